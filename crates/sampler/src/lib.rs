#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
#![deny(missing_docs, unused_must_use)]

//! Categorical row sampler: the numeric core of the `sampling_id` operator.
//!
//! For every row of a `[batch_size, width]` weight matrix a threshold `r` is
//! drawn from (1.0, 2.0), the row's weights are subtracted from it left to
//! right, and the first column that drives `r` below zero is chosen. When no
//! column does, the last column is chosen. The *value* at the chosen column is
//! emitted, not the index.
//!
//! Contract: identical matrix + identical draw sequence -> identical output Vec.
//! Sampling itself never fails; only matrix construction and config loading
//! return errors.
//!
//! Layout:
//! - `element.rs` — numeric element kinds (`i32`, `i64`, `f32`, `f64`)
//! - `draw.rs` — `DrawSource` trait and the seeded/reseeding/scripted sources
//! - `matrix.rs` — `WeightMatrix` row-major view
//! - `sample.rs` — per-row scan, serial and rayon batch paths, `Sampler`
//! - `config.rs` — `SamplerConfig` (JSON / environment)

/// Numeric element kinds accepted as weights.
pub mod element;
/// Sources of thresholds in (1.0, 2.0).
pub mod draw;
/// Row-major weight matrix view.
pub mod matrix;
/// Inverse-CDF row scan and batch sampling.
pub mod sample;
/// Sampler configuration.
pub mod config;

pub use config::{ConfigError, DrawStrategy, SamplerConfig};
pub use draw::{ConfiguredDraws, DrawSource, ReseedingDraws, ScriptedDraws, SeededDraws};
pub use element::Element;
pub use matrix::{ShapeError, WeightMatrix};
pub use sample::{choose_index, sample_ids, sample_ids_par, sample_row, sample_with_draws, Sampler};
