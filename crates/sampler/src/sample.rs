#![forbid(unsafe_code)]

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::{SamplerConfig, DEFAULT_PARALLEL_MIN_ROWS};
use crate::draw::{ConfiguredDraws, DrawSource};
use crate::element::Element;
use crate::matrix::WeightMatrix;

/// Column chosen for one row under threshold `draw`.
///
/// Subtracts the weights from `draw` left to right and returns the first
/// column at which the running value is strictly negative. If none is, the
/// last column is returned (0 for an empty row).
pub fn choose_index<T: Element>(row: &[T], draw: f64) -> usize {
    let mut r = draw;
    for (j, w) in row.iter().enumerate() {
        r -= w.to_f64();
        if r < 0.0 {
            return j;
        }
    }
    row.len().saturating_sub(1)
}

/// Value at the chosen column, or `None` for an empty row.
pub fn sample_row<T: Element>(row: &[T], draw: f64) -> Option<T> {
    row.get(choose_index(row, draw)).copied()
}

fn sample_one<T: Element>(i: usize, row: &[T], draw: f64) -> Option<T> {
    let idx = choose_index(row, draw);
    trace!(row = i, draw, index = idx, "row sampled");
    row.get(idx).copied()
}

/// Sample every row in order, taking one draw per row.
///
/// Returns exactly `x.batch_size()` values.
pub fn sample_ids<T, D>(x: &WeightMatrix<'_, T>, draws: &mut D) -> Vec<T>
where
    T: Element,
    D: DrawSource + ?Sized,
{
    debug!(
        batch_size = x.batch_size(),
        width = x.width(),
        parallel = false,
        "sampling ids"
    );
    // WeightMatrix rows are never empty, so nothing is dropped here
    x.rows()
        .enumerate()
        .filter_map(|(i, row)| sample_one(i, row, draws.next_draw()))
        .collect()
}

/// Rayon variant of [`sample_ids`].
///
/// Draws are taken on the calling thread in row order before the rows are
/// scanned in parallel, so the result equals `sample_ids` for the same draw
/// sequence.
pub fn sample_ids_par<T, D>(x: &WeightMatrix<'_, T>, draws: &mut D) -> Vec<T>
where
    T: Element,
    D: DrawSource + ?Sized,
{
    let thresholds: Vec<f64> = (0..x.batch_size()).map(|_| draws.next_draw()).collect();
    sample_with_draws(x, &thresholds, true)
}

/// Scan rows against thresholds that were already drawn, `thresholds[i]`
/// for row `i`.
///
/// `thresholds` must hold `x.batch_size()` values; extra rows or extra
/// thresholds are ignored. Lets a caller take draws under a lock and scan
/// after releasing it.
pub fn sample_with_draws<T: Element>(x: &WeightMatrix<'_, T>, thresholds: &[f64], parallel: bool) -> Vec<T> {
    debug!(
        batch_size = x.batch_size(),
        width = x.width(),
        parallel,
        "sampling ids"
    );
    if parallel {
        x.as_slice()
            .par_chunks_exact(x.width())
            .zip(thresholds.par_iter())
            .enumerate()
            .filter_map(|(i, (row, &r))| sample_one(i, row, r))
            .collect()
    } else {
        x.rows()
            .zip(thresholds.iter())
            .enumerate()
            .filter_map(|(i, (row, &r))| sample_one(i, row, r))
            .collect()
    }
}

/// A draw source plus the serial/parallel cut-over.
#[derive(Clone, Debug)]
pub struct Sampler<D> {
    draws: D,
    parallel_min_rows: usize,
}

impl Sampler<ConfiguredDraws> {
    /// Build the draw source and cut-over described by `cfg`.
    pub fn from_config(cfg: &SamplerConfig) -> Self {
        Self {
            draws: cfg.strategy.build(),
            parallel_min_rows: cfg.parallel_min_rows,
        }
    }
}

impl<D: DrawSource> Sampler<D> {
    /// Sampler over `draws` with the default cut-over.
    pub fn new(draws: D) -> Self {
        Self {
            draws,
            parallel_min_rows: DEFAULT_PARALLEL_MIN_ROWS,
        }
    }

    /// Batches with at least `rows` rows go through rayon. `0` always does,
    /// `usize::MAX` never does.
    pub fn with_parallel_min_rows(mut self, rows: usize) -> Self {
        self.parallel_min_rows = rows;
        self
    }

    /// Current cut-over.
    pub fn parallel_min_rows(&self) -> usize {
        self.parallel_min_rows
    }

    /// Whether a batch of `batch_size` rows goes through rayon.
    pub fn is_parallel(&self, batch_size: usize) -> bool {
        batch_size >= self.parallel_min_rows
    }

    /// Take `n` thresholds in order.
    pub fn next_draws(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.draws.next_draw()).collect()
    }

    /// Sample one value per row of `x`.
    pub fn sample<T: Element>(&mut self, x: &WeightMatrix<'_, T>) -> Vec<T> {
        let thresholds = self.next_draws(x.batch_size());
        sample_with_draws(x, &thresholds, self.is_parallel(x.batch_size()))
    }

    /// The underlying draw source.
    pub fn draws(&self) -> &D {
        &self.draws
    }
}
