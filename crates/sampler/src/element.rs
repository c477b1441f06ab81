#![forbid(unsafe_code)]

use std::fmt::Debug;

/// A weight type the sampler can scan.
///
/// The running threshold is an `f64`; each weight is widened to `f64` before
/// it is subtracted, so the control flow is the same for every kind.
pub trait Element: Copy + Debug + PartialEq + Send + Sync + 'static {
    /// Widen the weight for subtraction from the threshold.
    fn to_f64(self) -> f64;
}

macro_rules! impl_element {
    ($($t:ty),* $(,)?) => {
        $(
            impl Element for $t {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_element!(i32, i64, f32, f64);
