//! Numeric clean-up applied to every payload before it leaves the engine.

/// NaN and infinities become `0.0` so payloads are always JSON-safe numbers.
#[inline]
pub fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Round half away from zero to two decimal places.
#[inline]
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Post-processing pass that replaces every non-finite number with zero.
pub trait Sanitize {
    fn sanitize(self) -> Self;
}

impl Sanitize for f64 {
    fn sanitize(self) -> Self {
        finite_or_zero(self)
    }
}

impl<T: Sanitize> Sanitize for Vec<T> {
    fn sanitize(self) -> Self {
        self.into_iter().map(Sanitize::sanitize).collect()
    }
}

impl<T: Sanitize> Sanitize for Option<T> {
    fn sanitize(self) -> Self {
        self.map(Sanitize::sanitize)
    }
}
