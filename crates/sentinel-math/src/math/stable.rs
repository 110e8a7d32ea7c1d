//! Guarded arithmetic for probabilities.
//!
//! Everything here is total: NaN and infinities map to a documented value
//! instead of propagating through the scoring pipeline.

/// Clamp a value into `[0, 1]`. NaN maps to 0.
pub fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        return 0.0;
    }
    p.clamp(0.0, 1.0)
}

/// Clamp a finite value into `[0, 1]`, or return `None` for NaN/±inf.
pub fn finite_probability(p: f64) -> Option<f64> {
    if p.is_finite() {
        Some(p.clamp(0.0, 1.0))
    } else {
        None
    }
}

/// Clamp a prior into `[0, 1]`. In-range values pass through untouched.
///
/// Non-finite input falls back to `fallback` (itself clamped), then 0.5.
pub fn clamp_prior(p: f64, fallback: f64) -> f64 {
    let value = if p.is_finite() { p } else { fallback };
    if !value.is_finite() {
        return 0.5;
    }
    value.clamp(0.0, 1.0)
}

/// Divide, returning `fallback` when the denominator is zero or the result is not finite.
pub fn safe_div(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        return fallback;
    }
    let out = numerator / denominator;
    if out.is_finite() {
        out
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_probability_bounds() {
        assert_eq!(clamp_probability(-0.5), 0.0);
        assert_eq!(clamp_probability(1.5), 1.0);
        assert_eq!(clamp_probability(0.42), 0.42);
        assert_eq!(clamp_probability(f64::NAN), 0.0);
        assert_eq!(clamp_probability(f64::INFINITY), 1.0);
    }

    #[test]
    fn finite_probability_rejects_non_finite() {
        assert_eq!(finite_probability(f64::NAN), None);
        assert_eq!(finite_probability(f64::NEG_INFINITY), None);
        assert_eq!(finite_probability(2.0), Some(1.0));
    }

    #[test]
    fn clamp_prior_keeps_interior() {
        assert_eq!(clamp_prior(-0.2, 0.15), 0.0);
        assert_eq!(clamp_prior(1.7, 0.15), 1.0);
        assert_eq!(clamp_prior(1e-7, 0.15), 1e-7);
        assert_eq!(clamp_prior(1.0 - 1e-9, 0.15), 1.0 - 1e-9);
        assert_eq!(clamp_prior(f64::NAN, 0.15), 0.15);
        assert_eq!(clamp_prior(f64::NAN, f64::NAN), 0.5);
        assert_eq!(clamp_prior(0.3, 0.15), 0.3);
    }

    #[test]
    fn safe_div_fallbacks() {
        assert_eq!(safe_div(1.0, 0.0, 0.5), 0.5);
        assert_eq!(safe_div(1.0, f64::INFINITY, 0.5), 0.5);
        assert_eq!(safe_div(3.0, 2.0, 0.0), 1.5);
    }
}
