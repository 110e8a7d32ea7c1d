//! Piecewise-linear interpolation over sorted `(x, y)` knots.

/// Interpolate `x` over knots sorted by ascending `x`.
///
/// Outside the knot range the nearest endpoint's `y` is returned. Zero-width
/// segments resolve to their left knot. With no knots, `x` is returned
/// unchanged.
pub fn interpolate(knots: &[(f64, f64)], x: f64) -> f64 {
    let (first, last) = match (knots.first(), knots.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return x,
    };
    if x <= first.0 {
        return first.1;
    }
    if x >= last.0 {
        return last.1;
    }
    for pair in knots.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if x >= x0 && x <= x1 {
            let span = x1 - x0;
            if span <= 0.0 {
                return y0;
            }
            let t = (x - x0) / span;
            return y0 + t * (y1 - y0);
        }
    }
    last.1
}
