/// Evaluate the piecewise-linear function through `knots` at `x`.
///
/// `coords` extracts the `(x, y)` pair of each knot; the x coordinates must be
/// strictly increasing. The function is clamped to the first knot's y for
/// `x <= x0` and to the last knot's y for `x >= xn`. Between knots, the
/// smallest `i` with `x <= x[i]` selects the segment, and a value exactly on a
/// knot returns that knot's y without rounding through the slope.
///
/// An empty slice evaluates to zero.
pub(crate) fn interpolate<T>(x: f64, knots: &[T], coords: impl Fn(&T) -> (f64, f64)) -> f64 {
    let (Some(first), Some(last)) = (knots.first(), knots.last()) else {
        return 0.0;
    };

    let (x0, y0) = coords(first);
    if x <= x0 {
        return y0;
    }

    let (xn, yn) = coords(last);
    if x >= xn {
        return yn;
    }

    for pair in knots.windows(2) {
        let (xa, ya) = coords(&pair[0]);
        let (xb, yb) = coords(&pair[1]);
        if x <= xb {
            if x == xb {
                return yb;
            }
            let slope = (yb - ya) / (xb - xa);
            return ya + slope * (x - xa);
        }
    }

    // Unreachable for finite x, since x < xn means some segment matched
    yn
}
