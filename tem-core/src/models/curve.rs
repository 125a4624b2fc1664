mod interpolate;
pub(crate) use interpolate::interpolate;

use super::Point;

/// A representation of a piecewise-linear, weakly monotone decreasing bid curve
///
/// A bid curve states how much load a participant offers at each price.
/// Curves in a consensus market must be:
/// - Piecewise-linear (defined by a non-empty sequence of breakpoints)
/// - Strictly increasing in price (no two breakpoints share a price)
/// - Weakly monotone decreasing in quantity (a higher price never buys less reduction)
///
/// All values must be finite. Outside its price range, the curve is extended
/// by the quantity of the nearest breakpoint.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "PwlCurveDto", into = "PwlCurveDto")
)]
pub struct PwlCurve(Vec<Point>);

impl PwlCurve {
    /// Creates a new PwlCurve from a vector of points, validating all constraints
    ///
    /// # Validation
    ///
    /// This function validates that:
    /// 1. The vector is not empty
    /// 2. No coordinate is NaN or infinite
    /// 3. No two consecutive points share a price
    /// 4. Points are ordered by ascending price, non-increasing quantity
    pub fn new(points: Vec<Point>) -> Result<Self, PwlCurveError> {
        if points.is_empty() {
            return Err(PwlCurveError::Empty);
        }

        let mut prev: Option<&Point> = None;
        for (index, point) in points.iter().enumerate() {
            if point.price.is_nan() || point.quantity.is_nan() {
                return Err(PwlCurveError::NaN);
            }
            if point.price.is_infinite() || point.quantity.is_infinite() {
                return Err(PwlCurveError::Infinity);
            }

            if let Some(prev) = prev {
                // Equal prices would leave the local slope undefined
                if point.price == prev.price {
                    return Err(PwlCurveError::DegenerateBreakpoint { index });
                }
                // `prev < point` may be None for incomparable points, so negate
                if !(prev < point) {
                    return Err(PwlCurveError::NonMonotone { index });
                }
            }

            prev = Some(point);
        }

        Ok(Self(points))
    }

    /// Parses the flat `p0, q0, p1, q1, ...` form exchanged between participants
    ///
    /// A flat curve must hold at least two breakpoints, so a single-point
    /// curve can be built with [`PwlCurve::new`] but not received this way.
    pub fn from_flat(values: &[f64]) -> Result<Self, PwlCurveError> {
        if values.len() < 4 || values.len() % 2 != 0 {
            return Err(PwlCurveError::MalformedSerializedCurve { len: values.len() });
        }

        let points = values
            .chunks_exact(2)
            .map(|pair| Point {
                price: pair[0],
                quantity: pair[1],
            })
            .collect();

        Self::new(points)
    }

    /// Writes the curve in the flat `p0, q0, p1, q1, ...` form
    pub fn to_flat(&self) -> Vec<f64> {
        self.0
            .iter()
            .flat_map(|point| [point.price, point.quantity])
            .collect()
    }

    /// The quantity offered at `price`
    ///
    /// Interpolates linearly between breakpoints and clamps to the first or
    /// last quantity outside the curve's price range.
    pub fn quantity_at_price(&self, price: f64) -> f64 {
        interpolate(price, &self.0, |point| (point.price, point.quantity))
    }

    /// Returns the price range `(min_price, max_price)` covered by the breakpoints
    pub fn domain(&self) -> (f64, f64) {
        // construction guarantees at least one point
        (self.0[0].price, self.0[self.0.len() - 1].price)
    }

    /// The breakpoints of the curve, in ascending price order
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// The prices of the breakpoints, in ascending order
    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(|point| point.price)
    }

    /// The number of breakpoints (always at least one)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the curve has no breakpoints (never true for a constructed curve)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts the curve into its constituent points
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

/// DTO to ensure that we always validate when we deserialize from an untrusted source
///
/// The wire form is the flat `p0, q0, p1, q1, ...` array.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Debug)]
pub struct PwlCurveDto(pub Vec<f64>);

impl From<PwlCurve> for PwlCurveDto {
    fn from(value: PwlCurve) -> Self {
        Self(value.to_flat())
    }
}

impl TryFrom<PwlCurveDto> for PwlCurve {
    type Error = PwlCurveError;

    fn try_from(value: PwlCurveDto) -> Result<Self, Self::Error> {
        Self::from_flat(&value.0)
    }
}

/// Errors that can occur when creating or validating a PwlCurve
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum PwlCurveError {
    /// Error when no points are provided
    #[error("No points provided")]
    Empty,
    /// Error when a flat curve has odd length or fewer than two breakpoints
    #[error("Serialized curve of length {len} is not a sequence of price, quantity pairs")]
    MalformedSerializedCurve {
        /// The length of the rejected sequence
        len: usize,
    },
    /// Error when any coordinate value is NaN
    #[error("NaN value encountered")]
    NaN,
    /// Error when any coordinate value is infinite
    #[error("Prices and quantities cannot be infinite")]
    Infinity,
    /// Error when two consecutive breakpoints share a price
    #[error("Breakpoint {index} repeats the price of its predecessor")]
    DegenerateBreakpoint {
        /// The index of the second of the two equal breakpoints
        index: usize,
    },
    /// Error when points violate the monotonicity requirement
    #[error("Breakpoint {index} is not ordered by ascending price, non-increasing quantity")]
    NonMonotone {
        /// The index of the first out-of-order breakpoint
        index: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(price: f64, quantity: f64) -> Point {
        Point { price, quantity }
    }

    fn scenario() -> PwlCurve {
        PwlCurve::new(vec![pt(0.0, 0.0), pt(2.0, -1.0), pt(4.0, -2.0)]).unwrap()
    }

    #[test]
    fn test_empty_curve() {
        assert_eq!(PwlCurve::new(vec![]).unwrap_err(), PwlCurveError::Empty);
    }

    #[test]
    fn test_nan_and_infinity() {
        assert_eq!(
            PwlCurve::new(vec![pt(f64::NAN, 0.0)]).unwrap_err(),
            PwlCurveError::NaN
        );
        assert_eq!(
            PwlCurve::new(vec![pt(0.0, 0.0), pt(1.0, f64::NAN)]).unwrap_err(),
            PwlCurveError::NaN
        );
        assert_eq!(
            PwlCurve::new(vec![pt(0.0, 0.0), pt(f64::INFINITY, -1.0)]).unwrap_err(),
            PwlCurveError::Infinity
        );
    }

    #[test]
    fn test_degenerate_price() {
        assert_eq!(
            PwlCurve::new(vec![pt(0.0, 0.0), pt(2.0, -1.0), pt(2.0, -2.0)]).unwrap_err(),
            PwlCurveError::DegenerateBreakpoint { index: 2 }
        );
    }

    #[test]
    fn test_non_monotone() {
        // prices going backwards
        assert_eq!(
            PwlCurve::new(vec![pt(2.0, 0.0), pt(1.0, -1.0)]).unwrap_err(),
            PwlCurveError::NonMonotone { index: 1 }
        );
        // quantity rising with price
        assert_eq!(
            PwlCurve::new(vec![pt(0.0, -1.0), pt(1.0, 0.0)]).unwrap_err(),
            PwlCurveError::NonMonotone { index: 1 }
        );
    }

    #[test]
    fn test_flat_segment_is_valid() {
        assert!(PwlCurve::new(vec![pt(0.0, -1.0), pt(1.0, -1.0)]).is_ok());
    }

    #[test]
    fn test_single_point() {
        let curve = PwlCurve::new(vec![pt(1.0, -3.0)]).unwrap();
        assert_eq!(curve.domain(), (1.0, 1.0));
        assert_eq!(curve.len(), 1);
        assert!(!curve.is_empty());
        assert_eq!(curve.quantity_at_price(-5.0), -3.0);
        assert_eq!(curve.quantity_at_price(5.0), -3.0);
    }

    #[test]
    fn test_malformed_flat() {
        assert_eq!(
            PwlCurve::from_flat(&[]).unwrap_err(),
            PwlCurveError::MalformedSerializedCurve { len: 0 }
        );
        assert_eq!(
            PwlCurve::from_flat(&[0.0, 0.0, 1.0]).unwrap_err(),
            PwlCurveError::MalformedSerializedCurve { len: 3 }
        );
        assert_eq!(
            PwlCurve::from_flat(&[1.0, -1.0]).unwrap_err(),
            PwlCurveError::MalformedSerializedCurve { len: 2 }
        );
    }

    #[test]
    fn test_flat_layout() {
        let curve = PwlCurve::from_flat(&[0.0, 0.0, 2.0, -1.0, 4.0, -2.0]).unwrap();
        assert_eq!(curve, scenario());
        assert_eq!(curve.to_flat(), vec![0.0, 0.0, 2.0, -1.0, 4.0, -2.0]);
    }

    #[test]
    fn test_quantity_at_price() {
        let curve = scenario();
        assert_eq!(curve.quantity_at_price(-1.0), 0.0);
        assert_eq!(curve.quantity_at_price(1.0), -0.5);
        assert_eq!(curve.quantity_at_price(3.0), -1.5);
        assert_eq!(curve.quantity_at_price(9.0), -2.0);
    }

    #[test]
    fn test_deserialize_flat() {
        let curve = serde_json::from_str::<PwlCurve>("[0.0, 0.0, 2.0, -1.0]").unwrap();
        assert_eq!(curve.domain(), (0.0, 2.0));

        assert!(serde_json::from_str::<PwlCurve>("[0.0, 0.0, 2.0]").is_err());
        assert!(serde_json::from_str::<PwlCurve>("[0.0, 0.0]").is_err());
        assert!(serde_json::from_str::<PwlCurve>("[0.0, 0.0, 0.0, -1.0]").is_err());
    }
}
