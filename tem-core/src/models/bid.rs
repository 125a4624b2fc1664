use super::{ParticipantId, Point, PwlCurve, PwlCurveError, curve::interpolate};

/// A building's bid curve, derived from its thermostat-setpoint flexibility
///
/// A building knows, from its thermal model, how far its load moves
/// (`load_deltas`, e.g. kW) when its cooling setpoint is offset by
/// `setpoint_deltas` (e.g. degF). Two scale factors turn this into an offer:
/// - `ramp_slope` maps a setpoint offset onto the price that would justify it
/// - `load_scale` maps the per-unit load change onto the building's size
///
/// so that breakpoint `i` of the published curve is
/// `(ramp_slope * setpoint_deltas[i], load_scale * load_deltas[i])`.
///
/// A higher clearing price corresponds to a larger setpoint offset and a
/// larger-magnitude load reduction, so setpoint deltas must be strictly
/// increasing and load deltas strictly decreasing.
#[derive(Clone, Debug)]
pub struct BidCurve {
    id: ParticipantId,
    ramp_slope: f64,
    load_scale: f64,
    breakpoints: Vec<Breakpoint>,
    curve: PwlCurve,
}

impl BidCurve {
    /// Builds the bid curve of a building, validating all constraints
    ///
    /// # Validation
    ///
    /// This function validates that:
    /// 1. Both delta sequences have the same, non-zero length
    /// 2. Both scale factors are finite and strictly positive
    /// 3. The derived price/quantity breakpoints form a valid [`PwlCurve`]
    /// 4. No two consecutive load deltas are equal (the inverse lookup needs a slope)
    pub fn new(
        id: impl Into<ParticipantId>,
        ramp_slope: f64,
        load_scale: f64,
        setpoint_deltas: Vec<f64>,
        load_deltas: Vec<f64>,
    ) -> Result<Self, BidCurveError> {
        if setpoint_deltas.len() != load_deltas.len() {
            return Err(BidCurveError::LengthMismatch {
                setpoints: setpoint_deltas.len(),
                loads: load_deltas.len(),
            });
        }
        if !(ramp_slope.is_finite() && ramp_slope > 0.0) {
            return Err(BidCurveError::RampSlope(ramp_slope));
        }
        if !(load_scale.is_finite() && load_scale > 0.0) {
            return Err(BidCurveError::LoadScale(load_scale));
        }

        let points = setpoint_deltas
            .iter()
            .zip(load_deltas.iter())
            .map(|(setpoint, load)| Point {
                price: ramp_slope * setpoint,
                quantity: load_scale * load,
            })
            .collect();
        let curve = PwlCurve::new(points)?;

        if let Some(index) = load_deltas
            .windows(2)
            .position(|pair| pair[0] == pair[1])
        {
            return Err(BidCurveError::DegenerateLoad { index: index + 1 });
        }

        let breakpoints = setpoint_deltas
            .into_iter()
            .zip(load_deltas)
            .zip(curve.points())
            .map(|((setpoint_delta, load_delta), point)| Breakpoint {
                setpoint_delta,
                load_delta,
                price: point.price,
                quantity: point.quantity,
            })
            .collect();

        Ok(Self {
            id: id.into(),
            ramp_slope,
            load_scale,
            breakpoints,
            curve,
        })
    }

    /// The participant this curve belongs to
    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    /// The price per unit of setpoint offset
    pub fn ramp_slope(&self) -> f64 {
        self.ramp_slope
    }

    /// The load per unit of load delta
    pub fn load_scale(&self) -> f64 {
        self.load_scale
    }

    /// The published price/quantity curve
    pub fn curve(&self) -> &PwlCurve {
        &self.curve
    }

    /// The curve in the flat `p0, q0, p1, q1, ...` form exchanged between participants
    pub fn to_flat(&self) -> Vec<f64> {
        self.curve.to_flat()
    }

    /// The raw and derived values of every breakpoint, in index order
    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    /// The load this building offers at `price`
    pub fn quantity_at_price(&self, price: f64) -> f64 {
        self.curve.quantity_at_price(price)
    }

    /// The setpoint offset that realizes a load change of `load`
    ///
    /// This inverts the construction of the curve: the load is rescaled by
    /// `load_scale` and interpolated over the (decreasing) load deltas. Loads
    /// above the first load delta clamp to the first setpoint delta, loads
    /// below the last clamp to the last.
    pub fn setpoint_delta_at_load(&self, load: f64) -> f64 {
        let load = load / self.load_scale;
        // Negating the decreasing load axis lets us walk it in ascending order
        interpolate(-load, &self.breakpoints, |row| {
            (-row.load_delta, row.setpoint_delta)
        })
    }
}

/// One row of a building's bid table
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Breakpoint {
    /// The thermostat-setpoint offset
    pub setpoint_delta: f64,
    /// The per-unit load change at that offset
    pub load_delta: f64,
    /// The derived price, `ramp_slope * setpoint_delta`
    pub price: f64,
    /// The derived quantity, `load_scale * load_delta`
    pub quantity: f64,
}

/// Errors that can occur when constructing a BidCurve
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum BidCurveError {
    /// The setpoint and load sequences are not index aligned
    #[error("{setpoints} setpoint deltas but {loads} load deltas")]
    LengthMismatch {
        /// The number of setpoint deltas
        setpoints: usize,
        /// The number of load deltas
        loads: usize,
    },
    /// The ramp slope is not a positive, finite number
    #[error("ramp slope must be positive and finite, got {0}")]
    RampSlope(f64),
    /// The load scale is not a positive, finite number
    #[error("load scale must be positive and finite, got {0}")]
    LoadScale(f64),
    /// Two consecutive load deltas are equal
    #[error("load delta {index} repeats the load of its predecessor")]
    DegenerateLoad {
        /// The index of the second of the two equal load deltas
        index: usize,
    },
    /// The derived price/quantity curve is invalid
    #[error("invalid bid curve: {0}")]
    Curve(#[from] PwlCurveError),
}
