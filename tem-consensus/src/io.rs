use crate::Map;
use serde::{Deserialize, Serialize};
use tem_core::{BidCurve, BidCurveError, ParticipantId, PwlCurve};

/// The bidding parameters of one building, as found in a building document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingDef {
    /// Price per degree of setpoint offset
    #[serde(rename = "RampSlope", alias = "k")]
    pub ramp_slope: f64,
    /// Size of the building relative to its per-unit load deltas
    #[serde(rename = "LoadScale", alias = "kWScale")]
    pub load_scale: f64,
    /// Thermostat setpoint offsets, increasing
    #[serde(rename = "dT")]
    pub setpoint_deltas: Vec<f64>,
    /// Per-unit load changes at those offsets, decreasing
    #[serde(rename = "dP")]
    pub load_deltas: Vec<f64>,
}

/// A building document: building name to its bidding parameters, in document order
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildingSet(pub Map<ParticipantId, BuildingDef>);

impl BuildingSet {
    /// Build the bid curve of every building, failing on the first invalid one
    pub fn into_curves(self) -> Result<Vec<BidCurve>, BuildingSetError> {
        if self.0.is_empty() {
            return Err(BuildingSetError::Empty);
        }

        self.0
            .into_iter()
            .map(|(id, def)| {
                BidCurve::new(
                    id.clone(),
                    def.ramp_slope,
                    def.load_scale,
                    def.setpoint_deltas,
                    def.load_deltas,
                )
                .map_err(|source| BuildingSetError::Building { id, source })
            })
            .collect()
    }
}

/// Curves published by remote participants: identifier to flat `p0, q0, p1, q1, ...` array
///
/// Every curve is validated as it is deserialized.
pub type RemoteCurves = Map<ParticipantId, PwlCurve>;

/// Errors that can occur when building curves from a building document
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum BuildingSetError {
    /// The document defines no building
    #[error("no building definitions")]
    Empty,
    /// A building's parameters do not form a valid bid curve
    #[error("building {id}: {source}")]
    Building {
        /// The offending building
        id: ParticipantId,
        /// Why its bid curve was rejected
        source: BidCurveError,
    },
}
