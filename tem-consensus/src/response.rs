use crate::{Clearing, Map};
use tem_core::{BidCurve, ParticipantId};

/// How every local building responds to a clearing
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Response {
    /// The clearing the buildings respond to
    pub clearing: Clearing,
    /// The response of each building, in the order they were provided
    pub buildings: Map<ParticipantId, BuildingResponse>,
    /// The summed load change of all buildings
    pub total_load: f64,
}

/// One building's share of a clearing
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildingResponse {
    /// The load change offered at the clearing price (negative for a reduction)
    pub load: f64,
    /// The thermostat setpoint offset that realizes that load change
    pub setpoint_delta: f64,
}

impl Response {
    /// Evaluate each building's curve at the clearing price and invert the
    /// resulting load into a setpoint offset.
    pub fn new<'a>(clearing: Clearing, buildings: impl IntoIterator<Item = &'a BidCurve>) -> Self {
        let mut total_load = 0.0;
        let buildings = buildings
            .into_iter()
            .map(|bid| {
                let load = bid.quantity_at_price(clearing.price);
                total_load += load;
                let response = BuildingResponse {
                    load,
                    setpoint_delta: bid.setpoint_delta_at_load(load),
                };
                (bid.id().clone(), response)
            })
            .collect();

        Self {
            clearing,
            buildings,
            total_load,
        }
    }
}
