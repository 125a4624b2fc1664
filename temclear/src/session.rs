use crate::CliError;
use serde::Serialize;
use std::io::Read;
use tem_consensus::{
    AggregateCurve, BuildingSet, ConsensusMarket, Map, MarketError, RemoteCurves, Response,
};
use tem_core::{BidCurve, Breakpoint, ParticipantId, PwlCurve};
use tracing::{Level, event};

/// The local buildings and the market their curves (and any remote curves) are registered in
#[derive(Debug)]
pub struct Session {
    buildings: Vec<BidCurve>,
    market: ConsensusMarket,
}

impl Session {
    /// Read a building document and, optionally, a document of remote curves
    pub fn load<R: Read>(buildings: impl Read, remote: Option<R>) -> anyhow::Result<Self> {
        let buildings = serde_json::from_reader::<_, BuildingSet>(buildings)?.into_curves()?;
        let remote = match remote {
            Some(reader) => serde_json::from_reader::<_, RemoteCurves>(reader)?,
            None => RemoteCurves::default(),
        };
        Ok(Self::new(buildings, remote)?)
    }

    /// Register every building, then every remote curve.
    ///
    /// A remote curve may not reuse the name of a local building.
    pub fn new(buildings: Vec<BidCurve>, remote: RemoteCurves) -> Result<Self, CliError> {
        let mut market = ConsensusMarket::new();

        for bid in buildings.iter() {
            event!(
                Level::DEBUG,
                building = %bid.id(),
                ramp_slope = bid.ramp_slope(),
                load_scale = bid.load_scale(),
                "building bid curve"
            );
            for (index, row) in bid.breakpoints().iter().enumerate() {
                event!(
                    Level::DEBUG,
                    building = %bid.id(),
                    index,
                    setpoint_delta = row.setpoint_delta,
                    load_delta = row.load_delta,
                    price = row.price,
                    quantity = row.quantity,
                );
            }
            market.register_local(bid);
        }

        for (id, curve) in remote {
            if market.curve(id.as_str()).is_some() {
                return Err(CliError::DuplicateParticipant(id));
            }
            market.register(id, curve);
        }

        for point in market.aggregate().points() {
            event!(
                Level::DEBUG,
                price = point.price,
                quantity = point.quantity,
                "aggregate breakpoint"
            );
        }

        Ok(Self { buildings, market })
    }

    /// The local buildings, in document order
    pub fn buildings(&self) -> &[BidCurve] {
        &self.buildings
    }

    pub fn market(&self) -> &ConsensusMarket {
        &self.market
    }

    /// Clear one offer and evaluate every building's response
    pub fn respond(&self, offer: f64) -> Result<Response, MarketError> {
        let clearing = self.market.clear_offer(offer)?;
        Ok(Response::new(clearing, self.buildings.iter()))
    }

    /// Clear each offer in turn
    pub fn sweep(&self, offers: &[f64]) -> Result<Vec<Response>, MarketError> {
        offers.iter().map(|offer| self.respond(*offer)).collect()
    }

    /// Every building's bid table, every registered curve and the composite curve
    pub fn report(&self) -> CurvesReport<'_> {
        CurvesReport {
            buildings: self
                .buildings
                .iter()
                .map(|bid| {
                    let table = BuildingTable {
                        ramp_slope: bid.ramp_slope(),
                        load_scale: bid.load_scale(),
                        breakpoints: bid.breakpoints(),
                    };
                    (bid.id(), table)
                })
                .collect(),
            participants: self.market.curves().collect(),
            aggregate: self.market.aggregate(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct CurvesReport<'a> {
    pub buildings: Map<&'a ParticipantId, BuildingTable<'a>>,
    /// Flat `p0, q0, p1, q1, ...` curves of local and remote participants alike
    pub participants: Map<&'a ParticipantId, &'a PwlCurve>,
    pub aggregate: &'a AggregateCurve,
}

#[derive(Serialize, Debug)]
pub struct BuildingTable<'a> {
    pub ramp_slope: f64,
    pub load_scale: f64,
    pub breakpoints: &'a [Breakpoint],
}
