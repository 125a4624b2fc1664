use crate::{AggregateCurve, Cached, Clearing, Map};
use tem_core::{BidCurve, ParticipantId, PwlCurve, PwlCurveError};
use tracing::{Level, event, span};

/// A consensus market over the bid curves of its participants
///
/// Each participant holds exactly one curve; registering a known participant
/// replaces its curve. The aggregate curve is derived from the registered
/// curves on demand and cached until the next registration or removal, so a
/// batch of registrations costs a single recomputation at the next clearing.
///
/// The market is driven by one caller at a time: registrations take
/// `&mut self`, reads take `&self`.
#[derive(Clone, Debug, Default)]
pub struct ConsensusMarket {
    curves: Map<ParticipantId, PwlCurve>,
    aggregate: Cached<AggregateCurve>,
}

impl ConsensusMarket {
    /// A market without participants
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the curve of a locally built participant.
    ///
    /// Returns the curve previously registered under the same identifier.
    pub fn register_local(&mut self, bid: &BidCurve) -> Option<PwlCurve> {
        self.register(bid.id().clone(), bid.curve().clone())
    }

    /// Register (or replace) a participant's curve received in flat
    /// `p0, q0, p1, q1, ...` form.
    ///
    /// The curve is validated before it is stored; a rejected curve leaves the
    /// market, including any earlier curve of the same participant, untouched.
    pub fn register_remote(
        &mut self,
        id: impl Into<ParticipantId>,
        flat: &[f64],
    ) -> Result<Option<PwlCurve>, MarketError> {
        let id = id.into();
        match PwlCurve::from_flat(flat) {
            Ok(curve) => Ok(self.register(id, curve)),
            Err(source) => {
                event!(Level::WARN, participant = %id, err = source.to_string());
                Err(MarketError::Curve { id, source })
            }
        }
    }

    /// Register (or replace) an already validated curve
    pub fn register(&mut self, id: ParticipantId, curve: PwlCurve) -> Option<PwlCurve> {
        event!(
            Level::DEBUG,
            participant = %id,
            breakpoints = curve.len(),
            "registering bid curve"
        );
        self.aggregate.invalidate();
        self.curves.insert(id, curve)
    }

    /// Withdraw a participant from the market, returning its curve
    pub fn remove(&mut self, id: &str) -> Option<PwlCurve> {
        let removed = self.curves.shift_remove(id);
        if removed.is_some() {
            event!(Level::DEBUG, participant = id, "removing bid curve");
            self.aggregate.invalidate();
        }
        removed
    }

    /// The curve registered for a participant
    pub fn curve(&self, id: &str) -> Option<&PwlCurve> {
        self.curves.get(id)
    }

    /// The registered participants and their curves, in registration order
    pub fn curves(&self) -> impl Iterator<Item = (&ParticipantId, &PwlCurve)> {
        self.curves.iter()
    }

    /// The number of participants
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Whether the market has no participants
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// The sum of all registered curves, rebuilt if any curve changed since the last read
    pub fn aggregate(&self) -> &AggregateCurve {
        self.aggregate.get_or_init(|| {
            let span = span!(Level::DEBUG, "rebuilding aggregate curve");
            let _guard = span.enter();

            let aggregate = AggregateCurve::new(self.curves.values());
            event!(
                Level::DEBUG,
                participants = self.curves.len(),
                prices = aggregate.len(),
            );
            aggregate
        })
    }

    /// Clear a requested load reduction against the aggregate curve.
    ///
    /// See [`AggregateCurve::clear`] for the clearing rule. Fails if the
    /// market has no participants or the offer is not a finite number.
    pub fn clear_offer(&self, offer: f64) -> Result<Clearing, MarketError> {
        if !offer.is_finite() {
            return Err(MarketError::Offer(offer));
        }

        let clearing = self.aggregate().clear(offer).ok_or(MarketError::Empty)?;
        event!(
            Level::DEBUG,
            offer,
            price = clearing.price,
            status = ?clearing.status,
            "cleared offer"
        );
        Ok(clearing)
    }
}

/// Errors that can occur when operating a consensus market
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum MarketError {
    /// A participant's curve was rejected at registration
    #[error("invalid curve for participant {id}: {source}")]
    Curve {
        /// The participant whose curve was rejected
        id: ParticipantId,
        /// Why the curve was rejected
        source: PwlCurveError,
    },
    /// No participant has registered a curve, so no price can clear
    #[error("no participants in the market, clearing is not possible")]
    Empty,
    /// The offer is NaN or infinite
    #[error("offer must be finite, got {0}")]
    Offer(f64),
}
