mod bid;
mod curve;
mod participant;
mod point;

pub use bid::{BidCurve, BidCurveError, Breakpoint};
pub use curve::{PwlCurve, PwlCurveDto, PwlCurveError};
pub use participant::ParticipantId;
pub use point::Point;
