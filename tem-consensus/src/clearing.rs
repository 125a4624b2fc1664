/// The outcome of clearing one offer against the market
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clearing {
    /// The requested load reduction that was cleared
    pub offer: f64,
    /// The clearing price
    pub price: f64,
    /// Where on the price grid the clearing landed
    pub status: ClearingStatus,
}

impl Clearing {
    /// Whether the market could not absorb the whole offer
    ///
    /// In that case `price` is the highest price on the grid, and the load
    /// actually shed at that price falls short of the offer.
    pub fn is_under_cleared(&self) -> bool {
        self.status == ClearingStatus::Ceiling
    }
}

/// How a clearing price relates to the aggregate curve
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ClearingStatus {
    /// The aggregate offsets the offer exactly at the clearing price
    Cleared,
    /// The offer is already met at the cheapest price; the price is clamped to it
    Floor,
    /// The offer exceeds what the highest price buys; the price is clamped to it
    Ceiling,
}
