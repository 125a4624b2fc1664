use std::cmp::Ordering;

/// A breakpoint of a piecewise-linear bid curve
///
/// Each point consists of:
/// - A price (the independent variable)
/// - A quantity (the load change offered at that price, negative for a reduction)
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// The price coordinate
    pub price: f64,
    /// The quantity coordinate
    pub quantity: f64,
}

// We define a partial ordering for point so that bid curve validation is:
// All consecutive pairs of points satisfy pt0 < pt1
// This means: pt0.price < pt1.price AND pt0.quantity >= pt1.quantity
impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (
            self.price.partial_cmp(&other.price),
            self.quantity.partial_cmp(&other.quantity),
        ) {
            (Some(Ordering::Less), Some(quantity)) => {
                if quantity.is_ge() {
                    Some(Ordering::Less)
                } else {
                    None
                }
            }
            (Some(Ordering::Greater), Some(quantity)) => {
                if quantity.is_le() {
                    Some(Ordering::Greater)
                } else {
                    None
                }
            }
            (Some(Ordering::Equal), Some(quantity)) => Some(quantity.reverse()),
            (None, _) | (_, None) => None,
        }
    }
}
