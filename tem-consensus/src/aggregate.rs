use crate::{Clearing, ClearingStatus};
use tem_core::{Point, PwlCurve};

/// The sum of every participant's bid curve on a common price grid
///
/// The grid is the sorted union of the distinct prices of all breakpoints of
/// all curves. Each curve is resampled onto the grid with the usual
/// interpolate-and-clamp rule, so a participant whose own price range does not
/// reach a grid price contributes its nearest end quantity there.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AggregateCurve {
    prices: Vec<f64>,
    quantities: Vec<f64>,
}

impl AggregateCurve {
    /// Sum the provided curves onto the union of their prices
    pub fn new<'a, I>(curves: I) -> Self
    where
        I: IntoIterator<Item = &'a PwlCurve>,
        I::IntoIter: Clone,
    {
        let curves = curves.into_iter();

        let mut prices = curves
            .clone()
            .flat_map(|curve| curve.prices())
            .collect::<Vec<_>>();
        prices.sort_by(f64::total_cmp);
        prices.dedup();

        let mut quantities = vec![0.0; prices.len()];
        for curve in curves {
            for (price, quantity) in prices.iter().zip(quantities.iter_mut()) {
                *quantity += curve.quantity_at_price(*price);
            }
        }

        Self { prices, quantities }
    }

    /// The price grid, ascending and without duplicates
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    /// The summed quantity at each grid price
    pub fn quantities(&self) -> &[f64] {
        &self.quantities
    }

    /// The (price, quantity) pairs of the composite curve
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.prices
            .iter()
            .zip(self.quantities.iter())
            .map(|(price, quantity)| Point {
                price: *price,
                quantity: *quantity,
            })
    }

    /// The number of grid prices
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether the grid is empty (no curves were summed)
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Find the price at which the aggregate reduction offsets `offer`.
    ///
    /// With `net[i] = -(quantity[i] + offer)`, which is non-decreasing for
    /// monotone curves, the clearing price is the zero crossing of `net`
    /// interpolated between its neighboring grid prices. When `net` is
    /// positive everywhere the cheapest price is returned ([`ClearingStatus::Floor`]);
    /// when it is negative everywhere the highest price is returned
    /// ([`ClearingStatus::Ceiling`]) and the offer is only partially served.
    ///
    /// Returns `None` for an empty grid.
    pub fn clear(&self, offer: f64) -> Option<Clearing> {
        let last = self.prices.len().checked_sub(1)?;
        let net = |i: usize| -(self.quantities[i] + offer);

        let clearing = |price: f64, status: ClearingStatus| Clearing {
            offer,
            price,
            status,
        };

        if net(0) > 0.0 {
            return Some(clearing(self.prices[0], ClearingStatus::Floor));
        }
        if net(last) < 0.0 {
            return Some(clearing(self.prices[last], ClearingStatus::Ceiling));
        }

        for i in 0..=last {
            let hi = net(i);
            if hi >= 0.0 {
                // On a grid price, or at the very first one, there is nothing to interpolate
                let price = if i == 0 || hi == 0.0 {
                    self.prices[i]
                } else {
                    let lo = net(i - 1);
                    let (p0, p1) = (self.prices[i - 1], self.prices[i]);
                    p0 + ((p1 - p0) / (hi - lo)) * (0.0 - lo)
                };
                return Some(clearing(price, ClearingStatus::Cleared));
            }
        }

        // Only reachable with a NaN offer, since net(last) >= 0 otherwise
        Some(clearing(self.prices[last], ClearingStatus::Ceiling))
    }
}
