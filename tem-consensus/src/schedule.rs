use std::f64::consts::PI;

/// The most offers a schedule may expand to
pub const MAX_OFFERS: usize = 1_000_000;

/// A sequence of offers to clear, one after another
///
/// `Range` steps through offers evenly; `Diurnal` follows a daily cycle,
/// lowest at midnight and highest at noon:
/// `offer(h) = mean - amplitude * cos(2π h / 24)` for `samples` hours spread
/// evenly over `[0, 24]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum OfferSchedule {
    /// Offers `start, start + step, ...` up to and including `stop`
    Range {
        /// The first offer
        start: f64,
        /// The last offer (inclusive)
        stop: f64,
        /// The increment between offers
        step: f64,
    },
    /// Offers following a daily cosine profile
    Diurnal {
        /// The average offer over the day
        mean: f64,
        /// The swing of the offer around its mean
        amplitude: f64,
        /// The number of samples across the day
        samples: usize,
    },
}

impl Default for OfferSchedule {
    fn default() -> Self {
        Self::Range {
            start: 0.0,
            stop: 1900.0,
            step: 100.0,
        }
    }
}

impl OfferSchedule {
    /// The offers of the schedule, in order
    pub fn offers(&self) -> Result<Vec<f64>, ScheduleError> {
        match *self {
            Self::Range { start, stop, step } => {
                if !(start.is_finite() && stop.is_finite()) {
                    return Err(ScheduleError::NonFinite);
                }
                if !(step.is_finite() && step > 0.0) {
                    return Err(ScheduleError::Step(step));
                }
                if stop < start {
                    return Err(ScheduleError::EmptyRange { start, stop });
                }

                // tolerate rounding so that `stop` itself is reached
                let steps = ((stop - start) / step + 1e-9).floor();
                if !(steps < MAX_OFFERS as f64) {
                    return Err(ScheduleError::TooManyOffers);
                }
                let count = steps as usize + 1;
                Ok((0..count).map(|i| start + i as f64 * step).collect())
            }
            Self::Diurnal {
                mean,
                amplitude,
                samples,
            } => {
                if !(mean.is_finite() && amplitude.is_finite()) {
                    return Err(ScheduleError::NonFinite);
                }
                if samples < 2 {
                    return Err(ScheduleError::Samples(samples));
                }
                if samples > MAX_OFFERS {
                    return Err(ScheduleError::TooManyOffers);
                }

                let dt = 24.0 / (samples - 1) as f64;
                Ok((0..samples)
                    .map(|i| {
                        let hour = i as f64 * dt;
                        mean - amplitude * (2.0 * PI * hour / 24.0).cos()
                    })
                    .collect())
            }
        }
    }
}

/// Errors that can occur when expanding an offer schedule
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    /// A bound, mean or amplitude is NaN or infinite
    #[error("schedule parameters must be finite")]
    NonFinite,
    /// The range step is not positive
    #[error("range step must be positive, got {0}")]
    Step(f64),
    /// The range ends before it starts
    #[error("range stops at {stop} before it starts at {start}")]
    EmptyRange {
        /// The first offer
        start: f64,
        /// The last offer
        stop: f64,
    },
    /// Too few samples to span a day
    #[error("a diurnal schedule needs at least 2 samples, got {0}")]
    Samples(usize),
    /// The schedule would expand to more than [`MAX_OFFERS`] offers
    #[error("schedule yields more than {} offers", MAX_OFFERS)]
    TooManyOffers,
}
