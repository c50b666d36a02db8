use chrono::Weekday;
use rand::Rng;

use crate::error::GymGenError;
use crate::error::Result;

/// Canonical iteration order, Monday first. Sampling walks weekdays in this order.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

// Saturday is the busiest day, Sunday the slowest, Wednesday carries the kids club.
const DEFAULT_WEIGHTS: [f64; 7] = [0.9, 0.9, 1.0, 0.9, 1.2, 2.0, 0.6];

/// Relative likelihood of a visit falling on each weekday.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekdayWeightTable {
    weights: [f64; 7],
    total: f64,
}

impl WeekdayWeightTable {
    /// `weights[0]` is Monday, `weights[6]` is Sunday.
    pub fn try_new(weights: [f64; 7]) -> Result<Self> {
        for (weekday, weight) in WEEKDAYS.iter().zip(weights.iter()) {
            if !weight.is_finite() || *weight <= 0. {
                return Err(GymGenError::InvalidConfig(format!(
                    "weight of {weekday:?} must be positive, got {weight}"
                )));
            }
        }

        Ok(Self {
            weights,
            total: weights.iter().sum(),
        })
    }

    pub fn weight(&self, weekday: Weekday) -> f64 {
        self.weights[weekday.num_days_from_monday() as usize]
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn probability(&self, weekday: Weekday) -> f64 {
        self.weight(weekday) / self.total
    }

    pub fn iter(&self) -> impl Iterator<Item = (Weekday, f64)> + '_ {
        WEEKDAYS.iter().copied().zip(self.weights.iter().copied())
    }
}

impl Default for WeekdayWeightTable {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS,
            total: DEFAULT_WEIGHTS.iter().sum(),
        }
    }
}

/// Inverse-CDF draw over the weekday table. Consumes exactly one draw from `rng`.
pub fn pick_weekday<R: Rng + ?Sized>(weights: &WeekdayWeightTable, rng: &mut R) -> Weekday {
    let u = rng.gen::<f64>() * weights.total;
    let mut cumulative = 0.;
    for (weekday, weight) in weights.iter() {
        cumulative += weight;
        if cumulative >= u {
            return weekday;
        }
    }

    // only reachable through floating point drift at the upper boundary
    Weekday::Sun
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::pick_weekday;
    use super::WeekdayWeightTable;
    use super::WEEKDAYS;

    #[test]
    fn test_rejects_non_positive_weights() {
        assert!(WeekdayWeightTable::try_new([1., 1., 1., 0., 1., 1., 1.]).is_err());
        assert!(WeekdayWeightTable::try_new([1., -1., 1., 1., 1., 1., 1.]).is_err());
        assert!(WeekdayWeightTable::try_new([1., 1., 1., 1., f64::NAN, 1., 1.]).is_err());
        assert!(WeekdayWeightTable::try_new([1.; 7]).is_ok());
    }

    #[test]
    fn test_default_total() {
        let weights = WeekdayWeightTable::default();
        assert!((weights.total() - 7.5).abs() < 1e-9);
        assert_eq!(weights.weight(Weekday::Sat), 2.0);
    }

    #[test]
    fn test_max_draw_returns_sunday() {
        // every draw yields the largest f64 below 1.0
        let mut rng = StepRng::new(u64::MAX, 0);
        let weights = WeekdayWeightTable::default();
        assert_eq!(pick_weekday(&weights, &mut rng), Weekday::Sun);
    }

    #[test]
    fn test_zero_draw_returns_monday() {
        let mut rng = StepRng::new(0, 0);
        let weights = WeekdayWeightTable::default();
        assert_eq!(pick_weekday(&weights, &mut rng), Weekday::Mon);
    }

    #[test]
    fn test_distribution() {
        const DRAWS: usize = 200_000;
        let weights = WeekdayWeightTable::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut counts = [0usize; 7];
        for _ in 0..DRAWS {
            counts[pick_weekday(&weights, &mut rng).num_days_from_monday() as usize] += 1;
        }

        let mut chi_square = 0.;
        for (idx, weekday) in WEEKDAYS.iter().enumerate() {
            let expected = weights.probability(*weekday);
            let observed = counts[idx] as f64 / DRAWS as f64;
            assert!(
                (observed - expected).abs() < 0.01,
                "{weekday:?}: observed {observed}, expected {expected}"
            );
            let expected_count = expected * DRAWS as f64;
            chi_square += (counts[idx] as f64 - expected_count).powi(2) / expected_count;
        }

        // critical value for 6 degrees of freedom at p = 0.001
        assert!(chi_square < 22.458, "chi-square {chi_square}");
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let weights = WeekdayWeightTable::default();
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        let left: Vec<Weekday> = (0..1000).map(|_| pick_weekday(&weights, &mut a)).collect();
        let right: Vec<Weekday> = (0..1000).map(|_| pick_weekday(&weights, &mut b)).collect();
        assert_eq!(left, right);
    }
}
