use std::collections::HashMap;
use std::ops::Range;

use chrono::Weekday;
use rand::Rng;

use crate::error::GymGenError;
use crate::error::Result;
use crate::sampler::weekday::WeekdayWeightTable;
use crate::sampler::weekday::WEEKDAYS;

/// A named part of the day, e.g. "morning", with its candidate hours and relative weight.
#[derive(Debug, Clone, PartialEq)]
pub struct HourBand {
    name: String,
    from: u32,
    to: u32,
    weight: f64,
}

impl HourBand {
    /// `hours` is half-open, so `6..10` covers 6:00 through 9:00.
    pub fn try_new(name: impl Into<String>, hours: Range<u32>, weight: f64) -> Result<Self> {
        let name = name.into();
        if hours.is_empty() || hours.end > 24 {
            return Err(GymGenError::InvalidConfig(format!(
                "band {name:?} must cover a non-empty range within 0..24, got {hours:?}"
            )));
        }
        if !weight.is_finite() || weight <= 0. {
            return Err(GymGenError::InvalidConfig(format!(
                "band {name:?} weight must be positive, got {weight}"
            )));
        }

        Ok(Self {
            name,
            from: hours.start,
            to: hours.end,
            weight,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hours(&self) -> Range<u32> {
        self.from..self.to
    }

    pub fn contains(&self, hour: u32) -> bool {
        self.hours().contains(&hour)
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.hours())
    }
}

/// Ordered hour bands per weekday.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DailyHourProfile {
    bands: HashMap<Weekday, Vec<HourBand>>,
}

impl DailyHourProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the bands of `weekday`. Band order is the sampling order.
    pub fn insert(&mut self, weekday: Weekday, bands: Vec<HourBand>) -> Result<()> {
        if bands.is_empty() {
            return Err(GymGenError::InvalidConfig(format!(
                "hour profile of {weekday:?} has no bands"
            )));
        }
        self.bands.insert(weekday, bands);

        Ok(())
    }

    pub fn bands(&self, weekday: Weekday) -> Option<&[HourBand]> {
        self.bands.get(&weekday).map(|v| v.as_slice())
    }

    /// Weekdays that carry a weight but have no profile, in canonical order.
    pub fn missing(&self, weights: &WeekdayWeightTable) -> Vec<Weekday> {
        weights
            .iter()
            .map(|(weekday, _)| weekday)
            .filter(|weekday| !self.bands.contains_key(weekday))
            .collect()
    }

    /// Climbing gym calendar: evening peaks on weekdays, kids club on Wednesday
    /// afternoon, early sessions on Sunday.
    pub fn climbing_gym() -> Self {
        let evenings = |morning: f64, afternoon_to: u32, afternoon: f64, evening: f64| {
            vec![
                band("morning", 6..10, morning),
                band("afternoon", 10..afternoon_to, afternoon),
                band("evening", afternoon_to..23, evening),
            ]
        };

        let mut bands = HashMap::with_capacity(WEEKDAYS.len());
        bands.insert(Weekday::Mon, evenings(0.2, 17, 0.3, 0.5));
        bands.insert(Weekday::Tue, evenings(0.1, 17, 0.4, 0.5));
        bands.insert(Weekday::Wed, vec![
            band("morning", 6..10, 0.05),
            band("afternoon", 10..15, 0.25),
            band("kidsclub", 15..20, 0.45),
            band("evening", 20..23, 0.25),
        ]);
        bands.insert(Weekday::Thu, evenings(0.1, 17, 0.4, 0.5));
        bands.insert(Weekday::Fri, evenings(0.1, 16, 0.3, 0.6));
        bands.insert(Weekday::Sat, vec![
            band("morning", 7..11, 0.3),
            band("afternoon", 11..18, 0.4),
            band("evening", 18..23, 0.3),
        ]);
        bands.insert(Weekday::Sun, vec![
            band("early", 7..12, 0.5),
            band("afternoon", 12..15, 0.3),
            band("evening", 15..19, 0.2),
        ]);

        Self { bands }
    }
}

fn band(name: &str, hours: Range<u32>, weight: f64) -> HourBand {
    debug_assert!(
        hours.start < hours.end && hours.end <= 24 && weight > 0.,
        "invalid band {name}"
    );
    HourBand {
        name: name.to_string(),
        from: hours.start,
        to: hours.end,
        weight,
    }
}

/// Picks a band by weight, then an hour uniformly inside it. Consumes two draws.
pub fn pick_hour<R: Rng + ?Sized>(
    profile: &DailyHourProfile,
    weekday: Weekday,
    rng: &mut R,
) -> Result<u32> {
    let bands = profile
        .bands(weekday)
        .ok_or(GymGenError::UnknownWeekdayProfile(weekday))?;

    let total: f64 = bands.iter().map(|b| b.weight).sum();
    let u = rng.gen::<f64>() * total;
    let mut cumulative = 0.;
    for band in bands {
        cumulative += band.weight;
        if cumulative >= u {
            return Ok(band.pick(rng));
        }
    }

    match bands.last() {
        Some(band) => Ok(band.pick(rng)),
        None => Err(GymGenError::UnknownWeekdayProfile(weekday)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::band;
    use super::pick_hour;
    use super::DailyHourProfile;
    use super::HourBand;
    use crate::error::GymGenError;
    use crate::sampler::weekday::WeekdayWeightTable;
    use crate::sampler::weekday::WEEKDAYS;

    #[test]
    fn test_band_validation() {
        assert!(HourBand::try_new("empty", 10..10, 1.).is_err());
        assert!(HourBand::try_new("late", 20..25, 1.).is_err());
        assert!(HourBand::try_new("zero", 6..10, 0.).is_err());
        let band = HourBand::try_new("morning", 6..10, 0.2).unwrap();
        assert!(band.contains(6));
        assert!(band.contains(9));
        assert!(!band.contains(10));
    }

    #[test]
    fn test_climbing_gym_bands_are_valid() {
        let profile = DailyHourProfile::climbing_gym();
        for weekday in WEEKDAYS {
            for b in profile.bands(weekday).unwrap() {
                assert!(HourBand::try_new(b.name(), b.hours(), b.weight()).is_ok());
            }
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid band late")]
    fn test_invalid_builtin_band_panics() {
        let _ = band("late", 20..25, 1.);
    }

    #[test]
    fn test_empty_profile_entry_rejected() {
        let mut profile = DailyHourProfile::new();
        assert!(profile.insert(Weekday::Mon, vec![]).is_err());
    }

    #[test]
    fn test_unknown_weekday() {
        let mut profile = DailyHourProfile::new();
        profile
            .insert(Weekday::Mon, vec![HourBand::try_new("all", 0..24, 1.).unwrap()])
            .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let res = pick_hour(&profile, Weekday::Tue, &mut rng);
        assert!(matches!(res, Err(GymGenError::UnknownWeekdayProfile(Weekday::Tue))));
    }

    #[test]
    fn test_hours_within_bands() {
        let profile = DailyHourProfile::climbing_gym();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for weekday in WEEKDAYS {
            let bands = profile.bands(weekday).unwrap();
            for _ in 0..10_000 {
                let hour = pick_hour(&profile, weekday, &mut rng).unwrap();
                assert!(
                    bands.iter().any(|b| b.contains(hour)),
                    "{weekday:?}: hour {hour} outside declared bands"
                );
            }
        }
    }

    #[test]
    fn test_single_band() {
        let mut profile = DailyHourProfile::new();
        profile
            .insert(Weekday::Wed, vec![HourBand::try_new("kidsclub", 15..20, 0.45).unwrap()])
            .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..10_000 {
            let hour = pick_hour(&profile, Weekday::Wed, &mut rng).unwrap();
            assert!((15..20).contains(&hour));
        }
    }

    #[test]
    fn test_max_draw_lands_in_last_band() {
        let profile = DailyHourProfile::climbing_gym();
        // first draw is the largest value below 1.0, the hour draw then sees zero
        let mut rng = StepRng::new(u64::MAX, 1);
        let hour = pick_hour(&profile, Weekday::Sun, &mut rng).unwrap();
        assert_eq!(hour, 15);
    }

    #[test]
    fn test_band_frequencies() {
        const DRAWS: usize = 100_000;
        let profile = DailyHourProfile::climbing_gym();
        let bands = profile.bands(Weekday::Wed).unwrap();
        let total: f64 = bands.iter().map(|b| b.weight()).sum();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut counts = vec![0usize; bands.len()];
        for _ in 0..DRAWS {
            let hour = pick_hour(&profile, Weekday::Wed, &mut rng).unwrap();
            let idx = bands.iter().position(|b| b.contains(hour)).unwrap();
            counts[idx] += 1;
        }

        for (band, count) in bands.iter().zip(counts) {
            let observed = count as f64 / DRAWS as f64;
            let expected = band.weight() / total;
            assert!(
                (observed - expected).abs() < 0.01,
                "{}: observed {observed}, expected {expected}",
                band.name()
            );
        }
    }

    #[test]
    fn test_missing() {
        let mut profile = DailyHourProfile::new();
        profile
            .insert(Weekday::Sat, vec![HourBand::try_new("all", 0..24, 1.).unwrap()])
            .unwrap();
        let missing = profile.missing(&WeekdayWeightTable::default());
        assert_eq!(missing.len(), 6);
        assert!(!missing.contains(&Weekday::Sat));
        assert!(DailyHourProfile::climbing_gym()
            .missing(&WeekdayWeightTable::default())
            .is_empty());
    }
}
