use rand::distributions::WeightedIndex;
use rand::prelude::*;

use crate::error::GymGenError;
use crate::error::Result;

const AMERICAN_FIRST_NAMES: &[&str] = &[
    "James", "Michael", "Emma", "Olivia", "William", "Sophia", "Ethan", "Ava", "Benjamin",
    "Charlotte", "Bill", "Marshall", "Audrey", "Julia",
];
const CHINESE_FIRST_NAMES: &[&str] = &[
    "Xiao", "Wei", "Jing", "Li", "Zhang", "Chen", "Hao", "Mei", "Yuan", "Wen", "Xia",
];
const INTERNATIONAL_FIRST_NAMES: &[&str] = &[
    "Mateo", "Isabella", "Liam", "Santiago", "Amara", "Johannes", "Fatima", "Omar", "Anya",
    "Ivan", "Lux",
];
const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Lee", "Chen", "Garcia", "Schmidt", "Patel", "Nguyen", "Brown",
    "Takahashi", "Skleegore", "Banks", "Gates", "Aeterna",
];

/// Produces "First Last" names. Half of the first names come from the american pool, a
/// quarter each from the chinese and international pools.
pub struct NameProvider {
    first_names: Vec<&'static [&'static str]>,
    first_name_weight_idx: WeightedIndex<f64>,
    last_names: &'static [&'static str],
}

impl NameProvider {
    pub fn try_new(
        first_names: Vec<(&'static [&'static str], f64)>,
        last_names: &'static [&'static str],
    ) -> Result<Self> {
        if last_names.is_empty() || first_names.iter().any(|(pool, _)| pool.is_empty()) {
            return Err(GymGenError::InvalidConfig("empty name pool".to_string()));
        }
        let weights: Vec<f64> = first_names.iter().map(|(_, w)| *w).collect();

        Ok(Self {
            first_names: first_names.into_iter().map(|(pool, _)| pool).collect(),
            first_name_weight_idx: WeightedIndex::new(weights)
                .map_err(|err| GymGenError::InvalidConfig(err.to_string()))?,
            last_names,
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let pool = self.first_names[self.first_name_weight_idx.sample(rng)];
        let first = pool[rng.gen_range(0..pool.len())];
        let last = self.last_names[rng.gen_range(0..self.last_names.len())];

        format!("{first} {last}")
    }

    /// American, chinese and international first names in a 2:1:1 ratio.
    pub fn standard() -> Result<Self> {
        Self::try_new(
            vec![
                (AMERICAN_FIRST_NAMES, 2.),
                (CHINESE_FIRST_NAMES, 1.),
                (INTERNATIONAL_FIRST_NAMES, 1.),
            ],
            LAST_NAMES,
        )
    }
}
