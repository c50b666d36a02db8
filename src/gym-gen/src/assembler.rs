use std::fmt::Write;
use std::ops::RangeInclusive;

use chrono::Duration;
use chrono::NaiveDate;
use indicatif::ProgressBar;
use indicatif::ProgressState;
use indicatif::ProgressStyle;
use rand::prelude::*;
use rust_decimal::Decimal;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::dataset::Customer;
use crate::dataset::Dataset;
use crate::dataset::DayPass;
use crate::dataset::GroupAges;
use crate::dataset::Item;
use crate::dataset::Member;
use crate::dataset::PassType;
use crate::dataset::Sale;
use crate::dataset::Visit;
use crate::error::GymGenError;
use crate::error::Result;
use crate::names::NameProvider;
use crate::sampler::VisitSampler;

const AGES: RangeInclusive<u32> = 5..=60;
const JOINED_DAYS_AGO: RangeInclusive<i64> = 30..=730;
const MEMBERSHIP_DAYS: RangeInclusive<i64> = 90..=365;
const VISIT_MINUTES: RangeInclusive<u32> = 30..=180;
const PARTY_SIZE: RangeInclusive<usize> = 1..=6;
const PRICE_CENTS: RangeInclusive<i64> = 500..=5000;

pub struct Config {
    pub customers: usize,
    pub members: usize,
    pub visits_per_member: RangeInclusive<u32>,
    pub day_pass_purchases: RangeInclusive<usize>,
    pub sales: RangeInclusive<usize>,
    // "today" of the simulation, memberships and purchases are placed before it
    pub today: NaiveDate,
    pub sampler: VisitSampler,
    pub progress: bool,
}

pub struct Assembler {
    names: NameProvider,
    customers: usize,
    members: usize,
    visits_per_member: RangeInclusive<u32>,
    day_pass_purchases: RangeInclusive<usize>,
    sales: RangeInclusive<usize>,
    today: NaiveDate,
    history_days: i64,
    sampler: VisitSampler,
    progress: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub skipped_visits: usize,
    pub skipped_day_passes: usize,
}

impl Assembler {
    pub fn try_new(cfg: Config) -> Result<Self> {
        if cfg.customers == 0 {
            return Err(GymGenError::InvalidConfig(
                "at least one customer is required".to_string(),
            ));
        }
        if cfg.members > cfg.customers {
            return Err(GymGenError::InvalidConfig(format!(
                "members ({}) can't outnumber customers ({})",
                cfg.members, cfg.customers
            )));
        }
        for (name, empty) in [
            ("visits per member", cfg.visits_per_member.is_empty()),
            ("day pass purchases", cfg.day_pass_purchases.is_empty()),
            ("sales", cfg.sales.is_empty()),
        ] {
            if empty {
                return Err(GymGenError::InvalidConfig(format!("{name} range is empty")));
            }
        }
        let history_days = cfg.sampler.window().len_days();
        if history_days < 1 {
            return Err(GymGenError::InvalidConfig(
                "simulation window must span at least one day".to_string(),
            ));
        }

        Ok(Self {
            names: NameProvider::standard()?,
            customers: cfg.customers,
            members: cfg.members,
            visits_per_member: cfg.visits_per_member,
            day_pass_purchases: cfg.day_pass_purchases,
            sales: cfg.sales,
            today: cfg.today,
            history_days,
            sampler: cfg.sampler,
            progress: cfg.progress,
        })
    }

    pub fn with_names(mut self, names: NameProvider) -> Self {
        self.names = names;
        self
    }

    /// Builds every table. All randomness comes from `rng`, so a seeded rng
    /// reproduces the same dataset.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(Dataset, Stats)> {
        let mut stats = Stats::default();

        info!("generating {} customers...", self.customers);
        let customers = self.customers(rng);
        info!("generating {} members...", self.members);
        let members = self.members(&customers, rng)?;
        info!("generating visits...");
        let visits = self.visits(&members, &mut stats, rng)?;
        info!("generating day passes...");
        let day_passes = self.day_passes(&customers, &members, &mut stats, rng)?;
        info!("generating sales...");
        let sales = self.sales(&customers, rng)?;

        if stats.skipped_visits > 0 {
            warn!("{} visit(s) skipped by the sampler", stats.skipped_visits);
        }
        debug!(
            "{} day pass purchase(s) skipped for active members",
            stats.skipped_day_passes
        );

        Ok((
            Dataset {
                customers,
                members,
                visits,
                day_passes,
                sales,
            },
            stats,
        ))
    }

    fn days_ago(&self, days: i64) -> Result<NaiveDate> {
        self.today
            .checked_sub_signed(Duration::days(days))
            .ok_or_else(|| GymGenError::Internal(format!("{days} day(s) before {}", self.today)))
    }

    fn customers<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Customer> {
        (1..=self.customers as u64)
            .map(|customer_id| Customer {
                customer_id,
                name: self.names.sample(rng),
                age: rng.gen_range(AGES),
            })
            .collect()
    }

    // the first customers are the members, member_id == customer_id
    fn members<R: Rng + ?Sized>(&self, customers: &[Customer], rng: &mut R) -> Result<Vec<Member>> {
        let mut members = Vec::with_capacity(self.members);
        for customer in customers.iter().take(self.members) {
            let join_date = self.days_ago(rng.gen_range(JOINED_DAYS_AGO))?;
            let ends_at = join_date
                .checked_add_signed(Duration::days(rng.gen_range(MEMBERSHIP_DAYS)))
                .ok_or_else(|| GymGenError::Internal(format!("membership end after {join_date}")))?;

            members.push(Member {
                member_id: customer.customer_id,
                customer_id: customer.customer_id,
                name: customer.name.clone(),
                age: customer.age,
                join_date,
                is_active: ends_at > self.today,
            });
        }

        Ok(members)
    }

    fn visits<R: Rng + ?Sized>(
        &self,
        members: &[Member],
        stats: &mut Stats,
        rng: &mut R,
    ) -> Result<Vec<Visit>> {
        let pb = self.progress_bar(members.len() as u64)?;
        let mut visits = Vec::new();
        for member in members {
            let count = rng.gen_range(self.visits_per_member.clone());
            for _ in 0..count {
                let ts = match self.sampler.sample(rng) {
                    Ok(ts) => ts,
                    Err(err) if err.is_sampling() => {
                        debug!("member {}: {err}", member.member_id);
                        stats.skipped_visits += 1;
                        continue;
                    }
                    Err(err) => return Err(err),
                };

                visits.push(Visit {
                    visit_id: visits.len() as u64 + 1,
                    member_id: member.member_id,
                    date: ts.date,
                    time: ts.time(),
                    duration: rng.gen_range(VISIT_MINUTES),
                });
            }
            pb.inc(1);
        }
        pb.finish_with_message("done");

        Ok(visits)
    }

    fn day_passes<R: Rng + ?Sized>(
        &self,
        customers: &[Customer],
        members: &[Member],
        stats: &mut Stats,
        rng: &mut R,
    ) -> Result<Vec<DayPass>> {
        let attempts = rng.gen_range(self.day_pass_purchases.clone());
        let mut day_passes = Vec::with_capacity(attempts);
        for _ in 0..attempts {
            let purchaser = self.pick_customer(customers, rng)?;
            // active members climb on their membership
            if self.member_of(purchaser, members).is_some_and(|m| m.is_active) {
                stats.skipped_day_passes += 1;
                continue;
            }

            let party = rng.gen_range(PARTY_SIZE);
            let mut ages = Vec::with_capacity(party);
            ages.push(purchaser.age);
            ages.extend((1..party).map(|_| rng.gen_range(AGES)));

            let date = self.days_ago(rng.gen_range(1..=self.history_days))?;
            let pass_type = *PassType::ALL
                .choose(rng)
                .ok_or_else(|| GymGenError::Internal("no pass types".to_string()))?;

            day_passes.push(DayPass {
                day_pass_id: day_passes.len() as u64 + 1,
                purchaser_id: purchaser.customer_id,
                date,
                pass_type,
                group_ages: GroupAges(ages),
            });
        }

        Ok(day_passes)
    }

    fn sales<R: Rng + ?Sized>(&self, customers: &[Customer], rng: &mut R) -> Result<Vec<Sale>> {
        let count = rng.gen_range(self.sales.clone());
        let mut sales = Vec::with_capacity(count);
        for sale_id in 1..=count as u64 {
            let customer = self.pick_customer(customers, rng)?;
            let member_id = (customer.customer_id <= self.members as u64).then_some(customer.customer_id);
            let date = self.days_ago(rng.gen_range(1..=self.history_days))?;
            let item = *Item::ALL
                .choose(rng)
                .ok_or_else(|| GymGenError::Internal("no items".to_string()))?;

            sales.push(Sale {
                sale_id,
                customer_id: customer.customer_id,
                member_id,
                date,
                item,
                price: Decimal::new(rng.gen_range(PRICE_CENTS), 2),
            });
        }

        Ok(sales)
    }

    fn pick_customer<'a, R: Rng + ?Sized>(
        &self,
        customers: &'a [Customer],
        rng: &mut R,
    ) -> Result<&'a Customer> {
        customers
            .choose(rng)
            .ok_or_else(|| GymGenError::Internal("no customers".to_string()))
    }

    fn member_of<'a>(&self, customer: &Customer, members: &'a [Member]) -> Option<&'a Member> {
        if customer.customer_id == 0 || customer.customer_id > self.members as u64 {
            return None;
        }
        members.get(customer.customer_id as usize - 1)
    }

    fn progress_bar(&self, len: u64) -> Result<ProgressBar> {
        if !self.progress {
            return Ok(ProgressBar::hidden());
        }

        let style = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} members ({eta})",
        )
        .map_err(|err| GymGenError::Internal(err.to_string()))?
        .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
            let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
        })
        .progress_chars("#>-");

        Ok(ProgressBar::new(len).with_style(style))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;
    use chrono::NaiveDate;
    use chrono::Timelike;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rust_decimal::Decimal;

    use super::Assembler;
    use super::Config;
    use crate::error::GymGenError;
    use crate::sampler::DailyHourProfile;
    use crate::sampler::SimulationWindow;
    use crate::sampler::VisitSampler;
    use crate::sampler::WeekdayWeightTable;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn config() -> Config {
        Config {
            customers: 200,
            members: 40,
            visits_per_member: 5..=20,
            day_pass_purchases: 100..=200,
            sales: 50..=100,
            today: today(),
            sampler: VisitSampler::new(
                WeekdayWeightTable::default(),
                DailyHourProfile::climbing_gym(),
                SimulationWindow::ending_at(today(), 730).unwrap(),
            ),
            progress: false,
        }
    }

    #[test]
    fn test_invalid_config() {
        let mut cfg = config();
        cfg.members = 201;
        assert!(matches!(
            Assembler::try_new(cfg),
            Err(GymGenError::InvalidConfig(_))
        ));

        let mut cfg = config();
        cfg.sales = 10..=1;
        assert!(Assembler::try_new(cfg).is_err());

        let mut cfg = config();
        cfg.customers = 0;
        cfg.members = 0;
        assert!(Assembler::try_new(cfg).is_err());
    }

    #[test]
    fn test_tables() {
        let asm = Assembler::try_new(config()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (ds, stats) = asm.run(&mut rng).unwrap();

        assert_eq!(ds.customers.len(), 200);
        assert_eq!(ds.members.len(), 40);
        assert_eq!(stats.skipped_visits, 0);
        assert!(ds.customers.iter().all(|c| (5..=60).contains(&c.age)));

        for (idx, m) in ds.members.iter().enumerate() {
            assert_eq!(m.member_id, idx as u64 + 1);
            assert_eq!(m.customer_id, m.member_id);
            assert_eq!(m.name, ds.customers[idx].name);
            assert!(m.join_date < today());
        }

        assert!(ds.visits.len() >= 40 * 5 && ds.visits.len() <= 40 * 20);
        let profile = DailyHourProfile::climbing_gym();
        for (idx, v) in ds.visits.iter().enumerate() {
            assert_eq!(v.visit_id, idx as u64 + 1);
            assert!(v.member_id >= 1 && v.member_id <= 40);
            assert!(v.date < today());
            assert!((30..=180).contains(&v.duration));
            let bands = profile.bands(v.date.weekday()).unwrap();
            assert!(bands.iter().any(|b| b.contains(v.time.hour())));
        }

        assert!(ds.day_passes.len() + stats.skipped_day_passes >= 100);
        for (idx, dp) in ds.day_passes.iter().enumerate() {
            assert_eq!(dp.day_pass_id, idx as u64 + 1);
            let purchaser = &ds.customers[dp.purchaser_id as usize - 1];
            assert_eq!(dp.group_ages.0[0], purchaser.age);
            assert!((1..=6).contains(&dp.group_ages.0.len()));
            if dp.purchaser_id <= 40 {
                assert!(!ds.members[dp.purchaser_id as usize - 1].is_active);
            }
        }

        assert!((50..=100).contains(&ds.sales.len()));
        for s in &ds.sales {
            match s.member_id {
                Some(member_id) => {
                    assert_eq!(member_id, s.customer_id);
                    assert!(member_id <= 40);
                }
                None => assert!(s.customer_id > 40),
            }
            assert!(s.price >= Decimal::new(500, 2) && s.price <= Decimal::new(5000, 2));
            assert_eq!(s.price.scale(), 2);
        }
    }

    #[test]
    fn test_same_seed_same_dataset() {
        let asm = Assembler::try_new(config()).unwrap();
        let (a, _) = asm.run(&mut ChaCha8Rng::seed_from_u64(5)).unwrap();
        let (b, _) = asm.run(&mut ChaCha8Rng::seed_from_u64(5)).unwrap();
        let (c, _) = asm.run(&mut ChaCha8Rng::seed_from_u64(6)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_narrow_window_skips_visits() {
        let mut cfg = config();
        // Monday and Tuesday only, the default calendar picks other days most of the time
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        cfg.sampler = VisitSampler::new(
            WeekdayWeightTable::default(),
            DailyHourProfile::climbing_gym(),
            SimulationWindow::try_new(start, end).unwrap(),
        )
        .with_max_date_retries(20);
        let asm = Assembler::try_new(cfg).unwrap();
        let (ds, stats) = asm.run(&mut ChaCha8Rng::seed_from_u64(2)).unwrap();

        assert!(stats.skipped_visits > 0);
        assert!(ds
            .visits
            .iter()
            .all(|v| v.date >= start && v.date < end));
        for (idx, v) in ds.visits.iter().enumerate() {
            assert_eq!(v.visit_id, idx as u64 + 1);
        }
    }
}
