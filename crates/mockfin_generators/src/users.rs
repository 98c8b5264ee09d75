//! User generation.

use tracing::debug;

use mockfin_core::catalog::ReferenceCatalog;
use mockfin_core::record::column_names;
use mockfin_core::types::{ActivityLevelId, CountryId, InvestorProfileId, User, UserId};
use mockfin_core::{GeneratorError, MockRng, Record, Row, RowGenerator, WeightedSampler};

use crate::lifecycle::LifecycleSampler;

/// Generator for the user stage.
///
/// Investor profile, activity level and country are drawn through weighted
/// samplers built from the catalog; dates come from the lifecycle sampler.
pub struct UserGenerator {
    profiles: WeightedSampler<InvestorProfileId>,
    activity_levels: WeightedSampler<ActivityLevelId>,
    countries: WeightedSampler<CountryId>,
    lifecycle: LifecycleSampler,
    count: u64,
    next_id: u64,
    rng: MockRng,
}

impl UserGenerator {
    /// Creates a generator emitting `count` users.
    pub fn new(
        catalog: &ReferenceCatalog,
        lifecycle: LifecycleSampler,
        count: u64,
        rng: MockRng,
    ) -> Result<Self, GeneratorError> {
        if count == 0 {
            return Err(GeneratorError::invalid_input("user count must be positive"));
        }
        debug!(count, "Building user generator");
        Ok(Self {
            profiles: catalog.investor_profile_sampler()?,
            activity_levels: catalog.activity_level_sampler()?,
            countries: catalog.country_sampler()?,
            lifecycle,
            count,
            next_id: 1,
            rng,
        })
    }

    /// Produces the next user.
    pub fn next_user(&mut self) -> Result<User, GeneratorError> {
        if !self.has_more() {
            return Err(GeneratorError::Exhausted("users"));
        }
        let id = UserId::new(self.next_id);
        self.next_id += 1;

        let investor_profile_id = *self.profiles.draw(&mut self.rng);
        let activity_level_id = *self.activity_levels.draw(&mut self.rng);
        let country_id = *self.countries.draw(&mut self.rng);
        let lifecycle = self.lifecycle.sample(&mut self.rng);

        let user = User {
            id,
            investor_profile_id,
            activity_level_id,
            country_id,
            join_date: lifecycle.join_date,
            departure_date: lifecycle.departure_date,
            status: lifecycle.status,
        };
        user.validate()?;
        Ok(user)
    }
}

impl RowGenerator for UserGenerator {
    fn column_names(&self) -> Vec<&'static str> {
        column_names(User::COLUMNS)
    }

    fn has_more(&self) -> bool {
        self.next_id <= self.count
    }

    fn next_row(&mut self) -> Result<Row, GeneratorError> {
        self.next_user().map(|user| user.to_row())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mockfin_core::generator::collect_rows;
    use mockfin_core::types::{DateRange, UserStatus};
    use std::collections::HashMap;

    fn window() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_users_reference_catalog_entries() {
        let catalog = ReferenceCatalog::builtin();
        let lifecycle = LifecycleSampler::with_defaults(window());
        let mut gen = UserGenerator::new(&catalog, lifecycle, 200, MockRng::from_seed(21)).unwrap();
        let users: Vec<User> = collect_rows(&mut gen)
            .unwrap()
            .iter()
            .map(|row| User::from_row(row).unwrap())
            .collect();

        assert_eq!(users.len(), 200);
        for (index, user) in users.iter().enumerate() {
            assert_eq!(user.id.get(), index as u64 + 1);
            assert!(catalog.country(user.country_id).is_some());
            assert!(catalog.activity_level(user.activity_level_id).is_some());
            assert!(catalog
                .investor_profiles
                .iter()
                .any(|p| p.id == user.investor_profile_id));
        }
        assert!(users.iter().any(|u| u.status == UserStatus::Active));
    }

    #[test]
    fn test_country_distribution_follows_weights() {
        let catalog = ReferenceCatalog::builtin();
        let lifecycle = LifecycleSampler::with_defaults(window());
        let n = 10_000;
        let mut gen = UserGenerator::new(&catalog, lifecycle, n, MockRng::from_seed(22)).unwrap();
        let mut counts: HashMap<CountryId, u64> = HashMap::new();
        while gen.has_more() {
            *counts.entry(gen.next_user().unwrap().country_id).or_default() += 1;
        }
        for country in &catalog.countries {
            let observed = *counts.get(&country.id).unwrap_or(&0) as f64 / n as f64 * 100.0;
            assert!(
                (observed - country.weight).abs() < 2.0,
                "{} drawn {:.2}%, expected {}%",
                country.code,
                observed,
                country.weight
            );
        }
    }

    #[test]
    fn test_zero_count_rejected() {
        let catalog = ReferenceCatalog::builtin();
        let lifecycle = LifecycleSampler::with_defaults(window());
        assert!(UserGenerator::new(&catalog, lifecycle, 0, MockRng::from_seed(1)).is_err());
    }
}
