//! Transaction simulation.
//!
//! ## Regular trading
//!
//! A user trades between the join date and an effective end: the departure
//! date for departed users, otherwise the latest priced date. The number of
//! draws is `floor(annual * days / 365)`, raised to one when the period
//! spans more than a day. Each draw picks a uniform date in the inclusive
//! period; a date without prices yields nothing, otherwise a uniform priced
//! asset is traded with an even chance of BUY or SELL.
//!
//! ## Departure liquidation
//!
//! A departed user sells two to five distinct assets priced on the
//! departure date, at twice the usual amount scale.
//!
//! ## Amounts and currencies
//!
//! A base amount is drawn uniformly in 1,000..=50,000 (scaled for
//! liquidations), quantised to whole shares at the day's price, and booked
//! in a currency drawn from the user's [`CurrencyPreference`].

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

use mockfin_core::catalog::ReferenceCatalog;
use mockfin_core::record::column_names;
use mockfin_core::types::{
    ActivityLevelId, AssetId, CountryId, CurrencyId, Transaction, TransactionId, TransactionType,
    User, UserStatus,
};
use mockfin_core::{CatalogError, GeneratorError, MockRng, Record, Row, RowGenerator, WeightedSampler};

use crate::price_book::PriceBook;

/// Lower bound of the base trade amount.
pub const MIN_BASE_AMOUNT: f64 = 1_000.0;
/// Upper bound of the base trade amount.
pub const MAX_BASE_AMOUNT: f64 = 50_000.0;
/// Amount multiplier applied to liquidation sells.
pub const LIQUIDATION_SCALE: f64 = 2.0;
/// Fewest assets sold on departure.
pub const MIN_LIQUIDATED_ASSETS: usize = 2;
/// Most assets sold on departure.
pub const MAX_LIQUIDATED_ASSETS: usize = 5;

const DAYS_PER_YEAR: i64 = 365;

/// Per-user currency distribution.
///
/// The home currency takes a whole percentage between 70 and 80. With 60%
/// probability a non-home international currency takes the remainder,
/// chosen among the designated majors when one differs from home;
/// otherwise home takes everything.
#[derive(Clone, Debug)]
pub struct CurrencyPreference {
    home: CurrencyId,
    international: Option<CurrencyId>,
    home_percent: u32,
    sampler: WeightedSampler<CurrencyId>,
}

impl CurrencyPreference {
    /// Probability that a user trades in a second currency.
    pub const INTERNATIONAL_PROBABILITY: f64 = 0.60;

    /// Draws a preference for a user whose home currency is `home`.
    ///
    /// `majors` lists the preferred international currencies; `currencies`
    /// is the fallback pool when every major equals `home`.
    pub fn sample(
        home: CurrencyId,
        majors: &[CurrencyId],
        currencies: &[CurrencyId],
        rng: &mut MockRng,
    ) -> Result<Self, GeneratorError> {
        let home_percent: u32 = rng.gen_range(70..=80);
        let wants_international = rng.gen_bool(Self::INTERNATIONAL_PROBABILITY);

        let international = if wants_international {
            let preferred: Vec<CurrencyId> = majors.iter().copied().filter(|c| *c != home).collect();
            let pool: Vec<CurrencyId> = if preferred.is_empty() {
                currencies.iter().copied().filter(|c| *c != home).collect()
            } else {
                preferred
            };
            pool.choose(rng).copied()
        } else {
            None
        };

        let weights = match international {
            Some(other) => vec![
                (home, f64::from(home_percent)),
                (other, f64::from(100 - home_percent)),
            ],
            None => vec![(home, 100.0)],
        };

        Ok(Self {
            home,
            international,
            home_percent: if international.is_some() { home_percent } else { 100 },
            sampler: WeightedSampler::new(weights)?,
        })
    }

    /// Home currency.
    pub fn home(&self) -> CurrencyId {
        self.home
    }

    /// International currency, if any.
    pub fn international(&self) -> Option<CurrencyId> {
        self.international
    }

    /// Percentage of trades booked in the home currency.
    pub fn home_percent(&self) -> u32 {
        self.home_percent
    }

    /// Draws the currency of one trade.
    pub fn draw(&self, rng: &mut MockRng) -> CurrencyId {
        *self.sampler.draw(rng)
    }
}

/// A simulated trade before it is assigned an identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trade {
    /// Traded asset
    pub asset_id: AssetId,
    /// Trade date
    pub date: NaiveDate,
    /// Buy or sell
    pub transaction_type: TransactionType,
    /// Whole shares
    pub shares: i64,
    /// `shares * price`
    pub amount: Decimal,
    /// Booking currency
    pub currency_id: CurrencyId,
}

/// Quantises a base amount to whole shares at `price`.
///
/// Returns `(shares, shares * price)` with at least one share.
pub fn quantize_amount(base: f64, price: Decimal) -> Result<(i64, Decimal), GeneratorError> {
    let unit = price
        .to_f64()
        .filter(|p| *p > 0.0)
        .ok_or_else(|| GeneratorError::invalid_input(format!("price {} cannot be traded", price)))?;
    let shares = ((base / unit).floor() as i64).max(1);
    Ok((shares, Decimal::from(shares) * price))
}

/// Simulates the trading activity of individual users.
pub struct TransactionSimulator {
    prices: PriceBook,
    annual_counts: HashMap<ActivityLevelId, u32>,
    home_currencies: HashMap<CountryId, CurrencyId>,
    majors: Vec<CurrencyId>,
    currencies: Vec<CurrencyId>,
}

impl TransactionSimulator {
    /// Creates a simulator over `prices` using catalog activity levels and
    /// home currencies.
    pub fn new(catalog: &ReferenceCatalog, prices: PriceBook) -> Result<Self, GeneratorError> {
        let mut home_currencies = HashMap::with_capacity(catalog.countries.len());
        for country in &catalog.countries {
            home_currencies.insert(country.id, catalog.home_currency(country.id)?.id);
        }
        Ok(Self {
            prices,
            annual_counts: catalog
                .activity_levels
                .iter()
                .map(|a| (a.id, a.annual_transactions))
                .collect(),
            home_currencies,
            majors: catalog.major_currencies().iter().map(|c| c.id).collect(),
            currencies: catalog.currencies.iter().map(|c| c.id).collect(),
        })
    }

    /// Price lookup the simulator trades against.
    pub fn prices(&self) -> &PriceBook {
        &self.prices
    }

    /// Simulates every trade of `user`: regular trading first, then the
    /// departure liquidation.
    pub fn simulate(&self, user: &User, rng: &mut MockRng) -> Result<Vec<Trade>, GeneratorError> {
        let annual = *self
            .annual_counts
            .get(&user.activity_level_id)
            .ok_or(CatalogError::UnknownId {
                table: "activity_levels",
                id: user.activity_level_id.get(),
            })?;
        let home = *self
            .home_currencies
            .get(&user.country_id)
            .ok_or(CatalogError::UnknownId {
                table: "countries",
                id: user.country_id.get(),
            })?;
        let preference = CurrencyPreference::sample(home, &self.majors, &self.currencies, rng)?;

        let mut trades = self.regular_trades(user, annual, &preference, rng)?;
        trades.extend(self.liquidation(user, &preference, rng)?);
        Ok(trades)
    }

    fn regular_trades(
        &self,
        user: &User,
        annual: u32,
        preference: &CurrencyPreference,
        rng: &mut MockRng,
    ) -> Result<Vec<Trade>, GeneratorError> {
        let effective_end = match user.departure() {
            Some(departure) => departure,
            None => match self.prices.latest_date() {
                Some(latest) => latest,
                None => return Ok(Vec::new()),
            },
        };
        let days = (effective_end - user.join_date).num_days();
        if days <= 0 {
            return Ok(Vec::new());
        }

        let mut count = i64::from(annual) * days / DAYS_PER_YEAR;
        if count == 0 && days > 1 {
            count = 1;
        }

        let mut trades = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let date = rng.gen_date_between(user.join_date, effective_end);
            let priced = self.prices.priced_on(date);
            let Some(&(asset_id, price)) = priced.choose(rng) else {
                continue;
            };
            let transaction_type = if rng.gen_bool(0.5) {
                TransactionType::Buy
            } else {
                TransactionType::Sell
            };
            trades.push(self.trade(asset_id, price, date, transaction_type, 1.0, preference, rng)?);
        }
        Ok(trades)
    }

    fn liquidation(
        &self,
        user: &User,
        preference: &CurrencyPreference,
        rng: &mut MockRng,
    ) -> Result<Vec<Trade>, GeneratorError> {
        if user.status != UserStatus::Departed {
            return Ok(Vec::new());
        }
        let date = user.departure_date;
        let priced = self.prices.priced_on(date);
        if priced.is_empty() {
            return Ok(Vec::new());
        }

        let wanted = rng.gen_range(MIN_LIQUIDATED_ASSETS..=MAX_LIQUIDATED_ASSETS);
        let chosen: Vec<(AssetId, Decimal)> = priced
            .choose_multiple(rng, wanted.min(priced.len()))
            .copied()
            .collect();

        chosen
            .into_iter()
            .map(|(asset_id, price)| {
                self.trade(
                    asset_id,
                    price,
                    date,
                    TransactionType::Sell,
                    LIQUIDATION_SCALE,
                    preference,
                    rng,
                )
            })
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn trade(
        &self,
        asset_id: AssetId,
        price: Decimal,
        date: NaiveDate,
        transaction_type: TransactionType,
        scale: f64,
        preference: &CurrencyPreference,
        rng: &mut MockRng,
    ) -> Result<Trade, GeneratorError> {
        let base = rng.gen_range(MIN_BASE_AMOUNT..=MAX_BASE_AMOUNT) * scale;
        let (shares, amount) = quantize_amount(base, price)?;
        Ok(Trade {
            asset_id,
            date,
            transaction_type,
            shares,
            amount,
            currency_id: preference.draw(rng),
        })
    }
}

/// Generator for the transaction stage.
///
/// Users are simulated in ascending id order; transaction ids are
/// sequential across users starting at 1.
pub struct TransactionGenerator {
    simulator: TransactionSimulator,
    users: std::vec::IntoIter<User>,
    pending: VecDeque<Transaction>,
    next_id: u64,
    rng: MockRng,
}

impl TransactionGenerator {
    /// Creates a generator over `users`.
    pub fn new(simulator: TransactionSimulator, mut users: Vec<User>, rng: MockRng) -> Result<Self, GeneratorError> {
        users.sort_by_key(|u| u.id);
        debug!(
            users = users.len(),
            priced_dates = simulator.prices().len(),
            "Building transaction generator"
        );
        let mut generator = Self {
            simulator,
            users: users.into_iter(),
            pending: VecDeque::new(),
            next_id: 1,
            rng,
        };
        generator.refill()?;
        Ok(generator)
    }

    fn refill(&mut self) -> Result<(), GeneratorError> {
        while self.pending.is_empty() {
            let Some(user) = self.users.next() else {
                break;
            };
            for trade in self.simulator.simulate(&user, &mut self.rng)? {
                self.pending.push_back(Transaction {
                    id: TransactionId::new(self.next_id),
                    user_id: user.id,
                    asset_id: trade.asset_id,
                    date: trade.date,
                    transaction_type: trade.transaction_type,
                    shares: trade.shares,
                    amount: trade.amount,
                    currency_id: trade.currency_id,
                });
                self.next_id += 1;
            }
        }
        Ok(())
    }

    /// Produces the next transaction.
    pub fn next_transaction(&mut self) -> Result<Transaction, GeneratorError> {
        let transaction = self
            .pending
            .pop_front()
            .ok_or(GeneratorError::Exhausted("transactions"))?;
        self.refill()?;
        Ok(transaction)
    }
}

impl RowGenerator for TransactionGenerator {
    fn column_names(&self) -> Vec<&'static str> {
        column_names(Transaction::COLUMNS)
    }

    fn has_more(&self) -> bool {
        !self.pending.is_empty()
    }

    fn next_row(&mut self) -> Result<Row, GeneratorError> {
        self.next_transaction().map(|t| t.to_row())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use mockfin_core::types::{sentinel_date, InvestorProfileId, PricePoint, UserId};
    use std::collections::HashSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn flat_book(assets: u64, start: NaiveDate, days: u64, cents: i64) -> PriceBook {
        PriceBook::from_points((0..days).flat_map(|offset| {
            (1..=assets).map(move |asset| PricePoint {
                asset_id: AssetId::new(asset),
                date: start + Days::new(offset),
                price: Decimal::new(cents, 2),
            })
        }))
    }

    fn user(id: u64, activity: u64, join: NaiveDate, departure: Option<NaiveDate>) -> User {
        User {
            id: UserId::new(id),
            investor_profile_id: InvestorProfileId::new(1),
            activity_level_id: ActivityLevelId::new(activity),
            country_id: CountryId::new(1),
            join_date: join,
            departure_date: departure.unwrap_or_else(sentinel_date),
            status: if departure.is_some() {
                UserStatus::Departed
            } else {
                UserStatus::Active
            },
        }
    }

    #[test]
    fn test_quantize_amount_whole_shares() {
        let (shares, amount) = quantize_amount(1_000.0, Decimal::new(30000, 2)).unwrap();
        assert_eq!(shares, 3);
        assert_eq!(amount, Decimal::new(90000, 2));

        let (shares, amount) = quantize_amount(1_000.0, Decimal::new(500000, 2)).unwrap();
        assert_eq!(shares, 1);
        assert_eq!(amount, Decimal::new(500000, 2));

        assert!(quantize_amount(1_000.0, Decimal::ZERO).is_err());
    }

    #[test]
    fn test_currency_preference_shapes() {
        let usd = CurrencyId::new(1);
        let eur = CurrencyId::new(2);
        let gbp = CurrencyId::new(3);
        let mut rng = MockRng::from_seed(31);
        let mut with_international = 0;
        for _ in 0..1_000 {
            let pref = CurrencyPreference::sample(usd, &[usd, eur], &[usd, eur, gbp], &mut rng).unwrap();
            match pref.international() {
                Some(other) => {
                    with_international += 1;
                    assert_eq!(other, eur);
                    assert!((70..=80).contains(&pref.home_percent()));
                }
                None => assert_eq!(pref.home_percent(), 100),
            }
        }
        let share = with_international as f64 / 1_000.0;
        assert!(share > 0.54 && share < 0.66, "international share {}", share);
    }

    #[test]
    fn test_currency_preference_falls_back_when_only_major_is_home() {
        let usd = CurrencyId::new(1);
        let jpy = CurrencyId::new(4);
        let mut rng = MockRng::from_seed(32);
        for _ in 0..200 {
            let pref = CurrencyPreference::sample(usd, &[usd], &[usd, jpy], &mut rng).unwrap();
            if let Some(other) = pref.international() {
                assert_eq!(other, jpy);
            }
        }
    }

    #[test]
    fn test_regular_trading_count_and_window() {
        let catalog = ReferenceCatalog::builtin();
        let start = date(2024, 1, 1);
        let book = flat_book(3, start, 366, 10000);
        let simulator = TransactionSimulator::new(&catalog, book).unwrap();
        // Activity level 3 trades 52 times a year.
        let active = user(1, 3, start, None);
        let trades = simulator.simulate(&active, &mut MockRng::from_seed(33)).unwrap();
        assert_eq!(trades.len(), 52);
        for trade in &trades {
            assert!(trade.date >= start && trade.date <= date(2024, 12, 31));
            assert!(trade.amount > Decimal::ZERO);
            assert!(trade.shares >= 1);
            assert_eq!(trade.amount, Decimal::from(trade.shares) * Decimal::new(10000, 2));
        }
    }

    #[test]
    fn test_short_period_forces_one_trade() {
        let catalog = ReferenceCatalog::builtin();
        let start = date(2024, 1, 1);
        let simulator = TransactionSimulator::new(&catalog, flat_book(2, start, 3, 5000)).unwrap();
        // Dormant users trade twice a year: floor(2 * 2 / 365) == 0.
        let dormant = user(1, 1, start, None);
        let trades = simulator.simulate(&dormant, &mut MockRng::from_seed(34)).unwrap();
        assert_eq!(trades.len(), 1);
    }

    fn home_only(rng: &mut MockRng) -> CurrencyPreference {
        let usd = CurrencyId::new(1);
        CurrencyPreference::sample(usd, &[], &[usd], rng).unwrap()
    }

    #[test]
    fn test_departure_liquidation_sells_distinct_assets() {
        let catalog = ReferenceCatalog::builtin();
        let start = date(2024, 1, 1);
        let departure = date(2024, 1, 10);
        let price = Decimal::new(2000, 2);
        let simulator = TransactionSimulator::new(&catalog, flat_book(6, start, 30, 2000)).unwrap();
        let departed = user(1, 1, start, Some(departure));
        let mut rng = MockRng::from_seed(35);
        let mut counts = HashSet::new();

        for _ in 0..200 {
            let preference = home_only(&mut rng);
            let sells = simulator.liquidation(&departed, &preference, &mut rng).unwrap();

            assert!((MIN_LIQUIDATED_ASSETS..=MAX_LIQUIDATED_ASSETS).contains(&sells.len()));
            let distinct: HashSet<AssetId> = sells.iter().map(|t| t.asset_id).collect();
            assert_eq!(distinct.len(), sells.len());

            for trade in &sells {
                assert_eq!(trade.transaction_type, TransactionType::Sell);
                assert_eq!(trade.date, departure);
                assert_eq!(trade.amount, Decimal::from(trade.shares) * price);
                // Doubled scale: base in 2,000..=100,000, floored to whole shares.
                assert!(trade.amount <= Decimal::from(100_000));
                assert!(trade.amount + price > Decimal::from(2_000));
            }
            counts.insert(sells.len());
        }
        assert!(counts.contains(&MIN_LIQUIDATED_ASSETS));
        assert!(counts.contains(&MAX_LIQUIDATED_ASSETS));
    }

    #[test]
    fn test_liquidation_capped_by_assets_priced_that_day() {
        let catalog = ReferenceCatalog::builtin();
        let start = date(2024, 1, 1);
        let departure = date(2024, 1, 5);
        let simulator = TransactionSimulator::new(&catalog, flat_book(3, start, 10, 2000)).unwrap();
        let departed = user(1, 1, start, Some(departure));
        let mut rng = MockRng::from_seed(40);
        for _ in 0..100 {
            let preference = home_only(&mut rng);
            let sells = simulator.liquidation(&departed, &preference, &mut rng).unwrap();
            assert!((2..=3).contains(&sells.len()));
        }
    }

    #[test]
    fn test_active_user_has_no_liquidation() {
        let catalog = ReferenceCatalog::builtin();
        let start = date(2024, 1, 1);
        let simulator = TransactionSimulator::new(&catalog, flat_book(6, start, 30, 2000)).unwrap();
        let active = user(1, 1, start, None);
        let mut rng = MockRng::from_seed(41);
        let preference = home_only(&mut rng);
        assert!(simulator.liquidation(&active, &preference, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_draws_on_unpriced_dates_yield_nothing() {
        let catalog = ReferenceCatalog::builtin();
        let first = date(2024, 1, 1);
        let last = date(2024, 12, 31);
        let book = PriceBook::from_points([first, last].into_iter().flat_map(|day| {
            (1..=3).map(move |asset| PricePoint {
                asset_id: AssetId::new(asset),
                date: day,
                price: Decimal::new(5000, 2),
            })
        }));
        let simulator = TransactionSimulator::new(&catalog, book).unwrap();
        // Day traders draw floor(500 * 365 / 365) dates, almost all unpriced.
        let trader = user(1, 5, first, None);
        let mut rng = MockRng::from_seed(42);

        let mut total = 0;
        for _ in 0..10 {
            let trades = simulator.simulate(&trader, &mut rng).unwrap();
            assert!(trades.len() < 500);
            for trade in &trades {
                assert!(trade.date == first || trade.date == last);
                assert!(simulator.prices().price(trade.asset_id, trade.date).is_some());
            }
            total += trades.len();
        }
        assert!(total > 0);
        assert!(total < 100);
    }

    #[test]
    fn test_liquidation_bounded_by_priced_assets() {
        let catalog = ReferenceCatalog::builtin();
        let day = date(2024, 3, 1);
        let simulator = TransactionSimulator::new(&catalog, flat_book(1, day, 1, 2000)).unwrap();
        let departed = user(1, 5, day, Some(day));
        let trades = simulator.simulate(&departed, &mut MockRng::from_seed(36)).unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].transaction_type, TransactionType::Sell);
    }

    #[test]
    fn test_no_prices_no_trades() {
        let catalog = ReferenceCatalog::builtin();
        let simulator = TransactionSimulator::new(&catalog, PriceBook::default()).unwrap();
        let active = user(1, 5, date(2024, 1, 1), None);
        assert!(simulator.simulate(&active, &mut MockRng::from_seed(37)).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_activity_level_is_error() {
        let catalog = ReferenceCatalog::builtin();
        let simulator = TransactionSimulator::new(&catalog, PriceBook::default()).unwrap();
        let odd = user(1, 99, date(2024, 1, 1), None);
        assert!(simulator.simulate(&odd, &mut MockRng::from_seed(38)).is_err());
    }

    #[test]
    fn test_generator_sequential_ids_in_user_order() {
        let catalog = ReferenceCatalog::builtin();
        let start = date(2024, 1, 1);
        let simulator = TransactionSimulator::new(&catalog, flat_book(3, start, 60, 4200)).unwrap();
        let users = vec![user(2, 3, start, None), user(1, 3, start, None), user(3, 1, start, None)];
        let mut gen = TransactionGenerator::new(simulator, users, MockRng::from_seed(39)).unwrap();

        let mut transactions = Vec::new();
        while gen.has_more() {
            transactions.push(gen.next_transaction().unwrap());
        }
        assert!(!transactions.is_empty());
        for (index, t) in transactions.iter().enumerate() {
            assert_eq!(t.id.get(), index as u64 + 1);
        }
        for pair in transactions.windows(2) {
            assert!(pair[0].user_id <= pair[1].user_id);
        }
        assert!(matches!(
            gen.next_row(),
            Err(GeneratorError::Exhausted("transactions"))
        ));
    }
}
