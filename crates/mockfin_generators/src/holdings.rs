//! Holdings netting.
//!
//! Keeps a running balance per (user, asset, currency): buys add, sells
//! subtract. Only keys whose final balance is strictly positive become
//! holdings. Amounts are decimals, so the net is exact.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

use mockfin_core::record::column_names;
use mockfin_core::types::{AssetId, CurrencyId, Holding, Transaction, UserId};
use mockfin_core::{GeneratorError, Record, Row, RowGenerator};

type HoldingKey = (UserId, AssetId, CurrencyId);

/// Nets a transaction stream into positions.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use mockfin_core::types::{Transaction, TransactionType};
/// use mockfin_generators::holdings::HoldingsAggregator;
///
/// let trade = |id: u64, kind, amount: i64| Transaction {
///     id: id.into(),
///     user_id: 1u64.into(),
///     asset_id: 1u64.into(),
///     date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
///     transaction_type: kind,
///     shares: 1,
///     amount: Decimal::new(amount, 0),
///     currency_id: 1u64.into(),
/// };
/// let aggregator = HoldingsAggregator::new(&[
///     trade(1, TransactionType::Buy, 1000),
///     trade(2, TransactionType::Sell, 1000),
/// ])
/// .unwrap();
/// assert!(aggregator.holdings().is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct HoldingsAggregator {
    balances: BTreeMap<HoldingKey, Decimal>,
    transactions: usize,
}

impl HoldingsAggregator {
    /// Aggregates `transactions`.
    ///
    /// # Errors
    ///
    /// Fails on the first transaction with a non-positive amount.
    pub fn new(transactions: &[Transaction]) -> Result<Self, GeneratorError> {
        let mut balances: BTreeMap<HoldingKey, Decimal> = BTreeMap::new();
        for transaction in transactions {
            if transaction.amount <= Decimal::ZERO {
                return Err(GeneratorError::invalid_input(format!(
                    "transaction {} has non-positive amount {}",
                    transaction.id, transaction.amount
                )));
            }
            *balances
                .entry((transaction.user_id, transaction.asset_id, transaction.currency_id))
                .or_default() += transaction.transaction_type.signed(transaction.amount);
        }
        debug!(
            transactions = transactions.len(),
            keys = balances.len(),
            "Aggregated holdings"
        );
        Ok(Self {
            balances,
            transactions: transactions.len(),
        })
    }

    /// Net balance of a key, including non-positive ones.
    pub fn balance(&self, user: UserId, asset: AssetId, currency: CurrencyId) -> Option<Decimal> {
        self.balances.get(&(user, asset, currency)).copied()
    }

    /// Number of transactions aggregated.
    pub fn transaction_count(&self) -> usize {
        self.transactions
    }

    /// Positive holdings in ascending key order.
    pub fn holdings(&self) -> Vec<Holding> {
        self.balances
            .iter()
            .filter(|(_, amount)| **amount > Decimal::ZERO)
            .map(|(&(user_id, asset_id, currency_id), &amount)| Holding {
                user_id,
                asset_id,
                currency_id,
                amount,
            })
            .collect()
    }
}

/// Generator for the holdings stage.
pub struct HoldingsGenerator {
    holdings: std::vec::IntoIter<Holding>,
    remaining: usize,
}

impl HoldingsGenerator {
    /// Creates a generator over the positive holdings of `aggregator`.
    pub fn new(aggregator: &HoldingsAggregator) -> Self {
        let holdings = aggregator.holdings();
        Self {
            remaining: holdings.len(),
            holdings: holdings.into_iter(),
        }
    }
}

impl RowGenerator for HoldingsGenerator {
    fn column_names(&self) -> Vec<&'static str> {
        column_names(Holding::COLUMNS)
    }

    fn has_more(&self) -> bool {
        self.remaining > 0
    }

    fn next_row(&mut self) -> Result<Row, GeneratorError> {
        let holding = self
            .holdings
            .next()
            .ok_or(GeneratorError::Exhausted("holdings"))?;
        self.remaining -= 1;
        Ok(holding.to_row())
    }
}
