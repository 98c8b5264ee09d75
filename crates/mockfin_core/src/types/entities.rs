//! Generated dataset entities.
//!
//! Each entity implements [`Record`] so that generators can emit it as a
//! typed row and later stages can rebuild it from re-read records. Entity
//! invariants are checked on the way back in.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{
    ActivityLevelId, AssetClassId, AssetId, CountryId, CurrencyId, InvestorProfileId,
    TransactionId, UserId,
};
use super::time::sentinel_date;
use crate::error::RecordError;
use crate::record::{check_arity, Column, ColumnType, Record, Row, Value};

/// A tradable asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Asset identifier
    pub id: AssetId,
    /// Asset class reference
    pub asset_class_id: AssetClassId,
    /// Display name
    pub name: String,
}

impl Record for Asset {
    const COLUMNS: &'static [Column] = &[
        Column::new("asset_id", ColumnType::Id),
        Column::new("asset_class_id", ColumnType::Id),
        Column::new("name", ColumnType::Text),
    ];

    fn to_row(&self) -> Row {
        vec![
            Value::Id(self.id.get()),
            Value::Id(self.asset_class_id.get()),
            Value::Text(self.name.clone()),
        ]
    }

    fn from_row(row: &[Value]) -> Result<Self, RecordError> {
        check_arity(row, Self::COLUMNS)?;
        Ok(Self {
            id: AssetId::new(row[0].as_id(0)?),
            asset_class_id: AssetClassId::new(row[1].as_id(1)?),
            name: row[2].as_text(2)?.to_string(),
        })
    }
}

/// Closing price of one asset on one calendar date.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Priced asset
    pub asset_id: AssetId,
    /// Calendar date
    pub date: NaiveDate,
    /// Strictly positive price
    pub price: Decimal,
}

impl Record for PricePoint {
    const COLUMNS: &'static [Column] = &[
        Column::new("asset_id", ColumnType::Id),
        Column::new("price_date", ColumnType::Date),
        Column::new("price", ColumnType::Decimal),
    ];

    fn to_row(&self) -> Row {
        vec![
            Value::Id(self.asset_id.get()),
            Value::Date(self.date),
            Value::Decimal(self.price),
        ]
    }

    fn from_row(row: &[Value]) -> Result<Self, RecordError> {
        check_arity(row, Self::COLUMNS)?;
        let price = row[2].as_decimal(2)?;
        if price <= Decimal::ZERO {
            return Err(RecordError::invalid("price", price, "price must be positive"));
        }
        Ok(Self {
            asset_id: AssetId::new(row[0].as_id(0)?),
            date: row[1].as_date(1)?,
            price,
        })
    }
}

/// Lifecycle status of a user.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    /// Still on the platform; departure date is the sentinel.
    Active,
    /// Left the platform on a real departure date.
    Departed,
}

impl UserStatus {
    /// Serialised status label.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Departed => "DEPARTED",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(UserStatus::Active),
            "DEPARTED" => Ok(UserStatus::Departed),
            other => Err(RecordError::invalid("status", other, "unknown user status")),
        }
    }
}

/// A platform user with lifecycle dates.
///
/// Invariants: `departure_date >= join_date`; `Departed` if and only if the
/// departure date is a real date rather than [`sentinel_date`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier
    pub id: UserId,
    /// Investor profile reference
    pub investor_profile_id: InvestorProfileId,
    /// Activity level reference
    pub activity_level_id: ActivityLevelId,
    /// Country reference
    pub country_id: CountryId,
    /// Date the user joined
    pub join_date: NaiveDate,
    /// Departure date, or the sentinel when still active
    pub departure_date: NaiveDate,
    /// Lifecycle status
    pub status: UserStatus,
}

impl User {
    /// Real departure date, `None` for active users.
    pub fn departure(&self) -> Option<NaiveDate> {
        match self.status {
            UserStatus::Departed => Some(self.departure_date),
            UserStatus::Active => None,
        }
    }

    /// Checks the lifecycle invariants.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.departure_date < self.join_date {
            return Err(RecordError::invalid(
                "departure_date",
                self.departure_date,
                format!("departure precedes join date {}", self.join_date),
            ));
        }
        let is_sentinel = self.departure_date == sentinel_date();
        match (self.status, is_sentinel) {
            (UserStatus::Active, true) | (UserStatus::Departed, false) => Ok(()),
            (UserStatus::Active, false) => Err(RecordError::invalid(
                "departure_date",
                self.departure_date,
                "active user must carry the sentinel departure date",
            )),
            (UserStatus::Departed, true) => Err(RecordError::invalid(
                "departure_date",
                self.departure_date,
                "departed user must carry a real departure date",
            )),
        }
    }
}

impl Record for User {
    const COLUMNS: &'static [Column] = &[
        Column::new("user_id", ColumnType::Id),
        Column::new("investor_profile_id", ColumnType::Id),
        Column::new("activity_level_id", ColumnType::Id),
        Column::new("country_id", ColumnType::Id),
        Column::new("join_date", ColumnType::Date),
        Column::new("departure_date", ColumnType::Date),
        Column::new("status", ColumnType::Text),
    ];

    fn to_row(&self) -> Row {
        vec![
            Value::Id(self.id.get()),
            Value::Id(self.investor_profile_id.get()),
            Value::Id(self.activity_level_id.get()),
            Value::Id(self.country_id.get()),
            Value::Date(self.join_date),
            Value::Date(self.departure_date),
            Value::Text(self.status.as_str().to_string()),
        ]
    }

    fn from_row(row: &[Value]) -> Result<Self, RecordError> {
        check_arity(row, Self::COLUMNS)?;
        let user = Self {
            id: UserId::new(row[0].as_id(0)?),
            investor_profile_id: InvestorProfileId::new(row[1].as_id(1)?),
            activity_level_id: ActivityLevelId::new(row[2].as_id(2)?),
            country_id: CountryId::new(row[3].as_id(3)?),
            join_date: row[4].as_date(4)?,
            departure_date: row[5].as_date(5)?,
            status: row[6].as_text(6)?.parse()?,
        };
        user.validate()?;
        Ok(user)
    }
}

/// Direction of a trade.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Adds to the position
    Buy,
    /// Reduces the position
    Sell,
}

impl TransactionType {
    /// Serialised type label.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "BUY",
            TransactionType::Sell => "SELL",
        }
    }

    /// Applies the trade direction to an amount: positive for buys,
    /// negative for sells.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionType::Buy => amount,
            TransactionType::Sell => -amount,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(TransactionType::Buy),
            "SELL" => Ok(TransactionType::Sell),
            other => Err(RecordError::invalid(
                "transaction_type",
                other,
                "transaction type must be BUY or SELL",
            )),
        }
    }
}

/// A single synthetic trade.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction identifier
    pub id: TransactionId,
    /// Trading user
    pub user_id: UserId,
    /// Traded asset
    pub asset_id: AssetId,
    /// Trade date
    pub date: NaiveDate,
    /// Buy or sell
    pub transaction_type: TransactionType,
    /// Whole shares traded
    pub shares: i64,
    /// Monetary amount, `shares * price`
    pub amount: Decimal,
    /// Currency the amount is expressed in
    pub currency_id: CurrencyId,
}

impl Record for Transaction {
    const COLUMNS: &'static [Column] = &[
        Column::new("transaction_id", ColumnType::Id),
        Column::new("user_id", ColumnType::Id),
        Column::new("asset_id", ColumnType::Id),
        Column::new("transaction_date", ColumnType::Date),
        Column::new("transaction_type", ColumnType::Text),
        Column::new("shares", ColumnType::Integer),
        Column::new("amount", ColumnType::Decimal),
        Column::new("currency_id", ColumnType::Id),
    ];

    fn to_row(&self) -> Row {
        vec![
            Value::Id(self.id.get()),
            Value::Id(self.user_id.get()),
            Value::Id(self.asset_id.get()),
            Value::Date(self.date),
            Value::Text(self.transaction_type.as_str().to_string()),
            Value::Integer(self.shares),
            Value::Decimal(self.amount),
            Value::Id(self.currency_id.get()),
        ]
    }

    fn from_row(row: &[Value]) -> Result<Self, RecordError> {
        check_arity(row, Self::COLUMNS)?;
        Ok(Self {
            id: TransactionId::new(row[0].as_id(0)?),
            user_id: UserId::new(row[1].as_id(1)?),
            asset_id: AssetId::new(row[2].as_id(2)?),
            date: row[3].as_date(3)?,
            transaction_type: row[4].as_text(4)?.parse()?,
            shares: row[5].as_integer(5)?,
            amount: row[6].as_decimal(6)?,
            currency_id: CurrencyId::new(row[7].as_id(7)?),
        })
    }
}

/// Net position of a user in one asset and currency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    /// Holding user
    pub user_id: UserId,
    /// Held asset
    pub asset_id: AssetId,
    /// Currency of the position
    pub currency_id: CurrencyId,
    /// Strictly positive net amount
    pub amount: Decimal,
}

impl Record for Holding {
    const COLUMNS: &'static [Column] = &[
        Column::new("user_id", ColumnType::Id),
        Column::new("asset_id", ColumnType::Id),
        Column::new("currency_id", ColumnType::Id),
        Column::new("amount", ColumnType::Decimal),
    ];

    fn to_row(&self) -> Row {
        vec![
            Value::Id(self.user_id.get()),
            Value::Id(self.asset_id.get()),
            Value::Id(self.currency_id.get()),
            Value::Decimal(self.amount),
        ]
    }

    fn from_row(row: &[Value]) -> Result<Self, RecordError> {
        check_arity(row, Self::COLUMNS)?;
        let amount = row[3].as_decimal(3)?;
        if amount <= Decimal::ZERO {
            return Err(RecordError::invalid("amount", amount, "holding must be positive"));
        }
        Ok(Self {
            user_id: UserId::new(row[0].as_id(0)?),
            asset_id: AssetId::new(row[1].as_id(1)?),
            currency_id: CurrencyId::new(row[2].as_id(2)?),
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn active_user() -> User {
        User {
            id: UserId::new(1),
            investor_profile_id: InvestorProfileId::new(2),
            activity_level_id: ActivityLevelId::new(3),
            country_id: CountryId::new(4),
            join_date: date(2024, 1, 1),
            departure_date: sentinel_date(),
            status: UserStatus::Active,
        }
    }

    #[test]
    fn test_asset_row_round_trip() {
        let asset = Asset {
            id: AssetId::new(9),
            asset_class_id: AssetClassId::new(1),
            name: "Northwind Equity".to_string(),
        };
        assert_eq!(Asset::from_row(&asset.to_row()).unwrap(), asset);
    }

    #[test]
    fn test_price_point_rejects_non_positive_price() {
        let row = vec![
            Value::Id(1),
            Value::Date(date(2024, 1, 1)),
            Value::Decimal(Decimal::ZERO),
        ];
        assert!(PricePoint::from_row(&row).is_err());
    }

    #[test]
    fn test_user_invariants() {
        let user = active_user();
        assert!(user.validate().is_ok());
        assert_eq!(user.departure(), None);

        let mut departed = active_user();
        departed.status = UserStatus::Departed;
        assert!(departed.validate().is_err());
        departed.departure_date = date(2024, 6, 1);
        assert!(departed.validate().is_ok());
        assert_eq!(departed.departure(), Some(date(2024, 6, 1)));

        departed.departure_date = date(2023, 12, 31);
        assert!(departed.validate().is_err());

        let mut inconsistent = active_user();
        inconsistent.departure_date = date(2024, 6, 1);
        assert!(inconsistent.validate().is_err());
    }

    #[test]
    fn test_user_from_row_rejects_unknown_status() {
        let mut row = active_user().to_row();
        row[6] = Value::Text("PAUSED".to_string());
        let err = User::from_row(&row).unwrap_err();
        assert!(err.to_string().contains("PAUSED"));
    }

    #[test]
    fn test_transaction_type_parsing_and_sign() {
        assert_eq!("BUY".parse::<TransactionType>().unwrap(), TransactionType::Buy);
        assert!("HOLD".parse::<TransactionType>().is_err());
        let amount = Decimal::new(50000, 2);
        assert_eq!(TransactionType::Sell.signed(amount), -amount);
        assert_eq!(TransactionType::Buy.signed(amount), amount);
    }

    #[test]
    fn test_holding_rejects_zero_amount() {
        let row = vec![
            Value::Id(1),
            Value::Id(2),
            Value::Id(3),
            Value::Decimal(Decimal::ZERO),
        ];
        assert!(Holding::from_row(&row).is_err());
    }
}
