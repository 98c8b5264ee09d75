//! Entities survive the write/re-read cycle the pipeline relies on.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fs;

use mockfin_core::types::{
    sentinel_date, ActivityLevelId, AssetId, CountryId, CurrencyId, InvestorProfileId, Transaction,
    TransactionId, TransactionType, User, UserId, UserStatus,
};
use mockfin_core::Record;
use mockfin_store::{read_entities, FlatFileSink, RecordSink};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_users_with_sentinel_departure_reread() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.csv");
    let users = vec![
        User {
            id: UserId::new(1),
            investor_profile_id: InvestorProfileId::new(2),
            activity_level_id: ActivityLevelId::new(3),
            country_id: CountryId::new(1),
            join_date: date(2024, 1, 1),
            departure_date: sentinel_date(),
            status: UserStatus::Active,
        },
        User {
            id: UserId::new(2),
            investor_profile_id: InvestorProfileId::new(1),
            activity_level_id: ActivityLevelId::new(5),
            country_id: CountryId::new(4),
            join_date: date(2024, 2, 10),
            departure_date: date(2024, 8, 31),
            status: UserStatus::Departed,
        },
    ];

    let mut sink = FlatFileSink::new(&path);
    sink.prepare(User::COLUMNS).unwrap();
    for user in &users {
        sink.save(user.to_row());
    }
    sink.complete().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("user_id,investor_profile_id,activity_level_id,country_id,join_date,departure_date,status")
    );
    assert_eq!(lines.next(), Some("1,2,3,1,2024-01-01,9999-12-31,\"ACTIVE\""));

    let reread: Vec<User> = read_entities(&path).unwrap();
    assert_eq!(reread, users);
}

#[test]
fn test_transaction_amounts_keep_two_decimals() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transactions.csv");
    let transaction = Transaction {
        id: TransactionId::new(1),
        user_id: UserId::new(1),
        asset_id: AssetId::new(3),
        date: date(2024, 5, 6),
        transaction_type: TransactionType::Sell,
        shares: 12,
        amount: Decimal::new(1_234_500, 2),
        currency_id: CurrencyId::new(2),
    };

    let mut sink = FlatFileSink::new(&path);
    sink.prepare(Transaction::COLUMNS).unwrap();
    sink.save(transaction.to_row());
    sink.complete().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("1,1,3,2024-05-06,\"SELL\",12,12345.00,2"));

    let reread: Vec<Transaction> = read_entities(&path).unwrap();
    assert_eq!(reread, vec![transaction]);
}

#[test]
fn test_unknown_transaction_type_fails_reread() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transactions.csv");
    fs::write(
        &path,
        "transaction_id,user_id,asset_id,transaction_date,transaction_type,shares,amount,currency_id\n\
         1,1,1,2024-01-02,\"HOLD\",1,10.00,1\n",
    )
    .unwrap();
    let err = read_entities::<Transaction>(&path).unwrap_err();
    assert!(err.to_string().contains("BUY or SELL"));
}
