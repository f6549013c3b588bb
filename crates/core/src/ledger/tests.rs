//! Ledger service tests.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::*;
use crate::category::Category;
use crate::testing::InMemoryStore;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn request(amount: Decimal, category: &str, on: NaiveDate) -> TransactionRequest {
    TransactionRequest {
        amount: Some(amount),
        category: Some(category.to_string()),
        description: None,
        transaction_date: Some(on),
    }
}

fn service() -> LedgerService {
    LedgerService::new(Arc::new(InMemoryStore::new()))
}

#[test]
fn test_input_validation() {
    let ok = TransactionInput::try_from(TransactionRequest {
        description: Some("  lunch  ".into()),
        ..request(dec!(12.345), "food", date(2025, 3, 1))
    })
    .unwrap();
    assert_eq!(ok.amount, dec!(12.35));
    assert_eq!(ok.category, Category::Food);
    assert_eq!(ok.description.as_deref(), Some("lunch"));

    let blank = TransactionInput::try_from(TransactionRequest {
        description: Some("   ".into()),
        ..request(dec!(1), "Food", date(2025, 3, 1))
    })
    .unwrap();
    assert_eq!(blank.description, None);

    let missing = TransactionInput::try_from(TransactionRequest {
        transaction_date: None,
        ..request(dec!(1), "Food", date(2025, 3, 1))
    });
    assert!(matches!(missing, Err(LedgerError::MissingFields)));

    let zero = TransactionInput::try_from(request(dec!(0), "Food", date(2025, 3, 1)));
    assert!(matches!(zero, Err(LedgerError::InvalidAmount(_))));

    let bad_category = TransactionInput::try_from(request(dec!(5), "Crypto", date(2025, 3, 1)));
    assert!(matches!(bad_category, Err(LedgerError::InvalidCategory(c)) if c == "Crypto"));
}

#[tokio::test]
async fn test_list_orders_by_date_then_newest() {
    let ledger = service();
    let user = Uuid::new_v4();

    let older = ledger
        .add(user, request(dec!(10), "Food", date(2025, 3, 1)))
        .await
        .unwrap();
    let first_same_day = ledger
        .add(user, request(dec!(20), "Bills", date(2025, 3, 5)))
        .await
        .unwrap();
    let second_same_day = ledger
        .add(user, request(dec!(30), "Health", date(2025, 3, 5)))
        .await
        .unwrap();

    let ids: Vec<_> = ledger.list(user).await.unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![second_same_day.id, first_same_day.id, older.id]);
}

#[tokio::test]
async fn test_update_replaces_fields() {
    let ledger = service();
    let user = Uuid::new_v4();
    let tx = ledger
        .add(user, request(dec!(10), "Food", date(2025, 3, 1)))
        .await
        .unwrap();

    let updated = ledger
        .update(
            user,
            tx.id,
            TransactionRequest {
                description: Some("taxi".into()),
                ..request(dec!(42), "Transport", date(2025, 3, 2))
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, tx.id);
    assert_eq!(updated.amount, dec!(42));
    assert_eq!(updated.category, Category::Transport);
    assert_eq!(updated.description.as_deref(), Some("taxi"));
    assert_eq!(updated.transaction_date, date(2025, 3, 2));
}

#[tokio::test]
async fn test_other_users_cannot_touch_transaction() {
    let ledger = service();
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    let tx = ledger
        .add(owner, request(dec!(10), "Food", date(2025, 3, 1)))
        .await
        .unwrap();

    let err = ledger
        .update(intruder, tx.id, request(dec!(1), "Food", date(2025, 3, 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(id) if id == tx.id));

    let err = ledger.delete(intruder, tx.id).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));

    assert!(ledger.list(intruder).await.unwrap().is_empty());
    assert_eq!(ledger.list(owner).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_twice() {
    let ledger = service();
    let user = Uuid::new_v4();
    let tx = ledger
        .add(user, request(dec!(10), "Food", date(2025, 3, 1)))
        .await
        .unwrap();

    ledger.delete(user, tx.id).await.unwrap();
    assert!(matches!(
        ledger.delete(user, tx.id).await,
        Err(LedgerError::NotFound(_))
    ));
}
