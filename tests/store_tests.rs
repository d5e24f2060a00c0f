// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashbook::db;
use cashbook::error::LedgerError;
use cashbook::models::{TransactionInput, TxKind, TxStatus};
use cashbook::store::{self, TxFilter};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_ledger_schema(&mut conn).unwrap();
    conn
}

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn input(kind: TxKind, desc: &str, amount: &str, due: &str, status: TxStatus) -> TransactionInput {
    TransactionInput {
        kind,
        description: desc.to_string(),
        amount: dec(amount),
        due_date: d(due),
        status,
        account_id: None,
        category_id: None,
    }
}

#[test]
fn validation_rejects_empty_description_and_nonpositive_amount() {
    let conn = setup();
    let bad = input(TxKind::Expense, "  ", "10", "2024-06-01", TxStatus::Planned);
    assert!(matches!(
        store::insert_transaction(&conn, &bad),
        Err(LedgerError::Validation(_))
    ));
    let bad = input(TxKind::Expense, "rent", "0", "2024-06-01", TxStatus::Planned);
    assert!(matches!(
        store::insert_transaction(&conn, &bad),
        Err(LedgerError::Validation(_))
    ));
}

#[test]
fn settled_input_gets_a_settlement_date() {
    let conn = setup();
    let id = store::insert_transaction(
        &conn,
        &input(TxKind::Income, "sale", "100", "2024-06-05", TxStatus::Settled),
    )
    .unwrap();
    let tx = store::get_transaction(&conn, id).unwrap();
    assert_eq!(tx.status, TxStatus::Settled);
    assert_eq!(tx.settled_date, Some(d("2024-06-05")));
}

#[test]
fn settle_marks_and_dates_the_row() {
    let conn = setup();
    let id = store::insert_transaction(
        &conn,
        &input(TxKind::Expense, "rent", "1200", "2024-06-05", TxStatus::Planned),
    )
    .unwrap();
    store::settle_transaction(&conn, id, d("2024-06-10")).unwrap();
    let tx = store::get_transaction(&conn, id).unwrap();
    assert_eq!(tx.status, TxStatus::Settled);
    assert_eq!(tx.settled_date, Some(d("2024-06-10")));

    assert!(matches!(
        store::settle_transaction(&conn, 999, d("2024-06-10")),
        Err(LedgerError::NotFound(_))
    ));
}

#[test]
fn duplicate_copies_fields_but_resets_lifecycle() {
    let conn = setup();
    let id = store::insert_transaction(
        &conn,
        &input(TxKind::Expense, "hosting", "49.90", "2024-06-05", TxStatus::Settled),
    )
    .unwrap();
    let new_id = store::duplicate_transaction(&conn, id).unwrap();
    assert_ne!(new_id, id);

    let copy = store::get_transaction(&conn, new_id).unwrap();
    assert_eq!(copy.description, "hosting");
    assert_eq!(copy.amount, dec("49.90"));
    assert_eq!(copy.due_date, d("2024-06-05"));
    assert_eq!(copy.status, TxStatus::Planned);
    assert_eq!(copy.settled_date, None);

    // original untouched
    let orig = store::get_transaction(&conn, id).unwrap();
    assert_eq!(orig.status, TxStatus::Settled);

    assert!(matches!(
        store::duplicate_transaction(&conn, 999),
        Err(LedgerError::NotFound(_))
    ));
}

#[test]
fn referenced_account_and_category_cannot_be_deleted() {
    let conn = setup();
    let acc = store::insert_account(&conn, "Banco A", cashbook::models::AccountKind::Checking).unwrap();
    let cat = store::insert_category(&conn, "Aluguel", TxKind::Expense).unwrap();
    let mut tx = input(TxKind::Expense, "rent", "1200", "2024-06-05", TxStatus::Planned);
    tx.account_id = Some(acc);
    tx.category_id = Some(cat);
    let id = store::insert_transaction(&conn, &tx).unwrap();

    assert!(matches!(
        store::delete_account(&conn, acc),
        Err(LedgerError::Integrity(_))
    ));
    assert!(matches!(
        store::delete_category(&conn, cat),
        Err(LedgerError::Integrity(_))
    ));

    store::delete_transaction(&conn, id).unwrap();
    store::delete_account(&conn, acc).unwrap();
    store::delete_category(&conn, cat).unwrap();
}

#[test]
fn list_filters_by_month_kind_and_search() {
    let conn = setup();
    store::insert_transaction(
        &conn,
        &input(TxKind::Expense, "Aluguel escritório", "1200", "2024-06-05", TxStatus::Planned),
    )
    .unwrap();
    store::insert_transaction(
        &conn,
        &input(TxKind::Income, "Venda mensal", "800", "2024-06-20", TxStatus::Planned),
    )
    .unwrap();
    store::insert_transaction(
        &conn,
        &input(TxKind::Expense, "Aluguel julho", "1200", "2024-07-05", TxStatus::Planned),
    )
    .unwrap();

    let june = store::list_transactions(
        &conn,
        &TxFilter {
            month: Some((2024, 6)),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(june.len(), 2);
    // due date ascending
    assert_eq!(june[0].due_date, d("2024-06-05"));

    let incomes = store::list_transactions(
        &conn,
        &TxFilter {
            kind: Some(TxKind::Income),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].description, "Venda mensal");

    let search = store::list_transactions(
        &conn,
        &TxFilter {
            search: Some("ALUGUEL".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(search.len(), 2);
}

#[test]
fn audit_rows_record_user_action_and_detail() {
    let conn = setup();
    store::append_audit(&conn, "acme", "DUPLICAR_LANCAMENTO", "usuario=acme | id_origem=3 -> id_novo=9");
    store::append_audit(&conn, "acme", "EXCLUIR_LANCAMENTO", "usuario=acme | id_excluido=7");

    let entries = store::list_audit(&conn).unwrap();
    assert_eq!(entries.len(), 2);
    // newest first
    assert_eq!(entries[0].action, "EXCLUIR_LANCAMENTO");
    assert_eq!(entries[0].user, "acme");
    assert_eq!(entries[0].detail, "usuario=acme | id_excluido=7");
    assert_eq!(entries[1].action, "DUPLICAR_LANCAMENTO");
    assert!(!entries[1].timestamp.is_empty());
}
