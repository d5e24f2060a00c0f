// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashbook::models::{TransactionInput, TxKind, TxStatus};
use cashbook::store;
use cashbook::{cli, commands::transactions, db};
use chrono::NaiveDate;
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_ledger_schema(&mut conn).unwrap();
    let acc = store::insert_account(&conn, "Caixa", cashbook::models::AccountKind::Cash).unwrap();
    let cat = store::insert_category(&conn, "Vendas", TxKind::Income).unwrap();
    let rows = [
        (TxKind::Income, "Venda balcão", "150.00", "2024-06-01", TxStatus::Settled),
        (TxKind::Expense, "Aluguel", "1200.00", "2024-06-05", TxStatus::Planned),
        (TxKind::Income, "Venda online", "80.00", "2024-06-12", TxStatus::Planned),
        (TxKind::Expense, "Energia", "240.00", "2024-07-02", TxStatus::Planned),
    ];
    for (kind, desc, amount, due, status) in rows {
        store::insert_transaction(
            &conn,
            &TransactionInput {
                kind,
                description: desc.to_string(),
                amount: amount.parse().unwrap(),
                due_date: due.parse().unwrap(),
                status,
                account_id: Some(acc),
                category_id: if kind == TxKind::Income { Some(cat) } else { None },
            },
        )
        .unwrap();
    }
    conn
}

fn list_matches(args: &[&str]) -> clap::ArgMatches {
    let mut full = vec!["cashbook", "tx", "list"];
    full.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(full);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    list_m.clone()
}

fn today() -> NaiveDate {
    "2024-06-10".parse().unwrap()
}

#[test]
fn month_filter_respected() {
    let conn = setup();
    let rows = transactions::view_rows(&conn, &list_matches(&["--month", "2024-06"]), today()).unwrap();
    assert_eq!(rows.len(), 3);
    // due date ascending, Brazilian display format
    assert_eq!(rows[0].date, "01/06/2024");
    assert_eq!(rows[2].date, "12/06/2024");
}

#[test]
fn derived_status_labels_and_filters() {
    let conn = setup();
    let rows = transactions::view_rows(&conn, &list_matches(&[]), today()).unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].status, "Realizado");
    // due 5 days ago and still planned
    assert_eq!(rows[1].status, "Atrasado");
    // due within the 7-day window
    assert_eq!(rows[2].status, "Vence em 7 dias");
    assert_eq!(rows[3].status, "Previsto");

    let overdue =
        transactions::view_rows(&conn, &list_matches(&["--status", "overdue"]), today()).unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].description, "Aluguel");

    let soon =
        transactions::view_rows(&conn, &list_matches(&["--status", "due-soon"]), today()).unwrap();
    assert_eq!(soon.len(), 1);
    assert_eq!(soon[0].description, "Venda online");

    let settled =
        transactions::view_rows(&conn, &list_matches(&["--status", "realizado"]), today()).unwrap();
    assert_eq!(settled.len(), 1);
}

#[test]
fn kind_account_and_search_filters() {
    let conn = setup();
    let incomes =
        transactions::view_rows(&conn, &list_matches(&["--kind", "entrada"]), today()).unwrap();
    assert_eq!(incomes.len(), 2);

    let by_account =
        transactions::view_rows(&conn, &list_matches(&["--account", "Caixa"]), today()).unwrap();
    assert_eq!(by_account.len(), 4);

    let searched =
        transactions::view_rows(&conn, &list_matches(&["--search", "venda"]), today()).unwrap();
    assert_eq!(searched.len(), 2);
}

#[test]
fn amounts_are_display_formatted() {
    let conn = setup();
    let rows = transactions::view_rows(&conn, &list_matches(&["--month", "2024-06"]), today()).unwrap();
    assert_eq!(rows[1].amount, "R$ 1.200,00");
    assert_eq!(rows[1].kind, "Saída");
    assert_eq!(rows[1].category, "");
    assert_eq!(rows[1].account, "Caixa");
}
