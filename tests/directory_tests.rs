// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashbook::directory::{self, AuthOutcome, BillingStatus, TenantFilter};
use cashbook::error::LedgerError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    directory::init_directory_schema(&conn).unwrap();
    conn
}

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn fee(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn first_access_flow_end_to_end() {
    let conn = setup();
    let db_name =
        directory::create_tenant(&conn, "Acme", "Acme Ltda", "Starter", fee("49.90"), None)
            .unwrap();
    assert_eq!(db_name, "cliente_acme.sqlite");

    // password not set yet, whatever the caller sends
    assert_eq!(
        directory::authenticate(&conn, "acme", "anything").unwrap(),
        AuthOutcome::FirstAccessRequired {
            company: "Acme Ltda".to_string()
        }
    );

    // confirmation must match
    assert!(matches!(
        directory::set_password(&conn, "acme", "s3cret", "other"),
        Err(LedgerError::Validation(_))
    ));
    directory::set_password(&conn, "acme", "s3cret", "s3cret").unwrap();

    assert_eq!(
        directory::authenticate(&conn, " ACME ", "s3cret").unwrap(),
        AuthOutcome::Ok {
            company: "Acme Ltda".to_string(),
            db_name: "cliente_acme.sqlite".to_string()
        }
    );
    assert_eq!(
        directory::authenticate(&conn, "acme", "wrong").unwrap(),
        AuthOutcome::WrongPassword
    );

    // once set, only a reset can change it
    assert!(matches!(
        directory::set_password(&conn, "acme", "new", "new"),
        Err(LedgerError::Validation(_))
    ));
    directory::reset_password(&conn, "acme").unwrap();
    assert_eq!(
        directory::authenticate(&conn, "acme", "s3cret").unwrap(),
        AuthOutcome::FirstAccessRequired {
            company: "Acme Ltda".to_string()
        }
    );
}

#[test]
fn blocked_wins_over_everything_else() {
    let conn = setup();
    directory::create_tenant(&conn, "acme", "Acme Ltda", "Starter", fee("49.90"), None).unwrap();
    directory::set_active(&conn, "acme", false).unwrap();
    // even the first-access state is hidden behind the block
    assert_eq!(
        directory::authenticate(&conn, "acme", "").unwrap(),
        AuthOutcome::Blocked
    );
    directory::set_active(&conn, "acme", true).unwrap();
    assert!(matches!(
        directory::authenticate(&conn, "acme", "").unwrap(),
        AuthOutcome::FirstAccessRequired { .. }
    ));
}

#[test]
fn unknown_login_is_not_found() {
    let conn = setup();
    assert_eq!(
        directory::authenticate(&conn, "ghost", "x").unwrap(),
        AuthOutcome::NotFound
    );
    assert!(matches!(
        directory::set_active(&conn, "ghost", false),
        Err(LedgerError::NotFound(_))
    ));
}

#[test]
fn login_rules_are_enforced() {
    let conn = setup();
    directory::create_tenant(&conn, "acme", "Acme Ltda", "Starter", fee("49.90"), None).unwrap();
    assert!(matches!(
        directory::create_tenant(&conn, "ACME", "Other", "Starter", fee("49.90"), None),
        Err(LedgerError::Integrity(_))
    ));
    assert!(matches!(
        directory::create_tenant(&conn, "two words", "Other", "Starter", fee("49.90"), None),
        Err(LedgerError::Validation(_))
    ));
    assert!(matches!(
        directory::create_tenant(&conn, "", "Other", "Starter", fee("49.90"), None),
        Err(LedgerError::Validation(_))
    ));
}

#[test]
fn billing_status_relative_to_today() {
    let conn = setup();
    directory::create_tenant(&conn, "acme", "Acme Ltda", "Pro", fee("99.90"), None).unwrap();
    let today = d("2024-06-10");

    let t = directory::get_tenant(&conn, "acme").unwrap();
    assert_eq!(directory::billing_status(&t, today), BillingStatus::NoDueDate);

    directory::update_billing(&conn, "acme", "Pro", fee("99.90"), d("2024-06-10")).unwrap();
    let t = directory::get_tenant(&conn, "acme").unwrap();
    assert_eq!(directory::billing_status(&t, today), BillingStatus::Current);

    directory::update_billing(&conn, "acme", "Pro", fee("99.90"), d("2024-06-09")).unwrap();
    let t = directory::get_tenant(&conn, "acme").unwrap();
    assert_eq!(directory::billing_status(&t, today), BillingStatus::Overdue);
    assert_eq!(directory::billing_status(&t, today).label(), "VENCIDO");
}

#[test]
fn listing_hides_blocked_unless_asked() {
    let conn = setup();
    directory::create_tenant(&conn, "alpha", "Alpha SA", "Starter", fee("49.90"), None).unwrap();
    directory::create_tenant(&conn, "beta", "Beta ME", "Pro", fee("99.90"), Some(d("2024-06-01")))
        .unwrap();
    directory::set_active(&conn, "alpha", false).unwrap();
    let today = d("2024-06-10");

    let visible = directory::list_tenants(&conn, &TenantFilter::default(), today).unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].login, "beta");

    let all = directory::list_tenants(
        &conn,
        &TenantFilter {
            include_blocked: true,
            ..Default::default()
        },
        today,
    )
    .unwrap();
    assert_eq!(all.len(), 2);
    // ordered by company name
    assert_eq!(all[0].login, "alpha");

    let overdue = directory::list_tenants(
        &conn,
        &TenantFilter {
            include_blocked: true,
            only_overdue: true,
            ..Default::default()
        },
        today,
    )
    .unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].login, "beta");

    let searched = directory::list_tenants(
        &conn,
        &TenantFilter {
            search: Some("ALPHA".to_string()),
            include_blocked: true,
            ..Default::default()
        },
        today,
    )
    .unwrap();
    assert_eq!(searched.len(), 1);
}

#[test]
fn plans_have_default_fees() {
    assert_eq!(directory::default_fee("starter"), Some(fee("49.90")));
    assert_eq!(directory::default_fee("Pro"), Some(fee("99.90")));
    assert_eq!(directory::default_fee("Business"), Some(fee("199.90")));
    assert_eq!(directory::default_fee("Enterprise"), None);
}
