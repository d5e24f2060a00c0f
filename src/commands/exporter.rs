// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Local;
use rusqlite::Connection;
use serde_json::json;

use crate::commands::{reports, transactions};
use crate::status;
use crate::store;
use crate::utils::{fmt_date, fmt_money};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        Some(("cashflow", sub)) => export_cashflow(conn, sub),
        _ => Ok(()),
    }
}

/// Writes exactly what `tx list` shows: same filters, same display formatting.
fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let today = Local::now().date_naive();
    let rows = transactions::view_rows(conn, sub, today)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::WriterBuilder::new().delimiter(b';').from_path(out)?;
            wtr.write_record([
                "ID", "Status", "Data", "Tipo", "Descrição", "Categoria", "Conta", "Valor",
            ])?;
            for r in &rows {
                wtr.write_record([
                    r.id.to_string(),
                    r.status.clone(),
                    r.date.clone(),
                    r.kind.clone(),
                    r.description.clone(),
                    r.category.clone(),
                    r.account.clone(),
                    r.amount.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}

fn export_cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let (from, to) = reports::period_from_matches(sub)?;
    let basis = reports::parse_basis(sub.get_one::<String>("basis").unwrap())?;

    let records = store::ledger_records(conn)?;
    let report = status::cashflow(&records, from, to, basis);

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::WriterBuilder::new().delimiter(b';').from_path(out)?;
            wtr.write_record(["Data", "Entradas", "Saídas", "Saldo do Dia", "Saldo Acumulado"])?;
            for d in &report.days {
                wtr.write_record([
                    fmt_date(d.date),
                    fmt_money(&d.income),
                    fmt_money(&d.expense),
                    fmt_money(&d.net),
                    fmt_money(&d.running_balance),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let days: Vec<_> = report
                .days
                .iter()
                .map(|d| {
                    json!({
                        "date": fmt_date(d.date),
                        "income": fmt_money(&d.income),
                        "expense": fmt_money(&d.expense),
                        "net": fmt_money(&d.net),
                        "running_balance": fmt_money(&d.running_balance),
                    })
                })
                .collect();
            let payload = json!({
                "opening_balance": fmt_money(&report.opening_balance),
                "days": days,
            });
            std::fs::write(out, serde_json::to_string_pretty(&payload)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported cash flow to {}", out);
    Ok(())
}
