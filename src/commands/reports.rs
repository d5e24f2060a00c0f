// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::json;

use crate::commands::transactions::StatusFilter;
use crate::error::LedgerError;
use crate::models::TxKind;
use crate::status::{self, aging_summary, derive_display_status, Basis};
use crate::store::{self, TxFilter};
use crate::utils::{fmt_date, fmt_money, maybe_print_json, month_end, month_start, parse_date, parse_month, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("payables", sub)) => view(conn, sub, TxKind::Expense)?,
        Some(("receivables", sub)) => view(conn, sub, TxKind::Income)?,
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn month_or_current(sub: &clap::ArgMatches) -> Result<(i32, u32)> {
    match sub.get_one::<String>("month") {
        Some(s) => parse_month(s),
        None => {
            let today = Local::now().date_naive();
            Ok((today.year(), today.month()))
        }
    }
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = month_or_current(sub)?;
    let records = store::ledger_records(conn)?;
    let s = status::monthly_summary(&records, year, month);

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        println!("Resumo de {:02}/{}", month, year);
        let rows = vec![
            vec!["Saldo atual em caixa".to_string(), fmt_money(&s.cash_balance)],
            vec!["A receber (mês)".to_string(), fmt_money(&s.expected_income)],
            vec!["A pagar (mês)".to_string(), fmt_money(&s.expected_expense)],
            vec!["Resultado do mês".to_string(), fmt_money(&s.settled_result)],
        ];
        println!("{}", pretty_table(&["Indicador", "Valor"], rows));
    }
    Ok(())
}

/// Payables and receivables are the same report over opposite kinds; only the
/// wording changes.
fn view(conn: &Connection, sub: &clap::ArgMatches, kind: TxKind) -> Result<()> {
    let today = Local::now().date_naive();
    let (year, month) = month_or_current(sub)?;
    let filter = TxFilter {
        month: Some((year, month)),
        kind: Some(kind),
        account: None,
        category: sub.get_one::<String>("category").cloned(),
        search: sub.get_one::<String>("search").cloned(),
    };
    let status_filter = match sub.get_one::<String>("status") {
        Some(s) => Some(StatusFilter::parse(s)?),
        None => None,
    };

    let mut rows = store::list_transactions(conn, &filter)?;
    if let Some(f) = status_filter {
        rows.retain(|r| f.matches(r, today));
    }
    match sub.get_one::<String>("sort").map(String::as_str) {
        Some("amount-desc") => rows.sort_by(|a, b| b.amount.cmp(&a.amount)),
        Some("amount-asc") => rows.sort_by(|a, b| a.amount.cmp(&b.amount)),
        _ => {} // store order is due date ascending
    }

    let records: Vec<_> = rows.iter().map(|r| r.record()).collect();
    let aging = aging_summary(&records, today);

    let detail: Vec<serde_json::Value> = rows
        .iter()
        .map(|r| {
            let display = derive_display_status(r.status, Some(r.due_date), r.settled_date, today);
            json!({
                "id": r.id,
                "status": display.label_for(kind),
                "date": fmt_date(r.due_date),
                "description": r.description,
                "category": r.category.clone().unwrap_or_default(),
                "amount": fmt_money(&r.amount),
            })
        })
        .collect();

    let payload = json!({ "summary": aging, "rows": detail });
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &payload)? {
        return Ok(());
    }

    let (open_label, settled_label, soon_label) = match kind {
        TxKind::Expense => ("Total em aberto", "Total pago", "Vence em 7 dias"),
        TxKind::Income => ("Total em aberto", "Total recebido", "Recebe em 7 dias"),
    };
    println!(
        "{}",
        pretty_table(
            &[open_label, "Total atrasado", settled_label, soon_label],
            vec![vec![
                fmt_money(&aging.open_total),
                fmt_money(&aging.overdue_total),
                fmt_money(&aging.settled_total),
                aging.due_soon_count.to_string(),
            ]],
        )
    );

    let table_rows: Vec<Vec<String>> = detail
        .iter()
        .map(|v| {
            vec![
                v["status"].as_str().unwrap_or_default().to_string(),
                v["date"].as_str().unwrap_or_default().to_string(),
                v["description"].as_str().unwrap_or_default().to_string(),
                v["category"].as_str().unwrap_or_default().to_string(),
                v["amount"].as_str().unwrap_or_default().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Status", "Data", "Descrição", "Categoria", "Valor"], table_rows)
    );
    Ok(())
}

pub fn parse_basis(s: &str) -> Result<Basis, LedgerError> {
    match s.trim().to_lowercase().as_str() {
        "due" | "previsto" => Ok(Basis::Due),
        "settled" | "realizado" => Ok(Basis::Settled),
        other => Err(LedgerError::Validation(format!("unknown basis '{}'", other))),
    }
}

/// `--from`/`--to`, defaulting to the current month.
pub fn period_from_matches(sub: &clap::ArgMatches) -> Result<(NaiveDate, NaiveDate)> {
    let today = Local::now().date_naive();
    let from = match sub.get_one::<String>("from") {
        Some(s) => parse_date(s)?,
        None => month_start(today.year(), today.month())?,
    };
    let to = match sub.get_one::<String>("to") {
        Some(s) => parse_date(s)?,
        None => month_end(today.year(), today.month())?,
    };
    Ok((from, to))
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (from, to) = period_from_matches(sub)?;
    let basis = parse_basis(sub.get_one::<String>("basis").unwrap())?;
    let records = store::ledger_records(conn)?;
    let report = status::cashflow(&records, from, to, basis);

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }

    println!("Saldo inicial: {}", fmt_money(&report.opening_balance));
    if report.days.is_empty() {
        println!("Nenhum lançamento encontrado neste período.");
        return Ok(());
    }
    let mut rows: Vec<Vec<String>> = report
        .days
        .iter()
        .map(|d| {
            vec![
                fmt_date(d.date),
                fmt_money(&d.income),
                fmt_money(&d.expense),
                fmt_money(&d.net),
                fmt_money(&d.running_balance),
            ]
        })
        .collect();
    let total_in: Decimal = report.days.iter().map(|d| d.income).sum();
    let total_out: Decimal = report.days.iter().map(|d| d.expense).sum();
    let last = report.days.last().map(|d| d.running_balance).unwrap_or(report.opening_balance);
    rows.push(vec![
        "Total".to_string(),
        fmt_money(&total_in),
        fmt_money(&total_out),
        fmt_money(&(total_in - total_out)),
        fmt_money(&last),
    ]);
    println!(
        "{}",
        pretty_table(
            &["Data", "Entradas", "Saídas", "Saldo do Dia", "Saldo Acumulado"],
            rows,
        )
    );
    println!("Saldo final: {}", fmt_money(&last));
    Ok(())
}
