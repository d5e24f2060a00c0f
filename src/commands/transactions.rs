// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;

use crate::commands::inline;
use crate::error::LedgerError;
use crate::models::{Session, TransactionInput, TxKind, TxStatus};
use crate::status::{derive_display_status, DisplayStatus};
use crate::store::{self, TxFilter, TxRow};
use crate::utils::{fmt_date, fmt_money, maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table};

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("settle", sub)) => settle(conn, sub)?,
        Some(("duplicate", sub)) => duplicate(conn, session, sub)?,
        Some(("rm", sub)) => rm(conn, session, sub)?,
        Some(("audit", sub)) => audit(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn audit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let entries = store::list_audit(conn)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &entries)? {
        let rows: Vec<Vec<String>> = entries
            .iter()
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.timestamp.clone(),
                    e.user.clone(),
                    e.action.clone(),
                    e.detail.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Data/Hora", "Usuário", "Ação", "Detalhes"], rows)
        );
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let Some(kind) = inline(TxKind::parse(sub.get_one::<String>("kind").unwrap()))? else {
        return Ok(());
    };
    let Some(status) = inline(TxStatus::parse(sub.get_one::<String>("status").unwrap()))? else {
        return Ok(());
    };
    let description = sub.get_one::<String>("description").unwrap().clone();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let due_date = parse_date(sub.get_one::<String>("due").unwrap())?;

    let account_id = match sub.get_one::<String>("account") {
        Some(name) => match inline(store::account_id_by_name(conn, name))? {
            Some(id) => Some(id),
            None => return Ok(()),
        },
        None => None,
    };
    let category_id = match sub.get_one::<String>("category") {
        Some(name) => match inline(store::category_id_by_name(conn, name))? {
            Some(id) => Some(id),
            None => return Ok(()),
        },
        None => None,
    };

    let input = TransactionInput {
        kind,
        description,
        amount,
        due_date,
        status,
        account_id,
        category_id,
    };
    if let Some(id) = inline(store::insert_transaction(conn, &input))? {
        println!(
            "Recorded {} '{}' of {} due {} (id {})",
            input.kind.as_str(),
            input.description,
            fmt_money(&input.amount),
            fmt_date(input.due_date),
            id
        );
    }
    Ok(())
}

/// Status filter accepted on listings: either the persisted lifecycle state
/// or one of the derived classifications.
#[derive(Debug, Clone, Copy)]
pub enum StatusFilter {
    Stored(TxStatus),
    Derived(DisplayStatus),
}

impl StatusFilter {
    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s.trim().to_lowercase().as_str() {
            "previsto" | "planned" => Ok(StatusFilter::Stored(TxStatus::Planned)),
            "realizado" | "settled" => Ok(StatusFilter::Stored(TxStatus::Settled)),
            "atrasado" | "overdue" => Ok(StatusFilter::Derived(DisplayStatus::Overdue)),
            "due-soon" => Ok(StatusFilter::Derived(DisplayStatus::DueSoon)),
            "pending" => Ok(StatusFilter::Derived(DisplayStatus::Pending)),
            other => Err(LedgerError::Validation(format!(
                "unknown status filter '{}'",
                other
            ))),
        }
    }

    pub fn matches(&self, row: &TxRow, today: NaiveDate) -> bool {
        match self {
            StatusFilter::Stored(s) => row.status == *s,
            StatusFilter::Derived(d) => {
                derive_display_status(row.status, Some(row.due_date), row.settled_date, today) == *d
            }
        }
    }
}

pub fn filter_from_matches(sub: &clap::ArgMatches) -> Result<TxFilter> {
    let month = match sub.get_one::<String>("month") {
        Some(s) => Some(parse_month(s)?),
        None => None,
    };
    let kind = match sub.get_one::<String>("kind") {
        Some(s) => Some(TxKind::parse(s)?),
        None => None,
    };
    Ok(TxFilter {
        month,
        kind,
        account: sub.get_one::<String>("account").cloned(),
        category: sub.get_one::<String>("category").cloned(),
        search: sub.get_one::<String>("search").cloned(),
    })
}

/// Display-formatted row: this is exactly what the table, the CSV export and
/// the JSON output show. The badge text comes from the derived enum only.
#[derive(Debug, Clone, Serialize)]
pub struct TxView {
    pub id: i64,
    pub status: String,
    pub date: String,
    pub kind: String,
    pub description: String,
    pub category: String,
    pub account: String,
    pub amount: String,
}

pub fn view_rows(conn: &Connection, sub: &clap::ArgMatches, today: NaiveDate) -> Result<Vec<TxView>> {
    let filter = filter_from_matches(sub)?;
    let status_filter = match sub.get_one::<String>("status") {
        Some(s) => Some(StatusFilter::parse(s)?),
        None => None,
    };
    let rows = store::list_transactions(conn, &filter)?;
    let mut out = Vec::new();
    for row in rows {
        if let Some(f) = status_filter {
            if !f.matches(&row, today) {
                continue;
            }
        }
        let display = derive_display_status(row.status, Some(row.due_date), row.settled_date, today);
        out.push(TxView {
            id: row.id,
            status: display.label().to_string(),
            date: fmt_date(row.due_date),
            kind: row.kind.as_str().to_string(),
            description: row.description,
            category: row.category.unwrap_or_default(),
            account: row.account.unwrap_or_default(),
            amount: fmt_money(&row.amount),
        });
    }
    Ok(out)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let today = Local::now().date_naive();
    let data = view_rows(conn, sub, today)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.status.clone(),
                    r.date.clone(),
                    r.kind.clone(),
                    r.description.clone(),
                    r.category.clone(),
                    r.account.clone(),
                    r.amount.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Status", "Data", "Tipo", "Descrição", "Categoria", "Conta", "Valor"],
                rows,
            )
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let Some(current) = inline(store::get_transaction(conn, id))? else {
        return Ok(());
    };

    let kind = match sub.get_one::<String>("kind") {
        Some(s) => match inline(TxKind::parse(s))? {
            Some(k) => k,
            None => return Ok(()),
        },
        None => current.kind,
    };
    let status = match sub.get_one::<String>("status") {
        Some(s) => match inline(TxStatus::parse(s))? {
            Some(s) => s,
            None => return Ok(()),
        },
        None => current.status,
    };
    let account_id = match sub.get_one::<String>("account") {
        Some(name) => match inline(store::account_id_by_name(conn, name))? {
            Some(id) => Some(id),
            None => return Ok(()),
        },
        None => current.account_id,
    };
    let category_id = match sub.get_one::<String>("category") {
        Some(name) => match inline(store::category_id_by_name(conn, name))? {
            Some(id) => Some(id),
            None => return Ok(()),
        },
        None => current.category_id,
    };

    let input = TransactionInput {
        kind,
        description: sub
            .get_one::<String>("description")
            .cloned()
            .unwrap_or(current.description),
        amount: match sub.get_one::<String>("amount") {
            Some(s) => parse_decimal(s)?,
            None => current.amount,
        },
        due_date: match sub.get_one::<String>("due") {
            Some(s) => parse_date(s)?,
            None => current.due_date,
        },
        status,
        account_id,
        category_id,
    };
    if inline(store::update_transaction(conn, id, &input))?.is_some() {
        println!("Updated transaction {}", id);
    }
    Ok(())
}

fn settle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };
    if inline(store::settle_transaction(conn, id, date))?.is_some() {
        println!("Transaction {} settled on {}", id, fmt_date(date));
    }
    Ok(())
}

fn duplicate(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if let Some(new_id) = inline(store::duplicate_transaction(conn, id))? {
        store::append_audit(
            conn,
            &session.user,
            "DUPLICAR_LANCAMENTO",
            &format!("usuario={} | id_origem={} -> id_novo={}", session.user, id, new_id),
        );
        println!("Duplicated transaction {} as {}", id, new_id);
    }
    Ok(())
}

fn rm(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if inline(store::delete_transaction(conn, id))?.is_some() {
        store::append_audit(
            conn,
            &session.user,
            "EXCLUIR_LANCAMENTO",
            &format!("usuario={} | id_excluido={}", session.user, id),
        );
        println!("Deleted transaction {}", id);
    }
    Ok(())
}
