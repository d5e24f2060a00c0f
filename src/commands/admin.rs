// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Local;
use rusqlite::Connection;

use crate::commands::inline;
use crate::db;
use crate::directory::{self, TenantFilter};
use crate::utils::{fmt_date, fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("block", sub)) => {
            let login = sub.get_one::<String>("login").unwrap();
            if inline(directory::set_active(conn, login, false))?.is_some() {
                println!("Blocked '{}'", login);
            }
        }
        Some(("unblock", sub)) => {
            let login = sub.get_one::<String>("login").unwrap();
            if inline(directory::set_active(conn, login, true))?.is_some() {
                println!("Unblocked '{}'", login);
            }
        }
        Some(("reset-password", sub)) => {
            let login = sub.get_one::<String>("login").unwrap();
            if inline(directory::reset_password(conn, login))?.is_some() {
                println!("Password cleared for '{}'; first access pending again", login);
            }
        }
        Some(("rm", sub)) => {
            let login = sub.get_one::<String>("login").unwrap();
            if inline(directory::delete_tenant(conn, login))?.is_some() {
                println!("Removed '{}' (the ledger file is kept)", login);
            }
        }
        Some(("billing", sub)) => billing(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let login = sub.get_one::<String>("login").unwrap();
    let company = sub.get_one::<String>("company").unwrap();
    let plan = sub.get_one::<String>("plan").unwrap();
    let fee = match sub.get_one::<String>("fee") {
        Some(s) => parse_decimal(s)?,
        None => match directory::default_fee(plan) {
            Some(f) => f,
            None => {
                eprintln!("unknown plan '{}' and no --fee given", plan);
                return Ok(());
            }
        },
    };
    let due = match sub.get_one::<String>("due") {
        Some(s) => Some(parse_date(s)?),
        None => None,
    };

    let Some(db_name) = inline(directory::create_tenant(conn, login, company, plan, fee, due))?
    else {
        return Ok(());
    };
    // Provision the ledger file up front so first login opens a ready schema.
    let path = db::ledger_path(&db_name)?;
    db::open_ledger(&path)?;
    println!(
        "Created tenant '{}' ({}) on plan {} at {}; first access pending",
        login.trim().to_lowercase(),
        company,
        plan,
        path.display()
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let today = Local::now().date_naive();
    let filter = TenantFilter {
        search: sub.get_one::<String>("search").cloned(),
        include_blocked: sub.get_flag("include-blocked"),
        only_overdue: sub.get_flag("only-overdue"),
    };
    let tenants = directory::list_tenants(conn, &filter, today)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &tenants)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = tenants
        .iter()
        .map(|t| {
            vec![
                t.login.clone(),
                t.company.clone(),
                t.plan.clone(),
                fmt_money(&t.monthly_fee),
                t.next_due_date.map(fmt_date).unwrap_or_default(),
                directory::billing_status(t, today).label().to_string(),
                if t.active { "ativo" } else { "bloqueado" }.to_string(),
                if t.password_set { "sim" } else { "pendente" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Login", "Empresa", "Plano", "Mensalidade", "Vencimento", "Cobrança", "Acesso", "Senha"],
            rows,
        )
    );
    Ok(())
}

fn billing(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let login = sub.get_one::<String>("login").unwrap();
    let plan = sub.get_one::<String>("plan").unwrap();
    let fee = match sub.get_one::<String>("fee") {
        Some(s) => parse_decimal(s)?,
        None => match directory::default_fee(plan) {
            Some(f) => f,
            None => {
                eprintln!("unknown plan '{}' and no --fee given", plan);
                return Ok(());
            }
        },
    };
    let due = parse_date(sub.get_one::<String>("due").unwrap())?;
    if inline(directory::update_billing(conn, login, plan, fee, due))?.is_some() {
        println!(
            "Billing for '{}' set to {} at {} due {}",
            login,
            plan,
            fmt_money(&fee),
            fmt_date(due)
        );
    }
    Ok(())
}
