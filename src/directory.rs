// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Tenant directory: the global store mapping logins to ledger locations,
//! plan/billing data and the active flag. Owned by the administrator role.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db;
use crate::error::LedgerError;
use crate::models::Tenant;

/// Suggested monthly fees per plan.
pub const PLANS: &[(&str, &str)] = &[
    ("Starter", "49.90"),
    ("Pro", "99.90"),
    ("Business", "199.90"),
];

pub fn default_fee(plan: &str) -> Option<Decimal> {
    PLANS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(plan))
        .and_then(|(_, fee)| fee.parse().ok())
}

pub fn open_directory() -> Result<Connection> {
    let path = db::directory_path()?;
    let conn = Connection::open(&path)
        .with_context(|| format!("Open directory db at {}", path.display()))?;
    init_directory_schema(&conn)?;
    Ok(conn)
}

/// Base table plus additive-column migrations; re-running them on an existing
/// database is harmless and the only schema evolution supported.
pub fn init_directory_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS usuarios(
        usuario TEXT PRIMARY KEY,
        senha TEXT,
        db_nome TEXT,
        empresa TEXT,
        ativo INTEGER DEFAULT 1
    );
    "#,
    )?;
    for ddl in [
        "ALTER TABLE usuarios ADD COLUMN plano TEXT DEFAULT 'Starter'",
        "ALTER TABLE usuarios ADD COLUMN valor_mensal REAL DEFAULT 0",
        "ALTER TABLE usuarios ADD COLUMN vencimento TEXT",
    ] {
        let _ = conn.execute(ddl, []);
    }
    Ok(())
}

/// Outcome of a login attempt. `WrongPassword` is deliberately separate from
/// `NotFound` so the caller can phrase the warning correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Ok { company: String, db_name: String },
    NotFound,
    Blocked,
    FirstAccessRequired { company: String },
    WrongPassword,
}

pub fn authenticate(
    conn: &Connection,
    login: &str,
    password: &str,
) -> Result<AuthOutcome, LedgerError> {
    let login = login.trim().to_lowercase();
    let row = conn
        .query_row(
            "SELECT senha, db_nome, empresa, ativo FROM usuarios WHERE usuario=?1",
            params![login],
            |r| {
                Ok((
                    r.get::<_, Option<String>>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, Option<i64>>(3)?,
                ))
            },
        )
        .optional()?;

    let Some((stored, db_name, company, active)) = row else {
        return Ok(AuthOutcome::NotFound);
    };
    // The blocked check comes before everything else: an inactive tenant
    // never logs in, password or not.
    if active.unwrap_or(1) == 0 {
        return Ok(AuthOutcome::Blocked);
    }
    let stored = stored.unwrap_or_default();
    if stored.is_empty() {
        return Ok(AuthOutcome::FirstAccessRequired { company });
    }
    if stored != password {
        return Ok(AuthOutcome::WrongPassword);
    }
    Ok(AuthOutcome::Ok { company, db_name })
}

/// Completes the first-access flow. Only valid while the stored password is
/// still empty; once set it can only be cleared again via `reset_password`.
pub fn set_password(
    conn: &Connection,
    login: &str,
    new_password: &str,
    confirm: &str,
) -> Result<(), LedgerError> {
    if new_password.is_empty() || new_password != confirm {
        return Err(LedgerError::Validation(
            "passwords are empty or do not match".into(),
        ));
    }
    let login = login.trim().to_lowercase();
    let stored: Option<Option<String>> = conn
        .query_row(
            "SELECT senha FROM usuarios WHERE usuario=?1",
            params![login],
            |r| r.get(0),
        )
        .optional()?;
    let Some(stored) = stored else {
        return Err(LedgerError::NotFound(format!("login '{}' not found", login)));
    };
    if !stored.unwrap_or_default().is_empty() {
        return Err(LedgerError::Validation(
            "password already set; use reset first".into(),
        ));
    }
    conn.execute(
        "UPDATE usuarios SET senha=?1 WHERE usuario=?2",
        params![new_password, login],
    )?;
    Ok(())
}

/// Provision a tenant with an empty password (first-access pending) and a
/// dedicated ledger file name. Returns the ledger file name.
pub fn create_tenant(
    conn: &Connection,
    login: &str,
    company: &str,
    plan: &str,
    monthly_fee: Decimal,
    next_due_date: Option<NaiveDate>,
) -> Result<String, LedgerError> {
    let login = login.trim().to_lowercase();
    if login.is_empty() || company.trim().is_empty() {
        return Err(LedgerError::Validation(
            "login and company name are required".into(),
        ));
    }
    if login.contains(' ') {
        return Err(LedgerError::Validation("login must not contain spaces".into()));
    }
    let exists: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM usuarios WHERE usuario=?1",
            params![login],
            |r| r.get(0),
        )
        .optional()?;
    if exists.is_some() {
        return Err(LedgerError::Integrity(format!(
            "login '{}' already exists",
            login
        )));
    }
    let db_name = format!("cliente_{}.sqlite", login);
    conn.execute(
        "INSERT INTO usuarios (usuario, senha, db_nome, empresa, ativo, plano, valor_mensal, vencimento)
         VALUES (?1, '', ?2, ?3, 1, ?4, ?5, ?6)",
        params![
            login,
            db_name,
            company.trim(),
            plan,
            monthly_fee.to_string(),
            next_due_date,
        ],
    )?;
    Ok(db_name)
}

pub fn set_active(conn: &Connection, login: &str, active: bool) -> Result<(), LedgerError> {
    let changed = conn.execute(
        "UPDATE usuarios SET ativo=?1 WHERE usuario=?2",
        params![if active { 1 } else { 0 }, login.trim().to_lowercase()],
    )?;
    if changed == 0 {
        return Err(LedgerError::NotFound(format!("login '{}' not found", login)));
    }
    Ok(())
}

/// Clears the password back to empty, re-entering the first-access state.
pub fn reset_password(conn: &Connection, login: &str) -> Result<(), LedgerError> {
    let changed = conn.execute(
        "UPDATE usuarios SET senha='' WHERE usuario=?1",
        params![login.trim().to_lowercase()],
    )?;
    if changed == 0 {
        return Err(LedgerError::NotFound(format!("login '{}' not found", login)));
    }
    Ok(())
}

/// Removes the directory row only; the tenant's ledger file is untouched.
pub fn delete_tenant(conn: &Connection, login: &str) -> Result<(), LedgerError> {
    let changed = conn.execute(
        "DELETE FROM usuarios WHERE usuario=?1",
        params![login.trim().to_lowercase()],
    )?;
    if changed == 0 {
        return Err(LedgerError::NotFound(format!("login '{}' not found", login)));
    }
    Ok(())
}

pub fn update_billing(
    conn: &Connection,
    login: &str,
    plan: &str,
    monthly_fee: Decimal,
    next_due_date: NaiveDate,
) -> Result<(), LedgerError> {
    let changed = conn.execute(
        "UPDATE usuarios SET plano=?1, valor_mensal=?2, vencimento=?3 WHERE usuario=?4",
        params![
            plan,
            monthly_fee.to_string(),
            next_due_date,
            login.trim().to_lowercase()
        ],
    )?;
    if changed == 0 {
        return Err(LedgerError::NotFound(format!("login '{}' not found", login)));
    }
    Ok(())
}

pub fn get_tenant(conn: &Connection, login: &str) -> Result<Tenant, LedgerError> {
    let login = login.trim().to_lowercase();
    let mut stmt = conn.prepare(
        "SELECT usuario, empresa, db_nome, ativo, senha, plano, valor_mensal, vencimento
         FROM usuarios WHERE usuario=?1",
    )?;
    let tenant = stmt
        .query_row(params![login], map_tenant)
        .optional()?
        .ok_or_else(|| LedgerError::NotFound(format!("login '{}' not found", login)))?;
    Ok(tenant)
}

#[derive(Debug, Clone, Default)]
pub struct TenantFilter {
    /// Substring over login or company, case-insensitive.
    pub search: Option<String>,
    pub include_blocked: bool,
    pub only_overdue: bool,
}

pub fn list_tenants(
    conn: &Connection,
    filter: &TenantFilter,
    today: NaiveDate,
) -> Result<Vec<Tenant>, LedgerError> {
    let mut stmt = conn.prepare(
        "SELECT usuario, empresa, db_nome, ativo, senha, plano, valor_mensal, vencimento
         FROM usuarios ORDER BY empresa COLLATE NOCASE ASC",
    )?;
    let rows = stmt.query_map([], map_tenant)?;

    let mut out = Vec::new();
    for row in rows {
        let t = row?;
        if !filter.include_blocked && !t.active {
            continue;
        }
        if let Some(ref needle) = filter.search {
            let n = needle.to_lowercase();
            if !t.login.to_lowercase().contains(&n) && !t.company.to_lowercase().contains(&n) {
                continue;
            }
        }
        if filter.only_overdue {
            match t.next_due_date {
                Some(due) if due < today => {}
                _ => continue,
            }
        }
        out.push(t);
    }
    Ok(out)
}

fn map_tenant(r: &rusqlite::Row<'_>) -> rusqlite::Result<Tenant> {
    let password: Option<String> = r.get(4)?;
    let fee: Option<f64> = r.get(6)?;
    Ok(Tenant {
        login: r.get(0)?,
        company: r.get(1)?,
        db_name: r.get(2)?,
        active: r.get::<_, Option<i64>>(3)?.unwrap_or(1) != 0,
        plan: r
            .get::<_, Option<String>>(5)?
            .unwrap_or_else(|| "Starter".to_string()),
        monthly_fee: fee
            .and_then(|f| Decimal::try_from(f).ok())
            .unwrap_or(Decimal::ZERO),
        next_due_date: r.get(7)?,
        password_set: !password.unwrap_or_default().is_empty(),
    })
}

/// Billing situation relative to `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingStatus {
    Current,
    Overdue,
    NoDueDate,
}

impl BillingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BillingStatus::Current => "EM DIA",
            BillingStatus::Overdue => "VENCIDO",
            BillingStatus::NoDueDate => "SEM VENCIMENTO",
        }
    }
}

pub fn billing_status(tenant: &Tenant, today: NaiveDate) -> BillingStatus {
    match tenant.next_due_date {
        None => BillingStatus::NoDueDate,
        Some(due) if due < today => BillingStatus::Overdue,
        Some(_) => BillingStatus::Current,
    }
}
