// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ledger store: every read and write against a tenant's ledger goes through
//! here, so the four report views share one parameterized query instead of
//! re-deriving their own SQL.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::error::LedgerError;
use crate::models::{
    Account, AccountKind, AuditEntry, Category, Transaction, TransactionInput, TxKind, TxStatus,
};
use crate::status::LedgerRecord;

fn read_decimal(v: f64) -> Result<Decimal, LedgerError> {
    Decimal::try_from(v).map_err(|_| LedgerError::Validation(format!("invalid amount '{}'", v)))
}

fn validate(input: &TransactionInput) -> Result<(), LedgerError> {
    if input.description.trim().is_empty() {
        return Err(LedgerError::Validation(
            "description must not be empty".into(),
        ));
    }
    if input.amount <= Decimal::ZERO {
        return Err(LedgerError::Validation(
            "amount must be greater than zero".into(),
        ));
    }
    Ok(())
}

// data_real travels with the lifecycle state: set when the row is Realizado,
// cleared otherwise.
fn settled_date_for(input: &TransactionInput) -> Option<NaiveDate> {
    match input.status {
        TxStatus::Settled => Some(input.due_date),
        TxStatus::Planned => None,
    }
}

pub fn insert_transaction(
    conn: &Connection,
    input: &TransactionInput,
) -> Result<i64, LedgerError> {
    validate(input)?;
    conn.execute(
        "INSERT INTO transactions(tipo, descricao, valor, data_prevista, data_real, status, conta_id, categoria_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            input.kind.as_str(),
            input.description.trim(),
            input.amount.to_string(),
            input.due_date,
            settled_date_for(input),
            input.status.as_str(),
            input.account_id,
            input.category_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_transaction(
    conn: &Connection,
    id: i64,
    input: &TransactionInput,
) -> Result<(), LedgerError> {
    validate(input)?;
    let changed = conn.execute(
        "UPDATE transactions
         SET tipo=?1, descricao=?2, valor=?3, data_prevista=?4, data_real=?5, status=?6, conta_id=?7, categoria_id=?8
         WHERE id=?9",
        params![
            input.kind.as_str(),
            input.description.trim(),
            input.amount.to_string(),
            input.due_date,
            settled_date_for(input),
            input.status.as_str(),
            input.account_id,
            input.category_id,
            id,
        ],
    )?;
    if changed == 0 {
        return Err(LedgerError::NotFound(format!("transaction {} not found", id)));
    }
    Ok(())
}

/// Quick action: mark as settled with `today` as the operative date.
pub fn settle_transaction(
    conn: &Connection,
    id: i64,
    today: NaiveDate,
) -> Result<(), LedgerError> {
    let changed = conn.execute(
        "UPDATE transactions SET status='Realizado', data_real=?1 WHERE id=?2",
        params![today, id],
    )?;
    if changed == 0 {
        return Err(LedgerError::NotFound(format!("transaction {} not found", id)));
    }
    Ok(())
}

/// Delete is unconditional; nothing references a transaction.
pub fn delete_transaction(conn: &Connection, id: i64) -> Result<(), LedgerError> {
    let changed = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if changed == 0 {
        return Err(LedgerError::NotFound(format!("transaction {} not found", id)));
    }
    Ok(())
}

/// Copy every field except: status resets to Previsto and data_real clears.
/// One INSERT..SELECT, so the copy is atomic.
pub fn duplicate_transaction(conn: &Connection, id: i64) -> Result<i64, LedgerError> {
    let inserted = conn.execute(
        "INSERT INTO transactions (tipo, descricao, valor, data_prevista, data_real, status, conta_id, categoria_id)
         SELECT tipo, descricao, valor, data_prevista, NULL, 'Previsto', conta_id, categoria_id
         FROM transactions WHERE id=?1",
        params![id],
    )?;
    if inserted == 0 {
        return Err(LedgerError::NotFound(format!("transaction {} not found", id)));
    }
    Ok(conn.last_insert_rowid())
}

pub fn get_transaction(conn: &Connection, id: i64) -> Result<Transaction, LedgerError> {
    let row = conn
        .query_row(
            "SELECT id, tipo, descricao, valor, data_prevista, data_real, status, conta_id, categoria_id
             FROM transactions WHERE id=?1",
            params![id],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, f64>(3)?,
                    r.get::<_, NaiveDate>(4)?,
                    r.get::<_, Option<NaiveDate>>(5)?,
                    r.get::<_, String>(6)?,
                    r.get::<_, Option<i64>>(7)?,
                    r.get::<_, Option<i64>>(8)?,
                ))
            },
        )
        .optional()?;
    let Some((id, kind, description, amount, due_date, settled_date, status, account_id, category_id)) =
        row
    else {
        return Err(LedgerError::NotFound(format!("transaction {} not found", id)));
    };
    Ok(Transaction {
        id,
        kind: TxKind::parse(&kind)?,
        description,
        amount: read_decimal(amount)?,
        due_date,
        settled_date,
        status: TxStatus::parse(&status)?,
        account_id,
        category_id,
    })
}

// ---------------------------------------------------------------------------
// Accounts and categories
// ---------------------------------------------------------------------------

pub fn insert_account(conn: &Connection, name: &str, kind: AccountKind) -> Result<i64, LedgerError> {
    if name.trim().is_empty() {
        return Err(LedgerError::Validation("account name must not be empty".into()));
    }
    conn.execute(
        "INSERT INTO accounts(nome, tipo) VALUES (?1, ?2)",
        params![name.trim(), kind.as_str()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Refuses when any transaction still points at the row. This guard is part
/// of the store contract, not an optional nicety.
pub fn delete_account(conn: &Connection, id: i64) -> Result<(), LedgerError> {
    let refs: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE conta_id=?1",
        params![id],
        |r| r.get(0),
    )?;
    if refs > 0 {
        return Err(LedgerError::Integrity(format!(
            "account {} still has {} linked transaction(s)",
            id, refs
        )));
    }
    let changed = conn.execute("DELETE FROM accounts WHERE id=?1", params![id])?;
    if changed == 0 {
        return Err(LedgerError::NotFound(format!("account {} not found", id)));
    }
    Ok(())
}

pub fn list_accounts(conn: &Connection) -> Result<Vec<Account>, LedgerError> {
    let mut stmt = conn.prepare("SELECT id, nome, tipo FROM accounts ORDER BY id DESC")?;
    let rows = stmt.query_map([], |r| {
        Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?, r.get::<_, String>(2)?))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, kind) = row?;
        out.push(Account {
            id,
            name,
            kind: AccountKind::parse(&kind)?,
        });
    }
    Ok(out)
}

pub fn account_id_by_name(conn: &Connection, name: &str) -> Result<i64, LedgerError> {
    conn.query_row(
        "SELECT id FROM accounts WHERE nome=?1",
        params![name],
        |r| r.get(0),
    )
    .optional()?
    .ok_or_else(|| LedgerError::NotFound(format!("account '{}' not found", name)))
}

pub fn insert_category(conn: &Connection, name: &str, kind: TxKind) -> Result<i64, LedgerError> {
    if name.trim().is_empty() {
        return Err(LedgerError::Validation("category name must not be empty".into()));
    }
    conn.execute(
        "INSERT INTO categories(nome, tipo) VALUES (?1, ?2)",
        params![name.trim(), kind.as_str()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn delete_category(conn: &Connection, id: i64) -> Result<(), LedgerError> {
    let refs: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE categoria_id=?1",
        params![id],
        |r| r.get(0),
    )?;
    if refs > 0 {
        return Err(LedgerError::Integrity(format!(
            "category {} still has {} linked transaction(s)",
            id, refs
        )));
    }
    let changed = conn.execute("DELETE FROM categories WHERE id=?1", params![id])?;
    if changed == 0 {
        return Err(LedgerError::NotFound(format!("category {} not found", id)));
    }
    Ok(())
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>, LedgerError> {
    let mut stmt = conn.prepare("SELECT id, nome, tipo FROM categories ORDER BY id DESC")?;
    let rows = stmt.query_map([], |r| {
        Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?, r.get::<_, String>(2)?))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, kind) = row?;
        out.push(Category {
            id,
            name,
            kind: TxKind::parse(&kind)?,
        });
    }
    Ok(out)
}

pub fn category_id_by_name(conn: &Connection, name: &str) -> Result<i64, LedgerError> {
    conn.query_row(
        "SELECT id FROM categories WHERE nome=?1",
        params![name],
        |r| r.get(0),
    )
    .optional()?
    .ok_or_else(|| LedgerError::NotFound(format!("category '{}' not found", name)))
}

// ---------------------------------------------------------------------------
// Audit log
// ---------------------------------------------------------------------------

/// Fire-and-forget: a failed audit write must never block the action it
/// describes, so errors are swallowed (stderr at most).
pub fn append_audit(conn: &Connection, user: &str, action: &str, detail: &str) {
    let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    if let Err(e) = conn.execute(
        "INSERT INTO audit_log (data_hora, usuario, acao, detalhes) VALUES (?1, ?2, ?3, ?4)",
        params![now, user, action, detail],
    ) {
        eprintln!("audit write failed: {}", e);
    }
}

pub fn list_audit(conn: &Connection) -> Result<Vec<AuditEntry>, LedgerError> {
    let mut stmt = conn.prepare(
        "SELECT id, data_hora, usuario, acao, detalhes FROM audit_log ORDER BY id DESC",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(AuditEntry {
            id: r.get(0)?,
            timestamp: r.get::<_, Option<String>>(1)?.unwrap_or_default(),
            user: r.get::<_, Option<String>>(2)?.unwrap_or_default(),
            action: r.get::<_, Option<String>>(3)?.unwrap_or_default(),
            detail: r.get::<_, Option<String>>(4)?.unwrap_or_default(),
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Joined row for listings and exports.
#[derive(Debug, Clone, Serialize)]
pub struct TxRow {
    pub id: i64,
    pub kind: TxKind,
    pub status: TxStatus,
    pub description: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub settled_date: Option<NaiveDate>,
    pub account: Option<String>,
    pub category: Option<String>,
}

impl TxRow {
    pub fn record(&self) -> LedgerRecord {
        LedgerRecord {
            id: self.id,
            kind: self.kind,
            amount: self.amount,
            due_date: self.due_date,
            settled_date: self.settled_date,
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TxFilter {
    /// Year + month on the due date.
    pub month: Option<(i32, u32)>,
    pub kind: Option<TxKind>,
    pub account: Option<String>,
    pub category: Option<String>,
    /// Case-insensitive substring over the description.
    pub search: Option<String>,
}

/// The one query behind the transaction list, the payables/receivables pages
/// and the exports. Derived-status filtering happens above this layer since
/// it depends on the reference date.
pub fn list_transactions(conn: &Connection, filter: &TxFilter) -> Result<Vec<TxRow>, LedgerError> {
    let mut sql = String::from(
        "SELECT t.id, t.tipo, t.status, t.descricao, t.valor, t.data_prevista, t.data_real, a.nome, c.nome
         FROM transactions t
         LEFT JOIN accounts a ON t.conta_id = a.id
         LEFT JOIN categories c ON t.categoria_id = c.id
         WHERE 1=1",
    );
    let mut binds: Vec<String> = Vec::new();

    if let Some((year, month)) = filter.month {
        sql.push_str(" AND substr(t.data_prevista,1,7)=?");
        binds.push(format!("{:04}-{:02}", year, month));
    }
    if let Some(kind) = filter.kind {
        sql.push_str(" AND t.tipo=?");
        binds.push(kind.as_str().to_string());
    }
    if let Some(ref account) = filter.account {
        sql.push_str(" AND a.nome=?");
        binds.push(account.clone());
    }
    if let Some(ref category) = filter.category {
        sql.push_str(" AND c.nome=?");
        binds.push(category.clone());
    }
    if let Some(ref search) = filter.search {
        sql.push_str(" AND lower(t.descricao) LIKE '%' || lower(?) || '%'");
        binds.push(search.clone());
    }
    sql.push_str(" ORDER BY t.data_prevista ASC, t.id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let bind_refs: Vec<&dyn rusqlite::ToSql> =
        binds.iter().map(|s| s as &dyn rusqlite::ToSql).collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(bind_refs))?;

    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let kind: String = r.get(1)?;
        let status: String = r.get(2)?;
        let amount: f64 = r.get(4)?;
        out.push(TxRow {
            id: r.get(0)?,
            kind: TxKind::parse(&kind)?,
            status: TxStatus::parse(&status)?,
            description: r.get(3)?,
            amount: read_decimal(amount)?,
            due_date: r.get(5)?,
            settled_date: r.get(6)?,
            account: r.get(7)?,
            category: r.get(8)?,
        });
    }
    Ok(out)
}

/// Full transaction set projected for the aggregation engine, ascending id
/// for a stable accumulation order.
pub fn ledger_records(conn: &Connection) -> Result<Vec<LedgerRecord>, LedgerError> {
    let mut stmt = conn.prepare(
        "SELECT id, tipo, valor, data_prevista, data_real, status FROM transactions ORDER BY id ASC",
    )?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let kind: String = r.get(1)?;
        let amount: f64 = r.get(2)?;
        let status: String = r.get(5)?;
        out.push(LedgerRecord {
            id: r.get(0)?,
            kind: TxKind::parse(&kind)?,
            amount: read_decimal(amount)?,
            due_date: r.get(3)?,
            settled_date: r.get(4)?,
            status: TxStatus::parse(&status)?,
        });
    }
    Ok(out)
}
