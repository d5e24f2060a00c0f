// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Cashbook", "cashbook"));

pub fn data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let dir = proj.data_dir().to_path_buf();
    fs::create_dir_all(&dir).context("Failed to create data dir")?;
    Ok(dir)
}

/// Global tenant directory database, shared by all tenants.
pub fn directory_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("admin.sqlite"))
}

/// Resolve a tenant's ledger file. `db_nome` values from the directory are
/// bare file names; absolute paths pass through untouched (tests, --ledger).
pub fn ledger_path(db_name: &str) -> Result<PathBuf> {
    let p = Path::new(db_name);
    if p.is_absolute() {
        return Ok(p.to_path_buf());
    }
    Ok(data_dir()?.join(db_name))
}

pub fn open_ledger(path: &Path) -> Result<Connection> {
    let mut conn =
        Connection::open(path).with_context(|| format!("Open ledger at {}", path.display()))?;
    init_ledger_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_ledger_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nome TEXT NOT NULL,
        tipo TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nome TEXT NOT NULL,
        tipo TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        tipo TEXT NOT NULL,
        descricao TEXT NOT NULL,
        valor REAL NOT NULL,
        data_prevista DATE NOT NULL,
        data_real DATE,
        status TEXT NOT NULL,
        conta_id INTEGER,
        categoria_id INTEGER,
        FOREIGN KEY(conta_id) REFERENCES accounts(id),
        FOREIGN KEY(categoria_id) REFERENCES categories(id)
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_data_prevista ON transactions(data_prevista);

    CREATE TABLE IF NOT EXISTS audit_log(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        data_hora TEXT,
        usuario TEXT,
        acao TEXT,
        detalhes TEXT
    );
    "#,
    )?;
    Ok(())
}
