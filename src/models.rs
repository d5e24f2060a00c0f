// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::LedgerError;

/// Transaction direction. Stored as "Entrada" / "Saída".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxKind {
    #[serde(rename = "Entrada")]
    Income,
    #[serde(rename = "Saída")]
    Expense,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "Entrada",
            TxKind::Expense => "Saída",
        }
    }

    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s.trim().to_lowercase().as_str() {
            "entrada" | "income" => Ok(TxKind::Income),
            "saída" | "saida" | "expense" => Ok(TxKind::Expense),
            other => Err(LedgerError::Validation(format!(
                "unknown transaction kind '{}'",
                other
            ))),
        }
    }
}

/// Persisted lifecycle state. Stored as "Previsto" / "Realizado".
/// Distinct from the derived [`crate::status::DisplayStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    #[serde(rename = "Previsto")]
    Planned,
    #[serde(rename = "Realizado")]
    Settled,
}

impl TxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Planned => "Previsto",
            TxStatus::Settled => "Realizado",
        }
    }

    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s.trim().to_lowercase().as_str() {
            "previsto" | "planned" => Ok(TxStatus::Planned),
            "realizado" | "settled" => Ok(TxStatus::Settled),
            other => Err(LedgerError::Validation(format!(
                "unknown status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKind {
    #[serde(rename = "Conta Corrente")]
    Checking,
    #[serde(rename = "Caixa (Dinheiro)")]
    Cash,
    #[serde(rename = "Cartão de Crédito")]
    CreditCard,
    #[serde(rename = "Poupança/Investimento")]
    Savings,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Checking => "Conta Corrente",
            AccountKind::Cash => "Caixa (Dinheiro)",
            AccountKind::CreditCard => "Cartão de Crédito",
            AccountKind::Savings => "Poupança/Investimento",
        }
    }

    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s.trim().to_lowercase().as_str() {
            "checking" | "conta corrente" => Ok(AccountKind::Checking),
            "cash" | "caixa (dinheiro)" | "caixa" => Ok(AccountKind::Cash),
            "credit-card" | "cartão de crédito" | "cartao de credito" => Ok(AccountKind::CreditCard),
            "savings" | "poupança/investimento" | "poupanca/investimento" => {
                Ok(AccountKind::Savings)
            }
            other => Err(LedgerError::Validation(format!(
                "unknown account kind '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub kind: AccountKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub kind: TxKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub kind: TxKind,
    pub description: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub settled_date: Option<NaiveDate>,
    pub status: TxStatus,
    pub account_id: Option<i64>,
    pub category_id: Option<i64>,
}

/// Field set for inserts and full-row updates.
#[derive(Debug, Clone)]
pub struct TransactionInput {
    pub kind: TxKind,
    pub description: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub status: TxStatus,
    pub account_id: Option<i64>,
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: String,
    pub user: String,
    pub action: String,
    pub detail: String,
}

/// One tenant row from the directory database.
#[derive(Debug, Clone, Serialize)]
pub struct Tenant {
    pub login: String,
    pub company: String,
    pub db_name: String,
    pub active: bool,
    pub plan: String,
    pub monthly_fee: Decimal,
    pub next_due_date: Option<NaiveDate>,
    /// false means the password is still empty (first access pending).
    pub password_set: bool,
}

/// Per-request identity, resolved once at startup and passed to handlers.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: String,
    pub company: String,
    pub ledger_path: PathBuf,
}
