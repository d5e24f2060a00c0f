// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure status/aggregation engine. Every report recomputes these from the raw
//! transaction set against a reference date, so they must stay deterministic
//! and side-effect free.

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{TxKind, TxStatus};

/// Derived, date-relative classification. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DisplayStatus {
    Settled,
    Overdue,
    DueSoon,
    Pending,
}

impl DisplayStatus {
    /// Neutral badge text used by the transaction list.
    pub fn label(&self) -> &'static str {
        match self {
            DisplayStatus::Settled => "Realizado",
            DisplayStatus::Overdue => "Atrasado",
            DisplayStatus::DueSoon => "Vence em 7 dias",
            DisplayStatus::Pending => "Previsto",
        }
    }

    /// Payables/receivables vocabulary. Same classification rule, the wording
    /// is the only thing that changes between the two views.
    pub fn label_for(&self, kind: TxKind) -> &'static str {
        match (self, kind) {
            (DisplayStatus::Settled, TxKind::Income) => "Recebido",
            (DisplayStatus::Settled, TxKind::Expense) => "Pago",
            (DisplayStatus::Overdue, _) => "Atrasado",
            (DisplayStatus::DueSoon, TxKind::Income) => "Recebe em 7 dias",
            (DisplayStatus::DueSoon, TxKind::Expense) => "Vence em 7 dias",
            (DisplayStatus::Pending, TxKind::Income) => "A receber",
            (DisplayStatus::Pending, TxKind::Expense) => "A pagar",
        }
    }
}

/// Lookahead window for `DueSoon`, inclusive on both ends.
const DUE_SOON_DAYS: i64 = 7;

/// Single canonical rule for both payables and receivables.
///
/// Settled wins over any date; a missing due date is generic "awaiting";
/// a due date of exactly today or exactly seven days out is `DueSoon`.
pub fn derive_display_status(
    status: TxStatus,
    due_date: Option<NaiveDate>,
    _settled_date: Option<NaiveDate>,
    today: NaiveDate,
) -> DisplayStatus {
    if status == TxStatus::Settled {
        return DisplayStatus::Settled;
    }
    let Some(due) = due_date else {
        return DisplayStatus::Pending;
    };
    if due < today {
        DisplayStatus::Overdue
    } else if due <= today + Duration::days(DUE_SOON_DAYS) {
        DisplayStatus::DueSoon
    } else {
        DisplayStatus::Pending
    }
}

/// Minimal projection of a transaction the engine needs.
#[derive(Debug, Clone)]
pub struct LedgerRecord {
    pub id: i64,
    pub kind: TxKind,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub settled_date: Option<NaiveDate>,
    pub status: TxStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    /// All-time settled income minus settled expense. Intentionally not
    /// scoped to the month: it is the current cash on hand.
    pub cash_balance: Decimal,
    pub expected_income: Decimal,
    pub expected_expense: Decimal,
    pub settled_result: Decimal,
}

fn in_month(d: NaiveDate, year: i32, month: u32) -> bool {
    d.year() == year && d.month() == month
}

/// Monthly KPI set over the tenant's full transaction set.
pub fn monthly_summary(records: &[LedgerRecord], year: i32, month: u32) -> MonthlySummary {
    let mut cash_balance = Decimal::ZERO;
    let mut expected_income = Decimal::ZERO;
    let mut expected_expense = Decimal::ZERO;
    let mut settled_result = Decimal::ZERO;

    for r in records {
        match (r.kind, r.status) {
            (TxKind::Income, TxStatus::Settled) => cash_balance += r.amount,
            (TxKind::Expense, TxStatus::Settled) => cash_balance -= r.amount,
            _ => {}
        }
        if r.status == TxStatus::Planned && in_month(r.due_date, year, month) {
            match r.kind {
                TxKind::Income => expected_income += r.amount,
                TxKind::Expense => expected_expense += r.amount,
            }
        }
        if r.status == TxStatus::Settled {
            if let Some(settled) = r.settled_date {
                if in_month(settled, year, month) {
                    match r.kind {
                        TxKind::Income => settled_result += r.amount,
                        TxKind::Expense => settled_result -= r.amount,
                    }
                }
            }
        }
    }

    MonthlySummary {
        cash_balance,
        expected_income,
        expected_expense,
        settled_result,
    }
}

/// Axis for the cash-flow series: expected dates or actual settlement dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    Due,
    Settled,
}

impl Basis {
    fn date_of(&self, r: &LedgerRecord) -> Option<NaiveDate> {
        match self {
            Basis::Due => Some(r.due_date),
            Basis::Settled => r.settled_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyFlow {
    pub date: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    pub running_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CashflowReport {
    /// Net position accumulated strictly before `start`.
    pub opening_balance: Decimal,
    /// One row per distinct basis date with activity, ascending. Days without
    /// movement are not synthesized.
    pub days: Vec<DailyFlow>,
}

/// Daily cash-flow evolution over `[start, end]`. An inverted range is
/// swapped, never an error; an empty range yields an empty series.
pub fn cashflow(
    records: &[LedgerRecord],
    start: NaiveDate,
    end: NaiveDate,
    basis: Basis,
) -> CashflowReport {
    let (start, end) = if end < start { (end, start) } else { (start, end) };

    let mut opening_balance = Decimal::ZERO;
    use std::collections::BTreeMap;
    let mut by_day: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();

    for r in records {
        let Some(date) = basis.date_of(r) else {
            continue;
        };
        if date < start {
            match r.kind {
                TxKind::Income => opening_balance += r.amount,
                TxKind::Expense => opening_balance -= r.amount,
            }
        } else if date <= end {
            let entry = by_day.entry(date).or_insert((Decimal::ZERO, Decimal::ZERO));
            match r.kind {
                TxKind::Income => entry.0 += r.amount,
                TxKind::Expense => entry.1 += r.amount,
            }
        }
    }

    let mut running = opening_balance;
    let mut days = Vec::with_capacity(by_day.len());
    for (date, (income, expense)) in by_day {
        let net = income - expense;
        running += net;
        days.push(DailyFlow {
            date,
            income,
            expense,
            net,
            running_balance: running,
        });
    }

    CashflowReport {
        opening_balance,
        days,
    }
}

/// Aging totals for a payables or receivables view, over an already-filtered
/// record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgingSummary {
    /// Pending plus DueSoon: still open, not late.
    pub open_total: Decimal,
    pub overdue_total: Decimal,
    pub settled_total: Decimal,
    pub due_soon_count: usize,
}

pub fn aging_summary(records: &[LedgerRecord], today: NaiveDate) -> AgingSummary {
    let mut s = AgingSummary {
        open_total: Decimal::ZERO,
        overdue_total: Decimal::ZERO,
        settled_total: Decimal::ZERO,
        due_soon_count: 0,
    };
    for r in records {
        match derive_display_status(r.status, Some(r.due_date), r.settled_date, today) {
            DisplayStatus::Settled => s.settled_total += r.amount,
            DisplayStatus::Overdue => s.overdue_total += r.amount,
            DisplayStatus::DueSoon => {
                s.open_total += r.amount;
                s.due_soon_count += 1;
            }
            DisplayStatus::Pending => s.open_total += r.amount,
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn rec(
        id: i64,
        kind: TxKind,
        amount: &str,
        due: &str,
        settled: Option<&str>,
        status: TxStatus,
    ) -> LedgerRecord {
        LedgerRecord {
            id,
            kind,
            amount: dec(amount),
            due_date: d(due),
            settled_date: settled.map(d),
            status,
        }
    }

    #[test]
    fn display_status_grid() {
        let today = d("2024-06-10");
        let cases = [
            ("2024-06-09", DisplayStatus::Overdue),
            ("2024-06-10", DisplayStatus::DueSoon),
            ("2024-06-17", DisplayStatus::DueSoon),
            ("2024-06-18", DisplayStatus::Pending),
        ];
        for (due, expected) in cases {
            let got = derive_display_status(TxStatus::Planned, Some(d(due)), None, today);
            assert_eq!(got, expected, "due {}", due);
        }
    }

    #[test]
    fn settled_wins_regardless_of_date() {
        let today = d("2024-06-10");
        for due in ["2024-01-01", "2024-06-10", "2024-12-31"] {
            let got = derive_display_status(
                TxStatus::Settled,
                Some(d(due)),
                Some(d("2024-06-01")),
                today,
            );
            assert_eq!(got, DisplayStatus::Settled);
        }
    }

    #[test]
    fn missing_due_date_is_pending() {
        let today = d("2024-06-10");
        let got = derive_display_status(TxStatus::Planned, None, None, today);
        assert_eq!(got, DisplayStatus::Pending);
    }

    #[test]
    fn monthly_summary_kpis() {
        let records = vec![
            // settled income in-month
            rec(1, TxKind::Income, "1000", "2024-06-05", Some("2024-06-05"), TxStatus::Settled),
            // settled expense from a previous month: counts for cash balance,
            // not for the month's settled result
            rec(2, TxKind::Expense, "300", "2024-05-20", Some("2024-05-20"), TxStatus::Settled),
            // planned income due in-month
            rec(3, TxKind::Income, "500", "2024-06-25", None, TxStatus::Planned),
            // planned expense due in-month
            rec(4, TxKind::Expense, "200", "2024-06-28", None, TxStatus::Planned),
            // planned income due next month: excluded from expectations
            rec(5, TxKind::Income, "999", "2024-07-02", None, TxStatus::Planned),
            // settled expense in-month
            rec(6, TxKind::Expense, "150", "2024-06-08", Some("2024-06-09"), TxStatus::Settled),
        ];
        let s = monthly_summary(&records, 2024, 6);
        assert_eq!(s.cash_balance, dec("550")); // 1000 - 300 - 150, all time
        assert_eq!(s.expected_income, dec("500"));
        assert_eq!(s.expected_expense, dec("200"));
        assert_eq!(s.settled_result, dec("850")); // 1000 - 150 in June
    }

    #[test]
    fn monthly_summary_is_idempotent() {
        let records = vec![
            rec(1, TxKind::Income, "10.10", "2024-06-05", Some("2024-06-05"), TxStatus::Settled),
            rec(2, TxKind::Expense, "3.33", "2024-06-06", None, TxStatus::Planned),
        ];
        let a = monthly_summary(&records, 2024, 6);
        let b = monthly_summary(&records, 2024, 6);
        assert_eq!(a, b);
    }

    #[test]
    fn running_balance_recurrence() {
        let records = vec![
            // before the range: opening balance 100 - 40 = 60
            rec(1, TxKind::Income, "100", "2024-05-30", None, TxStatus::Planned),
            rec(2, TxKind::Expense, "40", "2024-05-31", None, TxStatus::Planned),
            // in range
            rec(3, TxKind::Income, "50", "2024-06-02", None, TxStatus::Planned),
            rec(4, TxKind::Expense, "20", "2024-06-02", None, TxStatus::Planned),
            rec(5, TxKind::Expense, "10", "2024-06-05", None, TxStatus::Planned),
            // after the range: ignored
            rec(6, TxKind::Income, "7777", "2024-07-01", None, TxStatus::Planned),
        ];
        let report = cashflow(&records, d("2024-06-01"), d("2024-06-30"), Basis::Due);
        assert_eq!(report.opening_balance, dec("60"));
        assert_eq!(report.days.len(), 2);

        let first = &report.days[0];
        assert_eq!(first.date, d("2024-06-02"));
        assert_eq!(first.net, dec("30"));
        assert_eq!(first.running_balance, report.opening_balance + first.net);

        for w in report.days.windows(2) {
            assert_eq!(w[1].running_balance, w[0].running_balance + w[1].net);
        }
    }

    #[test]
    fn cashflow_swaps_inverted_range() {
        let records = vec![rec(1, TxKind::Income, "10", "2024-06-02", None, TxStatus::Planned)];
        let a = cashflow(&records, d("2024-06-01"), d("2024-06-30"), Basis::Due);
        let b = cashflow(&records, d("2024-06-30"), d("2024-06-01"), Basis::Due);
        assert_eq!(a, b);
    }

    #[test]
    fn cashflow_empty_range_is_not_an_error() {
        let records = vec![rec(1, TxKind::Income, "10", "2024-06-02", None, TxStatus::Planned)];
        let report = cashflow(&records, d("2030-01-01"), d("2030-01-31"), Basis::Due);
        assert!(report.days.is_empty());
        assert_eq!(report.opening_balance, dec("10"));
    }

    #[test]
    fn cashflow_settled_basis_skips_unsettled() {
        let records = vec![
            rec(1, TxKind::Income, "10", "2024-06-02", Some("2024-06-03"), TxStatus::Settled),
            rec(2, TxKind::Income, "99", "2024-06-02", None, TxStatus::Planned),
        ];
        let report = cashflow(&records, d("2024-06-01"), d("2024-06-30"), Basis::Settled);
        assert_eq!(report.days.len(), 1);
        assert_eq!(report.days[0].date, d("2024-06-03"));
        assert_eq!(report.days[0].income, dec("10"));
    }

    #[test]
    fn aging_summary_buckets() {
        let today = d("2024-06-10");
        let records = vec![
            rec(1, TxKind::Expense, "100", "2024-06-01", None, TxStatus::Planned), // overdue
            rec(2, TxKind::Expense, "50", "2024-06-12", None, TxStatus::Planned),  // due soon
            rec(3, TxKind::Expense, "30", "2024-06-25", None, TxStatus::Planned),  // pending
            rec(4, TxKind::Expense, "70", "2024-06-03", Some("2024-06-03"), TxStatus::Settled),
        ];
        let s = aging_summary(&records, today);
        assert_eq!(s.overdue_total, dec("100"));
        assert_eq!(s.open_total, dec("80"));
        assert_eq!(s.settled_total, dec("70"));
        assert_eq!(s.due_soon_count, 1);
    }
}
