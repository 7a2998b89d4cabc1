// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Snapshot key holding the sum of every real category for a period.
pub const AGGREGATE_KEY: &str = "__TOTAL__";

/// Names starting with this prefix are reserved for derived rows.
pub const RESERVED_PREFIX: &str = "__";

pub fn is_reserved(name: &str) -> bool {
    name.starts_with(RESERVED_PREFIX)
}

/// A calendar month. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> LedgerResult<Self> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(LedgerError::InvalidMonth { year, month });
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn succ(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The month `n` steps after this one.
    pub fn plus(self, n: u32) -> Self {
        let idx = self.month as i64 - 1 + n as i64;
        Self {
            year: self.year + (idx / 12) as i32,
            month: (idx % 12) as u32 + 1,
        }
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// First day of the following month: the exclusive end of this month.
    pub fn end_exclusive(self) -> NaiveDate {
        self.succ().first_day()
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        Self::of(date) == self
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidPeriod(s.to_string());
        let (y, m) = s.trim().split_once('-').ok_or_else(invalid)?;
        if y.len() != 4 || m.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u32 = m.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

/// A sinking-fund bucket as supplied to a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub balance: Decimal,
    #[serde(default)]
    pub monthly_contribution: Decimal,
    #[serde(default)]
    pub apr: Decimal,
}

impl Category {
    pub fn new(name: &str, balance: Decimal, monthly_contribution: Decimal, apr: Decimal) -> Self {
        Self {
            name: name.to_string(),
            balance,
            monthly_contribution,
            apr,
        }
    }
}

/// One category's balance at the close of a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub year: i32,
    pub month: u32,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl Snapshot {
    pub fn new(period: YearMonth, category: &str, balance: Decimal) -> Self {
        Self {
            year: period.year,
            month: period.month,
            category: category.to_string(),
            balance,
        }
    }

    pub fn period(&self) -> YearMonth {
        YearMonth {
            year: self.year,
            month: self.month,
        }
    }

    pub fn is_aggregate(&self) -> bool {
        is_reserved(&self.category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Deposit,
    Withdraw,
    Adjust,
    Correction,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Deposit,
        EventKind::Withdraw,
        EventKind::Adjust,
        EventKind::Correction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Deposit => "deposit",
            EventKind::Withdraw => "withdraw",
            EventKind::Adjust => "adjust",
            EventKind::Correction => "correction",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown event type '{}'", s))
    }
}

/// A dated balance change outside the monthly cycle. Every kind applies
/// `amount` as-is; the kind is for display and filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub date: NaiveDate,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: EventKind,
    #[serde(default)]
    pub note: Option<String>,
}

fn default_kind() -> EventKind {
    EventKind::Deposit
}

impl Event {
    pub fn new(date: NaiveDate, category: &str, amount: Decimal, kind: EventKind) -> Self {
        Self {
            date,
            category: category.to_string(),
            amount,
            kind,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Recurrence of a scheduled deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Days(u32),
    /// Same calendar day next month, clamped to the month's last day.
    Monthly,
}

impl Cadence {
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s == "monthly" {
            return Some(Cadence::Monthly);
        }
        let n: u32 = s.strip_suffix('d')?.parse().ok()?;
        (n > 0).then_some(Cadence::Days(n))
    }

    /// The due date one period after `current`.
    pub fn advance(self, current: NaiveDate) -> LedgerResult<NaiveDate> {
        let next = match self {
            Cadence::Days(n) => current.checked_add_days(Days::new(n as u64)),
            Cadence::Monthly => current.checked_add_months(Months::new(1)),
        };
        next.ok_or(LedgerError::DateOutOfRange { date: current })
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cadence::Days(n) => write!(f, "{}d", n),
            Cadence::Monthly => f.write_str("monthly"),
        }
    }
}

/// A scheduled deposit definition.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringRule {
    pub category: String,
    pub amount: Decimal,
    pub every: Cadence,
    pub next_due: NaiveDate,
    pub note: Option<String>,
}

/// Per-category, per-month values supplied by the caller.
pub type MonthlyOverrides = HashMap<String, BTreeMap<YearMonth, Decimal>>;

/// The three override channels reconciled against the baseline schedule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    /// One-time additions to the balance.
    pub lump_sums: MonthlyOverrides,
    /// One-time deltas to that month's scheduled deposit.
    pub payment_adjustments: MonthlyOverrides,
    /// New baseline contribution from that month onward.
    pub contribution_changes: MonthlyOverrides,
}

impl Overrides {
    pub fn lump_sum(mut self, category: &str, period: YearMonth, amount: Decimal) -> Self {
        insert(&mut self.lump_sums, category, period, amount);
        self
    }

    pub fn payment_adjustment(mut self, category: &str, period: YearMonth, delta: Decimal) -> Self {
        insert(&mut self.payment_adjustments, category, period, delta);
        self
    }

    pub fn contribution_change(mut self, category: &str, period: YearMonth, amount: Decimal) -> Self {
        insert(&mut self.contribution_changes, category, period, amount);
        self
    }
}

fn insert(map: &mut MonthlyOverrides, category: &str, period: YearMonth, value: Decimal) {
    map.entry(category.to_string())
        .or_default()
        .insert(period, value);
}

pub fn lookup(map: &MonthlyOverrides, category: &str, period: YearMonth) -> Option<Decimal> {
    map.get(category).and_then(|m| m.get(&period)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn year_month_wraps_december() {
        let dec = YearMonth::new(2025, 12).unwrap();
        assert_eq!(dec.succ(), YearMonth::new(2026, 1).unwrap());
        assert_eq!(YearMonth::new(2025, 1).unwrap().plus(12), YearMonth::new(2026, 1).unwrap());
        assert_eq!(dec.end_exclusive(), d(2026, 1, 1));
    }

    #[test]
    fn year_month_parses_and_rejects() {
        assert_eq!("2025-06".parse::<YearMonth>().unwrap().to_string(), "2025-06");
        assert!("2025-13".parse::<YearMonth>().is_err());
        assert!("2025-6".parse::<YearMonth>().is_err());
        assert!("June".parse::<YearMonth>().is_err());
    }

    #[test]
    fn cadence_parsing() {
        assert_eq!(Cadence::parse("14d"), Some(Cadence::Days(14)));
        assert_eq!(Cadence::parse("monthly"), Some(Cadence::Monthly));
        assert_eq!(Cadence::parse("0d"), None);
        assert_eq!(Cadence::parse("weekly"), None);
        assert_eq!(Cadence::Days(7).to_string(), "7d");
    }

    #[test]
    fn monthly_cadence_clamps_to_month_end() {
        let jan31 = d(2025, 1, 31);
        let feb = Cadence::Monthly.advance(jan31).unwrap();
        assert_eq!(feb, d(2025, 2, 28));
        assert_eq!(Cadence::Monthly.advance(feb).unwrap(), d(2025, 3, 28));
        assert_eq!(Cadence::Monthly.advance(d(2024, 1, 31)).unwrap(), d(2024, 2, 29));
    }

    #[test]
    fn event_kind_round_trips_names() {
        for k in EventKind::ALL {
            assert_eq!(k.as_str().parse::<EventKind>().unwrap(), k);
        }
        assert!("refund".parse::<EventKind>().is_err());
    }
}
