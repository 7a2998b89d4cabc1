// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::YearMonth;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt record at {}:{line}: {source}", path.display())]
    Decode {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid rules file {}: {source}", path.display())]
    RulesDecode {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Rules encoding error: {0}")]
    RulesEncode(#[source] serde_yaml::Error),

    #[error("Invalid plan file {}: {source}", path.display())]
    PlanDecode {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unsupported cadence '{cadence}' for category '{category}' (use '<N>d' or 'monthly')")]
    UnsupportedCadence { category: String, cadence: String },

    #[error("Invalid override key '{key}' for category '{category}', expected YYYY-MM")]
    InvalidOverrideKey { category: String, key: String },

    #[error("Invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Invalid period '{0}', expected YYYY-MM")]
    InvalidPeriod(String),

    #[error("Category '{0}' is defined more than once")]
    DuplicateCategory(String),

    #[error("Category name '{0}' uses the reserved '__' prefix")]
    ReservedCategory(String),

    #[error("Date arithmetic overflowed after {date}")]
    DateOutOfRange { date: NaiveDate },

    #[error("Category '{category}' already has a snapshot for {period}; start after it, not at {start}")]
    SnapshotAhead {
        category: String,
        period: YearMonth,
        start: YearMonth,
    },

    #[error("Balance of '{category}' overflowed in {period}")]
    Overflow { category: String, period: YearMonth },
}

impl LedgerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LedgerError::Io {
            path: path.into(),
            source,
        }
    }

    /// Configuration problems are fixed by editing input, not by retrying.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            LedgerError::UnsupportedCadence { .. }
                | LedgerError::InvalidOverrideKey { .. }
                | LedgerError::InvalidMonth { .. }
                | LedgerError::InvalidPeriod(_)
                | LedgerError::DuplicateCategory(_)
                | LedgerError::ReservedCategory(_)
                | LedgerError::SnapshotAhead { .. }
        )
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
