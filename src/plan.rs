// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Plan files: category definitions, override maps and the paycheck
//! split, as one YAML document.
//!
//! ```yaml
//! categories:
//!   - { name: Tools, balance: 0, monthly_contribution: 50, apr: 0 }
//! lump_sums:
//!   Tools: { "2025-06": 60 }
//! payment_adjustments:
//!   Tools: { "2025-11": 150 }
//! contribution_changes:
//!   Tools: { "2026-07": 200 }
//! paycheck:
//!   Tools: 20
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, MonthlyOverrides, Overrides, YearMonth};

type RawOverrides = BTreeMap<String, BTreeMap<String, Decimal>>;

#[derive(Debug, Default, Deserialize)]
struct RawPlan {
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    lump_sums: RawOverrides,
    #[serde(default)]
    payment_adjustments: RawOverrides,
    #[serde(default)]
    contribution_changes: RawOverrides,
    #[serde(default)]
    paycheck: BTreeMap<String, Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    pub categories: Vec<Category>,
    pub overrides: Overrides,
    /// Per-category amounts moved to savings on each payday.
    pub paycheck: BTreeMap<String, Decimal>,
}

fn convert(raw: RawOverrides) -> LedgerResult<MonthlyOverrides> {
    let mut out = MonthlyOverrides::new();
    for (category, months) in raw {
        let mut per = BTreeMap::new();
        for (key, value) in months {
            let period = key
                .parse::<YearMonth>()
                .map_err(|_| LedgerError::InvalidOverrideKey {
                    category: category.clone(),
                    key: key.clone(),
                })?;
            per.insert(period, value);
        }
        out.insert(category, per);
    }
    Ok(out)
}

impl Plan {
    pub fn from_yaml(text: &str, origin: &Path) -> LedgerResult<Self> {
        let raw: RawPlan = if text.trim().is_empty() {
            RawPlan::default()
        } else {
            serde_yaml::from_str(text).map_err(|source| LedgerError::PlanDecode {
                path: origin.to_path_buf(),
                source,
            })?
        };
        Ok(Plan {
            categories: raw.categories,
            overrides: Overrides {
                lump_sums: convert(raw.lump_sums)?,
                payment_adjustments: convert(raw.payment_adjustments)?,
                contribution_changes: convert(raw.contribution_changes)?,
            },
            paycheck: raw.paycheck,
        })
    }

    pub fn load(path: &Path) -> LedgerResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| LedgerError::io(path, e))?;
        Self::from_yaml(&text, path)
    }

    pub fn paycheck_total(&self) -> Decimal {
        self.paycheck.values().copied().sum()
    }
}
