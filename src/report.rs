// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Human-readable rendering of simulation results. Pure functions only.

use std::fmt::Write as _;

use comfy_table::Table;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Event;
use crate::simulation::{CategoryMonth, MonthSummary, round_cents};
use crate::utils::pretty_table;

fn dollars(d: Decimal) -> String {
    format!("${:.2}", round_cents(d.abs()))
}

fn signed(d: Decimal) -> String {
    let r = round_cents(d);
    if r < Decimal::ZERO {
        format!("-{:.2}", r.abs())
    } else {
        format!("+{:.2}", r)
    }
}

fn direction(d: Decimal) -> &'static str {
    if d > Decimal::ZERO { "increased" } else { "decreased" }
}

pub fn event_marker(ev: &Event) -> String {
    let mut s = format!(
        "*** {} {} on {}",
        ev.kind.as_str().to_uppercase(),
        signed(ev.amount),
        ev.date.format("%m-%d")
    );
    if let Some(note) = ev.note.as_deref().filter(|n| !n.is_empty()) {
        let _ = write!(s, " ({})", note);
    }
    s.push_str(" ***");
    s
}

impl CategoryMonth {
    pub fn contribution_change_marker(&self) -> String {
        match self.contribution_change {
            Some(diff) => format!(
                "*** Monthly contribution {} by {} ***",
                direction(diff),
                dollars(diff)
            ),
            None => String::new(),
        }
    }

    pub fn payment_change_marker(&self) -> String {
        match self.payment_adjustment {
            Some(adj) => format!("*** Payment {} by {} ***", direction(adj), dollars(adj)),
            None => String::new(),
        }
    }

    pub fn lumpsum_marker(&self) -> String {
        match self.lump_sum {
            Some(lump) => format!("*** LUMP SUM {} ***", signed(lump)),
            None => String::new(),
        }
    }

    pub fn event_markers(&self) -> Vec<String> {
        self.events.iter().map(event_marker).collect()
    }

    /// Every nonempty marker on one line: contribution change, payment,
    /// events, lump sum.
    pub fn markers(&self) -> String {
        let mut parts = vec![self.contribution_change_marker(), self.payment_change_marker()];
        parts.extend(self.event_markers());
        parts.push(self.lumpsum_marker());
        parts.retain(|p| !p.is_empty());
        parts.join(" ")
    }
}

/// Flat, serializable view of one category-month.
#[derive(Debug, Serialize)]
pub struct SummaryRow {
    pub year: i32,
    pub month: u32,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub apr: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_deposited: Decimal,
    pub payment_change_marker: String,
    pub lumpsum_marker: String,
    pub contribution_change_marker: String,
    pub event_markers: Vec<String>,
    pub markers: String,
}

pub fn rows(summaries: &[MonthSummary]) -> Vec<SummaryRow> {
    summaries
        .iter()
        .flat_map(|m| {
            m.categories.iter().map(move |c| SummaryRow {
                year: m.year,
                month: m.month,
                name: c.name.clone(),
                apr: c.apr,
                balance: c.balance,
                amount_deposited: c.amount_deposited,
                payment_change_marker: c.payment_change_marker(),
                lumpsum_marker: c.lumpsum_marker(),
                contribution_change_marker: c.contribution_change_marker(),
                event_markers: c.event_markers(),
                markers: c.markers(),
            })
        })
        .collect()
}

fn apr_pct(apr: Decimal) -> String {
    format!("{:.2}%", round_cents(apr * Decimal::from(100)))
}

pub fn month_table(summary: &MonthSummary) -> Table {
    let mut data: Vec<Vec<String>> = summary
        .categories
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                apr_pct(c.apr),
                format!("{:.2}", c.amount_deposited),
                format!("{:.2}", c.balance),
                c.markers(),
            ]
        })
        .collect();
    data.push(vec![
        "Total".into(),
        String::new(),
        String::new(),
        format!("{:.2}", summary.total()),
        String::new(),
    ]);
    pretty_table(&["Category", "APR", "Deposited", "Balance", "Markers"], data)
}

/// The line-oriented schedule: one block per month, one line per category.
pub fn render_text(summaries: &[MonthSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "SINKING FUNDS SCHEDULE (by Calendar Month)");
    let _ = writeln!(out, "{}", "=".repeat(70));
    for m in summaries {
        let _ = writeln!(out, "\n{}", m.period());
        let _ = writeln!(out, "{}", "-".repeat(70));
        for c in &m.categories {
            let mut line = format!(
                "  {:<20} {:<8} Dep: {:<10} Bal: {:<12}",
                c.name,
                apr_pct(c.apr),
                dollars(c.amount_deposited),
                format!("${:.2}", c.balance),
            );
            let markers = c.markers();
            if !markers.is_empty() {
                line.push(' ');
                line.push_str(&markers);
            }
            let _ = writeln!(out, "{}", line.trim_end());
        }
        let _ = writeln!(out, "  {:<20} {:<8} {:<15} Bal: ${:.2}", "TOTAL", "", "", m.total());
    }
    let _ = writeln!(out, "\nSimulation complete for {} months.", summaries.len());
    out
}
