// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sinkfund::MonthSummary;
use sinkfund::models::{Event, EventKind};
use sinkfund::report;
use sinkfund::simulation::CategoryMonth;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn plain(name: &str, balance: &str) -> CategoryMonth {
    CategoryMonth {
        name: name.into(),
        apr: Decimal::ZERO,
        balance: dec(balance),
        amount_deposited: dec("20"),
        payment_adjustment: None,
        lump_sum: None,
        contribution_change: None,
        events: Vec::new(),
    }
}

#[test]
fn markers_join_in_fixed_order() {
    let mut c = plain("Tools", "150");
    c.lump_sum = Some(dec("60"));
    c.contribution_change = Some(dec("-15"));
    c.payment_adjustment = Some(dec("150"));
    c.events.push(Event::new(
        NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
        "Tools",
        dec("12.5"),
        EventKind::Correction,
    ));

    assert_eq!(
        c.markers(),
        "*** Monthly contribution decreased by $15.00 *** \
         *** Payment increased by $150.00 *** \
         *** CORRECTION +12.50 on 06-03 *** \
         *** LUMP SUM +60.00 ***"
    );
}

#[test]
fn negative_lump_sum_is_signed() {
    let mut c = plain("Tools", "0");
    c.lump_sum = Some(dec("-40"));
    assert_eq!(c.lumpsum_marker(), "*** LUMP SUM -40.00 ***");
}

#[test]
fn no_activity_means_no_markers() {
    let c = plain("Tools", "10");
    assert_eq!(c.markers(), "");
    assert!(c.event_markers().is_empty());
}

fn sample() -> Vec<MonthSummary> {
    let mut tools = plain("Tools", "101");
    tools.apr = dec("0.12");
    tools.payment_adjustment = Some(dec("-100"));
    vec![MonthSummary {
        year: 2025,
        month: 1,
        categories: vec![tools, plain("Savings", "300.5")],
    }]
}

#[test]
fn text_schedule_lists_months_categories_and_total() {
    let text = report::render_text(&sample());
    assert!(text.starts_with("SINKING FUNDS SCHEDULE"));
    assert!(text.contains("\n2025-01\n"));
    assert!(text.contains("12.00%"));
    assert!(text.contains("Bal: $101.00"));
    assert!(text.contains("*** Payment decreased by $100.00 ***"));
    assert!(text.contains("Bal: $401.50"));
    assert!(text.trim_end().ends_with("Simulation complete for 1 months."));
}

#[test]
fn month_table_has_total_row() {
    let table = report::month_table(&sample()[0]).to_string();
    assert!(table.contains("Total"));
    assert!(table.contains("401.50"));
    assert!(table.contains("Savings"));
}

#[test]
fn json_rows_flatten_each_category_month() {
    let rows = report::rows(&sample());
    assert_eq!(rows.len(), 2);
    let v = serde_json::to_value(&rows).unwrap();
    assert_eq!(v[0]["name"], "Tools");
    assert_eq!(v[0]["balance"], 101.0);
    assert_eq!(v[0]["payment_change_marker"], "*** Payment decreased by $100.00 ***");
    assert_eq!(v[1]["markers"], "");
}
