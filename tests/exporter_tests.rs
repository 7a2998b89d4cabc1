// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use sinkfund::config::Config;
use sinkfund::models::{Event, EventKind, Snapshot, YearMonth};
use sinkfund::{cli, commands::exporter};
use tempfile::tempdir;

fn seeded(dir: &std::path::Path) -> Config {
    let config = Config::new(dir.join("data"));
    let period = YearMonth::new(2025, 6).unwrap();
    config
        .snapshot_store()
        .append(&[
            Snapshot::new(period, "Tools", Decimal::new(4800, 2)),
            Snapshot::new(period, "__TOTAL__", Decimal::new(4800, 2)),
        ])
        .unwrap();
    config
        .event_store()
        .add(
            &Event::new(
                NaiveDate::from_ymd_opt(2025, 6, 12).unwrap(),
                "Tools",
                Decimal::new(-1234, 2),
                EventKind::Withdraw,
            )
            .with_note("Drill bits"),
        )
        .unwrap();
    config
}

#[test]
fn export_events_writes_pretty_json() {
    let dir = tempdir().unwrap();
    let config = seeded(dir.path());
    let out_path = dir.path().join("events.json");
    let out_str = out_path.to_string_lossy().to_string();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "sinkfund", "export", "events", "--format", "json", "--out", &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&config, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "date": "2025-06-12",
                "category": "Tools",
                "amount": "-12.34",
                "type": "withdraw",
                "note": "Drill bits"
            }
        ])
    );
}

#[test]
fn export_snapshots_writes_csv_with_header() {
    let dir = tempdir().unwrap();
    let config = seeded(dir.path());
    let out_path = dir.path().join("snapshots.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "sinkfund", "export", "snapshots", "--out", &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&config, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines,
        vec!["year,month,category,balance", "2025,6,Tools,48.00", "2025,6,__TOTAL__,48.00"]
    );
}

#[test]
fn export_rejects_unknown_format() {
    let dir = tempdir().unwrap();
    let config = seeded(dir.path());
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "sinkfund", "export", "events", "--format", "xml", "--out", &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        assert!(exporter::handle(&config, export_m).is_err());
    } else {
        panic!("no export subcommand");
    }
    assert!(!out_path.exists());
}
