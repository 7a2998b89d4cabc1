// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

use crate::config::DATA_DIR_ENV;

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as a JSON array"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON Lines"),
    )
}

fn required(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn optional(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

fn plan_arg() -> Arg {
    Arg::new("plan")
        .long("plan")
        .required(true)
        .help("YAML plan with categories and overrides")
}

fn simulate_cmd() -> Command {
    json_args(
        Command::new("simulate")
            .about("Project sinking-fund balances month by month")
            .arg(plan_arg())
            .arg(optional("start", "First month YYYY-MM (default: current month)"))
            .arg(
                Arg::new("months")
                    .long("months")
                    .value_parser(value_parser!(u32))
                    .default_value("12")
                    .help("Number of months to simulate"),
            )
            .arg(
                Arg::new("no_interest")
                    .long("no-interest")
                    .action(ArgAction::SetTrue)
                    .help("Skip monthly interest"),
            )
            .arg(
                Arg::new("no_resume")
                    .long("no-resume")
                    .action(ArgAction::SetTrue)
                    .help("Ignore stored snapshots; use plan balances"),
            )
            .arg(
                Arg::new("no_events")
                    .long("no-events")
                    .action(ArgAction::SetTrue)
                    .help("Ignore the event ledger"),
            )
            .arg(
                Arg::new("record")
                    .long("record")
                    .action(ArgAction::SetTrue)
                    .help("Append the resulting snapshots to the store"),
            )
            .arg(
                Arg::new("table")
                    .long("table")
                    .action(ArgAction::SetTrue)
                    .help("Render one table per month instead of the text schedule"),
            ),
    )
}

fn event_cmd() -> Command {
    Command::new("event")
        .about("Record and inspect mid-month events")
        .subcommand(
            Command::new("add")
                .about("Append one event")
                .arg(required("category", "Category name (case-sensitive)"))
                .arg(
                    required("amount", "Signed amount; negative decreases the balance")
                        .allow_hyphen_values(true),
                )
                .arg(optional("date", "YYYY-MM-DD (default: today)"))
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .default_value("deposit")
                        .value_parser(["deposit", "withdraw", "adjust", "correction"])
                        .help("Event type"),
                )
                .arg(optional("note", "Optional memo")),
        )
        .subcommand(json_args(
            Command::new("list")
                .about("List events in storage order")
                .arg(optional("from", "Inclusive start date YYYY-MM-DD"))
                .arg(optional("to", "Exclusive end date YYYY-MM-DD"))
                .arg(optional("category", "Only this category")),
        ))
}

fn schedule_cmd() -> Command {
    Command::new("schedule")
        .about("Recurring deposit rules")
        .subcommand(
            Command::new("run")
                .about("Emit events for every rule due on or before today")
                .arg(optional("today", "Evaluate as of YYYY-MM-DD (default: today)")),
        )
        .subcommand(Command::new("list").about("Show rules"))
        .subcommand(
            Command::new("add")
                .about("Add a rule")
                .arg(required("category", "Category name"))
                .arg(required("amount", "Deposit amount").allow_hyphen_values(true))
                .arg(required("every", "Cadence: '<N>d' or 'monthly'"))
                .arg(required("next_due", "First due date YYYY-MM-DD").long("next-due"))
                .arg(optional("note", "Optional memo")),
        )
}

fn snapshot_cmd() -> Command {
    Command::new("snapshot")
        .about("Inspect and seed balance snapshots")
        .subcommand(json_args(
            Command::new("list")
                .about("All snapshot rows in storage order")
                .arg(optional("category", "Only this category")),
        ))
        .subcommand(json_args(
            Command::new("latest").about("Latest balance per category"),
        ))
        .subcommand(
            Command::new("seed")
                .about("Write opening balances plus the total row")
                .arg(required("month", "Period YYYY-MM"))
                .arg(
                    Arg::new("balance")
                        .long("balance")
                        .required(true)
                        .action(ArgAction::Append)
                        .allow_hyphen_values(true)
                        .help("NAME=AMOUNT, repeatable"),
                ),
        )
}

fn payday_cmd() -> Command {
    Command::new("payday")
        .about("Show the paycheck transfer and projected total")
        .arg(plan_arg())
        .arg(optional("date", "Payday YYYY-MM-DD (default: today)"))
        .arg(
            Arg::new("log")
                .long("log")
                .action(ArgAction::SetTrue)
                .help("Append one deposit event per category"),
        )
}

fn export_cmd() -> Command {
    let target = |name: &'static str, about: &'static str| {
        Command::new(name)
            .about(about)
            .arg(
                Arg::new("format")
                    .long("format")
                    .default_value("csv")
                    .help("csv | json"),
            )
            .arg(required("out", "Output file"))
    };
    Command::new("export")
        .about("Export stores to CSV or JSON")
        .subcommand(target("snapshots", "Export snapshot rows"))
        .subcommand(target("events", "Export events"))
}

pub fn build_cli() -> Command {
    Command::new("sinkfund")
        .version(clap::crate_version!())
        .about("Sinking-fund projections, event ledger and recurring deposits")
        .arg(
            Arg::new("data_dir")
                .long("data-dir")
                .global(true)
                .env(DATA_DIR_ENV)
                .help("Directory holding the stores (default: ./data)"),
        )
        .subcommand(Command::new("init").about("Create the data directory"))
        .subcommand(simulate_cmd())
        .subcommand(event_cmd())
        .subcommand(schedule_cmd())
        .subcommand(snapshot_cmd())
        .subcommand(payday_cmd())
        .subcommand(export_cmd())
        .subcommand(Command::new("doctor").about("Check the stores for problems"))
}
