// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use sinkfund::{cli, commands, config::Config};

fn main() -> Result<()> {
    env_logger::init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();
    let config = Config::from_matches(&matches);

    match matches.subcommand() {
        Some(("init", _)) => {
            config.ensure_root()?;
            println!("Data directory ready at {}", config.root().display());
            println!("  snapshots: {}", config.snapshots_path().display());
            println!("  events:    {}", config.events_path().display());
            println!("  rules:     {}", config.rules_path().display());
        }
        Some(("simulate", sub)) => commands::simulate::handle(&config, sub)?,
        Some(("event", sub)) => commands::events::handle(&config, sub)?,
        Some(("schedule", sub)) => commands::schedule::handle(&config, sub)?,
        Some(("snapshot", sub)) => commands::snapshots::handle(&config, sub)?,
        Some(("payday", sub)) => commands::payday::handle(&config, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&config, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&config)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
