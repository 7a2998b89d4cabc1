// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::store::{EventStore, RuleStore, SnapshotStore};

pub const DATA_DIR_ENV: &str = "SINKFUND_DATA_DIR";
pub const DEFAULT_DATA_DIR: &str = "data";

pub const SNAPSHOT_FILE: &str = "snapshots.jsonl";
pub const EVENT_FILE: &str = "events.jsonl";
pub const RULES_FILE: &str = "recurring.yaml";

/// Where the stores live. Built once at startup and handed to whatever
/// needs a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl Config {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Use the global `--data-dir` argument (which also reads
    /// `SINKFUND_DATA_DIR`), else the default relative directory.
    pub fn from_matches(m: &clap::ArgMatches) -> Self {
        // Global args land on whichever level they were typed; the deepest wins.
        let mut found = m.get_one::<String>("data_dir");
        let mut cur = m;
        while let Some((_, sub)) = cur.subcommand() {
            if let Some(v) = sub.get_one::<String>("data_dir") {
                found = Some(v);
            }
            cur = sub;
        }
        found.map(|s| Self::new(s.trim())).unwrap_or_default()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn snapshots_path(&self) -> PathBuf {
        self.root.join(SNAPSHOT_FILE)
    }

    pub fn events_path(&self) -> PathBuf {
        self.root.join(EVENT_FILE)
    }

    pub fn rules_path(&self) -> PathBuf {
        self.root.join(RULES_FILE)
    }

    pub fn snapshot_store(&self) -> SnapshotStore {
        SnapshotStore::new(self.snapshots_path())
    }

    pub fn event_store(&self) -> EventStore {
        EventStore::new(self.events_path())
    }

    pub fn rule_store(&self) -> RuleStore {
        RuleStore::new(self.rules_path())
    }

    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create data dir {}", self.root.display()))
    }
}
