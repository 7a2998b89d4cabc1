// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Append-only record storage.
//!
//! Snapshots and events live in JSON-Lines files: one record per line, in
//! chronological write order. Nothing here rewrites or deletes a line.
//! Recurring rules are the exception: they are a small YAML document that
//! the scheduler rewrites in full after bumping due dates.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{debug, info};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Cadence, Event, RecurringRule, Snapshot};

fn ensure_parent(path: &Path) -> LedgerResult<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).map_err(|e| LedgerError::io(dir, e))?;
        }
    }
    Ok(())
}

/// A JSON-Lines file holding records of one type.
#[derive(Debug, Clone)]
pub struct JsonlLog<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> JsonlLog<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Append each record as one line, creating the file and its parent
    /// directory on first use.
    pub fn append(&self, records: &[T]) -> LedgerResult<()> {
        if records.is_empty() {
            return Ok(());
        }
        ensure_parent(&self.path)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| LedgerError::io(&self.path, e))?;
        let mut w = BufWriter::new(file);
        for r in records {
            let line = serde_json::to_string(r)?;
            writeln!(w, "{}", line).map_err(|e| LedgerError::io(&self.path, e))?;
        }
        w.flush().map_err(|e| LedgerError::io(&self.path, e))?;
        w.get_ref()
            .sync_data()
            .map_err(|e| LedgerError::io(&self.path, e))?;
        debug!("appended {} record(s) to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Every record in file order. A missing file is an empty store; a
    /// corrupt line fails the whole load.
    pub fn load_all(&self) -> LedgerResult<Vec<T>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(LedgerError::io(&self.path, e)),
        };
        let mut out = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| LedgerError::io(&self.path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            let rec = serde_json::from_str(&line).map_err(|source| LedgerError::Decode {
                path: self.path.clone(),
                line: idx + 1,
                source,
            })?;
            out.push(rec);
        }
        debug!("loaded {} record(s) from {}", out.len(), self.path.display());
        Ok(out)
    }
}

/// Month-end balances per category, plus the aggregate rows.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    log: JsonlLog<Snapshot>,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            log: JsonlLog::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.log.path()
    }

    pub fn append(&self, rows: &[Snapshot]) -> LedgerResult<()> {
        self.log.append(rows)
    }

    pub fn load_all(&self) -> LedgerResult<Vec<Snapshot>> {
        self.log.load_all()
    }

    /// Last row per category in file order, without aggregate rows.
    pub fn latest_per_category(&self) -> LedgerResult<BTreeMap<String, Snapshot>> {
        let mut latest = BTreeMap::new();
        for row in self.load_all()? {
            if row.is_aggregate() {
                continue;
            }
            latest.insert(row.category.clone(), row);
        }
        Ok(latest)
    }

    pub fn latest_balances(&self) -> LedgerResult<BTreeMap<String, Decimal>> {
        Ok(self
            .latest_per_category()?
            .into_iter()
            .map(|(name, row)| (name, row.balance))
            .collect())
    }
}

/// Mid-period balance adjustments.
#[derive(Debug, Clone)]
pub struct EventStore {
    log: JsonlLog<Event>,
}

impl EventStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            log: JsonlLog::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.log.path()
    }

    pub fn add(&self, event: &Event) -> LedgerResult<()> {
        self.log.append(std::slice::from_ref(event))
    }

    pub fn append(&self, events: &[Event]) -> LedgerResult<()> {
        self.log.append(events)
    }

    pub fn load_all(&self) -> LedgerResult<Vec<Event>> {
        self.log.load_all()
    }

    /// Events with `from <= date < to`, in storage order.
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> LedgerResult<Vec<Event>> {
        Ok(events_between(&self.load_all()?, from, to)
            .cloned()
            .collect())
    }
}

pub fn events_between(
    events: &[Event],
    from: NaiveDate,
    to: NaiveDate,
) -> impl Iterator<Item = &Event> {
    events.iter().filter(move |e| from <= e.date && e.date < to)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RuleRecord {
    category: String,
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
    every: String,
    next_due: NaiveDate,
    #[serde(default)]
    note: Option<String>,
}

impl RuleRecord {
    fn into_rule(self) -> LedgerResult<RecurringRule> {
        let every = Cadence::parse(&self.every).ok_or_else(|| LedgerError::UnsupportedCadence {
            category: self.category.clone(),
            cadence: self.every.clone(),
        })?;
        Ok(RecurringRule {
            category: self.category,
            amount: self.amount,
            every,
            next_due: self.next_due,
            note: self.note,
        })
    }
}

impl From<&RecurringRule> for RuleRecord {
    fn from(r: &RecurringRule) -> Self {
        Self {
            category: r.category.clone(),
            amount: r.amount,
            every: r.every.to_string(),
            next_due: r.next_due,
            note: r.note.clone(),
        }
    }
}

/// Recurring deposit definitions, kept as a YAML list.
#[derive(Debug, Clone)]
pub struct RuleStore {
    path: PathBuf,
}

impl RuleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All rules in file order. Every cadence is validated before anything
    /// is returned, so one bad rule rejects the whole file.
    pub fn load(&self) -> LedgerResult<Vec<RecurringRule>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(LedgerError::io(&self.path, e)),
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<RuleRecord> =
            serde_yaml::from_str(&text).map_err(|source| LedgerError::RulesDecode {
                path: self.path.clone(),
                source,
            })?;
        records.into_iter().map(RuleRecord::into_rule).collect()
    }

    /// Rewrite the whole file with `rules`, in the given order.
    pub fn save(&self, rules: &[RecurringRule]) -> LedgerResult<()> {
        let records: Vec<RuleRecord> = rules.iter().map(RuleRecord::from).collect();
        let text = serde_yaml::to_string(&records).map_err(LedgerError::RulesEncode)?;
        ensure_parent(&self.path)?;
        fs::write(&self.path, text).map_err(|e| LedgerError::io(&self.path, e))?;
        info!("saved {} rule(s) to {}", rules.len(), self.path.display());
        Ok(())
    }

    pub fn add(&self, rule: RecurringRule) -> LedgerResult<()> {
        let mut rules = self.load()?;
        rules.push(rule);
        self.save(&rules)
    }
}
