use std::collections::BTreeMap;

use crate::{MigrationRecord, MigrationStatus};

/// Application name to migration record, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    records: BTreeMap<String, MigrationRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, app: &str) -> Option<&MigrationRecord> {
        self.records.get(app)
    }

    pub fn status(&self, app: &str) -> Option<MigrationStatus> {
        self.records.get(app).map(|record| record.status)
    }

    /// Replaces any previous record for `app`, returning it.
    pub fn record(
        &mut self,
        app: impl Into<String>,
        record: MigrationRecord,
    ) -> Option<MigrationRecord> {
        self.records.insert(app.into(), record)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MigrationRecord)> {
        self.records
            .iter()
            .map(|(app, record)| (app.as_str(), record))
    }

    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            history: self.clone(),
        }
    }
}

impl FromIterator<(String, MigrationRecord)> for History {
    fn from_iter<I: IntoIterator<Item = (String, MigrationRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// Frozen copy of the history taken before a run starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSnapshot {
    history: History,
}

impl RunSnapshot {
    pub fn get(&self, app: &str) -> Option<&MigrationRecord> {
        self.history.get(app)
    }

    pub fn status(&self, app: &str) -> Option<MigrationStatus> {
        self.history.status(app)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
