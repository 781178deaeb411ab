use super::classify::{classify, ph_out_of_range};
use crate::model::{AlertEntry, ReadingRecord, Unit, ALERT_LIMIT};
use crate::time::parse_timestamp;
use std::cmp::Reverse;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Append-only in-memory logs. Lives for the process; nothing is compacted or persisted.
#[derive(Debug, Default)]
pub struct SensorLog {
    records: Vec<ReadingRecord>,
    snapshots: Vec<Unit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub records: usize,
    pub snapshots: usize,
}

impl SensorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies every unit from its last reading (sequence order, not timestamp order),
    /// appends one flattened record per classified unit, then appends the whole batch
    /// (reading-less units included) to the snapshot log.
    pub fn ingest(&mut self, mut units: Vec<Unit>) -> Vec<Unit> {
        for unit in units.iter_mut() {
            let Some(last) = unit.readings.last().cloned() else {
                tracing::debug!(unit_id = %unit.id, "unit has no readings; left unclassified");
                continue;
            };
            let classification = classify(&last);
            unit.classification = Some(classification.clone());
            tracing::debug!(
                unit_id = %unit.id,
                reading_id = %last.id,
                ph = last.ph,
                classification = classification.classification.as_str(),
                "classified unit"
            );
            self.records.push(ReadingRecord {
                unit_id: unit.id.clone(),
                timestamp: last.timestamp.clone(),
                reading: last,
                classification,
            });
        }

        self.snapshots.extend(units.iter().cloned());
        units
    }

    /// Out-of-range readings of the first stored snapshot with this id, newest first, at most
    /// [`ALERT_LIMIT`]. Later snapshots with the same id are shadowed by the first one.
    pub fn alerts_for(&self, unit_id: &str) -> Vec<AlertEntry> {
        let Some(snapshot) = self.snapshots.iter().find(|unit| unit.id == unit_id) else {
            return Vec::new();
        };

        let mut alerts: Vec<AlertEntry> = snapshot
            .readings
            .iter()
            .filter(|reading| ph_out_of_range(reading.ph))
            .map(AlertEntry::from)
            .collect();
        // By instant, not by string: accepted shapes mix `T`/space separators, fractions and
        // offsets. Stable, so equal instants keep submission order; unparsable values go last.
        alerts.sort_by_cached_key(|alert| Reverse(parse_timestamp(&alert.timestamp).ok()));
        alerts.truncate(ALERT_LIMIT);
        alerts
    }

    pub fn records(&self) -> &[ReadingRecord] {
        &self.records
    }

    pub fn snapshots(&self) -> &[Unit] {
        &self.snapshots
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            records: self.records.len(),
            snapshots: self.snapshots.len(),
        }
    }
}

/// Shared handle over a [`SensorLog`]. A single lock covers both logs so an ingest batch is
/// appended atomically with respect to queries and other ingests.
#[derive(Debug, Clone, Default)]
pub struct SensorStore {
    inner: Arc<Mutex<SensorLog>>,
}

impl SensorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn ingest(&self, units: Vec<Unit>) -> (Vec<Unit>, StoreStats) {
        let mut log = self.inner.lock().await;
        let units = log.ingest(units);
        (units, log.stats())
    }

    pub async fn alerts_for(&self, unit_id: &str) -> Vec<AlertEntry> {
        self.inner.lock().await.alerts_for(unit_id)
    }

    pub async fn stats(&self) -> StoreStats {
        self.inner.lock().await.stats()
    }
}
