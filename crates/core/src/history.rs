use crate::anxiety::AnxietyLevel;
use crate::catalog::Mode;
use crate::error::StoreError;
use crate::store::HistoryStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Summary of one evaluated answer, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub date: DateTime<Utc>,
    pub role: String,
    pub mode: String,
    pub score: u8,
    pub communication: u8,
    pub reasoning: u8,
    pub readiness: u8,
    pub anxiety_detected: bool,
}

fn scaled(score: u8, factor: f64) -> u8 {
    (f64::from(score) * factor).round() as u8
}

impl HistoryRecord {
    pub fn derive(
        date: DateTime<Utc>,
        score: u8,
        role: &str,
        mode: &Mode,
        anxiety: AnxietyLevel,
    ) -> Self {
        Self {
            date,
            role: role.to_string(),
            mode: mode.as_str().to_string(),
            score,
            communication: scaled(score, 0.9),
            reasoning: scaled(score, 0.85),
            readiness: scaled(score, 0.9),
            anxiety_detected: anxiety != AnxietyLevel::Low,
        }
    }
}

/// Appends records to a bounded, oldest-first list in the history store.
pub struct HistoryRecorder {
    store: Arc<dyn HistoryStore>,
    limit: usize,
    // Serializes the load-append-truncate-save cycle.
    write_lock: Mutex<()>,
}

impl HistoryRecorder {
    pub fn new(store: Arc<dyn HistoryStore>, limit: usize) -> Self {
        Self {
            store,
            limit: limit.max(1),
            write_lock: Mutex::new(()),
        }
    }

    pub fn record(
        &self,
        score: u8,
        role: &str,
        mode: &Mode,
        anxiety: AnxietyLevel,
    ) -> Result<HistoryRecord, StoreError> {
        self.record_at(Utc::now(), score, role, mode, anxiety)
    }

    pub fn record_at(
        &self,
        date: DateTime<Utc>,
        score: u8,
        role: &str,
        mode: &Mode,
        anxiety: AnxietyLevel,
    ) -> Result<HistoryRecord, StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut records = match self.store.load_history() {
            Ok(records) => records,
            Err(e @ StoreError::Json { .. }) => {
                tracing::warn!("Discarding unreadable interview history: {}", e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let record = HistoryRecord::derive(date, score, role, mode, anxiety);
        records.push(record.clone());
        if records.len() > self.limit {
            let overflow = records.len() - self.limit;
            records.drain(..overflow);
        }
        self.store.save_history(&records)?;
        tracing::debug!("Recorded score {} ({} entries kept)", score, records.len());
        Ok(record)
    }

    pub fn records(&self) -> Result<Vec<HistoryRecord>, StoreError> {
        self.store.load_history()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Steady,
    Declining,
}

/// Aggregate view of the stored history for progress tracking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub sessions: usize,
    pub average_score: f64,
    pub best_score: u8,
    pub latest_score: u8,
    pub trend: Trend,
}

impl ProgressSummary {
    pub fn from_records(records: &[HistoryRecord]) -> Option<Self> {
        let (latest, earlier) = records.split_last()?;
        let total: u32 = records.iter().map(|r| u32::from(r.score)).sum();
        let best_score = records.iter().map(|r| r.score).max().unwrap_or(latest.score);

        let trend = if earlier.is_empty() {
            Trend::Steady
        } else {
            let earlier_total: u32 = earlier.iter().map(|r| u32::from(r.score)).sum();
            let earlier_avg = f64::from(earlier_total) / earlier.len() as f64;
            let delta = f64::from(latest.score) - earlier_avg;
            if delta >= 5.0 {
                Trend::Improving
            } else if delta <= -5.0 {
                Trend::Declining
            } else {
                Trend::Steady
            }
        };

        Some(Self {
            sessions: records.len(),
            average_score: f64::from(total) / records.len() as f64,
            best_score,
            latest_score: latest.score,
            trend,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn recorder() -> HistoryRecorder {
        HistoryRecorder::new(Arc::new(MemoryStore::new()), DEFAULT_HISTORY_LIMIT)
    }

    #[test]
    fn test_record_derives_sub_scores() {
        let record = recorder()
            .record(100, "Engineer", &Mode::Behavioral, AnxietyLevel::Low)
            .unwrap();

        assert_eq!(record.score, 100);
        assert_eq!(record.communication, 90);
        assert_eq!(record.reasoning, 85);
        assert_eq!(record.readiness, 90);
        assert!(!record.anxiety_detected);
        assert_eq!(record.mode, "behavioral");
    }

    #[test]
    fn test_sub_scores_round_half_away_from_zero() {
        let date = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let record = HistoryRecord::derive(date, 75, "", &Mode::Supportive, AnxietyLevel::Medium);
        // 67.5 and 63.75
        assert_eq!(record.communication, 68);
        assert_eq!(record.reasoning, 64);
        assert!(record.anxiety_detected);
    }

    #[test]
    fn test_history_keeps_most_recent_twenty_in_order() {
        let recorder = recorder();
        for i in 0..25u8 {
            recorder
                .record(i, "Analyst", &Mode::Technical, AnxietyLevel::Low)
                .unwrap();
        }

        let records = recorder.records().unwrap();
        assert_eq!(records.len(), 20);
        let scores: Vec<u8> = records.iter().map(|r| r.score).collect();
        assert_eq!(scores, (5..25).collect::<Vec<u8>>());
    }

    #[test]
    fn test_concurrent_records_do_not_drop_writes() {
        let recorder = Arc::new(recorder());
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let recorder = recorder.clone();
                std::thread::spawn(move || {
                    recorder
                        .record(i, "", &Mode::Supportive, AnxietyLevel::Low)
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(recorder.records().unwrap().len(), 8);
    }

    #[test]
    fn test_corrupt_history_is_replaced() {
        use crate::store::{HISTORY_KEY, KeyValueStore};
        let store = Arc::new(MemoryStore::new());
        store.set(HISTORY_KEY, "[{broken").unwrap();
        let recorder = HistoryRecorder::new(store, DEFAULT_HISTORY_LIMIT);

        recorder
            .record(60, "", &Mode::Supportive, AnxietyLevel::Low)
            .unwrap();
        assert_eq!(recorder.records().unwrap().len(), 1);
    }

    #[test]
    fn test_progress_summary() {
        let date = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let records: Vec<_> = [50u8, 60, 70, 90]
            .iter()
            .map(|s| HistoryRecord::derive(date, *s, "", &Mode::Behavioral, AnxietyLevel::Low))
            .collect();

        let summary = ProgressSummary::from_records(&records).unwrap();
        assert_eq!(summary.sessions, 4);
        assert_eq!(summary.average_score, 67.5);
        assert_eq!(summary.best_score, 90);
        assert_eq!(summary.latest_score, 90);
        assert_eq!(summary.trend, Trend::Improving);
        assert!(ProgressSummary::from_records(&[]).is_none());
    }
}
