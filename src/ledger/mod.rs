//! Event ledger — persisted booking/decline log and analytics counters
//!
//! Two JSON documents live in the data directory: `events.json` holds the
//! raw append-only booking/decline arrays, `analytics.json` the rolling
//! counter snapshot. Both are rewritten wholesale on every mutation via a
//! temp file + rename, so a crash never leaves a torn document.
//!
//! A single actor task owns all state; [`EventLedger`] handles talk to it
//! over a bounded mpsc channel with oneshot replies. Serializing every
//! mutation through one writer is what makes concurrent bookings safe —
//! there is no read-modify-write window for two requests to race over.
//!
//! Corrupt or unreadable documents at startup are logged and replaced
//! with fresh state.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::types::{round1, AnalyticsSnapshot, EventKind, TrainingEvent};

const EVENTS_FILE: &str = "events.json";
const ANALYTICS_FILE: &str = "analytics.json";
const QUEUE_CAPACITY: usize = 64;

/// Width of the rolling recent-activity window, in days.
pub const RECENT_WINDOW_DAYS: i64 = 30;

/// Ledger operation errors.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ledger serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("ledger has shut down")]
    Closed,
}

/// On-disk shape of `events.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct TrainingLog {
    bookings: Vec<TrainingEvent>,
    declines: Vec<TrainingEvent>,
}

/// Recent-activity slice of an analytics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentWindow {
    pub window_days: i64,
    pub bookings: usize,
    pub declines: usize,
    pub win_rate: f64,
}

/// Counters plus the derived rolling window.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    #[serde(flatten)]
    pub totals: AnalyticsSnapshot,
    pub recent: RecentWindow,
}

enum Command {
    Log {
        event: TrainingEvent,
        reply: oneshot::Sender<Result<(), LedgerError>>,
    },
    Analytics {
        reply: oneshot::Sender<AnalyticsReport>,
    },
}

/// Cloneable handle to the ledger actor.
#[derive(Clone)]
pub struct EventLedger {
    tx: mpsc::Sender<Command>,
    stop: CancellationToken,
    done: CancellationToken,
}

impl EventLedger {
    /// Open the ledger in `dir`, loading any persisted documents, and
    /// spawn the owning actor task. Must be called from within a tokio
    /// runtime.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let log: TrainingLog = load_document(&dir.join(EVENTS_FILE));
        let totals: AnalyticsSnapshot = load_document(&dir.join(ANALYTICS_FILE));
        info!(
            dir = %dir.display(),
            bookings = log.bookings.len(),
            declines = log.declines.len(),
            "event ledger opened"
        );

        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let stop = CancellationToken::new();
        let done = CancellationToken::new();
        let state = LedgerState { dir, log, totals };
        tokio::spawn(run_actor(state, rx, stop.clone(), done.clone()));

        Ok(Self { tx, stop, done })
    }

    /// Record a booking confirmation.
    pub async fn log_booking(&self, event: TrainingEvent) -> Result<(), LedgerError> {
        debug_assert_eq!(event.kind, EventKind::Booking);
        self.log(event).await
    }

    /// Record a quote decline.
    pub async fn log_decline(&self, event: TrainingEvent) -> Result<(), LedgerError> {
        debug_assert_eq!(event.kind, EventKind::Decline);
        self.log(event).await
    }

    async fn log(&self, event: TrainingEvent) -> Result<(), LedgerError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Log { event, reply })
            .await
            .map_err(|_| LedgerError::Closed)?;
        rx.await.map_err(|_| LedgerError::Closed)?
    }

    /// Current counters plus the derived rolling window.
    pub async fn analytics(&self) -> Result<AnalyticsReport, LedgerError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Analytics { reply })
            .await
            .map_err(|_| LedgerError::Closed)?;
        rx.await.map_err(|_| LedgerError::Closed)
    }

    /// Stop the actor, draining queued commands and flushing to disk.
    pub async fn shutdown(&self) {
        self.stop.cancel();
        self.done.cancelled().await;
    }
}

// ============================================================================
// Actor
// ============================================================================

struct LedgerState {
    dir: PathBuf,
    log: TrainingLog,
    totals: AnalyticsSnapshot,
}

impl LedgerState {
    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Log { event, reply } => {
                let result = self.apply(event);
                if let Err(e) = &result {
                    error!(error = %e, "failed to persist ledger event");
                }
                let _ = reply.send(result);
            }
            Command::Analytics { reply } => {
                let _ = reply.send(self.report());
            }
        }
    }

    fn apply(&mut self, event: TrainingEvent) -> Result<(), LedgerError> {
        match event.kind {
            EventKind::Booking => {
                self.log.bookings.push(event);
                self.totals.total_bookings += 1;
            }
            EventKind::Decline => {
                self.log.declines.push(event);
                self.totals.total_declines += 1;
            }
        }
        self.totals.total_requests += 1;
        self.totals.win_rate = win_rate(self.totals.total_bookings, self.totals.total_requests);
        self.persist()
    }

    fn persist(&self) -> Result<(), LedgerError> {
        write_atomic(&self.dir.join(EVENTS_FILE), &self.log)?;
        write_atomic(&self.dir.join(ANALYTICS_FILE), &self.totals)?;
        Ok(())
    }

    fn report(&self) -> AnalyticsReport {
        let cutoff = Utc::now() - Duration::days(RECENT_WINDOW_DAYS);
        let bookings = self
            .log
            .bookings
            .iter()
            .filter(|e| e.logged_at >= cutoff)
            .count();
        let declines = self
            .log
            .declines
            .iter()
            .filter(|e| e.logged_at >= cutoff)
            .count();
        AnalyticsReport {
            totals: self.totals.clone(),
            recent: RecentWindow {
                window_days: RECENT_WINDOW_DAYS,
                bookings,
                declines,
                win_rate: win_rate(bookings as u64, (bookings + declines) as u64),
            },
        }
    }
}

async fn run_actor(
    mut state: LedgerState,
    mut rx: mpsc::Receiver<Command>,
    stop: CancellationToken,
    done: CancellationToken,
) {
    loop {
        tokio::select! {
            cmd = rx.recv() => match cmd {
                Some(cmd) => state.handle(cmd),
                None => break,
            },
            () = stop.cancelled() => {
                // Drain whatever is already queued, then stop accepting.
                rx.close();
                while let Some(cmd) = rx.recv().await {
                    state.handle(cmd);
                }
                break;
            }
        }
    }
    if let Err(e) = state.persist() {
        error!(error = %e, "final ledger flush failed");
    }
    done.cancel();
}

// ============================================================================
// Document I/O
// ============================================================================

/// Load a JSON document, falling back to `Default` when the file is
/// missing, unreadable, or malformed. A malformed document is a startup
/// condition worth a warning, not a fatal error.
fn load_document<T: Default + DeserializeOwned>(path: &Path) -> T {
    match fs::read(path) {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "malformed ledger document, starting fresh");
                T::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => T::default(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable ledger document, starting fresh");
            T::default()
        }
    }
}

/// Rewrite a document wholesale: write to a temp file in the same
/// directory, then rename over the target.
fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), LedgerError> {
    let bytes = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn win_rate(bookings: u64, requests: u64) -> f64 {
    if requests == 0 {
        return 0.0;
    }
    round1(bookings as f64 / requests as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::task::JoinSet;

    fn booking(n: usize) -> TrainingEvent {
        TrainingEvent::booking(
            format!("req-{n}"),
            format!("bk-{n}"),
            "customer-1".to_string(),
            "forwarder-001".to_string(),
            2500.0 + n as f64,
        )
    }

    fn decline(n: usize) -> TrainingEvent {
        TrainingEvent::decline(
            format!("req-{n}"),
            Some("price too high".to_string()),
            "customer-1".to_string(),
            "forwarder-001".to_string(),
        )
    }

    #[tokio::test]
    async fn test_counters_and_win_rate() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = EventLedger::open(dir.path()).unwrap();

        ledger.log_booking(booking(1)).await.unwrap();
        ledger.log_booking(booking(2)).await.unwrap();
        ledger.log_decline(decline(3)).await.unwrap();

        let report = ledger.analytics().await.unwrap();
        assert_eq!(report.totals.total_requests, 3);
        assert_eq!(report.totals.total_bookings, 2);
        assert_eq!(report.totals.total_declines, 1);
        assert_eq!(report.totals.win_rate, 66.7);
        assert_eq!(report.recent.bookings, 2);
        assert_eq!(report.recent.declines, 1);
        assert_eq!(report.recent.window_days, RECENT_WINDOW_DAYS);
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let ledger = EventLedger::open(dir.path()).unwrap();
            ledger.log_booking(booking(1)).await.unwrap();
            ledger.log_decline(decline(2)).await.unwrap();
            ledger.shutdown().await;
        }

        let reopened = EventLedger::open(dir.path()).unwrap();
        let report = reopened.analytics().await.unwrap();
        assert_eq!(report.totals.total_requests, 2);
        assert_eq!(report.totals.total_bookings, 1);
        assert_eq!(report.totals.total_declines, 1);
        assert_eq!(report.recent.bookings, 1);
    }

    /// Concurrent writers must not lose events. The single-writer actor
    /// serializes them; the final count must equal the number of calls.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_bookings_all_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = EventLedger::open(dir.path()).unwrap();

        let mut set = JoinSet::new();
        for n in 0..25 {
            let handle = ledger.clone();
            set.spawn(async move { handle.log_booking(booking(n)).await });
        }
        while let Some(res) = set.join_next().await {
            res.unwrap().unwrap();
        }

        let report = ledger.analytics().await.unwrap();
        assert_eq!(report.totals.total_bookings, 25);
        assert_eq!(report.totals.total_requests, 25);
        assert_eq!(report.totals.win_rate, 100.0);
    }

    #[tokio::test]
    async fn test_malformed_documents_start_fresh() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(EVENTS_FILE), b"{not json").unwrap();
        std::fs::write(dir.path().join(ANALYTICS_FILE), b"[]").unwrap();

        let ledger = EventLedger::open(dir.path()).unwrap();
        let report = ledger.analytics().await.unwrap();
        assert_eq!(report.totals.total_requests, 0);
        assert_eq!(report.totals.win_rate, 0.0);
    }

    #[tokio::test]
    async fn test_documents_written_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = EventLedger::open(dir.path()).unwrap();
        ledger.log_booking(booking(7)).await.unwrap();

        let events: serde_json::Value =
            serde_json::from_slice(&std::fs::read(dir.path().join(EVENTS_FILE)).unwrap()).unwrap();
        assert_eq!(events["bookings"].as_array().unwrap().len(), 1);
        assert_eq!(events["bookings"][0]["type"], "booking");

        let totals: serde_json::Value =
            serde_json::from_slice(&std::fs::read(dir.path().join(ANALYTICS_FILE)).unwrap())
                .unwrap();
        assert_eq!(totals["totalBookings"], 1);
        assert_eq!(totals["winRate"], 100.0);
    }

    #[tokio::test]
    async fn test_shutdown_rejects_further_logs() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = EventLedger::open(dir.path()).unwrap();
        ledger.shutdown().await;
        let err = ledger.log_booking(booking(1)).await.unwrap_err();
        assert!(matches!(err, LedgerError::Closed));
    }
}
