use crate::matcher::Matcher;
use crate::model::AppEntry;
use crate::scan;
use crate::sort::SortPolicy;
use crossbeam_channel::Sender;
use log::warn;
use parking_lot::{Condvar, Mutex};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};

/// One immutable result of a scan: entries in their sorted order plus the
/// search corpus derived from them, index-aligned by construction.
#[derive(Debug, Clone)]
pub struct Snapshot {
    entries: Vec<AppEntry>,
    search_texts: Vec<String>,
    indexed_at: SystemTime,
}

impl Snapshot {
    /// The pre-first-scan snapshot. Its epoch timestamp means the very first
    /// query always finds it stale.
    fn empty() -> Self {
        Self {
            entries: Vec::new(),
            search_texts: Vec::new(),
            indexed_at: SystemTime::UNIX_EPOCH,
        }
    }

    pub(crate) fn from_entries(entries: Vec<AppEntry>) -> Self {
        let search_texts = entries.iter().map(AppEntry::search_text).collect();
        Self {
            entries,
            search_texts,
            indexed_at: SystemTime::now(),
        }
    }

    pub fn entries(&self) -> &[AppEntry] {
        &self.entries
    }

    pub fn search_texts(&self) -> &[String] {
        &self.search_texts
    }

    pub fn indexed_at(&self) -> SystemTime {
        self.indexed_at
    }

    fn is_stale(&self, max_age: Duration) -> bool {
        SystemTime::now()
            .duration_since(self.indexed_at)
            .is_ok_and(|age| age >= max_age)
    }
}

/// Construction parameters for [`Index`].
pub struct IndexConfig {
    /// Snapshot age at which a query triggers a background refresh.
    pub max_age: Duration,
    pub sort: SortPolicy,
    /// Directories scanned in priority order; earlier ones win deduplication.
    pub dirs: Vec<PathBuf>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_age: Duration::from_secs(10),
            sort: SortPolicy::default(),
            dirs: scan::application_dirs(),
        }
    }
}

struct State {
    snapshot: Snapshot,
    matcher: Box<dyn Matcher + Send>,
    scanning: bool,
}

struct Shared {
    state: Mutex<State>,
    scan_done: Condvar,
    max_age: Duration,
    sort: SortPolicy,
    dirs: Vec<PathBuf>,
}

impl Shared {
    // Requires `scanning` to have been claimed by the caller; clears it and
    // wakes waiters once the new snapshot and corpus are swapped in together.
    fn run_scan(&self) {
        let (snapshot, errors) = scan::build_snapshot(&self.dirs, self.sort);
        if !errors.is_empty() {
            warn!("{errors}");
        }

        let mut state = self.state.lock();
        state.matcher.index(snapshot.search_texts());
        state.snapshot = snapshot;
        state.scanning = false;
        drop(state);

        self.scan_done.notify_all();
    }
}

/// The stateful application index: one cached [`Snapshot`], one search
/// backend, and a staleness-driven refresh scheduler.
///
/// A query against a stale snapshot answers immediately from the old data and
/// requests a refresh from a dedicated background thread; at most one scan is
/// ever in flight. The snapshot and the backend's corpus are only ever
/// replaced together under one lock, so query results always map back to the
/// visible entries.
pub struct Index {
    shared: Arc<Shared>,
    refresh_tx: Option<Sender<()>>,
    refresher: Option<JoinHandle<()>>,
}

impl Index {
    pub fn new(matcher: Box<dyn Matcher + Send>, config: IndexConfig) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                snapshot: Snapshot::empty(),
                matcher,
                scanning: false,
            }),
            scan_done: Condvar::new(),
            max_age: config.max_age,
            sort: config.sort,
            dirs: config.dirs,
        });

        // Single-slot scheduler: the channel holds at most one pending
        // request and the thread runs at most one scan at a time.
        let (refresh_tx, refresh_rx) = crossbeam_channel::bounded::<()>(1);
        let worker = Arc::clone(&shared);
        let refresher = thread::spawn(move || {
            while refresh_rx.recv().is_ok() {
                worker.run_scan();
            }
        });

        Self {
            shared,
            refresh_tx: Some(refresh_tx),
            refresher: Some(refresher),
        }
    }

    /// Searches the current snapshot. Never blocks on a refresh: a stale
    /// snapshot is served as-is while the refresh proceeds in the background.
    pub fn search(&self, query: &str) -> Vec<AppEntry> {
        let mut state = self.shared.state.lock();

        if state.snapshot.is_stale(self.shared.max_age) && !state.scanning {
            state.scanning = true;
            if let Some(tx) = &self.refresh_tx {
                let _ = tx.try_send(());
            }
        }

        let hits = state.matcher.search(query);
        hits.into_iter()
            .filter_map(|i| state.snapshot.entries().get(i).cloned())
            .collect()
    }

    /// The current snapshot's entries in their sorted order.
    pub fn all_entries(&self) -> Vec<AppEntry> {
        self.shared.state.lock().snapshot.entries().to_vec()
    }

    /// Forces a refresh and blocks until a fresh snapshot is in place. If a
    /// scan is already in flight this waits for it rather than starting a
    /// duplicate.
    pub fn reindex(&self) {
        let mut state = self.shared.state.lock();
        if state.scanning {
            while state.scanning {
                self.shared.scan_done.wait(&mut state);
            }
            return;
        }

        state.scanning = true;
        drop(state);
        self.shared.run_scan();
    }
}

impl Drop for Index {
    fn drop(&mut self) {
        // Closing the channel stops the refresher; join so an in-flight scan
        // finishes before the index goes away.
        self.refresh_tx.take();
        if let Some(handle) = self.refresher.take() {
            let _ = handle.join();
        }
    }
}
