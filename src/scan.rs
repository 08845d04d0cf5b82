use crate::desktop::{self, ParseError};
use crate::index::Snapshot;
use crate::model::AppEntry;
use crate::sort::SortPolicy;
use directories::BaseDirs;
use log::{debug, info};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::{env, fs, thread};
use walkdir::WalkDir;

/// One non-fatal problem encountered during a scan.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to list {dir}: {source}")]
    Walk {
        dir: PathBuf,
        source: walkdir::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse { path: PathBuf, source: ParseError },
}

/// Everything non-fatal that went wrong during one scan. A scan always yields
/// its best achievable snapshot; these are for the caller to log.
#[derive(Debug, Default)]
pub struct ScanErrors(Vec<ScanError>);

impl ScanErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScanError> {
        self.0.iter()
    }

    fn push(&mut self, err: ScanError) {
        self.0.push(err);
    }
}

impl std::fmt::Display for ScanErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} scan error(s): ", self.0.len())?;
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ScanErrors {}

/// Resolves the application directories in XDG priority order:
/// `$XDG_DATA_HOME/applications` first, then each `$XDG_DATA_DIRS` entry.
/// Earlier directories win during deduplication.
pub fn application_dirs() -> Vec<PathBuf> {
    let data_home = BaseDirs::new().map(|base| base.data_dir().to_path_buf());
    let data_dirs = env::var("XDG_DATA_DIRS")
        .unwrap_or_else(|_| "/usr/local/share:/usr/share".to_string());
    resolve_application_dirs(data_home, &data_dirs)
}

fn resolve_application_dirs(data_home: Option<PathBuf>, data_dirs: &str) -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(home) = data_home {
        dirs.push(home.join("applications"));
    }
    for dir in data_dirs.split(':').filter(|s| !s.is_empty()) {
        dirs.push(Path::new(dir).join("applications"));
    }

    // A dir repeated anywhere in the list is only walked once, at its
    // highest-priority position.
    let mut seen = HashSet::new();
    dirs.retain(|dir| seen.insert(dir.clone()));
    dirs
}

/// Walks the given directories in order and collects every `.desktop` file.
/// Missing directories are skipped; unreadable ones are reported.
fn discover(dirs: &[PathBuf], errors: &mut ScanErrors) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for dir in dirs {
        if !dir.exists() {
            debug!("skipping missing application dir {:?}", dir);
            continue;
        }

        debug!("scanning application dir {:?}", dir);
        for entry in WalkDir::new(dir).sort_by_file_name() {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if entry.file_type().is_file()
                        && path.extension().and_then(|s| s.to_str()) == Some("desktop")
                    {
                        files.push(path.to_path_buf());
                    }
                }
                Err(err) => errors.push(ScanError::Walk {
                    dir: dir.clone(),
                    source: err,
                }),
            }
        }
    }

    files
}

/// Builds a fresh snapshot from the given directories: parses every discovered
/// descriptor on a bounded worker pool, deduplicates by executable command
/// (first occurrence in directory-priority order wins), sorts, and derives the
/// search corpus.
pub fn build_snapshot(dirs: &[PathBuf], sort: SortPolicy) -> (Snapshot, ScanErrors) {
    let mut errors = ScanErrors::default();
    let files = discover(dirs, &mut errors);

    let workers = thread::available_parallelism()
        .map(|n| n.get() * 2)
        .unwrap_or(8);
    let want_mtime = sort.needs_mtime();

    let (job_tx, job_rx) = crossbeam_channel::bounded::<(usize, PathBuf)>(workers);
    let (result_tx, result_rx) =
        crossbeam_channel::unbounded::<(usize, PathBuf, Result<AppEntry, ParseError>)>();

    // Results come back out of order, so they carry their discovery ordinal
    // and are reassembled into slots to keep dedup precedence deterministic.
    let mut slots: Vec<Option<AppEntry>> = Vec::new();
    slots.resize_with(files.len(), || None);

    thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for (seq, path) in job_rx {
                    let parsed = desktop::parse_entry(&path).map(|mut entry| {
                        if want_mtime {
                            entry.modified =
                                fs::metadata(&path).and_then(|m| m.modified()).ok();
                        }
                        entry
                    });
                    let _ = result_tx.send((seq, path, parsed));
                }
            });
        }
        drop(result_tx);

        let feeder = scope.spawn(move || {
            for job in files.into_iter().enumerate() {
                if job_tx.send(job).is_err() {
                    break;
                }
            }
        });

        for (seq, path, parsed) in result_rx {
            match parsed {
                Ok(entry) => slots[seq] = Some(entry),
                Err(err) if err.is_skip() => {
                    debug!("skipping {:?}: {}", path, err);
                }
                Err(err) => errors.push(ScanError::Parse { path, source: err }),
            }
        }

        let _ = feeder.join();
    });

    let mut entries = Vec::with_capacity(slots.len());
    let mut seen_execs = HashSet::new();
    for entry in slots.into_iter().flatten() {
        if seen_execs.insert(entry.exec.clone()) {
            entries.push(entry);
        } else {
            debug!("dropping duplicate entry for exec {:?}", entry.exec);
        }
    }

    sort.sort(&mut entries);

    let snapshot = Snapshot::from_entries(entries);
    info!(
        "indexed {} entries ({} problems)",
        snapshot.entries().len(),
        errors.len()
    );
    (snapshot, errors)
}
