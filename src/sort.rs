use crate::model::AppEntry;
use serde::Deserialize;
use std::cmp::Reverse;
use std::time::SystemTime;

/// Final ordering of a scanned snapshot.
///
/// All sorts are stable: entries that compare equal keep their source order,
/// which for a fresh scan is directory-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortPolicy {
    /// Source order preserved, otherwise unspecified.
    Unsorted,
    #[default]
    Alphabetical,
    AlphabeticalReverse,
    ModTime,
    ModTimeReverse,
}

impl SortPolicy {
    /// Whether the scan has to stat source files for their modification time.
    /// Other policies skip the syscalls entirely.
    pub fn needs_mtime(&self) -> bool {
        matches!(self, SortPolicy::ModTime | SortPolicy::ModTimeReverse)
    }

    pub fn sort(&self, entries: &mut [AppEntry]) {
        match self {
            SortPolicy::Unsorted => {}
            SortPolicy::Alphabetical => {
                entries.sort_by_cached_key(|e| e.name.to_lowercase());
            }
            SortPolicy::AlphabeticalReverse => {
                entries.sort_by_cached_key(|e| Reverse(e.name.to_lowercase()));
            }
            SortPolicy::ModTime => {
                entries.sort_by_cached_key(|e| mtime_key(e));
            }
            SortPolicy::ModTimeReverse => {
                entries.sort_by_cached_key(|e| Reverse(mtime_key(e)));
            }
        }
    }
}

// Entries without a fetchable modification time sort as the earliest time.
fn mtime_key(entry: &AppEntry) -> SystemTime {
    entry.modified.unwrap_or(SystemTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn entry(name: &str) -> AppEntry {
        AppEntry::new(
            name.to_string(),
            name.to_lowercase(),
            PathBuf::from(format!("{name}.desktop")),
        )
    }

    fn names(entries: &[AppEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn alphabetical_is_case_insensitive() {
        let mut entries = vec![entry("firefox"), entry("Chromium"), entry("alacritty")];
        SortPolicy::Alphabetical.sort(&mut entries);
        assert_eq!(names(&entries), ["alacritty", "Chromium", "firefox"]);

        SortPolicy::AlphabeticalReverse.sort(&mut entries);
        assert_eq!(names(&entries), ["firefox", "Chromium", "alacritty"]);
    }

    #[test]
    fn alphabetical_ties_keep_source_order() {
        let mut a = entry("Files");
        a.exec = "first".to_string();
        let mut b = entry("files");
        b.exec = "second".to_string();

        let mut entries = vec![a, b];
        SortPolicy::Alphabetical.sort(&mut entries);
        assert_eq!(entries[0].exec, "first");
        assert_eq!(entries[1].exec, "second");
    }

    #[test]
    fn mod_time_orders_unknown_first() {
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);

        let mut old = entry("old");
        old.modified = Some(base);
        let mut new = entry("new");
        new.modified = Some(base + Duration::from_secs(60));
        let unknown = entry("unknown");

        let mut entries = vec![new.clone(), unknown.clone(), old.clone()];
        SortPolicy::ModTime.sort(&mut entries);
        assert_eq!(names(&entries), ["unknown", "old", "new"]);

        let mut entries = vec![old, unknown, new];
        SortPolicy::ModTimeReverse.sort(&mut entries);
        assert_eq!(names(&entries), ["new", "old", "unknown"]);
    }

    #[test]
    fn unsorted_preserves_order() {
        let mut entries = vec![entry("b"), entry("a"), entry("c")];
        SortPolicy::Unsorted.sort(&mut entries);
        assert_eq!(names(&entries), ["b", "a", "c"]);
    }

    #[test]
    fn deserializes_kebab_case_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            sort: SortPolicy,
        }
        let w: Wrapper = toml::from_str("sort = \"mod-time-reverse\"").unwrap();
        assert_eq!(w.sort, SortPolicy::ModTimeReverse);
    }
}
