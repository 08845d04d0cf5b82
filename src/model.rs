use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One discoverable application, produced by a scan and immutable afterwards.
#[derive(Debug, Clone)]
pub struct AppEntry {
    pub name: String,          // Display name
    pub generic_name: Option<String>,
    pub comment: Option<String>,
    pub exec: String,          // Command line, field codes stripped
    pub icon: Option<String>,  // Icon name/path
    pub categories: Vec<String>,
    pub keywords: Vec<String>,
    pub terminal: bool,
    pub path: PathBuf,         // Source .desktop file
    pub modified: Option<SystemTime>, // Only fetched when the sort policy needs it
}

impl AppEntry {
    pub fn new(name: String, exec: String, path: PathBuf) -> Self {
        Self {
            name,
            generic_name: None,
            comment: None,
            exec,
            icon: None,
            categories: Vec::new(),
            keywords: Vec::new(),
            terminal: false,
            path,
            modified: None,
        }
    }

    /// The flat string a search backend indexes for this entry: display name,
    /// generic name, comment, keywords, categories and the exec basename,
    /// space-joined.
    pub fn search_text(&self) -> String {
        let mut parts: Vec<&str> = vec![&self.name];
        if let Some(generic) = &self.generic_name {
            parts.push(generic);
        }
        if let Some(comment) = &self.comment {
            parts.push(comment);
        }
        parts.extend(self.keywords.iter().map(String::as_str));
        parts.extend(self.categories.iter().map(String::as_str));

        let base = self.exec_base();
        if !base.is_empty() {
            parts.push(base);
        }

        parts.join(" ")
    }

    /// Basename of the first word of the exec line, e.g. "/usr/bin/foo -x"
    /// yields "foo".
    pub fn exec_base(&self) -> &str {
        let first = self.exec.split_whitespace().next().unwrap_or("");
        Path::new(first)
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_text_joins_all_fields() {
        let mut entry = AppEntry::new(
            "Files".to_string(),
            "/usr/bin/nautilus --new-window".to_string(),
            PathBuf::from("/usr/share/applications/nautilus.desktop"),
        );
        entry.generic_name = Some("File Manager".to_string());
        entry.comment = Some("Access and organize files".to_string());
        entry.keywords = vec!["folder".to_string(), "browse".to_string()];
        entry.categories = vec!["Utility".to_string()];

        assert_eq!(
            entry.search_text(),
            "Files File Manager Access and organize files folder browse Utility nautilus"
        );
    }

    #[test]
    fn exec_base_strips_path_and_args() {
        let entry = AppEntry::new(
            "Foo".to_string(),
            "/opt/foo/bin/foo --flag value".to_string(),
            PathBuf::from("foo.desktop"),
        );
        assert_eq!(entry.exec_base(), "foo");

        let bare = AppEntry::new("Sh".to_string(), String::new(), PathBuf::from("sh.desktop"));
        assert_eq!(bare.exec_base(), "");
    }
}
