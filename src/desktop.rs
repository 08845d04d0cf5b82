use crate::model::AppEntry;
use std::fs;
use std::path::Path;

/// Why a single descriptor file did not become an entry.
///
/// `NotApplicable` and `Hidden` are expected for many files under the
/// application dirs and are skipped silently; the remaining variants are real
/// problems the scan aggregates and reports.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read entry: {0}")]
    Io(#[from] std::io::Error),

    #[error("not an application entry")]
    NotApplicable,

    #[error("entry is hidden")]
    Hidden,

    #[error("missing required key {0}")]
    MissingKey(&'static str),
}

impl ParseError {
    /// True for files the scan should drop without reporting: non-application
    /// descriptors and entries that ask not to be shown.
    pub fn is_skip(&self) -> bool {
        matches!(self, ParseError::NotApplicable | ParseError::Hidden)
    }
}

/// Parses one `.desktop` file into an [`AppEntry`].
///
/// Stateless; safe to call from any number of threads at once.
pub fn parse_entry(path: &Path) -> Result<AppEntry, ParseError> {
    let content = fs::read_to_string(path)?;
    parse_str(&content, path)
}

fn parse_str(content: &str, path: &Path) -> Result<AppEntry, ParseError> {
    let mut name = None;
    let mut generic_name = None;
    let mut comment = None;
    let mut exec = None;
    let mut icon = None;
    let mut categories = Vec::new();
    let mut keywords = Vec::new();
    let mut terminal = false;
    let mut hidden = false;
    let mut entry_type = None;
    let mut in_desktop_entry = false;
    let mut seen_desktop_entry = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line == "[Desktop Entry]" {
            in_desktop_entry = true;
            seen_desktop_entry = true;
            continue;
        }
        if line.starts_with('[') {
            // Actions and other groups don't contribute fields.
            in_desktop_entry = false;
            continue;
        }
        if !in_desktop_entry {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());

        // Localized keys like Name[de] are ignored; only the plain key counts.
        match key {
            "Name" => name = Some(value.to_string()),
            "GenericName" => generic_name = non_empty(value),
            "Comment" => comment = non_empty(value),
            "Exec" => exec = Some(strip_field_codes(value)),
            "Icon" => icon = non_empty(value),
            "Categories" => categories = split_list(value),
            "Keywords" => keywords = split_list(value),
            "Terminal" => terminal = value == "true",
            "Type" => entry_type = Some(value.to_string()),
            "NoDisplay" | "Hidden" if value == "true" => hidden = true,
            _ => {}
        }
    }

    if !seen_desktop_entry {
        return Err(ParseError::NotApplicable);
    }
    if let Some(t) = &entry_type {
        if t != "Application" {
            return Err(ParseError::NotApplicable);
        }
    }
    if hidden {
        return Err(ParseError::Hidden);
    }

    let name = name.ok_or(ParseError::MissingKey("Name"))?;
    let exec = exec.ok_or(ParseError::MissingKey("Exec"))?;

    let mut entry = AppEntry::new(name, exec, path.to_path_buf());
    entry.generic_name = generic_name;
    entry.comment = comment;
    entry.icon = icon;
    entry.categories = categories;
    entry.keywords = keywords;
    entry.terminal = terminal;
    Ok(entry)
}

/// Drops `%f`/`%u`-style field codes from an Exec line.
fn strip_field_codes(raw: &str) -> String {
    raw.split_whitespace()
        .filter(|s| !s.starts_with('%'))
        .collect::<Vec<_>>()
        .join(" ")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(content: &str) -> Result<AppEntry, ParseError> {
        parse_str(content, &PathBuf::from("test.desktop"))
    }

    #[test]
    fn parses_full_entry() {
        let entry = parse(
            "[Desktop Entry]\n\
             Type=Application\n\
             Name=Firefox\n\
             GenericName=Web Browser\n\
             Comment=Browse the web\n\
             Exec=firefox %u\n\
             Icon=firefox\n\
             Categories=Network;WebBrowser;\n\
             Keywords=internet;www;\n\
             Terminal=false\n",
        )
        .unwrap();

        assert_eq!(entry.name, "Firefox");
        assert_eq!(entry.generic_name.as_deref(), Some("Web Browser"));
        assert_eq!(entry.comment.as_deref(), Some("Browse the web"));
        assert_eq!(entry.exec, "firefox");
        assert_eq!(entry.icon.as_deref(), Some("firefox"));
        assert_eq!(entry.categories, vec!["Network", "WebBrowser"]);
        assert_eq!(entry.keywords, vec!["internet", "www"]);
        assert!(!entry.terminal);
    }

    #[test]
    fn strips_field_codes_from_exec() {
        let entry = parse("[Desktop Entry]\nName=V\nExec=vlc --started-from-file %U\n").unwrap();
        assert_eq!(entry.exec, "vlc --started-from-file");
    }

    #[test]
    fn missing_required_keys() {
        assert!(matches!(
            parse("[Desktop Entry]\nExec=foo\n"),
            Err(ParseError::MissingKey("Name"))
        ));
        assert!(matches!(
            parse("[Desktop Entry]\nName=Foo\n"),
            Err(ParseError::MissingKey("Exec"))
        ));
    }

    #[test]
    fn no_desktop_entry_group_is_not_applicable() {
        let err = parse("[KDE Something]\nName=Foo\nExec=foo\n").unwrap_err();
        assert!(matches!(err, ParseError::NotApplicable));
        assert!(err.is_skip());
    }

    #[test]
    fn non_application_type_is_not_applicable() {
        let err = parse("[Desktop Entry]\nType=Link\nName=Foo\nExec=foo\n").unwrap_err();
        assert!(matches!(err, ParseError::NotApplicable));
    }

    #[test]
    fn nodisplay_is_hidden() {
        let err = parse("[Desktop Entry]\nName=Foo\nExec=foo\nNoDisplay=true\n").unwrap_err();
        assert!(matches!(err, ParseError::Hidden));
        assert!(err.is_skip());
    }

    #[test]
    fn keys_outside_the_group_are_ignored() {
        let entry = parse(
            "[Desktop Entry]\n\
             Name=Foo\n\
             Exec=foo\n\
             [Desktop Action new-window]\n\
             Name=New Window\n\
             Exec=foo --new-window\n",
        )
        .unwrap();
        assert_eq!(entry.name, "Foo");
        assert_eq!(entry.exec, "foo");
    }

    #[test]
    fn localized_keys_are_ignored() {
        let entry = parse("[Desktop Entry]\nName=Files\nName[de]=Dateien\nExec=files\n").unwrap();
        assert_eq!(entry.name, "Files");
    }
}
