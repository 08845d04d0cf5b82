use anyhow::Result;
use appdex::SortPolicy;
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub index: IndexSection,
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub general: GeneralSection,
}

#[derive(Deserialize, Debug, Clone)]
pub struct IndexSection {
    /// Snapshot age in seconds before a query triggers a background refresh.
    #[serde(default = "default_index_age", rename = "index-age")]
    pub index_age: u64,
    #[serde(default)]
    pub sort: SortPolicy,
}

fn default_index_age() -> u64 {
    10
}

impl Default for IndexSection {
    fn default() -> Self {
        Self {
            index_age: default_index_age(),
            sort: SortPolicy::default(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct SearchSection {
    #[serde(default = "default_true")]
    pub fuzzy: bool,
    #[serde(default, rename = "case-sensitive")]
    pub case_sensitive: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            fuzzy: default_true(),
            case_sensitive: false,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct GeneralSection {
    /// Command used to wrap entries that want a terminal, e.g. "foot -e".
    #[serde(default)]
    pub terminal: Option<String>,
}

pub fn load_config() -> Result<Config> {
    let proj_dirs = ProjectDirs::from("org", "appdex", "appdex");
    let config_path = if let Some(dirs) = &proj_dirs {
        dirs.config_dir().join("config.toml")
    } else {
        PathBuf::from("config.toml")
    };

    if !config_path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.index.index_age, 10);
        assert_eq!(config.index.sort, SortPolicy::Alphabetical);
        assert!(config.search.fuzzy);
        assert!(!config.search.case_sensitive);
        assert!(config.general.terminal.is_none());
    }

    #[test]
    fn parses_kebab_case_keys() {
        let config: Config = toml::from_str(
            "[index]\n\
             index-age = 60\n\
             sort = \"mod-time\"\n\
             \n\
             [search]\n\
             fuzzy = false\n\
             case-sensitive = true\n\
             \n\
             [general]\n\
             terminal = \"foot -e\"\n",
        )
        .unwrap();

        assert_eq!(config.index.index_age, 60);
        assert_eq!(config.index.sort, SortPolicy::ModTime);
        assert!(!config.search.fuzzy);
        assert!(config.search.case_sensitive);
        assert_eq!(config.general.terminal.as_deref(), Some("foot -e"));
    }
}
