use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::de::skip_invalid;
use crate::error::StoreError;
use crate::state::Bookmark;
use crate::theme::Theme;

/// Key/value settings (currently only the theme name).
pub trait ConfigStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Ordered bookmark list with write-through persistence.
pub trait BookmarkStore {
    fn get_all(&self) -> Vec<Bookmark>;
    /// Replace the stored list with `bookmarks`.
    fn persist(&mut self, bookmarks: &[Bookmark]) -> Result<(), StoreError>;

    fn add(&mut self, bookmark: Bookmark) -> Result<(), StoreError> {
        let mut all = self.get_all();
        all.push(bookmark);
        self.persist(&all)
    }
}

/// Active theme from `store`, falling back to the default for unknown names.
pub fn load_theme(store: &dyn ConfigStore) -> Theme {
    store
        .get(Theme::CONFIG_KEY)
        .and_then(|name| Theme::from_name(&name))
        .unwrap_or_default()
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, deserialize_with = "skip_invalid")]
    pub bookmarks: Vec<Bookmark>,
    /// Keys this version doesn't know about, kept on rewrite.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// JSON config file holding the theme and the bookmarks.
///
/// Every write re-reads the file first, so several handles on the same path
/// can be used side by side.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/geeta/config.json`
    pub fn default_location() -> Result<Self, StoreError> {
        let config_dir = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
        Ok(Self::at(config_dir.join("geeta").join("config.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable files read as the default config.
    pub fn load(&self) -> Config {
        self.try_load().unwrap_or_else(|e| {
            log::warn!("ignoring unreadable config {e}");
            Config::default()
        })
    }

    /// Like [`ConfigFile::load`], but a file that exists and cannot be read
    /// or parsed is an error. Bookmark entries that don't parse are skipped.
    pub fn try_load(&self) -> Result<Config, StoreError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, config: &Config) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(config).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, content).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Read-modify-write. A file that cannot be read is never overwritten.
    fn update(&self, apply: impl FnOnce(&mut Config)) -> Result<(), StoreError> {
        let mut config = self.try_load()?;
        apply(&mut config);
        self.save(&config)
    }
}

impl ConfigStore for ConfigFile {
    fn get(&self, key: &str) -> Option<String> {
        let config = self.load();
        match key {
            Theme::CONFIG_KEY => config.theme,
            _ => config.extra.get(key).and_then(Value::as_str).map(str::to_string),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|config| match key {
            Theme::CONFIG_KEY => config.theme = Some(value.to_string()),
            _ => {
                config.extra.insert(key.to_string(), Value::String(value.to_string()));
            }
        })
    }
}

impl BookmarkStore for ConfigFile {
    fn get_all(&self) -> Vec<Bookmark> {
        self.load().bookmarks
    }

    fn persist(&mut self, bookmarks: &[Bookmark]) -> Result<(), StoreError> {
        self.update(|config| config.bookmarks = bookmarks.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let file = ConfigFile::at(dir.path().join("nope.json"));
        assert_eq!(file.load(), Config::default());
        assert_eq!(load_theme(&file), Theme::Arjuna);
        assert!(file.get_all().is_empty());
    }

    #[test]
    fn corrupt_file_reads_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(ConfigFile::at(&path).load(), Config::default());
    }

    #[test]
    fn corrupt_file_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let mut file = ConfigFile::at(&path);
        let err = file.set(Theme::CONFIG_KEY, "bhima").unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }));
        assert!(file.add(Bookmark::new(1, 1, "", "")).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn bad_bookmark_entry_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "theme": "bhima",
                "fontSize": 14,
                "bookmarks": [
                    {"chapter": "2", "verse": 47, "note": "duty",
                     "chapterTitle": "Contents of the Gītā Summarized"},
                    {"chapter": "3", "verse": null}
                ]
            }"#,
        )
        .unwrap();

        let mut file = ConfigFile::at(&path);
        assert_eq!(load_theme(&file), Theme::Bhima);
        let all = file.get_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].note, "duty");

        file.set(Theme::CONFIG_KEY, "nakula").unwrap();
        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "nakula");
        assert_eq!(raw["fontSize"], 14);
        assert_eq!(raw["bookmarks"][0]["note"], "duty");
        assert_eq!(raw["bookmarks"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn theme_and_bookmarks_share_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut settings = ConfigFile::at(&path);
        let mut bookmarks = ConfigFile::at(&path);

        settings.set(Theme::CONFIG_KEY, "bhima").unwrap();
        bookmarks.add(Bookmark::new(2, 47, "", "Contents of the Gītā Summarized")).unwrap();
        bookmarks.add(Bookmark::new(18, 66, "surrender", "")).unwrap();

        assert_eq!(load_theme(&settings), Theme::Bhima);
        let all = settings.get_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].note, "surrender");
    }

    #[test]
    fn unknown_keys_survive_rewrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"fontSize": 14, "theme": "nakula", "bookmarks": []}"#).unwrap();

        let mut file = ConfigFile::at(&path);
        file.persist(&[Bookmark::new(1, 1, "", "")]).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["fontSize"], 14);
        assert_eq!(raw["theme"], "nakula");
        assert_eq!(raw["bookmarks"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn unknown_theme_name_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = ConfigFile::at(dir.path().join("config.json"));
        file.set(Theme::CONFIG_KEY, "karna").unwrap();
        assert_eq!(load_theme(&file), Theme::Arjuna);
    }

    #[test]
    fn write_into_a_file_path_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let mut file = ConfigFile::at(blocker.join("config.json"));
        let err = file.persist(&[]).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
