// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Shared `ulapi.toml` loading.
//!
//! Each ulapi binary owns one top-level table in the file, keyed by its
//! name, and deserializes only that table.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Shared config file name for every ulapi binary.
pub const CONFIG_FILE_NAME: &str = "ulapi.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error("invalid config {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("{} has no [{section}] table", .path.display())]
    MissingSection { path: PathBuf, section: &'static str },
}

/// Candidate locations in lookup order: working directory, user config
/// directory, then the system-wide `/etc/ulapi`.
pub fn candidate_paths() -> Vec<PathBuf> {
    let user = dirs::config_dir().map(|dir| dir.join("ulapi").join(CONFIG_FILE_NAME));
    std::iter::once(PathBuf::from(CONFIG_FILE_NAME))
        .chain(user)
        .chain(std::iter::once(Path::new("/etc/ulapi").join(CONFIG_FILE_NAME)))
        .collect()
}

/// Pull `[section]` out of a TOML document.
///
/// The table is re-serialized and deserialized on its own so that
/// `#[serde(default)]` applies to the section alone.
fn section_of<T: DeserializeOwned>(document: &str, section: &str) -> Result<Option<T>, String> {
    let mut root: toml::Table = toml::from_str(document).map_err(|e| e.to_string())?;
    let Some(value) = root.remove(section) else {
        return Ok(None);
    };
    let text = toml::to_string(&value).map_err(|e| e.to_string())?;
    toml::from_str(&text).map(Some).map_err(|e| e.to_string())
}

fn read_section<T: DeserializeOwned>(path: &Path, section: &str) -> Result<Option<T>, ConfigError> {
    let document = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    section_of(&document, section).map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

/// A config struct stored as one table of `ulapi.toml`.
pub trait ConfigFile: Sized + Default + DeserializeOwned {
    /// Table name, e.g. `"ulapi-receiver"`.
    fn section_key() -> &'static str;

    /// Load from an explicit path. The table must be present.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        read_section(path, Self::section_key())?.ok_or_else(|| ConfigError::MissingSection {
            path: path.to_path_buf(),
            section: Self::section_key(),
        })
    }

    /// Load from the first [`candidate_paths`] entry that exists and carries
    /// the table. Falls back to `Default` with no path.
    fn load_from_default_paths() -> Result<(Self, Option<PathBuf>), ConfigError> {
        for path in candidate_paths().into_iter().filter(|p| p.is_file()) {
            if let Some(cfg) = read_section(&path, Self::section_key())? {
                return Ok((cfg, Some(path)));
            }
        }
        Ok((Self::default(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(default)]
    struct Sample {
        name: String,
        depth: u32,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self {
                name: "none".to_string(),
                depth: 7,
            }
        }
    }

    impl ConfigFile for Sample {
        fn section_key() -> &'static str {
            "sample"
        }
    }

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_section_applies_defaults() {
        let file = write_config("[sample]\nname = \"uplink\"\n");
        let cfg = Sample::load_from_file(file.path()).unwrap();
        assert_eq!(
            cfg,
            Sample {
                name: "uplink".to_string(),
                depth: 7
            }
        );
    }

    #[test]
    fn test_other_sections_are_ignored() {
        let file = write_config("[other]\nname = 3\n\n[sample]\ndepth = 2\n");
        let cfg = Sample::load_from_file(file.path()).unwrap();
        assert_eq!(cfg.depth, 2);
        assert_eq!(cfg.name, "none");
    }

    #[test]
    fn test_missing_section_is_error() {
        let file = write_config("[other]\nname = \"x\"\n");
        let err = Sample::load_from_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingSection {
                section: "sample",
                ..
            }
        ));
        assert!(err.to_string().contains("[sample]"));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let file = write_config("[sample\n");
        assert!(matches!(
            Sample::load_from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_wrong_field_type_is_parse_error() {
        let file = write_config("[sample]\ndepth = \"deep\"\n");
        assert!(matches!(
            Sample::load_from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_unreadable_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            Sample::load_from_file(&missing),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_candidate_paths_start_in_cwd() {
        let paths = candidate_paths();
        assert_eq!(paths[0], PathBuf::from("ulapi.toml"));
        assert_eq!(paths.last(), Some(&PathBuf::from("/etc/ulapi/ulapi.toml")));
    }
}
