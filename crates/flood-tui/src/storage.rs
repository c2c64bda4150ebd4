//! On-disk save files. Each save is one blob in the save directory, named
//! by its creation time in seconds since the epoch; challenge saves get a
//! trailing `_` so the menus can tell them apart without opening them.

use chrono::{Local, TimeZone, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A discovered save file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFile {
    pub path: PathBuf,
    /// Creation time from the file name, seconds since the epoch
    pub stamp: i64,
    /// Whether the name carries the challenge marker
    pub challenge: bool,
}

impl SaveFile {
    /// Local date-time label for the load and delete menus.
    pub fn label(&self) -> String {
        match Local.timestamp_opt(self.stamp, 0).single() {
            Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => self.stamp.to_string(),
        }
    }
}

/// Directory that save files live in.
pub fn save_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flood")
        .join("saves")
}

/// All recognizable save files, newest first. A missing directory is just
/// an empty list.
pub fn list_saves() -> Vec<SaveFile> {
    let mut saves = Vec::new();
    let entries = match fs::read_dir(save_dir()) {
        Ok(entries) => entries,
        Err(_) => return saves,
    };
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if let Some((stamp, challenge)) = parse_name(name) {
            saves.push(SaveFile {
                path: entry.path(),
                stamp,
                challenge,
            });
        }
    }
    saves.sort_by(|a, b| b.stamp.cmp(&a.stamp));
    saves
}

/// Write a blob under a fresh timestamp name, creating the directory on
/// first use.
pub fn write_save(blob: &str, challenge: bool) -> io::Result<PathBuf> {
    let dir = save_dir();
    fs::create_dir_all(&dir)?;

    let stamp = Utc::now().timestamp();
    let name = if challenge {
        format!("{stamp}_")
    } else {
        stamp.to_string()
    };
    let path = dir.join(name);
    fs::write(&path, blob)?;
    log::info!("saved game to {}", path.display());
    Ok(path)
}

pub fn read_save(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
}

pub fn delete_save(save: &SaveFile) -> io::Result<()> {
    log::info!("deleting save {}", save.path.display());
    fs::remove_file(&save.path)
}

/// Parse a file name into its timestamp and challenge marker. Names that
/// are not all digits (plus the optional trailing `_`) are not ours.
fn parse_name(name: &str) -> Option<(i64, bool)> {
    let (digits, challenge) = match name.strip_suffix('_') {
        Some(rest) => (rest, true),
        None => (name, false),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((digits.parse().ok()?, challenge))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_standard_name() {
        assert_eq!(parse_name("1724500000"), Some((1724500000, false)));
    }

    #[test]
    fn test_parse_challenge_name() {
        assert_eq!(parse_name("1724500000_"), Some((1724500000, true)));
    }

    #[test]
    fn test_foreign_names_are_skipped() {
        assert_eq!(parse_name("notes.txt"), None);
        assert_eq!(parse_name("_"), None);
        assert_eq!(parse_name(""), None);
        assert_eq!(parse_name("17245x0000"), None);
    }

    #[test]
    fn test_label_is_printable() {
        let save = SaveFile {
            path: PathBuf::from("1724500000"),
            stamp: 1724500000,
            challenge: false,
        };
        assert!(!save.label().is_empty());
    }
}
