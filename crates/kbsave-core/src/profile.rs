//! Save discovery and hero-profile matching
//!
//! A profile remembers a hero by fingerprint only. Finding "the current save
//! of this profile" means parsing the newest few saves and comparing hashes.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::container::source::modified_time;
use crate::error::{Error, Result};
use crate::save::SaveParser;

/// Newest saves inspected when matching a profile
pub const MATCH_CANDIDATES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveEntry {
    /// Directory name, or archive file stem
    pub name: String,
    pub path: PathBuf,
    /// Unix seconds
    pub modified: u64,
}

fn unix_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn is_save_path(path: &Path) -> bool {
    path.is_dir() || path.extension().is_some_and(|ext| ext == "sav")
}

/// Saves directly under `dir`, newest first
pub fn list_saves<P: AsRef<Path>>(dir: P, limit: usize) -> Result<Vec<SaveEntry>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::SavePathNotFound(dir.to_path_buf()));
    }

    let mut saves = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !is_save_path(&path) {
            continue;
        }

        let name = if path.is_dir() {
            path.file_name()
        } else {
            path.file_stem()
        };
        let Some(name) = name.map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };

        saves.push(SaveEntry {
            name,
            modified: unix_seconds(modified_time(&path)?),
            path,
        });
    }

    saves.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));
    saves.truncate(limit);
    Ok(saves)
}

/// Most recently modified of `candidates` whose hero fingerprint is `hash`.
/// Only the newest [`MATCH_CANDIDATES`] are parsed; unreadable ones are skipped.
pub fn find_most_recent_match(
    parser: &SaveParser,
    candidates: &[PathBuf],
    hash: &str,
) -> Result<PathBuf> {
    let mut dated: Vec<(SystemTime, &PathBuf)> = candidates
        .iter()
        .filter_map(|path| match modified_time(path) {
            Ok(time) => Some((time, path)),
            Err(e) => {
                warn!("Skipping save {}: {}", path.display(), e);
                None
            }
        })
        .collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    dated.truncate(MATCH_CANDIDATES);

    for (_, path) in &dated {
        debug!("Scanning save {}", path.display());
        let hero = match parser.hero(path) {
            Ok(hero) => hero,
            Err(e) => {
                warn!("Skipping save {}: {}", path.display(), e);
                continue;
            }
        };
        debug!("Hero '{}' hash {}", hero.full_name, hero.fingerprint_hash);
        if hero.fingerprint_hash == hash {
            return Ok((*path).clone());
        }
    }

    Err(Error::NoMatchingSave {
        hash: hash.to_string(),
        checked: dated.len(),
    })
}
