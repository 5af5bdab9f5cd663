//! Save location resolution
//!
//! A save is either a directory holding the payload files or a `.sav` ZIP
//! archive holding the same names. Archives are read in memory.

use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use strum::{Display, IntoStaticStr};
use tracing::{debug, warn};
use zip::ZipArchive;

use super::codec;
use crate::error::{Error, Result};

/// Which payload of a save to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
pub enum PayloadKind {
    /// Full world state
    #[strum(serialize = "data")]
    Primary,
    /// Save slot summary carrying the hero name fields
    #[strum(serialize = "info")]
    Auxiliary,
}

impl PayloadKind {
    /// Accepted file names, first existing wins
    pub fn file_names(&self) -> &'static [&'static str] {
        match self {
            Self::Primary => &["data", "savedata"],
            Self::Auxiliary => &["info", "saveinfo"],
        }
    }
}

/// A save on disk, either an unpacked directory or a `.sav` archive
#[derive(Debug, Clone)]
pub enum SaveSource {
    Directory(PathBuf),
    Archive { path: PathBuf, max_size: u64 },
}

impl SaveSource {
    pub fn open<P: AsRef<Path>>(path: P, max_archive_size: u64) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::SavePathNotFound(path.to_path_buf()));
        }

        if path.extension().is_some_and(|ext| ext == "sav") {
            Ok(Self::Archive {
                path: path.to_path_buf(),
                max_size: max_archive_size,
            })
        } else {
            Ok(Self::Directory(path.to_path_buf()))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(path) => path,
            Self::Archive { path, .. } => path,
        }
    }

    /// Raw container bytes of a payload
    pub fn read_raw(&self, kind: PayloadKind) -> Result<Vec<u8>> {
        match self {
            Self::Directory(dir) => read_from_directory(dir, kind),
            Self::Archive { path, max_size } => read_from_archive(path, kind, *max_size),
        }
    }

    /// Raw container bytes, or None when the payload is simply absent
    pub fn try_read_raw(&self, kind: PayloadKind) -> Result<Option<Vec<u8>>> {
        match self.read_raw(kind) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(Error::PayloadNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Read and decode a payload
    pub fn decode(&self, kind: PayloadKind) -> Result<Vec<u8>> {
        codec::decode(&self.read_raw(kind)?)
    }
}

fn not_found(path: &Path, kind: PayloadKind) -> Error {
    Error::PayloadNotFound {
        path: path.to_path_buf(),
        names: kind.file_names().iter().map(|s| s.to_string()).collect(),
    }
}

fn read_from_directory(dir: &Path, kind: PayloadKind) -> Result<Vec<u8>> {
    for name in kind.file_names() {
        let file = dir.join(name);
        if file.is_file() {
            debug!("Reading {} payload from {}", kind, file.display());
            return Ok(fs::read(file)?);
        }
    }
    Err(not_found(dir, kind))
}

fn read_from_archive(path: &Path, kind: PayloadKind, max_size: u64) -> Result<Vec<u8>> {
    let archive_err = |e: zip::result::ZipError| Error::Archive {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let bytes = fs::read(path)?;
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(archive_err)?;

    let mut total: u64 = 0;
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i).map_err(archive_err)?;
        total = total.saturating_add(entry.size());
    }
    if total > max_size {
        warn!(
            "Rejecting archive {}: {} bytes uncompressed",
            path.display(),
            total
        );
        return Err(Error::ArchiveTooLarge {
            path: path.to_path_buf(),
            size: total,
            max: max_size,
        });
    }

    for name in kind.file_names() {
        let mut entry = match archive.by_name(name) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => continue,
            Err(e) => return Err(archive_err(e)),
        };
        let declared = entry.size();
        let mut data = Vec::with_capacity(declared.min(max_size) as usize);
        (&mut entry).take(declared + 1).read_to_end(&mut data)?;
        if data.len() as u64 > declared {
            return Err(Error::Archive {
                path: path.to_path_buf(),
                message: format!("entry '{name}' inflates past its declared {declared} bytes"),
            });
        }
        debug!(
            "Read {} payload '{}' from archive {} ({} bytes)",
            kind,
            name,
            path.display(),
            data.len()
        );
        return Ok(data);
    }

    Err(not_found(path, kind))
}

/// Modification time of a save, used to rank candidate saves
pub fn modified_time(path: &Path) -> Result<std::time::SystemTime> {
    Ok(fs::metadata(path)?.modified()?)
}
