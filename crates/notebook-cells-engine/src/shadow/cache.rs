use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use sha2::{Digest, Sha256};

use crate::parsing::parse_notebook;

use super::ipynb::{IpynbNotebook, to_ipynb};

/// Hex characters of the content hash used in persisted file names.
const HASH_PREFIX_LEN: usize = 12;

/// Lowercase hex SHA-256 of the source text.
pub fn content_hash(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

#[derive(Debug, Clone)]
struct ShadowEntry {
    hash: String,
    notebook: IpynbNotebook,
}

/// Shadow notebooks keyed by source path and validated by content hash.
///
/// A lookup whose text hashes differently from the cached entry replaces the
/// entry, so a stale shadow is never handed out.
#[derive(Debug, Default)]
pub struct ShadowCache {
    entries: HashMap<PathBuf, ShadowEntry>,
}

impl ShadowCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_convert(&mut self, path: &Path, text: &str) -> &IpynbNotebook {
        let hash = content_hash(text);
        let entry = match self.entries.entry(path.to_path_buf()) {
            Entry::Occupied(occupied) if occupied.get().hash == hash => {
                log::trace!("shadow cache hit for {}", path.display());
                occupied.into_mut()
            }
            Entry::Occupied(mut occupied) => {
                log::debug!("shadow for {} is stale, regenerating", path.display());
                occupied.insert(Self::convert(hash, text));
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => {
                log::debug!("converting {} to shadow notebook", path.display());
                vacant.insert(Self::convert(hash, text))
            }
        };
        &entry.notebook
    }

    fn convert(hash: String, text: &str) -> ShadowEntry {
        ShadowEntry {
            hash,
            notebook: to_ipynb(&parse_notebook(text)),
        }
    }

    /// The cached shadow, only if it was built from exactly this text.
    pub fn get(&self, path: &Path, text: &str) -> Option<&IpynbNotebook> {
        let hash = content_hash(text);
        self.entries
            .get(path)
            .filter(|entry| entry.hash == hash)
            .map(|entry| &entry.notebook)
    }

    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the shadow for `path` into `dir` as `<stem>.<hash-prefix>.ipynb`.
    ///
    /// The hash in the name ties the file to the source text it came from, so
    /// older shadows of the same notebook never get overwritten by mistake.
    pub fn persist(&mut self, path: &Path, text: &str, dir: &Path) -> anyhow::Result<PathBuf> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("no file name in {}", path.display()))?
            .to_string();
        let hash = content_hash(text);
        let target = dir.join(format!("{stem}.{}.ipynb", &hash[..HASH_PREFIX_LEN]));

        let json = serde_json::to_string_pretty(self.get_or_convert(path, text))
            .context("Failed to encode shadow notebook")?;
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create shadow directory {}", dir.display()))?;
        fs::write(&target, json)
            .with_context(|| format!("Failed to write shadow {}", target.display()))?;

        log::debug!("persisted shadow to {}", target.display());
        Ok(target)
    }
}
