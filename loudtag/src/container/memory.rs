use std::path::{Path, PathBuf};

use super::{ContainerKind, SaveOptions, TagContainer};
use crate::error::ContainerError;
use crate::keys::TagFormat;

/// A tag container that lives in memory only.
///
/// It follows the key rules of the native tag system of `kind` and
/// records every save, so callers that do their own I/O (and tests) can
/// drive the taggers without touching files.
#[derive(Debug, Clone)]
pub struct MemoryContainer {
    kind: ContainerKind,
    path: PathBuf,
    entries: Vec<(String, String)>,
    saves: Vec<SaveOptions>,
    stripped: bool,
    fail_saves: bool,
}

impl MemoryContainer {
    pub fn new(kind: ContainerKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            entries: Vec::new(),
            saves: Vec::new(),
            stripped: false,
            fail_saves: false,
        }
    }

    pub fn with_entries<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.entries
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Make every following `save` fail
    pub fn fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Options of every successful save so far
    pub fn saves(&self) -> &[SaveOptions] {
        &self.saves
    }

    pub fn was_stripped(&self) -> bool {
        self.stripped
    }

    fn folds_case(&self) -> bool {
        matches!(
            self.kind.tag_format(),
            TagFormat::Vorbis | TagFormat::OpusR128 | TagFormat::Ape
        )
    }

    fn matches(&self, stored: &str, key: &str) -> bool {
        if self.folds_case() {
            stored.eq_ignore_ascii_case(key)
        } else {
            stored == key
        }
    }
}

impl TagContainer for MemoryContainer {
    fn kind(&self) -> ContainerKind {
        self.kind
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|(k, _)| self.matches(k, key))
            .map(|(_, v)| v.clone())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), ContainerError> {
        self.remove(key);
        self.entries.push((key.to_owned(), value));
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        let fold = self.folds_case();
        self.entries.retain(|(k, _)| {
            if fold {
                !k.eq_ignore_ascii_case(key)
            } else {
                k != key
            }
        });
    }

    fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(k, _)| k.clone()).collect()
    }

    fn strip(&mut self) -> Result<(), ContainerError> {
        match self.kind.tag_format() {
            TagFormat::Id3v2 | TagFormat::Ape => {
                self.entries.clear();
                self.stripped = true;
                Ok(())
            }
            _ => Err(ContainerError::StripUnsupported(self.kind.name())),
        }
    }

    fn save(&mut self, options: &SaveOptions) -> Result<(), ContainerError> {
        if self.fail_saves {
            return Err(ContainerError::Injected);
        }
        self.saves.push(*options);
        Ok(())
    }
}
