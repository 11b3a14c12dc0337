//! High-level [`TextArchive`] API — the primary embedding surface.
//!
//! ```no_run
//! use narctext::archive::TextArchive;
//!
//! // Export
//! let ar = TextArchive::open("a003.narc")?;
//! let sets = ar.text_sets();
//!
//! // Import
//! let mut ar = TextArchive::open("a003.narc")?;
//! let report = ar.apply_translations(&sets)?;
//! ar.write("new_a003.narc")?;
//! println!("{} entries updated", report.updated);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::narc::{Narc, NarcError};
use crate::perf;
use crate::text::{BlockContent, TextError, TextSet};

// ── EntryInfo ─────────────────────────────────────────────────────────────────

/// Lightweight descriptor returned by [`TextArchive::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub index:   usize,
    pub size:    usize,
    pub crc32:   u32,
    /// Number of decoded strings, `None` for opaque entries.
    pub strings: Option<usize>,
}

// ── ImportReport ──────────────────────────────────────────────────────────────

/// Outcome of [`TextArchive::apply_translations`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// Entries re-encoded from a translation.
    pub updated:             usize,
    pub archive_entries:     usize,
    pub translation_entries: usize,
}

impl ImportReport {
    pub fn is_mismatched(&self) -> bool {
        self.archive_entries != self.translation_entries
    }
}

// ── TextArchive ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct TextArchive {
    narc: Narc,
}

impl TextArchive {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, NarcError> {
        Self::from_bytes(&fs::read(path)?)
    }

    pub fn from_bytes(raw: &[u8]) -> Result<Self, NarcError> {
        Ok(Self { narc: Narc::parse(raw)? })
    }

    pub fn narc(&self) -> &Narc {
        &self.narc
    }

    pub fn len(&self) -> usize {
        self.narc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.narc.is_empty()
    }

    // ── Read ──────────────────────────────────────────────────────────────────

    pub fn contents(&self) -> Vec<BlockContent> {
        perf::classify_blocks(&self.narc.entries)
    }

    /// One set per entry; opaque entries yield an empty set.
    pub fn text_sets(&self) -> Vec<TextSet> {
        self.contents()
            .into_iter()
            .map(|c| match c {
                BlockContent::Text(set) => set,
                BlockContent::Opaque(_) => TextSet::new(),
            })
            .collect()
    }

    pub fn list(&self) -> Vec<EntryInfo> {
        self.narc
            .entries
            .iter()
            .zip(self.contents())
            .enumerate()
            .map(|(index, (bytes, content))| EntryInfo {
                index,
                size:    bytes.len(),
                crc32:   crc32fast::hash(bytes),
                strings: match content {
                    BlockContent::Text(set) => Some(set.len()),
                    BlockContent::Opaque(_) => None,
                },
            })
            .collect()
    }

    // ── Write ─────────────────────────────────────────────────────────────────

    /// Replace entries with re-encoded translations.
    ///
    /// `translations[i]` applies to entry `i`.  Entries whose set is missing
    /// or contains only empty strings keep their original bytes, as do
    /// translation sets past the end of the archive.  A length mismatch is
    /// logged and reported, not rejected.
    pub fn apply_translations(&mut self, translations: &[TextSet]) -> Result<ImportReport, TextError> {
        let report_base = ImportReport {
            updated:             0,
            archive_entries:     self.len(),
            translation_entries: translations.len(),
        };
        if report_base.is_mismatched() {
            warn!(
                "Mismatch in entry count: source ({}) vs. NARC ({})",
                translations.len(),
                self.len()
            );
        }

        let jobs: Vec<(usize, &[String])> = translations
            .iter()
            .take(self.len())
            .enumerate()
            .filter(|(_, set)| set.iter().any(|s| !s.is_empty()))
            .map(|(i, set)| (i, set.as_slice()))
            .collect();

        let encoded = perf::encode_jobs(&jobs)?;
        let updated = encoded.len();
        for (index, block) in encoded {
            self.narc.entries[index] = block;
        }

        info!("{updated} entries updated");
        Ok(ImportReport { updated, ..report_base })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, NarcError> {
        self.narc.to_bytes()
    }

    /// Rebuild the container and write it to `path`.  The file is only
    /// created once the complete image is in memory.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), NarcError> {
        let image = self.to_bytes()?;
        fs::write(path, image)?;
        Ok(())
    }
}

impl From<Narc> for TextArchive {
    fn from(narc: Narc) -> Self {
        Self { narc }
    }
}
