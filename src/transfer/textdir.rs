//! Directory-of-text-files exchange format.
//!
//! ```text
//! <root>/0000/0003.txt
//!
//! # Entry 0003
//!
//! [0000]
//! first string
//!
//! [0001]
//! second string
//! ```
//!
//! Only entries with at least one string get a file.  On import, `[n]`
//! opens slot `n`, lines starting with `#` are comments, and slot text is
//! trimmed.  Slots never mentioned come back as empty strings.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use super::TransferError;
use crate::text::TextSet;

/// Subdirectory holding the per-entry files.
pub const LANG_DIR: &str = "0000";

pub fn entry_file_name(index: usize) -> String {
    format!("{index:04}.txt")
}

pub fn lang_dir(root: &Path) -> PathBuf {
    root.join(LANG_DIR)
}

/// Render one entry's file body.
pub fn render_entry(index: usize, texts: &[String]) -> String {
    let mut out = format!("# Entry {index:04}\n\n");
    for (slot, text) in texts.iter().enumerate() {
        out.push_str(&format!("[{slot:04}]\n{text}\n\n"));
    }
    out
}

/// Parse one entry's file body.  `None` if it defines no slots.
pub fn parse_entry(content: &str) -> Option<TextSet> {
    let mut slots: BTreeMap<usize, String> = BTreeMap::new();
    let mut current: Option<usize> = None;
    let mut buf = String::new();

    for line in content.lines() {
        if line.len() >= 2 && line.starts_with('[') && line.ends_with(']') {
            if let Some(slot) = current {
                slots.insert(slot, buf.trim().to_string());
            }
            // A bracketed line that is not a number closes the slot.
            current = line[1..line.len() - 1].parse().ok();
            buf.clear();
        } else if !line.starts_with('#') && current.is_some() {
            buf.push_str(line);
            buf.push('\n');
        }
    }
    if let Some(slot) = current {
        slots.insert(slot, buf.trim().to_string());
    }

    let (&last, _) = slots.iter().next_back()?;
    Some((0..=last).map(|i| slots.get(&i).cloned().unwrap_or_default()).collect())
}

/// Write one file per non-empty set.  Returns the number of files written.
pub fn write_dir<P: AsRef<Path>>(sets: &[TextSet], root: P) -> Result<usize, TransferError> {
    let dir = lang_dir(root.as_ref());
    fs::create_dir_all(&dir)?;

    let mut written = 0;
    for (index, texts) in sets.iter().enumerate() {
        if texts.is_empty() {
            continue;
        }
        fs::write(dir.join(entry_file_name(index)), render_entry(index, texts))?;
        written += 1;
    }
    Ok(written)
}

/// Read `entry_count` sets.  Entries without a file come back empty; files
/// for indices past `entry_count` are ignored.
pub fn read_dir<P: AsRef<Path>>(root: P, entry_count: usize) -> Result<Vec<TextSet>, TransferError> {
    let dir = lang_dir(root.as_ref());
    if !dir.is_dir() {
        return Err(TransferError::MissingLanguageDir(dir));
    }

    let mut sets = vec![TextSet::new(); entry_count];
    for (index, set) in sets.iter_mut().enumerate() {
        let path = dir.join(entry_file_name(index));
        if !path.exists() {
            continue;
        }
        if let Some(parsed) = parse_entry(&fs::read_to_string(&path)?) {
            debug!("{}: {} slots", path.display(), parsed.len());
            *set = parsed;
        }
    }
    Ok(sets)
}
