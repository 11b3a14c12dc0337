//! Translator-facing exchange formats.
//!
//! Two interchangeable representations of "one ordered string list per
//! archive entry":
//!
//! - a JSON document ([`TextDocument`]), one record per entry, each text
//!   carrying both its original and translated form;
//! - a directory of plain-text files, one per non-empty entry (see
//!   [`textdir`]).
//!
//! [`load_translations`] picks the format from the shape of the path.

pub mod textdir;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::text::TextSet;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("The '{}' directory was not found", .0.display())]
    MissingLanguageDir(PathBuf),
    #[error("The input source '{}' does not exist", .0.display())]
    SourceNotFound(PathBuf),
    #[error("Invalid translation document: {0}")]
    InvalidDocument(&'static str),
}

// ── JSON document ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextDocument {
    pub entries: Vec<EntryRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryRecord {
    pub entry_index: usize,
    pub texts:       Vec<TextRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextRecord {
    pub text_index:      usize,
    pub original_text:   String,
    pub translated_text: Option<String>,
}

/// Import-side view of an entry record.  Only `texts` is read; the index
/// and the original text are informational and may hold any JSON value.
#[derive(Debug, Default, Deserialize)]
struct ImportEntry {
    #[serde(default)]
    texts: Vec<ImportText>,
}

#[derive(Debug, Default, Deserialize)]
struct ImportText {
    /// Absent or `null` means the empty string.
    #[serde(default)]
    translated_text: Option<String>,
}

impl TextDocument {
    /// One record per entry; translations start out equal to the originals.
    pub fn from_sets(sets: &[TextSet]) -> Self {
        let entries = sets
            .iter()
            .enumerate()
            .map(|(entry_index, set)| EntryRecord {
                entry_index,
                texts: set
                    .iter()
                    .enumerate()
                    .map(|(text_index, text)| TextRecord {
                        text_index,
                        original_text:   text.clone(),
                        translated_text: Some(text.clone()),
                    })
                    .collect(),
            })
            .collect();
        Self { entries }
    }

    /// Pretty-printed with two-space indent; non-ASCII is written verbatim.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), TransferError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

/// Translated strings per entry, in document order.
///
/// Accepts the wrapped `{"entries": [...]}` document or a bare list of entry
/// records.  The shape is chosen before the records are deserialized, so a
/// bad record reports its own error.
pub fn read_translations<R: Read>(reader: R) -> Result<Vec<TextSet>, TransferError> {
    let records = match serde_json::from_reader::<_, Value>(reader)? {
        Value::Object(mut doc) => doc
            .remove("entries")
            .ok_or(TransferError::InvalidDocument("missing \"entries\" list"))?,
        list @ Value::Array(_) => list,
        _ => return Err(TransferError::InvalidDocument("expected an object or a list")),
    };
    let entries: Vec<ImportEntry> = serde_json::from_value(records)?;
    Ok(entries
        .into_iter()
        .map(|e| {
            e.texts
                .into_iter()
                .map(|t| t.translated_text.unwrap_or_default())
                .collect()
        })
        .collect())
}

pub fn write_json<P: AsRef<Path>>(sets: &[TextSet], path: P) -> Result<(), TransferError> {
    let mut w = BufWriter::new(File::create(path)?);
    TextDocument::from_sets(sets).to_writer(&mut w)?;
    w.flush()?;
    Ok(())
}

pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Vec<TextSet>, TransferError> {
    read_translations(BufReader::new(File::open(path)?))
}

// ── Source dispatch ──────────────────────────────────────────────────────────

/// Load translations from a directory (text files) or a file (JSON).
///
/// `entry_count` is the archive length; the directory format always yields
/// exactly that many sets, JSON yields whatever the document holds.
pub fn load_translations<P: AsRef<Path>>(
    source:      P,
    entry_count: usize,
) -> Result<Vec<TextSet>, TransferError> {
    let source = source.as_ref();
    if source.is_dir() {
        textdir::read_dir(source, entry_count)
    } else if source.is_file() {
        read_json(source)
    } else {
        Err(TransferError::SourceNotFound(source.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets() -> Vec<TextSet> {
        vec![
            vec!["Hello".into(), "Pokémon\\xfffe".into()],
            Vec::new(),
            vec![String::new()],
        ]
    }

    #[test]
    fn document_shape() {
        let mut out = Vec::new();
        TextDocument::from_sets(&sets()).to_writer(&mut out).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v["entries"][0]["entry_index"], 0);
        assert_eq!(v["entries"][0]["texts"][1]["text_index"], 1);
        assert_eq!(v["entries"][0]["texts"][1]["original_text"], "Pokémon\\xfffe");
        assert_eq!(v["entries"][0]["texts"][1]["translated_text"], "Pokémon\\xfffe");
        assert_eq!(v["entries"][1]["texts"].as_array().unwrap().len(), 0);
        // Non-ASCII stays unescaped.
        assert!(String::from_utf8(out).unwrap().contains("Pokémon"));
    }

    #[test]
    fn document_reads_back() {
        let mut out = Vec::new();
        TextDocument::from_sets(&sets()).to_writer(&mut out).unwrap();
        assert_eq!(read_translations(out.as_slice()).unwrap(), sets());
    }

    #[test]
    fn bare_list_and_null_translations() {
        let json = r#"[
            {"texts": [{"original_text": "a", "translated_text": "b"},
                       {"original_text": "c", "translated_text": null},
                       {"original_text": "d"}]},
            {"entry_index": 1}
        ]"#;
        assert_eq!(
            read_translations(json.as_bytes()).unwrap(),
            vec![vec!["b".to_string(), String::new(), String::new()], Vec::new()]
        );
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = read_translations("{\"entries\": 5}".as_bytes()).unwrap_err();
        assert!(matches!(err, TransferError::Json(_)));
        let err = read_translations("{\"texts\": []}".as_bytes()).unwrap_err();
        assert!(matches!(err, TransferError::InvalidDocument(_)));
        let err = read_translations("\"entries\"".as_bytes()).unwrap_err();
        assert!(matches!(err, TransferError::InvalidDocument(_)));
    }

    #[test]
    fn informational_fields_accept_any_value() {
        let wrapped = r#"{"entries": [{"entry_index": 0, "texts": [
            {"text_index": 0, "original_text": null, "translated_text": "Hi"}]}]}"#;
        let bare = r#"[{"entry_index": "0", "texts": [
            {"text_index": -1, "original_text": 7, "translated_text": "Hi"}]}]"#;
        let expected = vec![vec!["Hi".to_string()]];
        assert_eq!(read_translations(wrapped.as_bytes()).unwrap(), expected);
        assert_eq!(read_translations(bare.as_bytes()).unwrap(), expected);
    }

    #[test]
    fn bad_record_reports_its_own_error() {
        let json = r#"[{"texts": [{"translated_text": 5}]}]"#;
        let err = read_translations(json.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("invalid type"), "{err}");
    }

    #[test]
    fn missing_source_is_reported() {
        let err = load_translations("/definitely/not/here.json", 3).unwrap_err();
        assert!(matches!(err, TransferError::SourceNotFound(_)));
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("texts.json");
        write_json(&sets(), &path).unwrap();
        assert_eq!(load_translations(&path, 3).unwrap(), sets());
    }
}
