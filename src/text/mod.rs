//! Message block codec: one NARC entry ⇄ an ordered list of strings.
//!
//! # Block layout
//!
//! ```text
//! 0x00  u16 section count (1)
//! 0x02  u16 entry count
//! 0x04  u32 section size
//! 0x08  u32 reserved (0)
//! 0x0C  u32 section offset (0x10)
//! sect  u32 section size
//!       { u32 offset, u16 unit count, u16 format tag }  × entry count
//!       encrypted code units ...
//! ```
//!
//! Row offsets are relative to the start of the section.  Each stored entry
//! carries one extra unit, the encrypted terminator, and its unit count
//! includes it.
//!
//! The per-row format tag is written as [`FORMAT_TAG`] and never checked on
//! read.  Blocks that use other tags decode as if they used this one.

pub mod cipher;
pub mod escape;

use log::debug;
use thiserror::Error;

use crate::cursor::{ByteCursor, CursorError};

/// Ordered strings of one block; the index is the text slot.
pub type TextSet = Vec<String>;

pub const FORMAT_TAG: u16 = 0x0100;

const SECTION_COUNT:         u16   = 1;
const HEADER_LEN:            u32   = 0x10;
const MIN_BLOCK_LEN:         usize = 12;
const ENTRY_COUNT_OFFSET:    usize = 2;
const SECTION_POINTER_OFFSET: usize = 12;
const ROW_LEN:               usize = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    #[error("block too short for a message header ({0} bytes)")]
    TooShort(usize),
    #[error("string section offset {offset:#x} lies outside the {len}-byte block")]
    SectionOutOfBounds { offset: usize, len: usize },
    #[error("too many strings for one block: {0}")]
    TooManyEntries(usize),
    #[error("string {index} is too long: {units} code units")]
    EntryTooLong { index: usize, units: usize },
    #[error("string {index} holds the reserved terminator unit 0xffff at position {position}")]
    ReservedUnit { index: usize, position: usize },
    #[error(transparent)]
    Truncated(#[from] CursorError),
}

/// A block classified by whether it holds a message table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockContent {
    Text(TextSet),
    Opaque(Vec<u8>),
}

impl BlockContent {
    pub fn classify(block: &[u8]) -> Self {
        match try_decode(block) {
            Ok(set) => BlockContent::Text(set),
            Err(e) => {
                debug!("treating block as opaque: {e}");
                BlockContent::Opaque(block.to_vec())
            }
        }
    }

    /// Strings of a text block; empty for opaque blocks.
    pub fn texts(&self) -> &[String] {
        match self {
            BlockContent::Text(set) => set,
            BlockContent::Opaque(_) => &[],
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, BlockContent::Text(_))
    }
}

// ── Decode ───────────────────────────────────────────────────────────────────

/// Decode a block, returning an empty set for anything that is not a
/// readable message table.
pub fn decode(block: &[u8]) -> TextSet {
    try_decode(block).unwrap_or_default()
}

/// Decode a block.
///
/// Fails as a whole when the header or string table cannot be read.  A row
/// whose text runs past the end of the block is skipped instead.
pub fn try_decode(block: &[u8]) -> Result<TextSet, TextError> {
    if block.len() < MIN_BLOCK_LEN {
        return Err(TextError::TooShort(block.len()));
    }

    let mut cur = ByteCursor::from_bytes(block);
    cur.seek(ENTRY_COUNT_OFFSET);
    let count = cur.read_u16()? as usize;
    cur.seek(SECTION_POINTER_OFFSET);
    let section = cur.read_u32()? as usize;
    if section >= block.len() {
        return Err(TextError::SectionOutOfBounds { offset: section, len: block.len() });
    }

    cur.seek(section);
    let _section_size = cur.read_u32()?;
    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        let offset = cur.read_u32()? as usize;
        let units = cur.read_u16()? as usize;
        let _tag = cur.read_u16()?;
        rows.push((offset, units));
    }

    let mut texts = Vec::with_capacity(rows.len());
    for (row, (offset, units)) in rows.into_iter().enumerate() {
        let start = section.saturating_add(offset);
        if start.saturating_add(units * 2) > block.len() {
            debug!("skipping string {row}: {units} units at {start:#x} overrun the block");
            continue;
        }
        cur.seek(start);
        let mut stored = Vec::with_capacity(units);
        for _ in 0..units {
            stored.push(cur.read_u16()?);
        }
        texts.push(escape::units_to_text(&cipher::decrypt(&stored)));
    }
    Ok(texts)
}

// ── Encode ───────────────────────────────────────────────────────────────────

/// Build a message block holding `texts` in order.
pub fn encode<S: AsRef<str>>(texts: &[S]) -> Result<Vec<u8>, TextError> {
    let count = u16::try_from(texts.len()).map_err(|_| TextError::TooManyEntries(texts.len()))?;

    let mut chunks = Vec::with_capacity(texts.len());
    for (index, text) in texts.iter().enumerate() {
        let units = escape::text_to_units(text.as_ref());
        if let Some(position) = units.iter().position(|&u| u == cipher::TERMINATOR) {
            return Err(TextError::ReservedUnit { index, position });
        }
        let stored = cipher::encrypt(&units);
        if stored.len() > u16::MAX as usize {
            return Err(TextError::EntryTooLong { index, units: stored.len() });
        }
        chunks.push(stored);
    }

    let mut section = ByteCursor::new();
    section.write_u32(0); // section size, patched
    let mut offset = 4 + texts.len() * ROW_LEN;
    for chunk in &chunks {
        section.write_u32(offset as u32);
        section.write_u16(chunk.len() as u16);
        section.write_u16(FORMAT_TAG);
        offset += chunk.len() * 2;
    }
    for unit in chunks.iter().flatten() {
        section.write_u16(*unit);
    }
    let section_size = section.len() as u32;
    section.patch_u32(0, section_size)?;

    let mut out = ByteCursor::new();
    out.write_u16(SECTION_COUNT);
    out.write_u16(count);
    out.write_u32(section_size);
    out.write_u32(0);
    out.write_u32(HEADER_LEN);
    out.write_bytes(section.as_slice());
    Ok(out.into_inner())
}
