//! NARC container: split an archive into ordered blocks and rebuild one.
//!
//! # Layout
//!
//! ```text
//! 0x00  "NARC"  u16 BOM=0xFFFE  u16 version=0x0100  u32 file size
//!       u16 header size=0x10  u16 section count=3
//! BTAF  "BTAF"  u32 section size  u32 file count  { u32 start, u32 end }*
//! BTNF  "BTNF"  u32 size  ... name table ...
//! GMIF  "GMIF"  u32 section size  file data ...  0xFF padding to 4
//! ```
//!
//! Allocation-table ranges are relative to the first byte after the GMIF
//! header.  Sections are located by scanning for their tags, so optional
//! sections may appear in any order; BTAF and GMIF are mandatory.
//!
//! Rebuilding always writes a single-directory name table.  Original file
//! names are not carried over.

use std::io;

use log::debug;
use thiserror::Error;

use crate::cursor::{find_tag, ByteCursor, CursorError};

pub const MAGIC:        &[u8; 4] = b"NARC";
pub const TAG_BTAF:     &[u8; 4] = b"BTAF";
pub const TAG_BTNF:     &[u8; 4] = b"BTNF";
pub const TAG_GMIF:     &[u8; 4] = b"GMIF";

pub const BYTE_ORDER_MARK: u16 = 0xFFFE;
pub const VERSION:         u16 = 0x0100;
pub const HEADER_SIZE:     u16 = 0x0010;
pub const SECTION_COUNT:   u16 = 3;

/// Offset of the total file size inside the header.
const FILE_SIZE_OFFSET: usize = 8;
/// BTAF: file count follows the tag and the section size.
const BTAF_COUNT_OFFSET: usize = 8;
/// GMIF: data follows the tag and the section size.
const GMIF_DATA_OFFSET: usize = 8;

// Stub BTNF: one root directory entry, no names.
const BTNF_SECTION_SIZE:    u32 = 0x10;
const BTNF_SUBTABLE_OFFSET: u32 = 4;
const BTNF_FIRST_FILE_ID:   u16 = 0;
const BTNF_DIR_COUNT:       u16 = 1;

#[derive(Error, Debug)]
pub enum NarcError {
    #[error("not a valid NARC file")]
    InvalidMagic,
    #[error("missing {0} section in NARC file")]
    MissingSection(&'static str),
    #[error("entry {index} range {start}..{end} lies outside the image data ({available} bytes)")]
    EntryOutOfBounds {
        index:     usize,
        start:     u32,
        end:       u32,
        available: usize,
    },
    #[error(transparent)]
    Truncated(#[from] CursorError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// An archive as an ordered list of opaque blocks.  A block's position is
/// its permanent index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Narc {
    pub entries: Vec<Vec<u8>>,
}

impl Narc {
    pub fn new(entries: Vec<Vec<u8>>) -> Self {
        Self { entries }
    }

    /// Split a NARC image into its blocks.
    ///
    /// Every allocation range must lie inside the GMIF data.  A range that
    /// ends past the data, or ends before it starts, fails with
    /// [`NarcError::EntryOutOfBounds`] instead of yielding a short or empty
    /// block, so a damaged table is never rebuilt into a smaller archive.
    pub fn parse(raw: &[u8]) -> Result<Self, NarcError> {
        if raw.get(..4) != Some(&MAGIC[..]) {
            return Err(NarcError::InvalidMagic);
        }

        let btaf = find_tag(raw, TAG_BTAF, 0)
            .ok_or(NarcError::MissingSection("allocation table (BTAF)"))?;
        let mut cur = ByteCursor::from_bytes(raw);
        cur.seek(btaf + BTAF_COUNT_OFFSET);
        let count = cur.read_u32()? as usize;
        let mut ranges = Vec::with_capacity(count.min(cur.remaining() / 8));
        for _ in 0..count {
            let start = cur.read_u32()?;
            let end = cur.read_u32()?;
            ranges.push((start, end));
        }

        let gmif = find_tag(raw, TAG_GMIF, 0)
            .ok_or(NarcError::MissingSection("image data (GMIF)"))?;
        let data = raw.get(gmif + GMIF_DATA_OFFSET..).unwrap_or(&[]);

        let mut entries = Vec::with_capacity(ranges.len());
        for (index, (start, end)) in ranges.into_iter().enumerate() {
            let slice = data
                .get(start as usize..end as usize)
                .ok_or(NarcError::EntryOutOfBounds { index, start, end, available: data.len() })?;
            entries.push(slice.to_vec());
        }

        debug!("parsed NARC: {} entries, BTAF at {btaf:#x}, GMIF at {gmif:#x}", entries.len());
        Ok(Self { entries })
    }

    /// Serialize the current blocks into a fresh NARC image.
    pub fn to_bytes(&self) -> Result<Vec<u8>, NarcError> {
        rebuild(&self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build a NARC image from `entries`, concatenated in order with no
/// padding between them.
///
/// Sizes that depend on later content are written as zero placeholders and
/// patched once the full image exists; nothing is returned until every
/// patch has been applied.
pub fn rebuild<B: AsRef<[u8]>>(entries: &[B]) -> Result<Vec<u8>, NarcError> {
    let mut out = ByteCursor::new();

    // ── Header ───────────────────────────────────────────────────────────────
    out.write_bytes(MAGIC);
    out.write_u16(BYTE_ORDER_MARK);
    out.write_u16(VERSION);
    out.write_u32(0); // file size, patched
    out.write_u16(HEADER_SIZE);
    out.write_u16(SECTION_COUNT);

    // ── BTAF ─────────────────────────────────────────────────────────────────
    let btaf_start = out.len();
    out.write_bytes(TAG_BTAF);
    out.write_u32(0); // section size, patched
    out.write_u32(entries.len() as u32);
    let mut running: u32 = 0;
    for entry in entries {
        out.write_u32(running);
        running = running.wrapping_add(entry.as_ref().len() as u32);
        out.write_u32(running);
    }

    // ── BTNF ─────────────────────────────────────────────────────────────────
    out.write_bytes(TAG_BTNF);
    out.write_u32(BTNF_SECTION_SIZE);
    out.write_u32(BTNF_SUBTABLE_OFFSET);
    out.write_u16(BTNF_FIRST_FILE_ID);
    out.write_u16(BTNF_DIR_COUNT);

    // ── GMIF ─────────────────────────────────────────────────────────────────
    let gmif_start = out.len();
    out.write_bytes(TAG_GMIF);
    out.write_u32(0); // section size, patched
    for entry in entries {
        out.write_bytes(entry.as_ref());
    }
    out.pad_to_4();

    // ── Patch ────────────────────────────────────────────────────────────────
    let total = out.len();
    out.patch_u32(FILE_SIZE_OFFSET, total as u32)?;
    // The BTAF size spans everything up to GMIF, name table included.
    out.patch_u32(btaf_start + 4, (gmif_start - btaf_start) as u32)?;
    out.patch_u32(gmif_start + 4, (total - gmif_start) as u32)?;

    debug!("rebuilt NARC: {} entries, {total} bytes", entries.len());
    Ok(out.into_inner())
}
