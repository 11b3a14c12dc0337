//! Little-endian byte buffer with a movable read cursor.
//!
//! Writes always append at the end of the buffer; reads start at the cursor
//! and advance it.  Placeholders written during a first pass are filled in
//! later with the `patch_*` methods, which never move the cursor.

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

/// Filler byte used by [`ByteCursor::pad_to_4`].  NARC tooling expects 0xFF,
/// not zero.
pub const PAD_BYTE: u8 = 0xFF;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CursorError {
    #[error("Truncated data: need {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        offset:    usize,
        needed:    usize,
        available: usize,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ByteCursor {
    buf: Vec<u8>,
    pos: usize,
}

impl ByteCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        Self { buf: data.to_vec(), pos: 0 }
    }

    // ── Write ────────────────────────────────────────────────────────────────

    pub fn write_u16(&mut self, value: u16) {
        let mut raw = [0u8; 2];
        LittleEndian::write_u16(&mut raw, value);
        self.buf.extend_from_slice(&raw);
    }

    pub fn write_u32(&mut self, value: u32) {
        let mut raw = [0u8; 4];
        LittleEndian::write_u32(&mut raw, value);
        self.buf.extend_from_slice(&raw);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append [`PAD_BYTE`] until the buffer length is a multiple of 4.
    pub fn pad_to_4(&mut self) {
        while self.buf.len() % 4 != 0 {
            self.buf.push(PAD_BYTE);
        }
    }

    /// Overwrite a previously written u32 at an absolute offset.
    pub fn patch_u32(&mut self, at: usize, value: u32) -> Result<(), CursorError> {
        let slot = self.slot_mut(at, 4)?;
        LittleEndian::write_u32(slot, value);
        Ok(())
    }

    // ── Read ─────────────────────────────────────────────────────────────────

    pub fn read_u16(&mut self) -> Result<u16, CursorError> {
        let v = LittleEndian::read_u16(self.take(2)?);
        Ok(v)
    }

    pub fn read_u32(&mut self) -> Result<u32, CursorError> {
        let v = LittleEndian::read_u32(self.take(4)?);
        Ok(v)
    }

    // ── Position ─────────────────────────────────────────────────────────────

    /// Move the cursor.  Seeking past the end is allowed; the next read fails.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn take(&mut self, len: usize) -> Result<&[u8], CursorError> {
        let start = self.pos;
        let end = start
            .checked_add(len)
            .filter(|&end| end <= self.buf.len())
            .ok_or(CursorError::Truncated {
                offset:    start,
                needed:    len,
                available: self.remaining(),
            })?;
        self.pos = end;
        Ok(&self.buf[start..end])
    }

    fn slot_mut(&mut self, at: usize, len: usize) -> Result<&mut [u8], CursorError> {
        let available = self.buf.len().saturating_sub(at);
        match at.checked_add(len) {
            Some(end) if end <= self.buf.len() => Ok(&mut self.buf[at..end]),
            _ => Err(CursorError::Truncated { offset: at, needed: len, available }),
        }
    }
}

/// Find the first occurrence of a 4-byte tag at or after `from`.
pub fn find_tag(haystack: &[u8], tag: &[u8; 4], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(tag.len())
        .position(|w| w == tag)
        .map(|i| from + i)
}
