//! Rolling-key stream cipher over 16-bit code units.
//!
//! Every entry is encrypted independently.  The key for the last slot (the
//! terminator appended on encrypt) is [`SEED`]; each step toward the start
//! of the entry rotates the key right by 3 bits.  Decryption recovers the
//! seed from the stored terminator and walks the same schedule backward.

/// Fixed cipher seed.
pub const SEED: u16 = 0x1234;

/// Plaintext value of the synthetic terminator unit.
pub const TERMINATOR: u16 = 0xFFFF;

const ROTATION: u32 = 3;

/// Advance the key one step toward the start of an entry.
#[inline]
pub fn rotate_key(key: u16) -> u16 {
    key.rotate_right(ROTATION)
}

/// Key applied at `position` of an entry of `len` plaintext units.
///
/// `position == len` is the terminator slot and yields `seed` itself.
/// Positions past `len` are clamped to the terminator slot.
#[inline]
pub fn key_schedule_at(seed: u16, len: usize, position: usize) -> u16 {
    // A 16-bit rotation by 3 repeats every 16 steps.
    let steps = (len.saturating_sub(position) % 16) as u32;
    seed.rotate_right(ROTATION * steps)
}

/// Encrypt `units` and append the terminator.  The result is always one
/// unit longer than the input.
pub fn encrypt(units: &[u16]) -> Vec<u16> {
    let len = units.len();
    let mut out: Vec<u16> = units
        .iter()
        .enumerate()
        .map(|(i, &u)| u ^ key_schedule_at(SEED, len, i))
        .collect();
    out.push(SEED ^ TERMINATOR);
    out
}

/// Decrypt one stored entry, terminator included.
///
/// The starting key is derived from the last stored unit, so any seed used
/// by the writer is recovered.  The decrypted terminator is left in place.
pub fn decrypt(stored: &[u16]) -> Vec<u16> {
    let mut out = stored.to_vec();
    let Some(&last) = stored.last() else {
        return out;
    };
    let mut key = last ^ TERMINATOR;
    for k in (0..out.len()).rev() {
        out[k] ^= key;
        if k > 0 {
            key = rotate_key(key);
        }
    }
    out
}
