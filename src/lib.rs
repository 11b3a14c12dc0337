pub mod cursor;
pub mod narc;
pub mod text;
pub mod transfer;
pub mod perf;
pub mod archive;

pub use cursor::{ByteCursor, CursorError};
pub use narc::{Narc, NarcError};
pub use text::{BlockContent, TextError, TextSet, decode, encode};
pub use archive::{TextArchive, ImportReport, EntryInfo};
pub use transfer::{TextDocument, TransferError, load_translations, read_translations};
