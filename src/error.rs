//! Library and application errors

use std::io;

use miette::Diagnostic;
use thiserror::Error;

/// All possible errors returned by uf2patch
///
/// Every error is terminal for the operation that raised it: a malformed
/// image or an unreadable file cannot become valid by retrying, and block
/// numbering is a global property, so no partial recovery is attempted.
#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Erase region at {base:#010x} of {length:#x} bytes wraps past the end of the 32-bit address space")]
    #[diagnostic(code(uf2patch::address_overflow))]
    AddressOverflow { base: u32, length: u32 },

    #[error("Block {block}: start or end magic word does not match the UF2 sentinels")]
    #[diagnostic(
        code(uf2patch::invalid_magic),
        help("The input is corrupted, truncated mid-frame, or not a UF2 file")
    )]
    InvalidMagic { block: usize },

    #[error("I/O failure while reading or writing an image")]
    #[diagnostic(code(uf2patch::io_failure))]
    IoFailure(#[from] io::Error),

    #[error("Erase region at {base:#010x} has length {length:#x}, which is not a positive multiple of 256 bytes")]
    #[diagnostic(
        code(uf2patch::misaligned_range),
        help("Erase regions must cover whole 256-byte flash pages")
    )]
    MisalignedRange { base: u32, length: u32 },

    #[error("Block {block}: declared payload size {size} exceeds the 256-byte capacity")]
    #[diagnostic(code(uf2patch::payload_too_large))]
    PayloadTooLarge { block: usize, size: u32 },

    #[error("Image length {len} is not a positive multiple of the 512-byte block size")]
    #[diagnostic(
        code(uf2patch::truncated_image),
        help("UF2 files are a sequence of whole 512-byte blocks; the input is empty or ends mid-block")
    )]
    TruncatedImage { len: usize },
}
