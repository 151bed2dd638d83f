//! A library for parsing and patching UF2 firmware images.
//!
//! UF2 files are a sequence of fixed-size, self-describing 512-byte blocks,
//! each carrying up to 256 bytes of payload destined for an absolute flash
//! address. This crate decodes such an image into an in-memory model,
//! synthesizes new blocks that fill an address range with an erase pattern,
//! and re-emits a consistent, renumbered image.
//!
//! The typical use case is appending erase blocks covering a device's
//! user-storage region, so that flashing the image also clears any data
//! previously stored there:
//!
//! ```no_run
//! use uf2patch::{AddressRange, Image};
//!
//! # fn main() -> Result<(), uf2patch::Error> {
//! let data = std::fs::read("firmware.uf2")?;
//! let mut image = Image::from_bytes(&data)?;
//!
//! // Erase the last 16 KiB of a 2 MiB flash mapped at 0x10000000.
//! let region = AddressRange::new(0x1020_0000 - 0x4000, 0x4000)?;
//! image.extend_with_erase_region(&region, 0xff);
//!
//! std::fs::write("firmware-patched.uf2", image.to_bytes())?;
//! # Ok(())
//! # }
//! ```

pub mod block;
#[cfg(feature = "cli")]
pub mod cli;
pub mod erase;
mod error;
pub mod family;
pub mod image;
#[cfg(feature = "cli")]
pub mod logging;

pub use crate::{
    block::{Block, BlockFlags, BLOCK_SIZE, PAYLOAD_CAPACITY},
    erase::AddressRange,
    error::Error,
    family::Family,
    image::Image,
};
