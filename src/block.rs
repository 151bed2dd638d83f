//! UF2 block codec
//!
//! A UF2 image is a sequence of framed 512-byte blocks. Each frame starts
//! with two magic words, carries a 32-byte little-endian header and a
//! 476-byte data area (of which this profile uses the first 256 bytes), and
//! ends with a third magic word at byte offset 508. This module is the only
//! place in the crate that knows the byte layout; everything else works on
//! the decoded [`Block`] representation.

use std::{fmt, mem::size_of};

use bitflags::bitflags;
use bytemuck::{bytes_of, pod_read_unaligned, Pod, Zeroable};

use crate::error::Error;

/// Size of a single framed UF2 block.
pub const BLOCK_SIZE: usize = 512;

/// Number of payload bytes carried by each block in this profile.
pub const PAYLOAD_CAPACITY: usize = 256;

/// Size of the in-frame data area. Only the first `payload_size` bytes are
/// meaningful; the tail is conventionally zero but preserved verbatim.
pub const DATA_AREA_SIZE: usize = 476;

const MAGIC_START0: u32 = 0x0A32_4655; // "UF2\n"
const MAGIC_START1: u32 = 0x9E5D_5157;
const MAGIC_END: u32 = 0x0AB1_6F30;

const HEADER_SIZE: usize = size_of::<BlockHeader>();
const FOOTER_OFFSET: usize = BLOCK_SIZE - size_of::<u32>();

bitflags! {
    /// Flag bits of a UF2 block header.
    ///
    /// Only `FAMILY_ID_PRESENT` affects this tool's behavior; all other
    /// bits, including ones not named here, pass through decode and encode
    /// untouched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BlockFlags: u32 {
        const NOT_MAIN_FLASH    = 0x0000_0001;
        const FILE_CONTAINER    = 0x0000_1000;
        const FAMILY_ID_PRESENT = 0x0000_2000;
        const MD5_PRESENT       = 0x0000_4000;
        const EXTENSION_TAGS    = 0x0000_8000;
    }
}

#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
struct BlockHeader {
    magic_start0: u32,
    magic_start1: u32,
    flags: u32,
    target_addr: u32,
    payload_size: u32,
    block_index: u32,
    block_count: u32,
    family_id: u32,
}

/// A single decoded UF2 block.
///
/// The magic sentinels are validated at decode time and re-emitted at encode
/// time; they are not stored. `block_index` and `block_count` are rewritten
/// by [`Image::renumber`](crate::Image::renumber) whenever the owning image
/// is resized; all other fields are fixed once the block exists.
#[derive(Clone, PartialEq, Eq)]
pub struct Block {
    pub flags: BlockFlags,
    /// Absolute flash address the payload is to be written to.
    pub target_addr: u32,
    /// Number of meaningful bytes at the start of `data`.
    pub payload_size: u32,
    pub block_index: u32,
    pub block_count: u32,
    /// Target chip family, meaningful when `FAMILY_ID_PRESENT` is set.
    pub family_id: u32,
    pub data: [u8; DATA_AREA_SIZE],
}

impl Block {
    /// Decode one 512-byte frame.
    ///
    /// `index` is the block's position in the image and is carried only for
    /// error reporting; the decode itself is a pure function of `frame`.
    pub fn decode(frame: &[u8], index: usize) -> Result<Self, Error> {
        if frame.len() != BLOCK_SIZE {
            return Err(Error::TruncatedImage { len: frame.len() });
        }

        let header: BlockHeader = pod_read_unaligned(&frame[..HEADER_SIZE]);
        let magic_end: u32 = pod_read_unaligned(&frame[FOOTER_OFFSET..]);

        if header.magic_start0 != MAGIC_START0
            || header.magic_start1 != MAGIC_START1
            || magic_end != MAGIC_END
        {
            return Err(Error::InvalidMagic { block: index });
        }
        if header.payload_size as usize > PAYLOAD_CAPACITY {
            return Err(Error::PayloadTooLarge {
                block: index,
                size: header.payload_size,
            });
        }

        let mut data = [0u8; DATA_AREA_SIZE];
        data.copy_from_slice(&frame[HEADER_SIZE..FOOTER_OFFSET]);

        Ok(Self {
            flags: BlockFlags::from_bits_retain(header.flags),
            target_addr: header.target_addr,
            payload_size: header.payload_size,
            block_index: header.block_index,
            block_count: header.block_count,
            family_id: header.family_id,
            data,
        })
    }

    /// Encode into a 512-byte frame. Total: always succeeds for a decoded or
    /// synthesized block, and `decode(encode(b)) == b`.
    pub fn encode(&self) -> [u8; BLOCK_SIZE] {
        let header = BlockHeader {
            magic_start0: MAGIC_START0,
            magic_start1: MAGIC_START1,
            flags: self.flags.bits(),
            target_addr: self.target_addr,
            payload_size: self.payload_size,
            block_index: self.block_index,
            block_count: self.block_count,
            family_id: self.family_id,
        };

        let mut frame = [0u8; BLOCK_SIZE];
        frame[..HEADER_SIZE].copy_from_slice(bytes_of(&header));
        frame[HEADER_SIZE..FOOTER_OFFSET].copy_from_slice(&self.data);
        frame[FOOTER_OFFSET..].copy_from_slice(bytes_of(&MAGIC_END));
        frame
    }

    /// The meaningful prefix of the data area.
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.payload_size as usize]
    }

    pub fn has_family_id(&self) -> bool {
        self.flags.contains(BlockFlags::FAMILY_ID_PRESENT)
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("flags", &self.flags)
            .field("target_addr", &format_args!("{:#010x}", self.target_addr))
            .field("payload_size", &self.payload_size)
            .field("block_index", &self.block_index)
            .field("block_count", &self.block_count)
            .field("family_id", &format_args!("{:#010x}", self.family_id))
            .finish_non_exhaustive()
    }
}
