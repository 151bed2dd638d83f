//! Synthesis of erase blocks
//!
//! An erase block is an ordinary UF2 block whose payload is a fill pattern,
//! usually `0xFF` to match NOR flash in its erased state. Writing such
//! blocks over a region is how a UF2 image clears data the device stored
//! there previously.

use crate::{
    block::{Block, BlockFlags, DATA_AREA_SIZE, PAYLOAD_CAPACITY},
    error::Error,
};

/// A flash region aligned to whole payload-sized pages.
///
/// The constructor enforces that the length is a positive multiple of the
/// 256-byte payload capacity and that the region fits the 32-bit address
/// space, so a valid `AddressRange` always divides into whole blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    base: u32,
    length: u32,
}

impl AddressRange {
    pub fn new(base: u32, length: u32) -> Result<Self, Error> {
        if length == 0 || length % PAYLOAD_CAPACITY as u32 != 0 {
            return Err(Error::MisalignedRange { base, length });
        }
        if base.checked_add(length - 1).is_none() {
            return Err(Error::AddressOverflow { base, length });
        }

        Ok(Self { base, length })
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    /// Number of blocks needed to cover the region.
    pub fn block_count(&self) -> u32 {
        self.length / PAYLOAD_CAPACITY as u32
    }
}

/// Generate the blocks covering `region`, one per 256-byte page in ascending
/// address order, every payload byte equal to `fill_byte`.
///
/// `first_index` and `block_count` are placeholders that keep the blocks
/// structurally valid on their own; the owning image's
/// [`renumber`](crate::Image::renumber) pass is the authoritative numbering.
/// Pure: identical arguments yield bit-identical blocks.
pub fn erase_blocks(
    region: &AddressRange,
    fill_byte: u8,
    family_id: u32,
    first_index: u32,
    block_count: u32,
) -> Vec<Block> {
    let mut data = [0u8; DATA_AREA_SIZE];
    data[..PAYLOAD_CAPACITY].fill(fill_byte);

    (0..region.block_count())
        .map(|i| Block {
            flags: BlockFlags::FAMILY_ID_PRESENT,
            target_addr: region.base() + i * PAYLOAD_CAPACITY as u32,
            payload_size: PAYLOAD_CAPACITY as u32,
            block_index: first_index + i,
            block_count,
            family_id,
            data,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn covers_range_without_gaps_or_overlaps() {
        let region = AddressRange::new(0x1000_0000, 0x1000).unwrap();
        let blocks = erase_blocks(&region, 0xFF, 0xe48b_ff56, 10, 26);

        assert_eq!(blocks.len(), 16);
        for (i, block) in blocks.iter().enumerate() {
            assert_eq!(block.target_addr, 0x1000_0000 + (i * 256) as u32);
            assert_eq!(block.payload_size, 256);
            assert_eq!(block.block_index, 10 + i as u32);
            assert_eq!(block.block_count, 26);
            assert_eq!(block.family_id, 0xe48b_ff56);
            assert!(block.has_family_id());
            assert!(block.payload().iter().all(|&byte| byte == 0xFF));
        }
    }

    #[test]
    fn is_deterministic() {
        let region = AddressRange::new(0x2000_0000, 0x200).unwrap();

        let first = erase_blocks(&region, 0x00, 0xada5_2840, 0, 2);
        let second = erase_blocks(&region, 0x00, 0xada5_2840, 0, 2);

        assert_eq!(first, second);
    }

    #[test]
    fn rejects_misaligned_length() {
        let err = AddressRange::new(0x1000_0000, 100).unwrap_err();
        assert!(matches!(
            err,
            Error::MisalignedRange {
                base: 0x1000_0000,
                length: 100
            }
        ));
    }

    #[test]
    fn rejects_empty_range() {
        let err = AddressRange::new(0x1000_0000, 0).unwrap_err();
        assert!(matches!(err, Error::MisalignedRange { length: 0, .. }));
    }

    #[test]
    fn rejects_wrapping_range() {
        let err = AddressRange::new(u32::MAX - 255, 512).unwrap_err();
        assert!(matches!(err, Error::AddressOverflow { .. }));
    }

    #[test]
    fn accepts_range_ending_at_address_space_top() {
        let region = AddressRange::new(u32::MAX - 511, 512).unwrap();
        assert_eq!(region.block_count(), 2);
    }
}
