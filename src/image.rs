//! In-memory model of a whole UF2 image
//!
//! An [`Image`] owns an ordered, non-empty sequence of blocks. The sequence
//! order defines the on-disk order; pre-existing content is not required to
//! be address-sorted. Renumbering is global: `block_index` and `block_count`
//! are cross-block properties, so every structural edit is followed by one
//! O(n) rewrite pass over the whole sequence.

use log::debug;

use crate::{
    block::{Block, BLOCK_SIZE},
    erase::{erase_blocks, AddressRange},
    error::Error,
    family::Family,
};

/// A decoded UF2 image.
#[derive(Debug, Clone)]
pub struct Image {
    blocks: Vec<Block>,
}

impl Image {
    /// Decode a whole image from its on-disk representation.
    ///
    /// The input must be a positive multiple of 512 bytes; a dangling
    /// partial frame fails with [`Error::TruncatedImage`] rather than being
    /// dropped or padded. The first per-block decode failure aborts the load
    /// and carries that block's position.
    ///
    /// The declared `block_index`/`block_count` fields of the input are not
    /// required to be consistent: hand-edited or malformed counters are
    /// overwritten by [`Image::renumber`] before anything is emitted.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.is_empty() || data.len() % BLOCK_SIZE != 0 {
            return Err(Error::TruncatedImage { len: data.len() });
        }

        let blocks = data
            .chunks_exact(BLOCK_SIZE)
            .enumerate()
            .map(|(index, frame)| Block::decode(frame, index))
            .collect::<Result<Vec<_>, Error>>()?;

        debug!("decoded {} blocks", blocks.len());
        Ok(Self { blocks })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Family ID of the last family-tagged block, if any.
    pub fn family_id(&self) -> Option<u32> {
        self.blocks
            .iter()
            .rev()
            .find(|block| block.has_family_id())
            .map(|block| block.family_id)
    }

    /// Append blocks at the end of the sequence, preserving their relative
    /// order.
    ///
    /// Appending alone does not renumber, so several appends can be batched
    /// before a single [`Image::renumber`] pass. Serialization renumbers
    /// unconditionally, so a forgotten pass cannot produce an inconsistent
    /// file.
    pub fn append<I>(&mut self, blocks: I)
    where
        I: IntoIterator<Item = Block>,
    {
        self.blocks.extend(blocks);
    }

    /// Rewrite every block's `block_index` to its position and `block_count`
    /// to the sequence length. Idempotent.
    pub fn renumber(&mut self) {
        let count = self.blocks.len() as u32;
        for (index, block) in self.blocks.iter_mut().enumerate() {
            block.block_index = index as u32;
            block.block_count = count;
        }
    }

    /// Serialize to the on-disk representation: every block encoded in
    /// sequence order and concatenated, `512 * len()` bytes in total.
    ///
    /// Renumbers first, so the output is internally consistent no matter
    /// which edits preceded it.
    pub fn to_bytes(&mut self) -> Vec<u8> {
        self.renumber();

        let mut out = Vec::with_capacity(self.blocks.len() * BLOCK_SIZE);
        for block in &self.blocks {
            out.extend_from_slice(&block.encode());
        }
        out
    }

    /// Append erase blocks covering `region`, then renumber.
    ///
    /// The new blocks are tagged with the family ID of the last
    /// family-tagged block already in the image, falling back to
    /// [`Family::default`] when the image carries no recognizable tag.
    /// Returns the number of blocks added.
    pub fn extend_with_erase_region(&mut self, region: &AddressRange, fill_byte: u8) -> usize {
        let family_id = self.family_id().unwrap_or_else(|| Family::default().id());
        self.extend_with_erase_blocks(region, fill_byte, family_id)
    }

    /// Same as [`Image::extend_with_erase_region`], with an explicit family
    /// ID for the new blocks.
    pub fn extend_with_erase_blocks(
        &mut self,
        region: &AddressRange,
        fill_byte: u8,
        family_id: u32,
    ) -> usize {
        let first_index = self.blocks.len() as u32;
        let block_count = first_index + region.block_count();

        let blocks = erase_blocks(region, fill_byte, family_id, first_index, block_count);
        let added = blocks.len();
        debug!(
            "appending {added} erase blocks at {:#010x}, fill {fill_byte:#04x}, family {family_id:#010x}",
            region.base()
        );

        self.append(blocks);
        self.renumber();
        added
    }
}
