//! TaPoS reference-block data

use bytes::{BufMut, BytesMut};
use echo_codec::Encode;

use crate::{DynamicGlobalProperties, TypesError};

/// Default distance between the head block time and transaction expiration
pub const DEFAULT_EXPIRATION_WINDOW_SECS: u32 = 40;

/// Reference-block fingerprint binding a transaction to a recent block.
///
/// A stale or mismatched pair is rejected by the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockData {
    /// Low 16 bits of the reference block number
    pub ref_block_num: u16,
    /// Bytes 4..8 of the reference block id, little-endian
    pub ref_block_prefix: u32,
    /// Expiration as unix seconds
    pub relative_expiration: u32,
}

impl BlockData {
    /// Create from raw parts
    pub const fn new(ref_block_num: u16, ref_block_prefix: u32, relative_expiration: u32) -> Self {
        Self {
            ref_block_num,
            ref_block_prefix,
            relative_expiration,
        }
    }

    /// Derive from head block state
    pub fn from_head(
        head_block_number: u64,
        head_block_id: &str,
        head_block_time: u32,
        window_secs: u32,
    ) -> Result<Self, TypesError> {
        Ok(Self {
            ref_block_num: Self::ref_block_num_of(head_block_number),
            ref_block_prefix: Self::ref_block_prefix_of(head_block_id)?,
            relative_expiration: head_block_time.saturating_add(window_secs),
        })
    }

    /// Derive from the dynamic global properties object
    pub fn from_properties(
        props: &DynamicGlobalProperties,
        window_secs: u32,
    ) -> Result<Self, TypesError> {
        Self::from_head(
            props.head_block_number,
            &props.head_block_id,
            props.time_secs()?,
            window_secs,
        )
    }

    /// `number & 0xFFFF`
    pub fn ref_block_num_of(head_block_number: u64) -> u16 {
        (head_block_number & 0xFFFF) as u16
    }

    /// Hex characters 8..16 of the block id, read as a little-endian u32
    pub fn ref_block_prefix_of(head_block_id: &str) -> Result<u32, TypesError> {
        let hex_part = head_block_id
            .get(8..16)
            .ok_or_else(|| TypesError::InvalidBlockId(head_block_id.to_string()))?;
        let mut bytes = [0u8; 4];
        hex::decode_to_slice(hex_part, &mut bytes)
            .map_err(|e| TypesError::InvalidBlockId(format!("{head_block_id}: {e}")))?;
        Ok(u32::from_le_bytes(bytes))
    }
}

impl Encode for BlockData {
    fn encode_to(&self, out: &mut BytesMut) {
        out.put_u16_le(self.ref_block_num);
        out.put_u32_le(self.ref_block_prefix);
        out.put_u32_le(self.relative_expiration);
    }
}
