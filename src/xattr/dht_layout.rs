//! Decoder for the on-brick directory layout record
//!
//! Every brick stores its slice of a directory's hash space in the
//! `trusted.glusterfs.dht` extended attribute: four 32-bit big-endian
//! fields (entry count, hash scheme, range start, range end).

use zerocopy::byteorder::{BigEndian, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::XattrError;
use crate::layout::{BrickId, BrickRange, HashRange, Layout};

/// Size of the encoded layout record in bytes
pub const DHT_LAYOUT_RECORD_LEN: usize = 16;

/// Hash scheme tag for the Davies-Meyer hash (the only scheme the
/// translator writes)
pub const DHT_HASH_TYPE_DM: u32 = 1;

/// On-brick `trusted.glusterfs.dht` record
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct DhtLayoutRecord {
    /// Number of range entries in the record (always 1 on disk)
    count: U32<BigEndian>,
    /// Hash scheme used to place names into the range
    hash_type: U32<BigEndian>,
    /// First hash value assigned to this brick (inclusive)
    start: U32<BigEndian>,
    /// Last hash value assigned to this brick (inclusive)
    end: U32<BigEndian>,
}

impl DhtLayoutRecord {
    /// Build a record for a brick's assigned range
    ///
    /// `None` encodes the unassigned state as an all-zero range, the same
    /// convention the translator uses for bricks without a slice.
    pub fn new(range: Option<HashRange>) -> Self {
        let (start, end) = match range {
            Some(r) => (r.start, r.end),
            None => (0, 0),
        };
        Self {
            count: U32::new(1),
            hash_type: U32::new(DHT_HASH_TYPE_DM),
            start: U32::new(start),
            end: U32::new(end),
        }
    }

    /// Decode a raw 16-byte attribute value
    pub fn parse(bytes: &[u8]) -> Result<Self, XattrError> {
        Self::read_from_bytes(bytes).map_err(|_| XattrError::BadLength {
            expected: DHT_LAYOUT_RECORD_LEN,
            actual: bytes.len(),
        })
    }

    /// Decode the `getfattr -e hex` form (`0x` followed by 32 hex digits)
    pub fn parse_hex(value: &str) -> Result<Self, XattrError> {
        let digits = value
            .trim()
            .strip_prefix("0x")
            .ok_or_else(|| XattrError::BadHex(value.to_string()))?;
        if digits.len() != DHT_LAYOUT_RECORD_LEN * 2 {
            return Err(XattrError::BadLength {
                expected: DHT_LAYOUT_RECORD_LEN,
                actual: digits.len() / 2,
            });
        }

        let mut bytes = [0u8; DHT_LAYOUT_RECORD_LEN];
        for (index, byte) in bytes.iter_mut().enumerate() {
            let pair = digits
                .get(index * 2..index * 2 + 2)
                .ok_or_else(|| XattrError::BadHex(value.to_string()))?;
            *byte =
                u8::from_str_radix(pair, 16).map_err(|_| XattrError::BadHex(value.to_string()))?;
        }
        Self::parse(&bytes)
    }

    /// Number of range entries in the record
    pub fn count(&self) -> u32 {
        self.count.get()
    }

    /// Hash scheme tag
    ///
    /// Schemes other than [`DHT_HASH_TYPE_DM`] are surfaced as-is so
    /// callers can decide whether to reject them.
    pub fn hash_type(&self) -> u32 {
        self.hash_type.get()
    }

    /// The assigned range, or `None` for the all-zero unassigned state
    ///
    /// A record with `start > end` never leaves the translator; it is
    /// treated as unassigned rather than as a malformed attribute so a
    /// corrupt brick does not abort a whole-directory check.
    pub fn hash_range(&self) -> Option<HashRange> {
        let (start, end) = (self.start.get(), self.end.get());
        if start == 0 && end == 0 {
            return None;
        }
        let range = HashRange::new(start, end);
        if range.is_none() {
            tracing::warn!(
                "inverted hash range 0x{:08x}..0x{:08x}, treating brick as unassigned",
                start,
                end
            );
        }
        range
    }

    /// Pair the decoded range with the brick it was fetched from
    pub fn to_brick_range(&self, brick: BrickId) -> BrickRange {
        BrickRange::new(brick, self.hash_range())
    }
}

/// Build a directory layout from per-brick decoded records
///
/// Callers fetch one record per subvolume (from the subvolume's layout
/// brick) and pass them in subvolume order; that order is what
/// resolution reports as the subvolume index.
pub fn layout_from_records<I>(records: I) -> Layout
where
    I: IntoIterator<Item = (BrickId, DhtLayoutRecord)>,
{
    Layout::new(
        records
            .into_iter()
            .map(|(brick, record)| record.to_brick_range(brick))
            .collect(),
    )
}
