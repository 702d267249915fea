//! Decoders for the extended attributes the filesystem exposes
//!
//! Callers fetch attribute values from bricks and the mount point
//! (`getfattr` over remote execution); everything here is pure parsing.

pub mod dht_layout;
pub mod pathinfo;

pub use dht_layout::{
    layout_from_records, DhtLayoutRecord, DHT_HASH_TYPE_DM, DHT_LAYOUT_RECORD_LEN,
};
pub use pathinfo::parse_pathinfo;

use crate::constants::LINKTO_FILE_MODE;

/// Attribute decoding errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XattrError {
    #[error("Unexpected attribute length: expected {expected} bytes, got {actual}")]
    BadLength { expected: usize, actual: usize },

    #[error("Malformed hex value: {0}")]
    BadHex(String),

    #[error("No brick locations found in pathinfo value")]
    EmptyPathinfo,

    #[error("Linkto value is not valid UTF-8")]
    BadLinkto,
}

/// Decode a `trusted.glusterfs.dht.linkto` value
///
/// The attribute stores the name of the subvolume actually holding the
/// data, NUL-terminated.
pub fn parse_linkto(bytes: &[u8]) -> Result<String, XattrError> {
    let end = bytes
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(bytes.len());
    let name = std::str::from_utf8(&bytes[..end]).map_err(|_| XattrError::BadLinkto)?;
    Ok(name.to_string())
}

/// Whether a file mode marks a linkto placeholder
///
/// A rename that moves a name to a new hashed subvolume leaves a file
/// with mode `---------T` (01000) pointing at the data's real location.
pub fn is_linkto_mode(mode: u32) -> bool {
    mode & 0o7777 == LINKTO_FILE_MODE
}
