//! Global constants for DHTCheck
//!
//! This module centralizes commonly used constants across the codebase
//! to improve maintainability and reduce duplication.

/// First value of the hash space partitioned across subvolumes.
pub const HASH_SPACE_START: u32 = 0;

/// Last value of the hash space (inclusive).
///
/// Directory layouts must cover `[HASH_SPACE_START, HASH_SPACE_END]`
/// exactly, with no gaps and no overlaps.
pub const HASH_SPACE_END: u32 = u32::MAX;

/// Default attempt bound for alternate-name discovery
///
/// `find_new_hashed` enumerates at most this many candidate names before
/// reporting exhaustion. A single-subvolume directory can never yield a
/// differing-hash name, so the search must be bounded.
pub const DEFAULT_RENAME_ATTEMPTS: u32 = 1000;

/// Extended attribute carrying a directory's hash range on each brick
pub const DHT_XATTR_NAME: &str = "trusted.glusterfs.dht";

/// Extended attribute listing the physical locations backing a path
pub const PATHINFO_XATTR_NAME: &str = "trusted.glusterfs.pathinfo";

/// Extended attribute naming the subvolume a linkto file points at
pub const LINKTO_XATTR_NAME: &str = "trusted.glusterfs.dht.linkto";

/// Extended attribute carrying the filesystem-wide unique entry id
pub const GFID_XATTR_NAME: &str = "trusted.gfid";

/// Permission bits marking a linkto placeholder file (`---------T`)
///
/// A rename that changes a name's hash target leaves a file with exactly
/// these mode bits on the newly hashed subvolume.
pub const LINKTO_FILE_MODE: u32 = 0o1000;

/// Name munge applied before hashing (same pattern as the translator's
/// rsync-hash-regex default)
///
/// Names like `.foo.Xy12z` hash as `foo`, so rsync temporaries land on
/// the same subvolume as the final name.
pub const RSYNC_NAME_PATTERN: &str = r"^\.(.+)\.[^.]+$";
