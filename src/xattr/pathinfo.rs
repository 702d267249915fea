//! Parser for the `trusted.glusterfs.pathinfo` attribute
//!
//! The mount point reports every physical location backing a path as a
//! parenthesized listing, e.g.
//!
//! ```text
//! (<DISTRIBUTE:vol-dht> (<REPLICATE:vol-replicate-0>
//!   <POSIX(/bricks/brick1/b):server1:/bricks/brick1/b/dir/file>
//!   <POSIX(/bricks/brick2/b):server2:/bricks/brick2/b/dir/file>))
//! ```
//!
//! Only the `<POSIX(...):host:path>` leaves matter for presence checks.

use regex::Regex;
use std::sync::OnceLock;

use super::XattrError;
use crate::layout::BrickId;

fn posix_segment() -> &'static Regex {
    static SEGMENT: OnceLock<Regex> = OnceLock::new();
    SEGMENT.get_or_init(|| {
        // host names cannot contain ':' or '>', brick paths cannot contain '>'
        Regex::new(r"<POSIX\([^)]*\):([^:>]+):([^>]+)>").expect("posix segment pattern compiles")
    })
}

/// Extract the physical `(host, path)` locations from a pathinfo value
///
/// # Returns
/// The locations in listing order, or `EmptyPathinfo` when the value
/// contains no POSIX leaves (e.g. it was fetched from a brick instead of
/// the mount point).
pub fn parse_pathinfo(value: &str) -> Result<Vec<BrickId>, XattrError> {
    let bricks: Vec<BrickId> = posix_segment()
        .captures_iter(value)
        .map(|caps| BrickId::new(&caps[1], &caps[2]))
        .collect();
    if bricks.is_empty() {
        return Err(XattrError::EmptyPathinfo);
    }
    Ok(bricks)
}
