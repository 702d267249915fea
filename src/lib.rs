//! DHTCheck - Placement Verification for DHT-Based Distributed Filesystems
//!
//! DHTCheck predicts and validates where a consistent-hashing translator
//! places files and directories across storage bricks. It is the pure
//! half of a cluster verification harness: callers fetch layout and
//! metadata facts from a live volume (extended attributes, stat output,
//! presence listings) and this crate decides what those facts must look
//! like. It features:
//!
//! - **Bit-Exact Name Hashing**: The Davies-Meyer hash the target
//!   filesystem uses for placement, including its rsync-temporary name
//!   munging, so predicted and observed locations always agree
//! - **Layout Resolution**: Sorted interval index over a directory's
//!   per-brick hash ranges, resolving any name to its hashed subvolume
//! - **Layout Validation**: Completeness checking of a directory layout
//!   (gaps, overlaps, duplicate bricks, unassigned bricks)
//! - **Cross-Brick Verification**: Presence-on-hashed-brick-only checks,
//!   gfid agreement, and mount-versus-brick attribute comparison
//! - **Attribute Decoding**: The on-brick layout record, pathinfo
//!   listings, and linkto markers
//!
//! # Architecture
//!
//! DHTCheck consists of several key components:
//!
//! - **Hashing** ([`hash`]): The placement hash and name munging rules
//! - **Layout** ([`layout`]): Layout data model, hashed-subvolume
//!   resolution, alternate-name discovery, and completeness validation
//! - **Attributes** ([`xattr`]): Decoders for the extended attributes
//!   bricks and mount points expose
//! - **Verification** ([`verify`]): Pure comparison of fetched facts
//!   against predicted placement
//! - **Waiting** ([`wait`]): Bounded polling for cluster-side work to
//!   settle before assertions run
//!
//! All operations are pure and synchronous; the crate performs no remote
//! execution and never mutates cluster state.
//!
//! # Example
//!
//! ```rust
//! use dhtcheck::hash::NameHasher;
//! use dhtcheck::layout::{BrickId, BrickRange, HashRange, Layout};
//!
//! // Four equal slices of the hash space, as fetched from four bricks
//! let layout = Layout::new(
//!     (0u32..4)
//!         .map(|i| {
//!             let start = i << 30;
//!             let end = if i == 3 { u32::MAX } else { ((i + 1) << 30) - 1 };
//!             BrickRange::new(
//!                 BrickId::new(format!("server{}", i), "/bricks/b"),
//!                 HashRange::new(start, end),
//!             )
//!         })
//!         .collect(),
//! );
//!
//! assert!(layout.validate().is_complete());
//!
//! let hasher = NameHasher::new();
//! let resolution = layout.find_hashed_subvol(&hasher, "/", "file1").unwrap();
//! assert_eq!(resolution.subvol_index, 2);
//! ```

pub mod config;
pub mod constants;
pub mod hash;
pub mod layout;
pub mod logging;
pub mod verify;
pub mod wait;
pub mod xattr;
