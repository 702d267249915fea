// ブリック横断の整合性検査モジュール
pub mod attrs;
pub mod presence;

pub use attrs::{attrs_match, gfid_report, AttrReport, GfidReport};
pub use presence::{check_presence, PresenceReport, PresenceViolation};
