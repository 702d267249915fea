// レイアウト解決・検証モジュール
pub mod resolver;
pub mod types;
pub mod validate;

pub use resolver::{compute_name_hash, NewHashed, Resolution};
pub use types::{BrickId, BrickRange, HashRange, Layout, Subvolume};
pub use validate::ValidationReport;

/// レイアウト操作エラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Hash 0x{hash:08x} is not covered by any range")]
    NotCovered { hash: u32 },

    #[error("No differing-hash name found within {attempts} attempts")]
    Exhausted { attempts: u32 },
}

pub type LayoutResult<T> = Result<T, LayoutError>;
