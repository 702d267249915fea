use super::types::{BrickRange, Layout};
use super::{LayoutError, LayoutResult};
use crate::hash::NameHasher;
use tracing::instrument;

/// 名前のハッシュ値を計算
///
/// 親パスはどのディレクトリのレイアウトを参照するかを決めるだけで、
/// ハッシュ値には入らない (対象システムは最終コンポーネントのみを
/// ハッシュ化する)。ここでは引数の妥当性だけを確認する。
///
/// # Arguments
/// * `hasher` - 名前ハッシャ
/// * `parent` - 親ディレクトリのパス (非空)
/// * `name` - ファイル名 (非空、`/` を含まない)
pub fn compute_name_hash(hasher: &NameHasher, parent: &str, name: &str) -> LayoutResult<u32> {
    if parent.is_empty() {
        return Err(LayoutError::InvalidArgument(
            "parent path must not be empty".to_string(),
        ));
    }
    if name.is_empty() {
        return Err(LayoutError::InvalidArgument(
            "name must not be empty".to_string(),
        ));
    }
    if name.contains('/') {
        return Err(LayoutError::InvalidArgument(format!(
            "name must not contain a path separator: {}",
            name
        )));
    }
    Ok(hasher.hash_name(name))
}

/// ハッシュ先サブボリュームの解決結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// ハッシュ先のスロット
    pub brick: &'a BrickRange,

    /// レイアウト内でのスロット位置 (サブボリューム番号)
    pub subvol_index: usize,

    /// 解決に使ったハッシュ値
    pub hash: u32,

    /// 同じハッシュ値を含む他のスロット位置
    ///
    /// 正しいレイアウトでは常に空。非空なら区間が重なっている。
    pub also_matches: Vec<usize>,
}

impl Resolution<'_> {
    /// 重なりなく一意に解決できたか
    pub fn is_unambiguous(&self) -> bool {
        self.also_matches.is_empty()
    }
}

/// 別サブボリュームにハッシュされる代替名の発見結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHashed<'a> {
    /// 発見した名前
    pub new_name: String,

    /// 代替名のハッシュ先スロット
    pub brick: &'a BrickRange,

    /// レイアウト内でのスロット位置
    pub subvol_index: usize,

    /// 代替名のハッシュ値
    pub hash: u32,
}

impl Layout {
    /// ハッシュ値を含むスロットを解決
    ///
    /// # Returns
    /// どの区間にも含まれない場合は `None`。複数の区間に含まれる場合は
    /// 取得順で最初のスロットを返し、残りを `also_matches` に載せる
    pub fn resolve_hash(&self, hash: u32) -> Option<Resolution<'_>> {
        let mut matches = self.slots_containing(hash);
        if matches.is_empty() {
            return None;
        }
        let subvol_index = matches.remove(0);
        if !matches.is_empty() {
            tracing::warn!(
                "hash 0x{:08x} is claimed by {} slots, layout has overlaps",
                hash,
                matches.len() + 1
            );
        }
        Some(Resolution {
            brick: &self.entries()[subvol_index],
            subvol_index,
            hash,
            also_matches: matches,
        })
    }

    /// 名前のハッシュ先サブボリュームを解決
    ///
    /// # Arguments
    /// * `hasher` - 名前ハッシャ
    /// * `parent` - 親ディレクトリのパス
    /// * `name` - ファイル名
    ///
    /// # Returns
    /// どの区間にも含まれない場合は `NotCovered` (不完全なレイアウトの兆候)
    #[instrument(level = "trace", name = "layout_resolve", skip(self, hasher), fields(name = %name))]
    pub fn find_hashed_subvol(
        &self,
        hasher: &NameHasher,
        parent: &str,
        name: &str,
    ) -> LayoutResult<Resolution<'_>> {
        let hash = compute_name_hash(hasher, parent, name)?;
        self.resolve_hash(hash)
            .ok_or(LayoutError::NotCovered { hash })
    }

    /// 元の名前と異なるサブボリュームにハッシュされる代替名を探す
    ///
    /// サブボリューム間リネームの検証に使う。`{base_name}{i}` 形式の
    /// 候補を順に試し、最初に別サブボリュームへ解決された候補を返す。
    /// 不完全なレイアウトでどの区間にも入らない候補は読み飛ばす。
    ///
    /// # Arguments
    /// * `max_attempts` - 候補数の上限 (単一サブボリュームのディレクトリでは
    ///   どの候補も同じ場所に解決されるため、必ず有限で打ち切る)
    ///
    /// # Returns
    /// 上限内に見つからなければ `Exhausted`
    #[instrument(level = "trace", name = "layout_find_new_hashed", skip(self, hasher), fields(base = %base_name))]
    pub fn find_new_hashed(
        &self,
        hasher: &NameHasher,
        parent: &str,
        base_name: &str,
        max_attempts: u32,
    ) -> LayoutResult<NewHashed<'_>> {
        if max_attempts == 0 {
            return Err(LayoutError::InvalidArgument(
                "max_attempts must be at least 1".to_string(),
            ));
        }

        let original = self.find_hashed_subvol(hasher, parent, base_name)?;

        for attempt in 1..=max_attempts {
            let candidate = format!("{}{}", base_name, attempt);
            let hash = compute_name_hash(hasher, parent, &candidate)?;
            match self.resolve_hash(hash) {
                Some(resolution) if resolution.subvol_index != original.subvol_index => {
                    tracing::debug!(
                        "{} resolves to subvol {} (original {} on subvol {})",
                        candidate,
                        resolution.subvol_index,
                        base_name,
                        original.subvol_index
                    );
                    return Ok(NewHashed {
                        new_name: candidate,
                        brick: &self.entries()[resolution.subvol_index],
                        subvol_index: resolution.subvol_index,
                        hash,
                    });
                }
                _ => {}
            }
        }

        Err(LayoutError::Exhausted {
            attempts: max_attempts,
        })
    }
}
