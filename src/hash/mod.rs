// 名前ハッシュモジュール
pub mod davies_meyer;

pub use davies_meyer::gf_dm_hash;

use crate::constants::RSYNC_NAME_PATTERN;
use regex::Regex;

/// 対象ファイルシステムと同じ規則でファイル名をハッシュ化する
///
/// 対象システムはハッシュ前に名前のmungeを行う: rsyncの一時ファイル名
/// (`.name.XXXXXX`) は最終的な名前と同じサブボリュームに配置されるよう、
/// 中央部分だけをハッシュ化する。mungeはデフォルトで有効。
pub struct NameHasher {
    /// mungeに使う正規表現。Noneなら名前をそのままハッシュ化する
    rsync_regex: Option<Regex>,
}

impl NameHasher {
    /// デフォルトのmungeパターンを持つハッシャを作成
    pub fn new() -> Self {
        // 定数パターンのコンパイルは失敗しない
        let regex = Regex::new(RSYNC_NAME_PATTERN).expect("default rsync pattern compiles");
        Self {
            rsync_regex: Some(regex),
        }
    }

    /// mungeを行わないハッシャを作成
    ///
    /// munge無効で動作しているボリュームの検証に使う。
    pub fn literal() -> Self {
        Self { rsync_regex: None }
    }

    /// パターンを指定してハッシャを作成
    ///
    /// # Arguments
    /// * `pattern` - 第1キャプチャグループをハッシュ対象とする正規表現
    pub fn with_pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            rsync_regex: Some(Regex::new(pattern)?),
        })
    }

    /// 名前のハッシュ値を計算
    ///
    /// # Arguments
    /// * `name` - ファイル名 (パス区切りを含まない最終コンポーネント)
    ///
    /// # Returns
    /// 32ビットのハッシュ値
    pub fn hash_name(&self, name: &str) -> u32 {
        gf_dm_hash(self.munged(name).as_bytes())
    }

    /// munge適用後の実効名を返す
    pub fn munged<'a>(&self, name: &'a str) -> &'a str {
        if let Some(regex) = &self.rsync_regex {
            if let Some(stem) = regex.captures(name).and_then(|caps| caps.get(1)) {
                tracing::trace!("name {} munged to {}", name, stem.as_str());
                return stem.as_str();
            }
        }
        name
    }
}

impl Default for NameHasher {
    fn default() -> Self {
        Self::new()
    }
}
