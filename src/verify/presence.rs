use std::collections::HashMap;

use crate::hash::NameHasher;
use crate::layout::{BrickId, Layout, LayoutResult};

/// 1ブリック分の配置違反
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceViolation {
    /// 違反したブリック
    pub brick: BrickId,

    /// 期待した存在状態
    pub expected: bool,

    /// 観測した存在状態。呼び出し側が観測を提供しなかった場合は `None`
    pub observed: Option<bool>,
}

/// 配置検査の結果
///
/// 新規作成されたファイルはリバランスやlinktoファイル作成が起きるまで
/// ハッシュ先ブリックにのみ存在する、という不変条件の検査結果。
/// 不一致はエラーではなくデータとして返し、呼び出し側が診断メッセージを
/// 組み立てる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceReport {
    /// ハッシュ先として期待したブリック
    pub expected: BrickId,

    /// 名前のハッシュ値
    pub hash: u32,

    /// 期待と観測が食い違ったブリック
    pub violations: Vec<PresenceViolation>,
}

impl PresenceReport {
    /// 全ブリックが期待通りだったか
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }
}

/// ファイルがハッシュ先ブリックにのみ存在することを検査
///
/// # Arguments
/// * `layout` - 親ディレクトリのレイアウト
/// * `hasher` - 名前ハッシャ
/// * `parent` - 親ディレクトリのパス
/// * `name` - ファイル名
/// * `presence` - ブリックごとの観測した存在状態
///
/// # Returns
/// 解決に失敗した場合 (不正な名前、不完全なレイアウト) はエラー。
/// 解決できた場合は違反の有無によらず `PresenceReport`
pub fn check_presence(
    layout: &Layout,
    hasher: &NameHasher,
    parent: &str,
    name: &str,
    presence: &HashMap<BrickId, bool>,
) -> LayoutResult<PresenceReport> {
    let resolution = layout.find_hashed_subvol(hasher, parent, name)?;
    let expected_brick = resolution.brick.brick.clone();

    let mut violations = Vec::new();
    for (index, entry) in layout.entries().iter().enumerate() {
        let expected = index == resolution.subvol_index;
        let observed = presence.get(&entry.brick).copied();
        if observed != Some(expected) {
            violations.push(PresenceViolation {
                brick: entry.brick.clone(),
                expected,
                observed,
            });
        }
    }

    if !violations.is_empty() {
        tracing::warn!(
            "{}/{} is misplaced: expected only on {} ({} violations)",
            parent,
            name,
            expected_brick,
            violations.len()
        );
    }

    Ok(PresenceReport {
        expected: expected_brick,
        hash: resolution.hash,
        violations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{BrickRange, HashRange, LayoutError};

    fn brick(n: usize) -> BrickId {
        BrickId::new(format!("server{}", n), format!("/bricks/brick{}/b", n))
    }

    fn quartile_layout() -> Layout {
        Layout::new(
            (0..4)
                .map(|i| {
                    let start = (i as u32) << 30;
                    let end = if i == 3 { u32::MAX } else { ((i as u32 + 1) << 30) - 1 };
                    BrickRange::new(brick(i), HashRange::new(start, end))
                })
                .collect(),
        )
    }

    fn presence_map(present_on: &[usize]) -> HashMap<BrickId, bool> {
        (0..4).map(|i| (brick(i), present_on.contains(&i))).collect()
    }

    #[test]
    fn test_file_only_on_hashed_brick_passes() {
        // file1は第3四分位 (B2) にハッシュされる
        let layout = quartile_layout();
        let hasher = NameHasher::new();
        let report =
            check_presence(&layout, &hasher, "/", "file1", &presence_map(&[2])).unwrap();
        assert!(report.is_ok());
        assert_eq!(report.expected, brick(2));
        assert_eq!(report.hash, 0xa787_fa82);
    }

    #[test]
    fn test_file_on_wrong_brick_is_reported() {
        let layout = quartile_layout();
        let hasher = NameHasher::new();
        let report =
            check_presence(&layout, &hasher, "/", "file1", &presence_map(&[1])).unwrap();
        assert!(!report.is_ok());
        assert_eq!(
            report.violations,
            vec![
                PresenceViolation {
                    brick: brick(1),
                    expected: false,
                    observed: Some(true),
                },
                PresenceViolation {
                    brick: brick(2),
                    expected: true,
                    observed: Some(false),
                },
            ]
        );
    }

    #[test]
    fn test_stale_copy_alongside_hashed_brick() {
        let layout = quartile_layout();
        let hasher = NameHasher::new();
        let report =
            check_presence(&layout, &hasher, "/", "file1", &presence_map(&[2, 3])).unwrap();
        assert!(!report.is_ok());
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].brick, brick(3));
    }

    #[test]
    fn test_missing_observation_is_a_violation() {
        let layout = quartile_layout();
        let hasher = NameHasher::new();
        let mut presence = presence_map(&[2]);
        presence.remove(&brick(0));
        let report = check_presence(&layout, &hasher, "/", "file1", &presence).unwrap();
        assert!(!report.is_ok());
        assert_eq!(report.violations[0].observed, None);
    }

    #[test]
    fn test_incomplete_layout_propagates_not_covered() {
        // 第3四分位を欠いたレイアウトではfile1を解決できない
        let layout = Layout::new(vec![
            BrickRange::new(brick(0), HashRange::new(0, 0x3fff_ffff)),
            BrickRange::new(brick(1), HashRange::new(0x4000_0000, 0x7fff_ffff)),
            BrickRange::new(brick(3), HashRange::new(0xc000_0000, u32::MAX)),
        ]);
        let hasher = NameHasher::new();
        let err =
            check_presence(&layout, &hasher, "/", "file1", &HashMap::new()).unwrap_err();
        assert_eq!(err, LayoutError::NotCovered { hash: 0xa787_fa82 });
    }
}
