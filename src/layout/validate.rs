use super::types::{BrickId, HashRange, Layout};
use crate::constants::{HASH_SPACE_END, HASH_SPACE_START};
use std::collections::HashMap;

/// レイアウト検証の結果
///
/// エラー型ではなく診断用の構造化データ。呼び出し側 (テストのアサーション)
/// が合否判定と失敗メッセージの組み立てに使う。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// どのスロットも覆っていないハッシュ区間
    pub gaps: Vec<HashRange>,

    /// 区間が重なっているブリックの組
    pub overlaps: Vec<(BrickId, BrickId)>,

    /// 区間未割り当てのブリック (検証の走査からは除外)
    ///
    /// オフライン等で区間を持たないブリックと、ハッシュ空間の穴とを
    /// 呼び出し側が区別できるよう別に記録する。
    pub unassigned: Vec<BrickId>,

    /// レイアウトに複数回現れたブリック
    pub duplicates: Vec<BrickId>,
}

impl ValidationReport {
    /// レイアウトが完全か
    ///
    /// 全域を隙間なく・重なりなく・重複登録なく覆っている場合のみ真。
    /// 未割り当てブリックの存在は完全性を損なわない。
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty() && self.overlaps.is_empty() && self.duplicates.is_empty()
    }
}

impl Layout {
    /// レイアウトの完全性を検証
    ///
    /// 割り当て済み区間を開始値順に走査し、カーソル (次に覆われるべき値)
    /// を進めながら隙間と重なりを記録する。
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        let mut seen: HashMap<&BrickId, usize> = HashMap::new();
        for entry in self.entries() {
            let count = seen.entry(&entry.brick).or_insert(0);
            *count += 1;
            if *count == 2 {
                report.duplicates.push(entry.brick.clone());
            }
            if entry.range.is_none() {
                report.unassigned.push(entry.brick.clone());
            }
        }

        // カーソルは end + 1 がu32を超えるためu64で持つ
        let mut cursor = u64::from(HASH_SPACE_START);
        // カーソル位置まで覆った (endが最大の) スロット
        let mut furthest: Option<usize> = None;

        for &(start, end, index) in self.sorted_ranges() {
            if u64::from(start) > cursor {
                report.gaps.push(HashRange {
                    start: cursor as u32,
                    end: start - 1,
                });
            } else if u64::from(start) < cursor {
                if let Some(previous) = furthest {
                    report.overlaps.push((
                        self.entries()[previous].brick.clone(),
                        self.entries()[index].brick.clone(),
                    ));
                }
            }

            let next = u64::from(end) + 1;
            if next > cursor {
                cursor = next;
                furthest = Some(index);
            }
        }

        if cursor <= u64::from(HASH_SPACE_END) {
            report.gaps.push(HashRange {
                start: cursor as u32,
                end: HASH_SPACE_END,
            });
        }

        if !report.is_complete() {
            tracing::warn!(
                "layout incomplete: {} gaps, {} overlaps, {} duplicates",
                report.gaps.len(),
                report.overlaps.len(),
                report.duplicates.len()
            );
        }
        report
    }
}
