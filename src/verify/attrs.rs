use std::collections::BTreeMap;

use crate::layout::BrickId;

/// gfid一致検査の結果
///
/// ディレクトリは全ブリックに作られ、全ブリックで同じgfidを持つ必要がある。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GfidReport {
    /// 基準にしたブリックとそのgfid (入力が空なら `None`)
    pub reference: Option<(BrickId, String)>,

    /// 基準と異なるgfidを報告したブリック
    pub mismatches: Vec<(BrickId, String)>,
}

impl GfidReport {
    /// 全ブリックのgfidが一致しているか
    ///
    /// 1ブリックしか観測がない場合も一致とみなす。空の入力は不一致。
    pub fn is_consistent(&self) -> bool {
        self.reference.is_some() && self.mismatches.is_empty()
    }
}

/// ブリックごとのgfidを突き合わせる
///
/// # Arguments
/// * `gfids` - ブリックごとの観測したgfid (hex文字列)。`BTreeMap` なので
///   基準ブリックの選択は決定的
pub fn gfid_report(gfids: &BTreeMap<BrickId, String>) -> GfidReport {
    let mut entries = gfids.iter();
    let reference = match entries.next() {
        Some((brick, gfid)) => (brick.clone(), gfid.clone()),
        None => {
            return GfidReport {
                reference: None,
                mismatches: Vec::new(),
            }
        }
    };

    let mismatches: Vec<(BrickId, String)> = entries
        .filter(|(_, gfid)| *gfid != &reference.1)
        .map(|(brick, gfid)| (brick.clone(), gfid.clone()))
        .collect();

    if !mismatches.is_empty() {
        tracing::warn!(
            "gfid differs across bricks: {} bricks disagree with {}",
            mismatches.len(),
            reference.0
        );
    }

    GfidReport {
        reference: Some(reference),
        mismatches,
    }
}

/// マウントとブリック間の属性一致検査の結果
///
/// パーミッションやstatの個別フィールドなど、1属性分の突き合わせ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrReport {
    /// マウントポイントで観測した値
    pub mount_value: String,

    /// マウントと異なる値を報告したブリック
    pub mismatches: Vec<(BrickId, String)>,
}

impl AttrReport {
    /// 全ブリックがマウントと同じ値を報告したか
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// マウントで見える属性値と各ブリックの値を突き合わせる
///
/// # Arguments
/// * `mount_value` - マウントポイントで観測した値
/// * `brick_values` - バックエンドブリックごとの観測値
pub fn attrs_match(mount_value: &str, brick_values: &BTreeMap<BrickId, String>) -> AttrReport {
    let mismatches: Vec<(BrickId, String)> = brick_values
        .iter()
        .filter(|(_, value)| value.as_str() != mount_value)
        .map(|(brick, value)| (brick.clone(), value.clone()))
        .collect();

    if !mismatches.is_empty() {
        tracing::warn!(
            "attribute mismatch: {} bricks differ from mount value {}",
            mismatches.len(),
            mount_value
        );
    }

    AttrReport {
        mount_value: mount_value.to_string(),
        mismatches,
    }
}
