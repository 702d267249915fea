use serde::{Deserialize, Serialize};
use std::fmt;

/// ブリック識別子 (ホスト + バックエンドディレクトリ)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BrickId {
    /// ブリックを提供するホスト
    pub host: String,

    /// ホスト上のバックエンドディレクトリ
    pub path: String,
}

impl BrickId {
    /// 新しいブリック識別子を作成
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
        }
    }

    /// `host:/brick/path` 形式の文字列を分解
    ///
    /// ボリューム情報の出力やpathinfoに現れる表記。最初のコロンで分割する。
    ///
    /// # Returns
    /// ホストとパスが両方非空なら `Some`
    pub fn parse(value: &str) -> Option<Self> {
        let (host, path) = value.split_once(':')?;
        if host.is_empty() || path.is_empty() {
            return None;
        }
        Some(Self::new(host, path))
    }
}

impl fmt::Display for BrickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.path)
    }
}

/// 32ビットハッシュ空間上の閉区間
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashRange {
    /// 区間の先頭 (含む)
    pub start: u32,

    /// 区間の末尾 (含む)
    pub end: u32,
}

impl HashRange {
    /// 新しい区間を作成
    ///
    /// # Returns
    /// `start <= end` なら `Some`。逆転した区間は表現しない
    pub fn new(start: u32, end: u32) -> Option<Self> {
        if start <= end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// ハッシュ値が区間に含まれるか
    pub fn contains(&self, hash: u32) -> bool {
        self.start <= hash && hash <= self.end
    }

    /// 区間に含まれる値の個数
    pub fn len(&self) -> u64 {
        u64::from(self.end) - u64::from(self.start) + 1
    }
}

/// レプリカ/分散セット単位のサブボリューム
///
/// レイアウトのハッシュ区間はサブボリューム単位で割り当てられる。
/// セット内のブリックは同一のメタデータを持つ前提 (ここでは検証しない)。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subvolume {
    /// サブボリューム名 (例: `vol-replicate-0`)
    pub name: String,

    /// セットを構成するブリック
    pub bricks: Vec<BrickId>,
}

impl Subvolume {
    /// 新しいサブボリュームを作成
    pub fn new(name: impl Into<String>, bricks: Vec<BrickId>) -> Self {
        Self {
            name: name.into(),
            bricks,
        }
    }

    /// レイアウトxattrを取得するブリック
    ///
    /// セット内の先頭ブリックのバックエンドディレクトリが
    /// ディレクトリレイアウトを代表する。
    pub fn layout_brick(&self) -> Option<&BrickId> {
        self.bricks.first()
    }
}

/// ディレクトリレイアウト内の1スロット
///
/// `range` が `None` のブリックは区間未割り当ての正常な状態
/// (追加直後・オフライン中など) を表す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickRange {
    /// 区間を保持するブリック
    pub brick: BrickId,

    /// 割り当てられたハッシュ区間
    pub range: Option<HashRange>,
}

impl BrickRange {
    /// 新しいスロットを作成
    pub fn new(brick: BrickId, range: Option<HashRange>) -> Self {
        Self { brick, range }
    }
}

/// 1ディレクトリ分のハッシュ区間割り当て
///
/// 呼び出し側が取得した順序を保持する。構築時に区間を開始値でソートした
/// 索引と末尾値の累積最大を作り、二分探索での解決に使う。
/// ライブシステムから取得したスナップショットであり、変更しない。
#[derive(Debug, Clone)]
pub struct Layout {
    /// 取得順のスロット
    entries: Vec<BrickRange>,

    /// 割り当て済み区間を開始値でソートした索引: (start, end, entries内の位置)
    sorted: Vec<(u32, u32, usize)>,

    /// sorted[0..=i] の end の最大値
    ///
    /// 重なった不正レイアウトでも、後方走査をここで打ち切れる。
    prefix_max_end: Vec<u32>,
}

impl Layout {
    /// スロット列からレイアウトを構築
    pub fn new(entries: Vec<BrickRange>) -> Self {
        let mut sorted: Vec<(u32, u32, usize)> = entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| entry.range.map(|r| (r.start, r.end, index)))
            .collect();
        sorted.sort_unstable_by_key(|&(start, _, index)| (start, index));

        let mut prefix_max_end = Vec::with_capacity(sorted.len());
        let mut max_end = 0u32;
        for &(_, end, _) in &sorted {
            max_end = max_end.max(end);
            prefix_max_end.push(max_end);
        }

        Self {
            entries,
            sorted,
            prefix_max_end,
        }
    }

    /// 取得順のスロットを返す
    pub fn entries(&self) -> &[BrickRange] {
        &self.entries
    }

    /// スロット数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// スロットが無いか
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 区間割り当てを持つスロットの索引ビュー
    pub(crate) fn sorted_ranges(&self) -> &[(u32, u32, usize)] {
        &self.sorted
    }

    /// ハッシュ値を含む全スロットを取得順で返す
    ///
    /// ソート済み索引を二分探索し、累積最大で後方走査を打ち切る。
    /// 正しいレイアウトなら結果は高々1件。重なった不正レイアウトでは
    /// 複数件になるため、呼び出し側が検出に使える。
    pub(crate) fn slots_containing(&self, hash: u32) -> Vec<usize> {
        // start <= hash を満たす末尾位置
        let upper = self.sorted.partition_point(|&(start, _, _)| start <= hash);

        let mut matches = Vec::new();
        for position in (0..upper).rev() {
            if self.prefix_max_end[position] < hash {
                // これより前の区間はすべて hash より手前で終わる
                break;
            }
            let (_, end, index) = self.sorted[position];
            if end >= hash {
                matches.push(index);
            }
        }
        matches.sort_unstable();
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_brick_id_parse() {
        let id = BrickId::parse("server1:/bricks/brick1/b").unwrap();
        assert_eq!(id.host, "server1");
        assert_eq!(id.path, "/bricks/brick1/b");
        assert_eq!(id.to_string(), "server1:/bricks/brick1/b");

        assert!(BrickId::parse("no-colon").is_none());
        assert!(BrickId::parse(":/path-only").is_none());
        assert!(BrickId::parse("host-only:").is_none());
    }

    #[test]
    fn test_hash_range_basics() {
        let range = HashRange::new(10, 20).unwrap();
        assert!(range.contains(10));
        assert!(range.contains(20));
        assert!(!range.contains(9));
        assert!(!range.contains(21));
        assert_eq!(range.len(), 11);

        // 逆転した区間は構築できない
        assert!(HashRange::new(20, 10).is_none());

        // 全域を覆う区間
        let all = HashRange::new(0, u32::MAX).unwrap();
        assert_eq!(all.len(), 1u64 << 32);
    }

    #[test]
    fn test_slots_containing_quartiles() {
        let layout = quartile_layout();
        assert_eq!(layout.slots_containing(0), vec![0]);
        assert_eq!(layout.slots_containing(0x3fff_ffff), vec![0]);
        assert_eq!(layout.slots_containing(0x4000_0000), vec![1]);
        assert_eq!(layout.slots_containing(0xa787_fa82), vec![2]);
        assert_eq!(layout.slots_containing(u32::MAX), vec![3]);
    }

    #[test]
    fn test_slots_containing_gap() {
        // 第2四分位を欠いたレイアウト
        let layout = Layout::new(vec![
            BrickRange::new(brick(0), HashRange::new(0, 0x3fff_ffff)),
            BrickRange::new(brick(2), HashRange::new(0x8000_0000, 0xbfff_ffff)),
            BrickRange::new(brick(3), HashRange::new(0xc000_0000, u32::MAX)),
        ]);
        assert!(layout.slots_containing(0x5000_0000).is_empty());
    }

    #[test]
    fn test_slots_containing_overlap_returns_all() {
        // 故意に重ねたレイアウト: 両スロットが取得順で返る
        let layout = Layout::new(vec![
            BrickRange::new(brick(0), HashRange::new(0, 0x8000_0000)),
            BrickRange::new(brick(1), HashRange::new(0x8000_0000, u32::MAX)),
        ]);
        assert_eq!(layout.slots_containing(0x8000_0000), vec![0, 1]);
        assert_eq!(layout.slots_containing(0x7fff_ffff), vec![0]);
        assert_eq!(layout.slots_containing(0x8000_0001), vec![1]);
    }

    #[test]
    fn test_unassigned_slots_are_skipped() {
        let layout = Layout::new(vec![
            BrickRange::new(brick(0), HashRange::new(0, u32::MAX)),
            BrickRange::new(brick(1), None),
        ]);
        assert_eq!(layout.slots_containing(123), vec![0]);
    }

    #[test]
    fn test_subvolume_layout_brick() {
        let subvol = Subvolume::new("vol-replicate-0", vec![brick(0), brick(1)]);
        assert_eq!(subvol.layout_brick(), Some(&brick(0)));

        let empty = Subvolume::new("vol-replicate-1", vec![]);
        assert!(empty.layout_brick().is_none());
    }
}
