use log::debug;

use super::bwt::SENTINEL;
use super::first_column::FirstColumnIndex;
use super::rank::RankIndex;
use crate::error::{IndexError, Result};

/// 索引构建参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOpt {
    /// rank checkpoint 间隔，只影响查询代价，不影响结果
    pub jump: usize,
    /// 行 -> 原文偏移映射的采样间隔，见 [`crate::index::locate`]
    pub sample_rate: usize,
}

impl Default for IndexOpt {
    fn default() -> Self {
        Self { jump: 64, sample_rate: 32 }
    }
}

/// FM 索引：BWT 上的 rank 结构 + 首列 C 表。
///
/// 构建后只读，可在多线程间共享查询（`Sync`）。
/// 检索结果是排序旋转矩阵中的行号，不是原文偏移；偏移映射见
/// [`crate::index::locate::PositionMap`]。
#[derive(Debug, Clone)]
pub struct SearchIndex {
    rank: RankIndex,
    first: FirstColumnIndex,
}

impl SearchIndex {
    /// 以默认 checkpoint 间隔构建
    pub fn build(bwt: Vec<u8>) -> Self {
        let first = FirstColumnIndex::from_text(&bwt);
        let rank = RankIndex::sample(bwt, IndexOpt::default().jump);
        Self { rank, first }
    }

    /// `opt.sample_rate` 不在此使用，由 [`crate::index::locate::PositionMap::build`] 校验
    pub fn build_with_opt(bwt: Vec<u8>, opt: IndexOpt) -> Result<Self> {
        let first = FirstColumnIndex::from_text(&bwt);
        let rank = RankIndex::build(bwt, opt.jump)?;
        debug!("fm: {} rows, jump {}", rank.len(), opt.jump);
        Ok(Self { rank, first })
    }

    pub fn rows(&self) -> usize {
        self.rank.len()
    }

    pub fn bwt(&self) -> &[u8] {
        self.rank.text()
    }

    pub fn rank_index(&self) -> &RankIndex {
        &self.rank
    }

    pub fn first_column(&self) -> &FirstColumnIndex {
        &self.first
    }

    /// LF 映射：第 `row` 行旋转左移一位（起点前移一个字节）后所在的行。
    #[inline]
    pub fn lf(&self, row: usize) -> usize {
        let c = self.bwt()[row];
        self.first.row_of(c, self.rank.rank_unchecked(c, row))
    }

    /// 在半开区间 `[l, r)` 的行上向左扩展字节 `c`，返回新区间
    #[inline]
    fn extend(&self, c: u8, l: usize, r: usize) -> (usize, usize) {
        // l 之前（不含）c 的个数
        let before = if l > 0 { self.rank.rank_unchecked(c, l - 1) } else { 0 };
        let through = self.rank.rank_unchecked(c, r - 1);
        (self.first.row_of(c, before + 1), self.first.row_of(c, through + 1))
    }

    /// 反向搜索精确匹配，返回以 `pattern` 为前缀的行的半开区间 `[l, r)`。
    ///
    /// 无匹配返回 None；空模式匹配全部行。空索引（0 行）总是 None。
    pub fn backward_search(&self, pattern: &[u8]) -> Option<(usize, usize)> {
        if self.rows() == 0 {
            return None;
        }
        let mut l = 0usize;
        let mut r = self.rows();
        for &c in pattern.iter().rev() {
            let (nl, nr) = self.extend(c, l, r);
            if nl >= nr {
                return None;
            }
            l = nl;
            r = nr;
        }
        Some((l, r))
    }

    /// 匹配行号（升序）；None 表示无匹配
    pub fn search(&self, pattern: &[u8]) -> Option<Vec<usize>> {
        self.backward_search(pattern).map(|(l, r)| (l..r).collect())
    }

    /// 出现次数
    pub fn count(&self, pattern: &[u8]) -> usize {
        self.backward_search(pattern).map_or(0, |(l, r)| r - l)
    }

    /// 以哨兵开头的旋转所在行（原文偏移 `rows - 1`）。BWT 中哨兵须恰好出现一次。
    pub fn sentinel_row(&self) -> Result<usize> {
        let sentinels = self.first.count(SENTINEL);
        if sentinels != 1 {
            return Err(IndexError::invalid(
                "bwt",
                format!("expected exactly one sentinel, found {}", sentinels),
            ));
        }
        Ok(self.first.row_of(SENTINEL, 1))
    }

    /// 检查行号是否在索引范围内
    pub fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.rows() {
            return Err(IndexError::OutOfRange {
                what: "row",
                index: row,
                len: self.rows(),
            });
        }
        Ok(())
    }
}

pub fn build_index(bwt: &[u8]) -> SearchIndex {
    SearchIndex::build(bwt.to_vec())
}

pub fn search(index: &SearchIndex, pattern: &[u8]) -> Option<Vec<usize>> {
    index.search(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::bwt::transform;

    /// 朴素构造排序旋转矩阵
    fn sorted_rotations(seq: &[u8]) -> Vec<Vec<u8>> {
        let mut text = seq.to_vec();
        text.push(SENTINEL);
        let n = text.len();
        let mut rots: Vec<Vec<u8>> = (0..n)
            .map(|i| text[i..].iter().chain(&text[..i]).copied().collect())
            .collect();
        rots.sort();
        rots
    }

    fn make_text(len: usize, alphabet: &[u8]) -> Vec<u8> {
        let mut x: u32 = 42;
        let mut v = Vec::with_capacity(len);
        for _ in 0..len {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            v.push(alphabet[(x >> 16) as usize % alphabet.len()]);
        }
        v
    }

    #[test]
    fn abracadabra_scenarios() {
        let idx = build_index(&transform(b"abracadabra"));
        assert_eq!(search(&idx, b"c"), Some(vec![8]));
        assert_eq!(search(&idx, b"abr"), Some(vec![2, 3]));
        assert_eq!(search(&idx, b"abru"), None);
        assert_eq!(idx.count(b"a"), 5);
        assert_eq!(idx.count(b"abracadabra"), 1);
    }

    #[test]
    fn empty_pattern_matches_every_row() {
        let idx = build_index(&transform(b"banana"));
        assert_eq!(idx.search(b""), Some((0..7).collect()));
    }

    #[test]
    fn index_over_empty_input() {
        let idx = build_index(&transform(b""));
        assert_eq!(idx.rows(), 1);
        assert_eq!(idx.search(b""), Some(vec![0]));
        assert_eq!(idx.search(b"$"), Some(vec![0]));
        assert_eq!(idx.search(b"a"), None);

        let none = build_index(b"");
        assert_eq!(none.search(b""), None);
    }

    #[test]
    fn unseen_byte_never_matches() {
        let idx = build_index(&transform(b"mississippi"));
        assert_eq!(idx.search(b"x"), None);
        assert_eq!(idx.search(b"sx"), None);
        assert_eq!(idx.search(b"xs"), None);
        assert_eq!(idx.search(&[0u8]), None);
        assert_eq!(idx.search(&[255u8]), None);
    }

    #[test]
    fn sound_and_complete_against_naive_rotations() {
        for (len, alphabet) in [(1, &b"ab"[..]), (30, &b"ab"[..]), (60, &b"ACGT"[..]), (45, &b"xyz \n"[..])] {
            let seq = make_text(len, alphabet);
            let rots = sorted_rotations(&seq);
            let idx = SearchIndex::build_with_opt(transform(&seq), IndexOpt { jump: 3, sample_rate: 1 }).unwrap();
            for start in 0..seq.len() {
                for plen in 1..=4usize.min(seq.len() - start) {
                    let pat = &seq[start..start + plen];
                    let expected: Vec<usize> = rots
                        .iter()
                        .enumerate()
                        .filter(|(_, r)| r.starts_with(pat))
                        .map(|(i, _)| i)
                        .collect();
                    assert_eq!(idx.search(pat), Some(expected), "pattern {:?}", pat);
                }
            }
        }
    }

    #[test]
    fn result_independent_of_jump() {
        let seq = make_text(80, b"ACGT");
        let bwt = transform(&seq);
        let reference = SearchIndex::build_with_opt(bwt.clone(), IndexOpt { jump: 1, sample_rate: 1 }).unwrap();
        for jump in [2, 3, 5, 20, 200] {
            let idx = SearchIndex::build_with_opt(bwt.clone(), IndexOpt { jump, sample_rate: 1 }).unwrap();
            for pat in [&b"A"[..], &b"CG"[..], &b"GTA"[..], &b"TTTT"[..], &b"ACGTN"[..]] {
                assert_eq!(idx.backward_search(pat), reference.backward_search(pat), "jump={}", jump);
            }
        }
    }

    #[test]
    fn lf_moves_to_previous_offset() {
        let seq = b"abracadabra";
        let rots = sorted_rotations(seq);
        let idx = build_index(&transform(seq));
        for row in 0..idx.rows() {
            let mut expected = rots[row].clone();
            expected.rotate_right(1);
            assert_eq!(rots[idx.lf(row)], expected, "row={}", row);
        }
    }

    #[test]
    fn bad_options_are_rejected() {
        let bwt = transform(b"acgt");
        assert!(matches!(
            SearchIndex::build_with_opt(bwt.clone(), IndexOpt { jump: 0, sample_rate: 4 }),
            Err(IndexError::InvalidParameter { name: "jump", .. })
        ));
        // 采样间隔只在建偏移映射时校验
        assert!(SearchIndex::build_with_opt(bwt, IndexOpt { jump: 4, sample_rate: 0 }).is_ok());
    }

    #[test]
    fn sentinel_row_requires_single_sentinel() {
        let idx = build_index(&transform(b"abracadabra"));
        assert_eq!(idx.sentinel_row().unwrap(), 0);
        assert!(build_index(b"abc").sentinel_row().is_err());
        assert!(build_index(b"a$b$").sentinel_row().is_err());
    }

    #[test]
    fn check_row_bounds() {
        let idx = build_index(&transform(b"acgt"));
        assert!(idx.check_row(4).is_ok());
        assert_eq!(
            idx.check_row(5),
            Err(IndexError::OutOfRange { what: "row", index: 5, len: 5 })
        );
    }

    #[test]
    fn shared_across_threads() {
        let idx = build_index(&transform(b"GATTACAGATTACA"));
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| assert_eq!(idx.count(b"TTA"), 2));
            }
        });
    }
}
