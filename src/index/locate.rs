//! 行号 -> 原文偏移映射。
//!
//! 独立于检索本身：[`SearchIndex`] 只返回排序矩阵的行号，需要原文位置时在其上
//! 另建 [`PositionMap`]。采样稀疏后缀数组，未采样行沿 LF 回走至采样行。

use log::debug;

use super::bwt::broken_cycle;
use super::fm::SearchIndex;
use crate::error::{IndexError, Result};

/// 采样后缀数组：位图标记被采样的行，紧凑数组按行序保存其原文偏移。
///
/// 原文偏移为 `sample_rate` 倍数的行被采样，共 `ceil(rows / sample_rate)` 个。
#[derive(Debug, Clone)]
pub struct PositionMap {
    /// 每行一位，bits[row / 64] 的第 row % 64 位
    bits: Vec<u64>,
    /// word_ranks[w] = bits[..w] 中置位总数
    word_ranks: Vec<usize>,
    /// 第 k 个被采样行（按行号升序）的原文偏移
    offsets: Vec<usize>,
    rows: usize,
    sample_rate: usize,
}

impl PositionMap {
    /// 对 `index` 做一次完整 LF 回走并采样。
    ///
    /// BWT 中哨兵须恰好出现一次，且从哨兵行出发的 LF 回走须恰好在 `rows`
    /// 步后首次回到起点（即覆盖全部行），否则返回 `InvalidParameter`。
    pub fn build(index: &SearchIndex, sample_rate: usize) -> Result<Self> {
        if sample_rate == 0 {
            return Err(IndexError::invalid("sample_rate", "sampling interval must be at least 1"));
        }
        let start = index.sentinel_row()?;
        let rows = index.rows();

        // (row, offset)；以哨兵开头的旋转起点为 n = rows - 1
        let mut sampled: Vec<(usize, usize)> = Vec::with_capacity((rows + sample_rate - 1) / sample_rate);
        let mut row = start;
        for pos in (0..rows).rev() {
            if pos % sample_rate == 0 {
                sampled.push((row, pos));
            }
            row = index.lf(row);
            if (row == start) != (pos == 0) {
                return Err(broken_cycle());
            }
        }
        sampled.sort_unstable_by_key(|&(row, _)| row);

        let mut bits = vec![0u64; (rows + 63) / 64];
        for &(row, _) in &sampled {
            bits[row / 64] |= 1u64 << (row % 64);
        }
        let mut word_ranks = Vec::with_capacity(bits.len());
        let mut acc = 0usize;
        for &w in &bits {
            word_ranks.push(acc);
            acc += w.count_ones() as usize;
        }
        let offsets: Vec<usize> = sampled.into_iter().map(|(_, pos)| pos).collect();
        debug!(
            "locate: sampled {} of {} rows (rate {})",
            offsets.len(),
            rows,
            sample_rate
        );

        Ok(Self { bits, word_ranks, offsets, rows, sample_rate })
    }

    /// 若 `row` 被采样，返回其原文偏移
    #[inline]
    fn sample_at(&self, row: usize) -> Option<usize> {
        let (w, b) = (row / 64, row % 64);
        let word = self.bits[w];
        if (word >> b) & 1 == 0 {
            return None;
        }
        let below = (word & ((1u64 << b) - 1)).count_ones() as usize;
        Some(self.offsets[self.word_ranks[w] + below])
    }

    /// 第 `row` 行旋转在原文中的起始偏移；哨兵行返回原文长度。
    pub fn locate(&self, index: &SearchIndex, row: usize) -> Result<usize> {
        index.check_row(row)?;
        if self.rows != index.rows() {
            return Err(IndexError::invalid("index", "position map was built for a different index"));
        }
        // 构建时已确认 LF 为覆盖全部行的单环，且偏移 0 必被采样，最多 sample_rate - 1 步
        let mut row = row;
        let mut steps = 0usize;
        loop {
            if let Some(pos) = self.sample_at(row) {
                return Ok(pos + steps);
            }
            row = index.lf(row);
            steps += 1;
        }
    }

    /// 批量映射一个行区间，结果按行顺序（未排序的原文偏移）
    pub fn locate_range(&self, index: &SearchIndex, l: usize, r: usize) -> Result<Vec<usize>> {
        (l..r).map(|row| self.locate(index, row)).collect()
    }

    pub fn sample_rate(&self) -> usize {
        self.sample_rate
    }

    /// 被采样的行数
    pub fn sampled(&self) -> usize {
        self.offsets.len()
    }
}
