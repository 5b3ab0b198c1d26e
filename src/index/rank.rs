use log::debug;

use crate::error::{IndexError, Result};

/// 带 checkpoint 采样的 rank 结构。
///
/// - 每个出现过的字节按首次出现顺序分配一列（仅内部使用）。
/// - 每 `jump` 个位置记录一行 checkpoint：第 `i / jump` 行保存 `text[0..=i]`
///   中各字节的出现次数（`i % jump == 0`）。
/// - 查询时从最近的 checkpoint 顺扫至目标位置，代价 O(jump)。
#[derive(Debug, Clone)]
pub struct RankIndex {
    text: Vec<u8>,
    /// 字节 -> 列号；未出现的字节为 None
    columns: [Option<usize>; 256],
    width: usize,
    /// checkpoint 表（行优先展平）：checkpoints[row * width + col]
    checkpoints: Vec<usize>,
    jump: usize,
}

impl RankIndex {
    pub fn build(text: Vec<u8>, jump: usize) -> Result<Self> {
        if jump == 0 {
            return Err(IndexError::invalid("jump", "checkpoint interval must be at least 1"));
        }
        Ok(Self::sample(text, jump))
    }

    /// 调用方保证 `jump >= 1`
    pub(crate) fn sample(text: Vec<u8>, jump: usize) -> Self {
        debug_assert!(jump >= 1);

        let mut columns = [None; 256];
        let mut width = 0usize;
        for &b in &text {
            let slot = &mut columns[b as usize];
            if slot.is_none() {
                *slot = Some(width);
                width += 1;
            }
        }

        let n = text.len();
        let rows = (n + jump - 1) / jump;
        let mut checkpoints = Vec::with_capacity(rows * width);
        let mut running = vec![0usize; width];
        for (i, &b) in text.iter().enumerate() {
            if let Some(col) = columns[b as usize] {
                running[col] += 1;
            }
            if i % jump == 0 {
                checkpoints.extend_from_slice(&running);
            }
        }
        debug!(
            "rank: {} bytes, {} distinct, {} checkpoints (jump {})",
            n, width, rows, jump
        );

        Self { text, columns, width, checkpoints, jump }
    }

    /// `text[0..=pos]` 中 `byte` 的出现次数（首次出现记为 1）。
    ///
    /// 未出现过的字节返回 0；`pos` 越界返回 `OutOfRange`。
    pub fn rank_of(&self, byte: u8, pos: usize) -> Result<usize> {
        if pos >= self.text.len() {
            return Err(IndexError::OutOfRange {
                what: "rank position",
                index: pos,
                len: self.text.len(),
            });
        }
        Ok(self.rank_unchecked(byte, pos))
    }

    /// 同 [`Self::rank_of`]，调用方保证 `pos < len`。
    #[inline]
    pub(crate) fn rank_unchecked(&self, byte: u8, pos: usize) -> usize {
        debug_assert!(pos < self.text.len());
        let Some(col) = self.columns[byte as usize] else {
            return 0;
        };
        let row = pos / self.jump;
        let base = self.checkpoints[row * self.width + col];
        let start = row * self.jump + 1;
        let add = if start <= pos {
            self.text[start..=pos].iter().filter(|&&b| b == byte).count()
        } else {
            0
        };
        base + add
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn jump(&self) -> usize {
        self.jump
    }

    /// 构建时见过的不同字节数
    pub fn distinct(&self) -> usize {
        self.width
    }
}

pub fn build_rank_index(text: &[u8], jump: usize) -> Result<RankIndex> {
    RankIndex::build(text.to_vec(), jump)
}

pub fn rank_of(index: &RankIndex, byte: u8, pos: usize) -> Result<usize> {
    index.rank_of(byte, pos)
}
