use log::debug;

use super::fm::SearchIndex;
use super::sa::sort_suffixes;
use crate::error::{IndexError, Result};

/// 追加在序列末尾的哨兵字节。调用方需保证输入中不含该字节。
pub const SENTINEL: u8 = b'$';

/// 计算序列的 Burrows-Wheeler 变换，不修改输入。
///
/// 先复制输入并追加 [`SENTINEL`]，对全部后缀排序，再依次取每行后缀起点的
/// 前一个字节（循环）。输出长度恒为 `seq.len() + 1`，空输入得到 `"$"`。
pub fn transform(seq: &[u8]) -> Vec<u8> {
    let mut text = Vec::with_capacity(seq.len() + 1);
    text.extend_from_slice(seq);
    text.push(SENTINEL);

    let n = text.len();
    let perm = sort_suffixes(&text);
    debug!("bwt: sorted {} rows", n);

    perm.iter().map(|&p| text[(p + n - 1) % n]).collect()
}

/// BWT 逆变换：从哨兵所在行沿 LF 映射回走，还原不含哨兵的原序列。
///
/// 输入中哨兵须恰好出现一次，且 LF 映射须构成覆盖全部行的单一环，
/// 否则返回 `InvalidParameter`。
pub fn inverse_transform(bwt: &[u8]) -> Result<Vec<u8>> {
    let index = SearchIndex::build(bwt.to_vec());
    let start = index.sentinel_row()?;
    let n = bwt.len() - 1;
    let mut out = vec![0u8; n];

    // 以哨兵开头的旋转对应原文偏移 n，其 L 列字节为 text[n - 1]
    let mut row = start;
    for slot in out.iter_mut().rev() {
        *slot = index.bwt()[row];
        row = index.lf(row);
        if row == start {
            return Err(broken_cycle());
        }
    }
    Ok(out)
}

/// LF 环提前回到哨兵行：输入不是任何序列的 BWT
pub(crate) fn broken_cycle() -> IndexError {
    IndexError::invalid("bwt", "LF mapping does not visit every row from the sentinel")
}
