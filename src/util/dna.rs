/// 规范化核酸序列：转大写，`U` 视为 `T`，其余非 ACGTN 字节记为 `N`。
pub fn normalize_seq(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .map(|&b| match b.to_ascii_uppercase() {
            up @ (b'A' | b'C' | b'G' | b'T' | b'N') => up,
            b'U' => b'T',
            _ => b'N',
        })
        .collect()
}

const COMPLEMENT: [(u8, u8); 5] = [(b'A', b'T'), (b'C', b'G'), (b'G', b'C'), (b'T', b'A'), (b'U', b'A')];

/// 互补碱基，保留大小写；未知字节记为 `N` / `n`。
#[inline]
pub fn complement(base: u8) -> u8 {
    let up = base.to_ascii_uppercase();
    let comp = COMPLEMENT
        .iter()
        .find(|&&(b, _)| b == up)
        .map_or(b'N', |&(_, c)| c);
    if base.is_ascii_lowercase() {
        comp.to_ascii_lowercase()
    } else {
        comp
    }
}

pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}
