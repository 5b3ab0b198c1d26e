/// 首列索引（C 表）：`C[b]` = 所有小于 `b` 的字节总数，即排序矩阵中以 `b`
/// 开头的行块起点。覆盖完整的 0..=255 字节空间。
#[derive(Debug, Clone)]
pub struct FirstColumnIndex {
    /// 长度 257，末项为总数，便于取 `C[b + 1] - C[b]`
    c: Vec<usize>,
}

impl FirstColumnIndex {
    pub fn from_counts(counts: &[usize; 256]) -> Self {
        let mut c = Vec::with_capacity(257);
        let mut acc = 0usize;
        c.push(acc);
        for &n in counts {
            acc += n;
            c.push(acc);
        }
        Self { c }
    }

    /// 统计 `text` 的字节频率后构建。BWT 与原序列（含哨兵）的字节多重集相同。
    pub fn from_text(text: &[u8]) -> Self {
        let mut counts = [0usize; 256];
        for &b in text {
            counts[b as usize] += 1;
        }
        Self::from_counts(&counts)
    }

    /// 第 `rank` 个（从 1 计）以 `byte` 开头的旋转所在行：`C[byte] + rank - 1`。
    ///
    /// 不做越界检查；`rank` 应在 `1..=count(byte)` 内（回溯搜索中的区间端点可取到
    /// `count(byte) + 1`）。
    #[inline]
    pub fn row_of(&self, byte: u8, rank: usize) -> usize {
        self.c[byte as usize] + rank - 1
    }

    /// 以 `byte` 开头的行块起点，即 `C[byte]`
    #[inline]
    pub fn start(&self, byte: u8) -> usize {
        self.c[byte as usize]
    }

    pub fn count(&self, byte: u8) -> usize {
        self.c[byte as usize + 1] - self.c[byte as usize]
    }

    pub fn total(&self) -> usize {
        self.c[256]
    }
}

pub fn build_first_column_index(counts: &[usize; 256]) -> FirstColumnIndex {
    FirstColumnIndex::from_counts(counts)
}

pub fn row_of(index: &FirstColumnIndex, byte: u8, rank: usize) -> usize {
    index.row_of(byte, rank)
}
