/// 计算后缀的字典序排列（倍增法，O(n log² n)）。
///
/// 返回行号 -> 后缀起点的排列，仅在构建 BWT 时临时使用。
/// 比较的是后缀而非循环旋转：调用方保证末尾哨兵唯一，两种次序一致。
pub fn sort_suffixes(text: &[u8]) -> Vec<usize> {
    let n = text.len();
    let mut perm: Vec<usize> = (0..n).collect();
    if n <= 1 {
        return perm;
    }

    // rank[i]：后缀 i 前 k 个字节的等价类；越界视为 -1（更短者更小）
    let mut rank: Vec<i64> = text.iter().map(|&b| i64::from(b)).collect();
    let mut next: Vec<i64> = vec![0; n];

    let mut k = 1usize;
    loop {
        let key = |i: usize| (rank[i], if i + k < n { rank[i + k] } else { -1 });
        perm.sort_unstable_by_key(|&i| key(i));

        next[perm[0]] = 0;
        for w in 1..n {
            let (a, b) = (perm[w - 1], perm[w]);
            next[b] = next[a] + i64::from(key(a) != key(b));
        }
        rank.copy_from_slice(&next);

        // 所有等价类互不相同即已全序
        if rank[perm[n - 1]] as usize == n - 1 || k >= n {
            break;
        }
        k <<= 1;
    }

    perm
}
