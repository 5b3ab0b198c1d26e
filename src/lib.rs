//! # bwt-search
//!
//! 基于 Burrows-Wheeler 变换（BWT）的 FM 索引，对不可变字节序列做精确子串检索。
//!
//! 构建流程自底向上：
//!
//! - **后缀排序 / 变换**：追加哨兵 `$`，对全部后缀排序，取 L 列得到 BWT
//! - **Rank 索引**：checkpoint 采样 + 块内顺扫，回答 `text[0..=i]` 中字节 c 的个数
//! - **首列索引**：按字节值累计计数（C 表），给出每个字节行块的起点
//! - **反向搜索**：从模式末字节到首字节逐步收窄半开行区间 `[l, r)`
//!
//! 检索结果是排序旋转矩阵的行号。需要原文偏移时另建 [`index::locate::PositionMap`]。
//!
//! ## 快速示例
//!
//! ```rust
//! use bwt_search::index::{bwt, fm};
//!
//! let bwt_str = bwt::transform(b"abracadabra");
//! assert_eq!(bwt_str, b"ard$rcaaaabb");
//!
//! let idx = fm::build_index(&bwt_str);
//! assert_eq!(fm::search(&idx, b"abr"), Some(vec![2, 3]));
//! assert_eq!(fm::search(&idx, b"abru"), None);
//! ```
//!
//! ## 模块说明
//!
//! - [`index`] — 后缀排序、BWT、rank / 首列索引、反向搜索、偏移映射
//! - [`io`] — FASTA 解析（作为待索引字节序列的来源）
//! - [`util`] — 核酸规范化 / 反向互补
//! - [`error`] — 错误类型

pub mod error;
pub mod index;
pub mod io;
pub mod util;

pub use error::{IndexError, Result};
pub use index::bwt::{inverse_transform, transform, SENTINEL};
pub use index::fm::{build_index, search, IndexOpt, SearchIndex};
