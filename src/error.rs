/// 索引构建与查询的结果类型
pub type Result<T> = std::result::Result<T, IndexError>;

/// 索引相关错误。
///
/// 查询无匹配不属于错误：检索函数以 `None` 表示，见 [`crate::index::fm::SearchIndex::search`]。
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// 构建参数不合法（如 checkpoint 间隔为 0，或 BWT 中哨兵个数不为 1）
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// 查询位置超出索引范围；索引本身不受影响
    #[error("{what} {index} is out of range (len {len})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
}

impl IndexError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
