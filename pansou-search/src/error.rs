//! Search failures, worded for direct display in a chat message.

use thiserror::Error;

/// Why a search could not produce results.
///
/// Every variant's `Display` text is shown inline to the user in place
/// of results; none of these are fatal to the process.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("搜索超时，请稍后重试")]
    Timeout,

    #[error("网络连接失败，请稍后重试")]
    Network(#[source] reqwest::Error),

    #[error("搜索服务错误: HTTP {0}")]
    Status(u16),

    /// The provider answered with a non-zero envelope code.
    #[error("{0}")]
    Api(String),
}
