//! 促销规则错误类型
//!
//! 解析器本身不返回错误，错误只出现在目录加载和草稿编辑这两个边界上。

use thiserror::Error;

use crate::models::RuleKind;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("规则目录解析失败: {0}")]
    CatalogParse(#[from] serde_json::Error),

    #[error("规则目录读取失败: {path}: {source}")]
    CatalogIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("规则实例不存在: {kind} index={index}")]
    InstanceNotFound { kind: RuleKind, index: usize },
}

impl RuleError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::CatalogParse(_) => "CATALOG_PARSE_FAILED",
            Self::CatalogIo { .. } => "CATALOG_IO_FAILED",
            Self::InstanceNotFound { .. } => "INSTANCE_NOT_FOUND",
        }
    }
}

pub type Result<T> = std::result::Result<T, RuleError>;
