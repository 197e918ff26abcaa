//! 共享库
//!
//! 包含各二进制共用的配置加载和日志初始化代码。

pub mod config;
pub mod observability;
