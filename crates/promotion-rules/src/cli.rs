//! CLI 命令定义
//!
//! 使用 clap derive 宏定义 `rule-resolver` 的命令行接口，
//! 便于运维人员在不启动前端的情况下检查规则目录。
//!
//! ```bash
//! rule-resolver --catalog catalog.json resolve -k reward -t DISCOUNT
//! rule-resolver display -k condition -t DAY_OF_WEEK -v '["MON","TUE"]'
//! rule-resolver list -k limit
//! ```

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use crate::catalog::RuleCatalog;
use crate::models::RuleKind;

/// 促销规则目录检查工具
#[derive(Parser, Debug)]
#[command(name = "rule-resolver")]
#[command(version, about = "促销规则目录检查工具")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)，覆盖配置文件
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// 配置目录，默认读取 CONFIG_DIR 或 ./config
    #[arg(long)]
    pub config_dir: Option<String>,

    /// 规则目录 JSON 文件，覆盖配置中的 catalog.path
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 输出某一规则类型的表单约束（JSON）
    Resolve {
        /// 规则种类：condition, reward, limit
        #[arg(short, long)]
        kind: RuleKind,

        /// 规则类型编码
        #[arg(short = 't', long = "type")]
        rule_type: String,
    },

    /// 输出规则值的展示字符串
    Display {
        #[arg(short, long)]
        kind: RuleKind,

        #[arg(short = 't', long = "type")]
        rule_type: String,

        /// 规则值，JSON 格式；无法解析时按普通字符串处理
        #[arg(short, long)]
        value: String,
    },

    /// 列出某一种类下的所有规则类型
    List {
        #[arg(short, long)]
        kind: RuleKind,
    },
}

/// 针对已加载的目录执行命令，返回要输出的文本
pub fn execute(command: &Commands, catalog: &RuleCatalog) -> anyhow::Result<String> {
    match command {
        Commands::Resolve { kind, rule_type } => {
            let constraints = catalog.constraints(*kind, rule_type);
            if !constraints.is_known() {
                tracing::warn!(kind = %kind, rule_type = %rule_type, "Rule type not found in catalog");
            }
            Ok(serde_json::to_string_pretty(&constraints)?)
        }
        Commands::Display {
            kind,
            rule_type,
            value,
        } => {
            let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.clone()));
            Ok(catalog.display_value(*kind, rule_type, &value))
        }
        Commands::List { kind } => Ok(catalog
            .entries(*kind)
            .iter()
            .map(|entry| entry.rule_type.as_str())
            .collect::<Vec<_>>()
            .join("\n")),
    }
}
