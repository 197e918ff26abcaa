//! 规则目录
//!
//! 按规则种类（条件/奖励/限制）组织服务端下发的目录条目，
//! 在编辑会话开始时加载一次，之后只读。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::display::build_display_value;
use crate::error::{Result, RuleError};
use crate::models::{RuleCatalogEntry, RuleKind, ValueType};
use crate::resolver::{FieldConstraints, resolve_constraints, resolve_entry};

/// 促销规则目录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleCatalog {
    #[serde(default)]
    pub conditions: Vec<RuleCatalogEntry>,
    #[serde(default)]
    pub rewards: Vec<RuleCatalogEntry>,
    #[serde(default)]
    pub limits: Vec<RuleCatalogEntry>,
}

impl RuleCatalog {
    pub fn new(
        conditions: Vec<RuleCatalogEntry>,
        rewards: Vec<RuleCatalogEntry>,
        limits: Vec<RuleCatalogEntry>,
    ) -> Self {
        Self {
            conditions,
            rewards,
            limits,
        }
    }

    /// 从元数据接口返回的 JSON 解析目录
    ///
    /// 只有整体 JSON 无法解析时才返回错误；单个条目解析失败会记录警告并跳过，
    /// 其余条目照常加载。
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        let catalog = Self {
            conditions: parse_entries(RuleKind::Condition, raw.conditions),
            rewards: parse_entries(RuleKind::Reward, raw.rewards),
            limits: parse_entries(RuleKind::Limit, raw.limits),
        };
        catalog.inspect();
        Ok(catalog)
    }

    /// 从文件读取并解析目录
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RuleError::CatalogIo {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), bytes = content.len(), "Read rule catalog file");
        Self::from_json(&content)
    }

    pub fn entries(&self, kind: RuleKind) -> &[RuleCatalogEntry] {
        match kind {
            RuleKind::Condition => &self.conditions,
            RuleKind::Reward => &self.rewards,
            RuleKind::Limit => &self.limits,
        }
    }

    pub fn resolve(&self, kind: RuleKind, rule_type: &str) -> Option<&RuleCatalogEntry> {
        resolve_entry(self.entries(kind), rule_type)
    }

    pub fn constraints(&self, kind: RuleKind, rule_type: &str) -> FieldConstraints {
        resolve_constraints(self.entries(kind), rule_type)
    }

    pub fn display_value(&self, kind: RuleKind, rule_type: &str, value: &Value) -> String {
        build_display_value(self.resolve(kind, rule_type), value)
    }

    /// 所有种类的条目总数
    pub fn len(&self) -> usize {
        self.conditions.len() + self.rewards.len() + self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 记录加载统计并对可疑条目发出警告，不影响加载结果
    fn inspect(&self) {
        info!(
            conditions = self.conditions.len(),
            rewards = self.rewards.len(),
            limits = self.limits.len(),
            "Rule catalog loaded"
        );

        for kind in RuleKind::ALL {
            let mut seen = HashSet::new();
            for entry in self.entries(kind) {
                if !seen.insert(entry.rule_type.as_str()) {
                    warn!(
                        kind = %kind,
                        rule_type = %entry.rule_type,
                        "Duplicate rule type in catalog, first entry wins"
                    );
                }
                if entry.value_type == ValueType::Options && entry.option_list().is_empty() {
                    warn!(
                        kind = %kind,
                        rule_type = %entry.rule_type,
                        "OPTIONS rule type declares no options"
                    );
                }
                if let ValueType::Unknown(raw) = &entry.value_type {
                    debug!(
                        kind = %kind,
                        rule_type = %entry.rule_type,
                        value_type = %raw,
                        "Unknown value type, falling back to text input"
                    );
                }
            }
        }
    }
}

/// 按种类分组、尚未逐条解析的目录
#[derive(Deserialize)]
struct RawCatalog {
    #[serde(default)]
    conditions: Vec<Value>,
    #[serde(default)]
    rewards: Vec<Value>,
    #[serde(default)]
    limits: Vec<Value>,
}

fn parse_entries(kind: RuleKind, rows: Vec<Value>) -> Vec<RuleCatalogEntry> {
    let total = rows.len();
    let entries: Vec<RuleCatalogEntry> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(kind = %kind, index, error = %e, "Failed to parse catalog entry, skipping");
                None
            }
        })
        .collect();

    if entries.len() < total {
        warn!(
            kind = %kind,
            skipped = total - entries.len(),
            loaded = entries.len(),
            "Some catalog entries were skipped"
        );
    }
    entries
}
