//! 促销规则数据模型
//!
//! 定义规则目录条目和规则实例的核心结构体，支持与元数据接口 JSON 的序列化/反序列化

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// 规则值类型
///
/// 决定了前端渲染的输入组件和展示值的格式化方式。
/// 服务端新增的未知类型保留原始字符串，不会导致目录加载失败。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValueType {
    /// 数值类型
    Number,
    /// 字符串类型
    String,
    /// 多选类型，必须配合 options 字段使用
    Options,
    /// 一天内的时间段，值为 `[开始, 结束]`
    TimeInDay,
    /// 未识别的值类型
    Unknown(String),
}

impl ValueType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Number => "NUMBER",
            Self::String => "STRING",
            Self::Options => "OPTIONS",
            Self::TimeInDay => "TIME_IN_DAY",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<String> for ValueType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "NUMBER" => Self::Number,
            "STRING" => Self::String,
            "OPTIONS" => Self::Options,
            "TIME_IN_DAY" => Self::TimeInDay,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<ValueType> for String {
    fn from(value_type: ValueType) -> Self {
        value_type.as_str().to_string()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 多选类型的选项定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOption {
    /// 选项的显示标签
    pub label: String,
    /// 选项的实际值，通常为字符串，也允许数值
    pub value: Value,
}

impl RuleOption {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// 规则目录条目
///
/// 描述某一规则类型允许的值类型、操作符和单位，由服务端元数据接口下发，
/// 在一次编辑会话中保持不变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCatalogEntry {
    /// 规则类型编码，如 `DAY_OF_WEEK`
    #[serde(rename = "type")]
    pub rule_type: String,
    pub value_type: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operators: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<RuleOption>>,
}

impl RuleCatalogEntry {
    pub fn new(rule_type: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            rule_type: rule_type.into(),
            value_type,
            operators: None,
            units: None,
            options: None,
        }
    }

    pub fn with_operators<I, S>(mut self, operators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operators = Some(operators.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_units<I, S>(mut self, units: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.units = Some(units.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_options(mut self, options: Vec<RuleOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn operator_codes(&self) -> &[String] {
        self.operators.as_deref().unwrap_or_default()
    }

    pub fn unit_codes(&self) -> &[String] {
        self.units.as_deref().unwrap_or_default()
    }

    pub fn option_list(&self) -> &[RuleOption] {
        self.options.as_deref().unwrap_or_default()
    }

    /// 只声明了一个单位时返回该单位，此时单位选择器应被禁用
    pub fn fixed_unit(&self) -> Option<&str> {
        match self.unit_codes() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }
}

/// 规则种类
///
/// 一个促销活动由条件、奖励、限制三组有序规则组成
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleKind {
    Condition,
    Reward,
    Limit,
}

impl RuleKind {
    pub const ALL: [RuleKind; 3] = [Self::Condition, Self::Reward, Self::Limit];
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Condition => write!(f, "condition"),
            Self::Reward => write!(f, "reward"),
            Self::Limit => write!(f, "limit"),
        }
    }
}

impl std::str::FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "condition" | "conditions" => Ok(Self::Condition),
            "reward" | "rewards" => Ok(Self::Reward),
            "limit" | "limits" => Ok(Self::Limit),
            other => Err(format!("unknown rule kind: {}", other)),
        }
    }
}

/// 规则实例（条件、奖励或限制）
///
/// 由编辑中的草稿独占持有，活动保存前不会持久化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleInstance {
    #[serde(rename = "type")]
    pub rule_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// 由目录条目和值推导，不允许单独编辑
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
}

impl RuleInstance {
    pub fn new(rule_type: impl Into<String>) -> Self {
        Self {
            rule_type: rule_type.into(),
            operator: None,
            value: Value::Null,
            unit: None,
            display_value: None,
        }
    }
}
