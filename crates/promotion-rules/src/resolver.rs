//! 规则表单解析器
//!
//! 根据服务端下发的规则目录和用户选择的规则类型，解析出应使用的输入组件、
//! 可选操作符和单位。所有函数都是纯函数，查找失败时退化为“无约束”，不会返回错误。

use serde::{Deserialize, Serialize};

use crate::labels::{SelectOption, label_all, operator_label, unit_label};
use crate::models::{RuleCatalogEntry, RuleOption, ValueType};

/// 值输入组件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueWidget {
    NumberInput,
    TextInput,
    MultiSelect,
    TimeRange,
}

/// 按类型精确匹配目录条目，重复类型时取第一个
pub fn resolve_entry<'a>(
    catalog: &'a [RuleCatalogEntry],
    rule_type: &str,
) -> Option<&'a RuleCatalogEntry> {
    catalog.iter().find(|entry| entry.rule_type == rule_type)
}

pub fn operators_for(entry: Option<&RuleCatalogEntry>) -> Vec<SelectOption> {
    entry
        .map(|e| label_all(e.operator_codes(), operator_label))
        .unwrap_or_default()
}

/// 单位选项列表；只有一个单位时由调用方自动选中
pub fn units_for(entry: Option<&RuleCatalogEntry>) -> Vec<SelectOption> {
    entry
        .map(|e| label_all(e.unit_codes(), unit_label))
        .unwrap_or_default()
}

/// 值类型到输入组件的映射，未知类型回退为文本输入
pub fn value_widget_for(entry: &RuleCatalogEntry) -> ValueWidget {
    match entry.value_type {
        ValueType::Number => ValueWidget::NumberInput,
        ValueType::String => ValueWidget::TextInput,
        ValueType::Options => ValueWidget::MultiSelect,
        ValueType::TimeInDay => ValueWidget::TimeRange,
        ValueType::Unknown(_) => ValueWidget::TextInput,
    }
}

/// 一次类型选择解析出的表单约束
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConstraints {
    pub rule_type: String,
    /// 类型未知时为 None，表示输入框禁用
    pub widget: Option<ValueWidget>,
    pub operators: Vec<SelectOption>,
    pub units: Vec<SelectOption>,
    /// 目录只声明了一个单位时自动选中的单位
    pub fixed_unit: Option<String>,
    pub unit_selector_disabled: bool,
    pub options: Vec<RuleOption>,
}

impl FieldConstraints {
    pub fn is_known(&self) -> bool {
        self.widget.is_some()
    }
}

/// 解析某一规则类型的完整表单约束
pub fn resolve_constraints(catalog: &[RuleCatalogEntry], rule_type: &str) -> FieldConstraints {
    let entry = resolve_entry(catalog, rule_type);
    let fixed_unit = entry.and_then(|e| e.fixed_unit()).map(str::to_string);

    FieldConstraints {
        rule_type: rule_type.to_string(),
        widget: entry.map(value_widget_for),
        operators: operators_for(entry),
        units: units_for(entry),
        unit_selector_disabled: fixed_unit.is_some(),
        fixed_unit,
        options: entry.map(|e| e.option_list().to_vec()).unwrap_or_default(),
    }
}
