//! 操作符与单位的显示标签

use serde::{Deserialize, Serialize};

/// 下拉选择框的选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// 操作符编码对应的显示标签，未知编码原样返回
pub fn operator_label(code: &str) -> String {
    let label = match code.to_ascii_uppercase().as_str() {
        "EQ" => "=",
        "NE" | "NEQ" => "≠",
        "GT" => ">",
        "GTE" => "≥",
        "LT" => "<",
        "LTE" => "≤",
        "IN" => "in",
        "NOT_IN" => "not in",
        "BETWEEN" => "between",
        _ => return code.to_string(),
    };
    label.to_string()
}

/// 单位编码对应的显示标签，未知编码原样返回
pub fn unit_label(code: &str) -> String {
    let label = match code.to_ascii_uppercase().as_str() {
        "MINUTE" => "minute(s)",
        "HOUR" => "hour(s)",
        "DAY" => "day(s)",
        "WEEK" => "week(s)",
        "MONTH" => "month(s)",
        "PERCENT" => "%",
        "AMOUNT" => "amount",
        "TIMES" => "time(s)",
        "ORDER" => "order(s)",
        "CYCLE" => "cycle(s)",
        _ => return code.to_string(),
    };
    label.to_string()
}

pub(crate) fn label_all(codes: &[String], label: fn(&str) -> String) -> Vec<SelectOption> {
    codes
        .iter()
        .map(|code| SelectOption::new(label(code), code.clone()))
        .collect()
}
