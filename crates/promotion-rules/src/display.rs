//! 展示值格式化
//!
//! 将规则值渲染为列表/摘要视图中使用的可读字符串。
//! 所有路径都不会失败：无法识别的值退化为尽力而为的字符串化。

use chrono::{DateTime, NaiveDateTime, NaiveTime};
use serde_json::Value;

use crate::models::{RuleCatalogEntry, ValueType};

/// 多选标签之间的分隔符
pub const OPTION_SEPARATOR: &str = ", ";

/// 时间段开始与结束之间的分隔符
pub const TIME_RANGE_SEPARATOR: &str = "–";

const TIME_FORMAT: &str = "%H:%M";

/// 根据目录条目和值构建展示字符串
///
/// - NUMBER/STRING：直接字符串化
/// - OPTIONS：按目录顺序筛选被选中的选项，标签以 `", "` 连接
/// - TIME_IN_DAY：格式化为 `HH:mm–HH:mm`
/// - 其他（未知类型或条目缺失）：字符串化
pub fn build_display_value(entry: Option<&RuleCatalogEntry>, value: &Value) -> String {
    let Some(entry) = entry else {
        return stringify(value);
    };

    match entry.value_type {
        ValueType::Number | ValueType::String => stringify(value),
        ValueType::Options => selected_labels(entry, value),
        ValueType::TimeInDay => format_time_range(value).unwrap_or_else(|| stringify(value)),
        ValueType::Unknown(_) => stringify(value),
    }
}

/// 将 JSON 值字符串化
///
/// 空值为空串；整数值的浮点数不带小数部分；数组元素以 `,` 连接
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn format_number(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => format!("{}", f),
        None => n.to_string(),
    }
}

fn selected_labels(entry: &RuleCatalogEntry, value: &Value) -> String {
    let selected: &[Value] = match value {
        Value::Array(items) => items.as_slice(),
        Value::Null => &[],
        scalar => std::slice::from_ref(scalar),
    };

    entry
        .option_list()
        .iter()
        .filter(|option| selected.contains(&option.value))
        .map(|option| option.label.as_str())
        .collect::<Vec<_>>()
        .join(OPTION_SEPARATOR)
}

/// 格式化两元素时间段，任一端无法解析时返回 None
pub fn format_time_range(value: &Value) -> Option<String> {
    let (start, end) = parse_time_range(value)?;
    Some(format!(
        "{}{}{}",
        start.format(TIME_FORMAT),
        TIME_RANGE_SEPARATOR,
        end.format(TIME_FORMAT)
    ))
}

/// 将时间段归一化为 `["HH:mm", "HH:mm"]`，无法解析时返回 None
pub fn normalize_time_range(value: &Value) -> Option<Value> {
    let (start, end) = parse_time_range(value)?;
    Some(Value::Array(vec![
        Value::String(start.format(TIME_FORMAT).to_string()),
        Value::String(end.format(TIME_FORMAT).to_string()),
    ]))
}

fn parse_time_range(value: &Value) -> Option<(NaiveTime, NaiveTime)> {
    match value.as_array()?.as_slice() {
        [start, end] => Some((parse_time(start)?, parse_time(end)?)),
        _ => None,
    }
}

/// 解析一天内的时间
///
/// 接受 `HH:mm`、`HH:mm:ss`、RFC 3339 时间戳以及不带时区的 ISO 日期时间
pub fn parse_time(value: &Value) -> Option<NaiveTime> {
    let raw = value.as_str()?.trim();

    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, TIME_FORMAT))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.time()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.time())
        })
}
