//! 促销规则表单解析
//!
//! 为促销活动编辑器提供由服务端元数据驱动的规则表单能力，支持：
//! - 规则目录（条件/奖励/限制）的加载和查找
//! - 按规则类型解析输入组件、操作符和单位
//! - 规则值展示字符串的生成
//! - 编辑草稿的维护和请求体序列化

pub mod catalog;
pub mod cli;
pub mod display;
pub mod draft;
pub mod error;
pub mod labels;
pub mod models;
pub mod resolver;

pub use catalog::RuleCatalog;
pub use display::build_display_value;
pub use draft::RuleDraft;
pub use error::{Result, RuleError};
pub use labels::SelectOption;
pub use models::{RuleCatalogEntry, RuleInstance, RuleKind, RuleOption, ValueType};
pub use resolver::{
    FieldConstraints, ValueWidget, operators_for, resolve_constraints, resolve_entry, units_for,
    value_widget_for,
};
