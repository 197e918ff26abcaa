//! 规则草稿
//!
//! 持有编辑中活动的条件、奖励、限制三组有序规则实例。
//! 每次修改类型或值后都会重新计算 `display_value`，保证其始终由目录条目和值推导。

use serde_json::{Value, json};
use tracing::debug;

use crate::catalog::RuleCatalog;
use crate::display::{build_display_value, normalize_time_range};
use crate::error::{Result, RuleError};
use crate::models::{RuleCatalogEntry, RuleInstance, RuleKind, ValueType};

/// 活动编辑草稿
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleDraft {
    conditions: Vec<RuleInstance>,
    rewards: Vec<RuleInstance>,
    limits: Vec<RuleInstance>,
}

impl RuleDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instances(&self, kind: RuleKind) -> &[RuleInstance] {
        match kind {
            RuleKind::Condition => &self.conditions,
            RuleKind::Reward => &self.rewards,
            RuleKind::Limit => &self.limits,
        }
    }

    fn instances_mut(&mut self, kind: RuleKind) -> &mut Vec<RuleInstance> {
        match kind {
            RuleKind::Condition => &mut self.conditions,
            RuleKind::Reward => &mut self.rewards,
            RuleKind::Limit => &mut self.limits,
        }
    }

    fn instance_mut(&mut self, kind: RuleKind, index: usize) -> Result<&mut RuleInstance> {
        self.instances_mut(kind)
            .get_mut(index)
            .ok_or(RuleError::InstanceNotFound { kind, index })
    }

    /// 追加一个新规则实例，返回其下标
    pub fn add(&mut self, catalog: &RuleCatalog, kind: RuleKind, rule_type: &str) -> usize {
        let mut instance = RuleInstance::new(rule_type);
        normalize_instance(&mut instance, catalog.resolve(kind, rule_type));

        let list = self.instances_mut(kind);
        list.push(instance);
        debug!(kind = %kind, rule_type = %rule_type, index = list.len() - 1, "Rule added to draft");
        list.len() - 1
    }

    /// 切换规则类型，重置操作符、单位和值
    pub fn set_type(
        &mut self,
        catalog: &RuleCatalog,
        kind: RuleKind,
        index: usize,
        rule_type: &str,
    ) -> Result<()> {
        let instance = self.instance_mut(kind, index)?;
        *instance = RuleInstance::new(rule_type);
        normalize_instance(instance, catalog.resolve(kind, rule_type));
        Ok(())
    }

    pub fn set_operator(
        &mut self,
        kind: RuleKind,
        index: usize,
        operator: Option<String>,
    ) -> Result<()> {
        self.instance_mut(kind, index)?.operator = operator;
        Ok(())
    }

    /// 设置单位；目录只声明一个单位时保持自动选中的单位不变
    pub fn set_unit(
        &mut self,
        catalog: &RuleCatalog,
        kind: RuleKind,
        index: usize,
        unit: Option<String>,
    ) -> Result<()> {
        let instance = self.instance_mut(kind, index)?;
        let fixed = catalog
            .resolve(kind, &instance.rule_type)
            .and_then(RuleCatalogEntry::fixed_unit);

        match fixed {
            Some(fixed) => {
                debug!(kind = %kind, index, unit = %fixed, "Unit is fixed by catalog, ignoring change");
                instance.unit = Some(fixed.to_string());
            }
            None => instance.unit = unit,
        }
        Ok(())
    }

    /// 设置规则值，归一化后重新计算展示值
    pub fn set_value(
        &mut self,
        catalog: &RuleCatalog,
        kind: RuleKind,
        index: usize,
        value: Value,
    ) -> Result<()> {
        let instance = self.instance_mut(kind, index)?;
        let entry = catalog.resolve(kind, &instance.rule_type);
        instance.value = value;
        normalize_instance(instance, entry);
        Ok(())
    }

    /// 删除并返回指定规则实例，后续实例前移
    pub fn remove(&mut self, kind: RuleKind, index: usize) -> Result<RuleInstance> {
        let list = self.instances_mut(kind);
        if index >= list.len() {
            return Err(RuleError::InstanceNotFound { kind, index });
        }
        Ok(list.remove(index))
    }

    /// 载入已保存的规则实例以便编辑
    ///
    /// 与新增、编辑走同一个归一化函数，存储的展示值会被丢弃后重新计算。
    pub fn hydrate(&mut self, catalog: &RuleCatalog, kind: RuleKind, instances: Vec<RuleInstance>) {
        let hydrated: Vec<RuleInstance> = instances
            .into_iter()
            .map(|mut instance| {
                let entry = catalog.resolve(kind, &instance.rule_type);
                normalize_instance(&mut instance, entry);
                instance
            })
            .collect();

        debug!(kind = %kind, count = hydrated.len(), "Draft hydrated");
        *self.instances_mut(kind) = hydrated;
    }

    /// 序列化为活动创建/更新请求体中的规则部分
    pub fn to_request_body(&self) -> Value {
        json!({
            "conditions": self.conditions,
            "rewards": self.rewards,
            "limits": self.limits,
        })
    }
}

/// 新增、切换类型、设置值和水合共用的归一化
///
/// - TIME_IN_DAY 值统一为 `["HH:mm", "HH:mm"]`，无法解析时保留原值
/// - 只声明一个单位时强制使用该单位
/// - 只声明一个操作符且尚未选择时自动选中
/// - 重新计算展示值
fn normalize_instance(instance: &mut RuleInstance, entry: Option<&RuleCatalogEntry>) {
    if let Some(entry) = entry {
        if entry.value_type == ValueType::TimeInDay
            && let Some(normalized) = normalize_time_range(&instance.value)
        {
            instance.value = normalized;
        }
        if let Some(fixed) = entry.fixed_unit() {
            instance.unit = Some(fixed.to_string());
        }
        if instance.operator.is_none()
            && let [only] = entry.operator_codes()
        {
            instance.operator = Some(only.clone());
        }
    }
    instance.display_value = Some(build_display_value(entry, &instance.value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RuleOption;

    fn create_test_catalog() -> RuleCatalog {
        RuleCatalog::new(
            vec![
                RuleCatalogEntry::new("DAY_OF_WEEK", ValueType::Options)
                    .with_operators(["IN"])
                    .with_options(vec![
                        RuleOption::new("Mon", "MON"),
                        RuleOption::new("Tue", "TUE"),
                    ]),
                RuleCatalogEntry::new("HAPPY_HOUR", ValueType::TimeInDay),
            ],
            vec![
                RuleCatalogEntry::new("DISCOUNT", ValueType::Number)
                    .with_operators(["EQ", "GTE"])
                    .with_units(["PERCENT"]),
            ],
            vec![
                RuleCatalogEntry::new("WASH_DURATION", ValueType::Number)
                    .with_units(["MINUTE", "HOUR"]),
            ],
        )
    }

    #[test]
    fn test_add_applies_defaults() {
        let catalog = create_test_catalog();
        let mut draft = RuleDraft::new();

        let index = draft.add(&catalog, RuleKind::Reward, "DISCOUNT");
        let instance = &draft.instances(RuleKind::Reward)[index];
        assert_eq!(instance.unit.as_deref(), Some("PERCENT"));
        assert_eq!(instance.operator, None);
        assert_eq!(instance.display_value.as_deref(), Some(""));

        let index = draft.add(&catalog, RuleKind::Condition, "DAY_OF_WEEK");
        assert_eq!(
            draft.instances(RuleKind::Condition)[index].operator.as_deref(),
            Some("IN")
        );
    }

    #[test]
    fn test_add_unknown_type() {
        let catalog = create_test_catalog();
        let mut draft = RuleDraft::new();

        let index = draft.add(&catalog, RuleKind::Limit, "UNKNOWN");
        let instance = &draft.instances(RuleKind::Limit)[index];
        assert_eq!(instance.unit, None);
        assert_eq!(instance.operator, None);
    }

    #[test]
    fn test_set_value_recomputes_display() {
        let catalog = create_test_catalog();
        let mut draft = RuleDraft::new();
        let index = draft.add(&catalog, RuleKind::Condition, "DAY_OF_WEEK");

        draft
            .set_value(&catalog, RuleKind::Condition, index, json!(["TUE", "MON"]))
            .unwrap();

        let instance = &draft.instances(RuleKind::Condition)[index];
        assert_eq!(instance.value, json!(["TUE", "MON"]));
        assert_eq!(instance.display_value.as_deref(), Some("Mon, Tue"));
    }

    #[test]
    fn test_set_type_resets_instance() {
        let catalog = create_test_catalog();
        let mut draft = RuleDraft::new();
        let index = draft.add(&catalog, RuleKind::Condition, "DAY_OF_WEEK");
        draft
            .set_value(&catalog, RuleKind::Condition, index, json!(["MON"]))
            .unwrap();

        draft
            .set_type(&catalog, RuleKind::Condition, index, "HAPPY_HOUR")
            .unwrap();

        let instance = &draft.instances(RuleKind::Condition)[index];
        assert_eq!(instance.rule_type, "HAPPY_HOUR");
        assert_eq!(instance.value, Value::Null);
        assert_eq!(instance.operator, None);
        assert_eq!(instance.display_value.as_deref(), Some(""));
    }

    #[test]
    fn test_set_unit_respects_fixed_unit() {
        let catalog = create_test_catalog();
        let mut draft = RuleDraft::new();

        let reward = draft.add(&catalog, RuleKind::Reward, "DISCOUNT");
        draft
            .set_unit(&catalog, RuleKind::Reward, reward, Some("AMOUNT".into()))
            .unwrap();
        assert_eq!(
            draft.instances(RuleKind::Reward)[reward].unit.as_deref(),
            Some("PERCENT")
        );

        let limit = draft.add(&catalog, RuleKind::Limit, "WASH_DURATION");
        draft
            .set_unit(&catalog, RuleKind::Limit, limit, Some("HOUR".into()))
            .unwrap();
        assert_eq!(
            draft.instances(RuleKind::Limit)[limit].unit.as_deref(),
            Some("HOUR")
        );
    }

    #[test]
    fn test_set_operator() {
        let catalog = create_test_catalog();
        let mut draft = RuleDraft::new();
        let index = draft.add(&catalog, RuleKind::Reward, "DISCOUNT");

        draft
            .set_operator(RuleKind::Reward, index, Some("GTE".into()))
            .unwrap();
        assert_eq!(
            draft.instances(RuleKind::Reward)[index].operator.as_deref(),
            Some("GTE")
        );
    }

    #[test]
    fn test_remove_shifts_instances() {
        let catalog = create_test_catalog();
        let mut draft = RuleDraft::new();
        draft.add(&catalog, RuleKind::Condition, "DAY_OF_WEEK");
        draft.add(&catalog, RuleKind::Condition, "HAPPY_HOUR");

        let removed = draft.remove(RuleKind::Condition, 0).unwrap();
        assert_eq!(removed.rule_type, "DAY_OF_WEEK");
        assert_eq!(draft.instances(RuleKind::Condition).len(), 1);
        assert_eq!(draft.instances(RuleKind::Condition)[0].rule_type, "HAPPY_HOUR");
    }

    #[test]
    fn test_index_out_of_range() {
        let catalog = create_test_catalog();
        let mut draft = RuleDraft::new();

        let result = draft.set_value(&catalog, RuleKind::Limit, 0, json!(5));
        assert!(matches!(
            result,
            Err(RuleError::InstanceNotFound {
                kind: RuleKind::Limit,
                index: 0
            })
        ));
        assert!(draft.remove(RuleKind::Reward, 2).is_err());
        assert!(draft.set_operator(RuleKind::Condition, 1, None).is_err());
    }

    #[test]
    fn test_hydrate_normalizes_time_and_display() {
        let catalog = create_test_catalog();
        let mut draft = RuleDraft::new();

        let saved = RuleInstance {
            rule_type: "HAPPY_HOUR".into(),
            operator: None,
            value: json!(["08:00:00", "2024-01-01T22:30:00Z"]),
            unit: None,
            display_value: Some("stale".into()),
        };
        draft.hydrate(&catalog, RuleKind::Condition, vec![saved]);

        let instance = &draft.instances(RuleKind::Condition)[0];
        assert_eq!(instance.value, json!(["08:00", "22:30"]));
        assert_eq!(instance.display_value.as_deref(), Some("08:00–22:30"));
    }

    #[test]
    fn test_hydrate_reapplies_fixed_unit() {
        let catalog = create_test_catalog();
        let mut draft = RuleDraft::new();

        let mut saved = RuleInstance::new("DISCOUNT");
        saved.value = json!(15);
        draft.hydrate(&catalog, RuleKind::Reward, vec![saved]);

        let instance = &draft.instances(RuleKind::Reward)[0];
        assert_eq!(instance.unit.as_deref(), Some("PERCENT"));
        assert_eq!(instance.display_value.as_deref(), Some("15"));
    }

    #[test]
    fn test_to_request_body() {
        let catalog = create_test_catalog();
        let mut draft = RuleDraft::new();
        let index = draft.add(&catalog, RuleKind::Reward, "DISCOUNT");
        draft
            .set_value(&catalog, RuleKind::Reward, index, json!(20))
            .unwrap();

        let body = draft.to_request_body();
        assert_eq!(body["conditions"], json!([]));
        assert_eq!(body["limits"], json!([]));
        assert_eq!(
            body["rewards"],
            json!([{
                "type": "DISCOUNT",
                "value": 20,
                "unit": "PERCENT",
                "display_value": "20"
            }])
        );
    }

    #[test]
    fn test_set_value_normalizes_time_range() {
        let catalog = create_test_catalog();
        let mut draft = RuleDraft::new();
        let index = draft.add(&catalog, RuleKind::Condition, "HAPPY_HOUR");

        draft
            .set_value(&catalog, RuleKind::Condition, index, json!(["08:00:00", "22:30:00"]))
            .unwrap();

        let instance = &draft.instances(RuleKind::Condition)[index];
        assert_eq!(instance.value, json!(["08:00", "22:30"]));
        assert_eq!(instance.display_value.as_deref(), Some("08:00–22:30"));
    }

    #[test]
    fn test_hydrate_assigns_single_operator() {
        let catalog = create_test_catalog();
        let mut draft = RuleDraft::new();

        let mut saved = RuleInstance::new("DAY_OF_WEEK");
        saved.value = json!(["MON"]);
        draft.hydrate(&catalog, RuleKind::Condition, vec![saved]);

        let instance = &draft.instances(RuleKind::Condition)[0];
        assert_eq!(instance.operator.as_deref(), Some("IN"));
        assert_eq!(instance.display_value.as_deref(), Some("Mon"));
    }

    #[test]
    fn test_hydrate_keeps_saved_operator() {
        let catalog = create_test_catalog();
        let mut draft = RuleDraft::new();

        let mut saved = RuleInstance::new("DISCOUNT");
        saved.operator = Some("GTE".into());
        draft.hydrate(&catalog, RuleKind::Reward, vec![saved]);

        assert_eq!(
            draft.instances(RuleKind::Reward)[0].operator.as_deref(),
            Some("GTE")
        );
    }
}
