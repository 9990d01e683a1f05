//! 谓词目录
//!
//! 显式注册的、有序的具名谓词集合。调用方按名称解析谓词，
//! 诊断接口通过目录枚举全部谓词。
//!
//! 注册时校验依赖：谓词只能依赖更早注册的谓词，因此依赖图天然无环，
//! 注册顺序即为一个合法的拓扑序。

use crate::context::EvaluationContext;
use crate::error::{Result, RuleError};
use crate::models::{PredicateValue, VisibilityRules};
use crate::predicates;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, instrument};

/// 谓词求值函数
pub type PredicateFn = fn(&PredicateInput<'_>) -> PredicateValue;

/// 谓词类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateKind {
    /// 直接返回单个属性
    PassThrough,
    /// 属性的布尔/枚举组合
    Composite,
    /// 需要显式上下文（团体号、日期）
    Contextual,
    /// 组合其他派生谓词的结果
    Dependent,
}

/// 谓词定义
#[derive(Clone)]
pub struct PredicateDef {
    pub name: &'static str,
    pub kind: PredicateKind,
    pub depends_on: &'static [&'static str],
    pub eval: PredicateFn,
}

impl PredicateDef {
    pub fn new(name: &'static str, kind: PredicateKind, eval: PredicateFn) -> Self {
        Self {
            name,
            kind,
            depends_on: &[],
            eval,
        }
    }

    pub fn depends_on(mut self, deps: &'static [&'static str]) -> Self {
        self.depends_on = deps;
        self
    }
}

impl fmt::Debug for PredicateDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("depends_on", &self.depends_on)
            .finish_non_exhaustive()
    }
}

/// 谓词求值时的输入视图
///
/// `flag` / `value` 只能读到 `depends_on` 中声明的谓词；未声明的名称读作 false / None，
/// 无论该谓词是否已在本次求值中算出。
pub struct PredicateInput<'a> {
    rules: &'a VisibilityRules,
    context: &'a EvaluationContext,
    depends_on: &'static [&'static str],
    resolved: &'a HashMap<&'static str, PredicateValue>,
}

impl<'a> PredicateInput<'a> {
    pub fn rules(&self) -> &'a VisibilityRules {
        self.rules
    }

    pub fn context(&self) -> &'a EvaluationContext {
        self.context
    }

    /// 读取原始属性
    pub fn attr(&self, name: &str) -> bool {
        self.rules.get(name)
    }

    /// 读取已求值的布尔谓词
    pub fn flag(&self, predicate: &str) -> bool {
        self.value(predicate).is_some_and(|v| v.as_bool())
    }

    /// 读取已求值的谓词值
    pub fn value(&self, predicate: &str) -> Option<PredicateValue> {
        if !self.depends_on.iter().any(|dep| *dep == predicate) {
            return None;
        }
        self.resolved.get(predicate).copied()
    }
}

/// 单个谓词的求值结果
#[derive(Debug, Clone, Serialize)]
pub struct PredicateOutcome {
    pub name: &'static str,
    pub kind: PredicateKind,
    pub value: PredicateValue,
}

/// 全量求值报告（按注册顺序）
#[derive(Debug, Clone, Serialize)]
pub struct PredicateReport {
    pub outcomes: Vec<PredicateOutcome>,
}

impl PredicateReport {
    pub fn get(&self, name: &str) -> Option<PredicateValue> {
        self.outcomes
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.value)
    }

    /// 结果为 true 的布尔谓词名
    pub fn enabled(&self) -> Vec<&'static str> {
        self.outcomes
            .iter()
            .filter(|o| o.value.as_bool())
            .map(|o| o.name)
            .collect()
    }
}

/// 谓词目录
#[derive(Debug, Clone, Default)]
pub struct PredicateCatalog {
    defs: Vec<PredicateDef>,
    index: HashMap<&'static str, usize>,
}

impl PredicateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册谓词；重名或依赖未先注册时报错
    pub fn register(&mut self, def: PredicateDef) -> Result<()> {
        if self.index.contains_key(def.name) {
            return Err(RuleError::DuplicatePredicate(def.name.to_string()));
        }

        if let Some(missing) = def
            .depends_on
            .iter()
            .find(|dep| !self.index.contains_key(*dep))
        {
            return Err(RuleError::UnresolvedDependency {
                predicate: def.name.to_string(),
                dependency: missing.to_string(),
            });
        }

        debug!(predicate = def.name, kind = ?def.kind, "谓词已注册");
        self.index.insert(def.name, self.defs.len());
        self.defs.push(def);
        Ok(())
    }

    /// 会员门户的完整谓词目录
    pub fn member_portal() -> Result<Self> {
        let mut catalog = Self::new();
        for def in member_portal_defs() {
            catalog.register(def)?;
        }

        info!(predicates = catalog.len(), "Predicate catalog built");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&PredicateDef> {
        self.index.get(name).map(|&i| &self.defs[i])
    }

    /// 按注册顺序返回谓词名
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.defs.iter().map(|d| d.name)
    }

    pub fn defs(&self) -> &[PredicateDef] {
        &self.defs
    }

    /// 按名称求值单个谓词，只计算其传递依赖
    pub fn evaluate(
        &self,
        name: &str,
        rules: &VisibilityRules,
        context: &EvaluationContext,
    ) -> Result<PredicateValue> {
        let target = *self
            .index
            .get(name)
            .ok_or_else(|| RuleError::UnknownPredicate(name.to_string()))?;

        let needed = self.dependency_closure(target);
        let resolved = self.resolve(rules, context, |i| needed[i], target + 1);

        // resolve 必然包含 target
        Ok(resolved
            .get(self.defs[target].name)
            .copied()
            .unwrap_or(PredicateValue::Bool(false)))
    }

    /// 按注册顺序求值全部谓词
    #[instrument(skip_all, fields(predicates = self.defs.len()))]
    pub fn evaluate_all(
        &self,
        rules: &VisibilityRules,
        context: &EvaluationContext,
    ) -> PredicateReport {
        let resolved = self.resolve(rules, context, |_| true, self.defs.len());

        let outcomes = self
            .defs
            .iter()
            .map(|def| PredicateOutcome {
                name: def.name,
                kind: def.kind,
                value: resolved
                    .get(def.name)
                    .copied()
                    .unwrap_or(PredicateValue::Bool(false)),
            })
            .collect();

        PredicateReport { outcomes }
    }

    /// 按注册顺序求值前 `limit` 个谓词中被选中的部分
    fn resolve(
        &self,
        rules: &VisibilityRules,
        context: &EvaluationContext,
        selected: impl Fn(usize) -> bool,
        limit: usize,
    ) -> HashMap<&'static str, PredicateValue> {
        let mut resolved = HashMap::with_capacity(limit);

        for (i, def) in self.defs.iter().enumerate().take(limit) {
            if !selected(i) {
                continue;
            }
            let value = (def.eval)(&PredicateInput {
                rules,
                context,
                depends_on: def.depends_on,
                resolved: &resolved,
            });
            resolved.insert(def.name, value);
        }

        resolved
    }

    /// 目标谓词及其传递依赖的位置掩码
    fn dependency_closure(&self, target: usize) -> Vec<bool> {
        let mut needed = vec![false; self.defs.len()];
        let mut stack = vec![target];

        while let Some(i) = stack.pop() {
            if needed[i] {
                continue;
            }
            needed[i] = true;
            stack.extend(
                self.defs[i]
                    .depends_on
                    .iter()
                    .filter_map(|dep| self.index.get(dep).copied()),
            );
        }

        needed
    }
}

fn member_portal_defs() -> Vec<PredicateDef> {
    use PredicateKind::*;

    vec![
        // 直通
        PredicateDef::new("has_medical", PassThrough, |i| {
            predicates::has_medical(i.rules()).into()
        }),
        PredicateDef::new("has_dental", PassThrough, |i| {
            predicates::has_dental(i.rules()).into()
        }),
        PredicateDef::new("has_vision", PassThrough, |i| {
            predicates::has_vision(i.rules()).into()
        }),
        PredicateDef::new("has_pharmacy", PassThrough, |i| {
            predicates::has_pharmacy(i.rules()).into()
        }),
        PredicateDef::new("has_behavioral_health", PassThrough, |i| {
            predicates::has_behavioral_health(i.rules()).into()
        }),
        PredicateDef::new("is_subscriber", PassThrough, |i| {
            predicates::is_subscriber(i.rules()).into()
        }),
        // 组合
        PredicateDef::new("is_active_member", Composite, |i| {
            predicates::is_active_member(i.rules()).into()
        }),
        PredicateDef::new("is_future_effective", Composite, |i| {
            predicates::is_future_effective(i.rules()).into()
        }),
        PredicateDef::new("is_vision_eligible", Composite, |i| {
            predicates::is_vision_eligible(i.rules()).into()
        }),
        PredicateDef::new("is_dental_eligible", Composite, |i| {
            predicates::is_dental_eligible(i.rules()).into()
        }),
        PredicateDef::new("is_pharmacy_eligible", Composite, |i| {
            predicates::is_pharmacy_eligible(i.rules()).into()
        }),
        PredicateDef::new("is_medicare", Composite, |i| {
            predicates::is_medicare(i.rules()).into()
        }),
        PredicateDef::new("is_wellness_only", Composite, |i| {
            predicates::is_wellness_only(i.rules()).into()
        }),
        PredicateDef::new("is_fsa_only", Composite, |i| {
            predicates::is_fsa_only(i.rules()).into()
        }),
        PredicateDef::new("plan_kind", Composite, |i| {
            predicates::plan_kind(i.rules()).into()
        }),
        PredicateDef::new("coverage_status", Composite, |i| {
            predicates::coverage_status(i.rules()).into()
        }),
        // 上下文
        PredicateDef::new("is_rewards_group", Contextual, |i| {
            i.context()
                .group_id
                .as_ref()
                .is_some_and(|group| predicates::is_rewards_group(i.rules(), group))
                .into()
        }),
        PredicateDef::new("is_plan_in_effect", Contextual, |i| {
            i.context()
                .dated_term()
                .is_some_and(|(term, as_of)| predicates::is_plan_in_effect(i.rules(), term, as_of))
                .into()
        }),
        PredicateDef::new("is_in_renewal_window", Contextual, |i| {
            i.context()
                .dated_term()
                .is_some_and(|(term, as_of)| {
                    predicates::is_in_renewal_window(i.rules(), term, as_of)
                })
                .into()
        }),
        // 依赖
        PredicateDef::new("show_claims", Dependent, |i| {
            predicates::show_claims(i.rules()).into()
        })
        .depends_on(&[
            "has_medical",
            "is_dental_eligible",
            "is_vision_eligible",
            "is_fsa_only",
            "is_wellness_only",
        ]),
        PredicateDef::new("show_benefits", Dependent, |i| {
            predicates::show_benefits(i.rules()).into()
        })
        .depends_on(&["is_active_member", "is_wellness_only"]),
        PredicateDef::new("show_pharmacy", Dependent, |i| {
            predicates::show_pharmacy(i.rules()).into()
        })
        .depends_on(&["is_pharmacy_eligible", "is_medicare"]),
        PredicateDef::new("show_id_card", Dependent, |i| {
            predicates::show_id_card(i.rules()).into()
        })
        .depends_on(&["is_active_member", "is_future_effective"]),
        PredicateDef::new("show_chat", Dependent, |i| {
            predicates::show_chat(i.rules()).into()
        })
        .depends_on(&["is_active_member", "plan_kind"]),
        PredicateDef::new("show_spending_accounts", Dependent, |i| {
            predicates::show_spending_accounts(i.rules()).into()
        })
        .depends_on(&["is_fsa_only", "coverage_status"]),
        PredicateDef::new("show_prior_authorization", Dependent, |i| {
            predicates::show_prior_authorization(i.rules()).into()
        })
        .depends_on(&["has_medical", "is_active_member"]),
        PredicateDef::new("show_care_management", Dependent, |i| {
            predicates::show_care_management(i.rules()).into()
        })
        .depends_on(&["is_active_member", "is_medicare", "has_behavioral_health"]),
        PredicateDef::new("show_telehealth", Dependent, |i| {
            predicates::show_telehealth(i.rules()).into()
        })
        .depends_on(&["has_medical", "is_active_member"]),
        PredicateDef::new("show_rewards", Dependent, |i| {
            i.context()
                .group_id
                .as_ref()
                .is_some_and(|group| predicates::show_rewards(i.rules(), group))
                .into()
        })
        .depends_on(&["is_active_member", "is_rewards_group"]),
        PredicateDef::new("show_renewal_banner", Dependent, |i| {
            i.context()
                .dated_term()
                .is_some_and(|(term, as_of)| {
                    predicates::show_renewal_banner(i.rules(), term, as_of)
                })
                .into()
        })
        .depends_on(&["is_in_renewal_window", "is_medicare"]),
    ]
}
