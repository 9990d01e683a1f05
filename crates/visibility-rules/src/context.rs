//! 谓词评估上下文
//!
//! 部分谓词需要属性集之外的显式参数（团体号、计划生效/终止日期、参照日期）。
//! 这些参数在调用处通过 `GroupId::parse` / `PlanTerm::new` 校验，
//! 谓词本身只接收已校验的值，不会自行获取上下文。

use crate::error::{Result, RuleError};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// 日期格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 团体号最大长度
const GROUP_ID_MAX_LEN: usize = 20;

/// 已校验的团体号（大写、仅字母数字）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GroupId(String);

impl GroupId {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(RuleError::invalid_context("group_id", "不能为空"));
        }
        if trimmed.len() > GROUP_ID_MAX_LEN {
            return Err(RuleError::invalid_context(
                "group_id",
                format!("长度不能超过 {} 个字符", GROUP_ID_MAX_LEN),
            ));
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(RuleError::invalid_context(
                "group_id",
                format!("只能包含字母和数字: '{}'", trimmed),
            ));
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 计划有效期（终止日期可缺省，表示长期有效）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanTerm {
    effective: NaiveDate,
    term: Option<NaiveDate>,
}

impl PlanTerm {
    pub fn new(effective: NaiveDate, term: Option<NaiveDate>) -> Result<Self> {
        if let Some(term) = term {
            if term < effective {
                return Err(RuleError::invalid_context(
                    "plan_term",
                    format!("终止日期 {} 早于生效日期 {}", term, effective),
                ));
            }
        }

        Ok(Self { effective, term })
    }

    /// 从 `YYYY-MM-DD` 字符串解析
    pub fn parse(effective: &str, term: Option<&str>) -> Result<Self> {
        let effective = parse_date("plan_effective_date", effective)?;
        let term = term
            .map(|t| parse_date("plan_term_date", t))
            .transpose()?;

        Self::new(effective, term)
    }

    pub fn effective(&self) -> NaiveDate {
        self.effective
    }

    pub fn term(&self) -> Option<NaiveDate> {
        self.term
    }

    /// 参照日期是否落在有效期内（两端闭区间）
    pub fn covers(&self, as_of: NaiveDate) -> bool {
        as_of >= self.effective && self.term.is_none_or(|term| as_of <= term)
    }

    /// 距终止日期的天数；无终止日期时为 None，已过终止日期时为负数
    pub fn days_until_term(&self, as_of: NaiveDate) -> Option<i64> {
        self.term.map(|term| (term - as_of).num_days())
    }
}

/// 解析 `YYYY-MM-DD` 日期参数
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|e| {
        RuleError::invalid_context(field, format!("无法解析日期 '{}': {}", raw, e))
    })
}

/// 评估上下文
///
/// 由调用方显式构造；缺失的上下文会使依赖它的谓词返回 false。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationContext {
    pub group_id: Option<GroupId>,
    pub plan_term: Option<PlanTerm>,
    pub as_of: Option<NaiveDate>,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group_id(mut self, group_id: GroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn with_plan_term(mut self, plan_term: PlanTerm) -> Self {
        self.plan_term = Some(plan_term);
        self
    }

    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    /// 同时具备计划有效期和参照日期时返回二者
    pub fn dated_term(&self) -> Option<(&PlanTerm, NaiveDate)> {
        self.plan_term.as_ref().zip(self.as_of)
    }
}
