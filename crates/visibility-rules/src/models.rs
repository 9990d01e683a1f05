//! 可见性规则领域模型

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// 会员可见性属性集（属性名 -> 布尔值）
///
/// 缺失的属性一律按 `false` 处理，读取永不失败。
/// 每次请求解码得到一份新的实例，请求内不可变。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisibilityRules {
    attributes: BTreeMap<String, bool>,
}

impl VisibilityRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 (属性名, 值) 对构建
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        Self {
            attributes: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// 由值为 true 的属性名构建
    pub fn with_true<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_pairs(names.into_iter().map(|n| (n, true)))
    }

    /// 从会话提供方给出的 JSON 对象构建，按 JS 真值规则转换
    ///
    /// 非对象输入得到空属性集。
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self {
                attributes: map
                    .iter()
                    .map(|(k, v)| (k.clone(), is_truthy(v)))
                    .collect(),
            },
            _ => Self::default(),
        }
    }

    /// 解析原始 JSON 文本后按 [`Self::from_json`] 转换
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Ok(Self::from_json(&value))
    }

    /// 读取属性；缺失即 false
    pub fn get(&self, name: &str) -> bool {
        self.attributes.get(name).copied().unwrap_or(false)
    }

    /// 属性是否显式出现在集合中（无论真假）
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: bool) {
        self.attributes.insert(name.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.attributes.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// 值为 true 的属性名（按字典序）
    pub fn enabled(&self) -> Vec<&str> {
        self.iter().filter(|(_, v)| *v).map(|(k, _)| k).collect()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// JS 风格真值：null、false、0、NaN、空字符串为假，其余为真
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// 会员计划类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    Medicare,
    Medicaid,
    Individual,
    Commercial,
    Unknown,
}

impl PlanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medicare => "medicare",
            Self::Medicaid => "medicaid",
            Self::Individual => "individual",
            Self::Commercial => "commercial",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 保障状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageStatus {
    Terminated,
    FutureEffective,
    Active,
    Inactive,
}

impl CoverageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Terminated => "terminated",
            Self::FutureEffective => "future_effective",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for CoverageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 派生谓词的取值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PredicateValue {
    Bool(bool),
    Plan(PlanKind),
    Coverage(CoverageStatus),
}

impl PredicateValue {
    /// 布尔视图；枚举值一律视为 false
    pub fn as_bool(&self) -> bool {
        matches!(self, Self::Bool(true))
    }
}

impl From<bool> for PredicateValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<PlanKind> for PredicateValue {
    fn from(value: PlanKind) -> Self {
        Self::Plan(value)
    }
}

impl From<CoverageStatus> for PredicateValue {
    fn from(value: CoverageStatus) -> Self {
        Self::Coverage(value)
    }
}

impl fmt::Display for PredicateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Plan(p) => write!(f, "{}", p),
            Self::Coverage(c) => write!(f, "{}", c),
        }
    }
}
