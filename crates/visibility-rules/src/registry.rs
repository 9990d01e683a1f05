//! 属性注册表
//!
//! 定义属性名与比特位置的映射。注册表只允许在末尾追加：
//! 已发布的位置永不复用、永不重排，废弃的属性保留原有槽位，
//! 以保证已签发令牌仍能被正确解码。

use crate::error::{Result, RuleError};
use serde::Serialize;
use std::collections::HashMap;

/// 会员门户属性表（按位置顺序）
///
/// 第二列为废弃标记。只能在末尾追加新属性。
const MEMBER_PORTAL_ATTRIBUTES: &[(&str, bool)] = &[
    ("active", false),
    ("subscriber", false),
    ("medical", false),
    ("dental", false),
    ("vision", false),
    ("pharmacy", false),
    ("terminated", false),
    ("future_effective", false),
    ("commercial", false),
    ("individual", false),
    ("medicare", false),
    ("medicaid", false),
    ("medicare_advantage", false),
    ("medicare_prescription", false),
    ("wellness_only", false),
    ("fsa_only", false),
    ("hsa_eligible", false),
    ("hra_eligible", false),
    ("self_funded", false),
    ("paper_eob", true),
    ("behavioral_health", false),
    ("cobra", false),
    ("id_card_eligible", false),
    ("chat_eligible", false),
    ("telehealth", false),
    ("care_management", false),
    ("legacy_portal", true),
    ("prior_authorization", false),
    ("spending_account_admin", false),
    ("amplify_health", false),
];

/// 注册表条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeEntry {
    pub name: String,
    pub position: usize,
    pub deprecated: bool,
}

/// 属性注册表
///
/// 进程启动时构建一次，之后只读；通过 `Arc` 在请求间共享。
#[derive(Debug, Clone)]
pub struct AttributeRegistry {
    entries: Vec<AttributeEntry>,
    index: HashMap<String, usize>,
}

impl AttributeRegistry {
    /// 创建注册表构建器
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// 按给定顺序从属性名构建
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .fold(Self::builder(), |builder, name| builder.attribute(name))
            .build()
    }

    /// 会员门户当前发布的注册表
    pub fn member_portal() -> Self {
        let entries: Vec<AttributeEntry> = MEMBER_PORTAL_ATTRIBUTES
            .iter()
            .enumerate()
            .map(|(position, (name, deprecated))| AttributeEntry {
                name: name.to_string(),
                position,
                deprecated: *deprecated,
            })
            .collect();
        let index = entries
            .iter()
            .map(|e| (e.name.clone(), e.position))
            .collect();

        Self { entries, index }
    }

    /// 按位置顺序返回全部属性名
    pub fn all_names(&self) -> Vec<&str> {
        self.names().collect()
    }

    /// 按位置顺序迭代属性名
    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// 查询属性的比特位置（仅用于诊断工具）
    pub fn position_of(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| RuleError::UnknownAttribute(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// 属性是否已废弃；未注册的属性返回 false
    pub fn is_deprecated(&self, name: &str) -> bool {
        self.index
            .get(name)
            .is_some_and(|&pos| self.entries[pos].deprecated)
    }

    pub fn entries(&self) -> &[AttributeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 取前 `len` 个属性构成的旧版本注册表
    ///
    /// 由于只追加，任一前缀都等同于某个历史发布版本。
    pub fn prefix(&self, len: usize) -> Self {
        let entries: Vec<AttributeEntry> = self.entries.iter().take(len).cloned().collect();
        let index = entries
            .iter()
            .map(|e| (e.name.clone(), e.position))
            .collect();

        Self { entries, index }
    }
}

/// 注册表构建器
///
/// 位置按注册顺序分配（从 0 开始）；重复名称在 `build` 时报错。
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: Vec<AttributeEntry>,
    index: HashMap<String, usize>,
    duplicate: Option<String>,
}

impl RegistryBuilder {
    /// 追加属性
    pub fn attribute(self, name: impl Into<String>) -> Self {
        self.push(name.into(), false)
    }

    /// 追加一个已废弃属性（仅为保留槽位）
    pub fn deprecated(self, name: impl Into<String>) -> Self {
        self.push(name.into(), true)
    }

    fn push(mut self, name: String, deprecated: bool) -> Self {
        if self.index.contains_key(&name) {
            self.duplicate.get_or_insert(name);
            return self;
        }

        let position = self.entries.len();
        self.index.insert(name.clone(), position);
        self.entries.push(AttributeEntry {
            name,
            position,
            deprecated,
        });
        self
    }

    pub fn build(self) -> Result<AttributeRegistry> {
        if let Some(name) = self.duplicate {
            return Err(RuleError::DuplicateAttribute(name));
        }

        Ok(AttributeRegistry {
            entries: self.entries,
            index: self.index,
        })
    }
}
