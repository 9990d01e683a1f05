//! 可见性规则错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("令牌格式错误: 位置 {offset} 的字符 {character:?} 不在编码字母表中")]
    MalformedToken { offset: usize, character: char },

    #[error("未注册的属性: {0}")]
    UnknownAttribute(String),

    #[error("属性重复注册: {0}")]
    DuplicateAttribute(String),

    #[error("未注册的谓词: {0}")]
    UnknownPredicate(String),

    #[error("谓词重复注册: {0}")]
    DuplicatePredicate(String),

    #[error("谓词 {predicate} 依赖的 {dependency} 必须先注册")]
    UnresolvedDependency {
        predicate: String,
        dependency: String,
    },

    #[error("无效的上下文参数 {field}: {message}")]
    InvalidContext { field: String, message: String },

    #[error("JSON 序列化错误: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RuleError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedToken { .. } => "MALFORMED_TOKEN",
            Self::UnknownAttribute(_) => "UNKNOWN_ATTRIBUTE",
            Self::DuplicateAttribute(_) => "DUPLICATE_ATTRIBUTE",
            Self::UnknownPredicate(_) => "UNKNOWN_PREDICATE",
            Self::DuplicatePredicate(_) => "DUPLICATE_PREDICATE",
            Self::UnresolvedDependency { .. } => "UNRESOLVED_DEPENDENCY",
            Self::InvalidContext { .. } => "INVALID_CONTEXT",
            Self::JsonError(_) => "JSON_ERROR",
        }
    }

    pub(crate) fn invalid_context(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidContext {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RuleError>;
