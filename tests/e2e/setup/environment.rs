//! 测试环境
//!
//! 组装注册表、令牌网关与谓词目录，模拟会话提供方的一个发布版本。

use portal_shared::config::InvalidTokenPolicy;
use std::sync::Arc;
use visibility_rules::{
    AttributeRegistry, EvaluationContext, PredicateCatalog, VisibilityCodec, VisibilityGate,
    VisibilityRules,
};

/// 测试环境
pub struct TestEnvironment {
    pub gate: VisibilityGate,
    pub catalog: PredicateCatalog,
    pub context: EvaluationContext,
}

impl TestEnvironment {
    /// 当前版本注册表，默认回退策略
    pub fn setup() -> Self {
        Self::with_registry(AttributeRegistry::member_portal(), InvalidTokenPolicy::Fallback)
    }

    /// 当前版本注册表，指定损坏令牌策略
    pub fn with_policy(policy: InvalidTokenPolicy) -> Self {
        Self::with_registry(AttributeRegistry::member_portal(), policy)
    }

    /// 只包含前 `len` 个属性的历史版本
    pub fn release(len: usize) -> Self {
        Self::with_registry(
            AttributeRegistry::member_portal().prefix(len),
            InvalidTokenPolicy::Fallback,
        )
    }

    pub fn with_registry(registry: AttributeRegistry, policy: InvalidTokenPolicy) -> Self {
        Self {
            gate: VisibilityGate::new(VisibilityCodec::new(Arc::new(registry)), policy),
            catalog: PredicateCatalog::member_portal().unwrap(),
            context: EvaluationContext::new(),
        }
    }

    pub fn with_context(mut self, context: EvaluationContext) -> Self {
        self.context = context;
        self
    }

    /// 求值单个谓词的布尔结果
    pub fn visible(&self, rules: &VisibilityRules, predicate: &str) -> bool {
        self.catalog
            .evaluate(predicate, rules, &self.context)
            .unwrap()
            .as_bool()
    }
}
