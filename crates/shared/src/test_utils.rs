//! 测试工具模块
//!
//! 提供常见会员画像的属性集 fixture（JSON 形式），供各 crate 的单元测试、
//! 集成测试和基准测试复用。属性名与会员门户属性注册表保持一致。

use serde_json::{Value, json};

/// 会员画像 fixture 生成器
pub struct MemberFixtures;

impl MemberFixtures {
    /// 在职商业团险会员：医疗 + 牙科 + 视力 + 药房
    pub fn active_commercial() -> Value {
        json!({
            "active": true,
            "subscriber": true,
            "medical": true,
            "dental": true,
            "vision": true,
            "pharmacy": true,
            "commercial": true,
            "id_card_eligible": true,
            "chat_eligible": true,
            "hsa_eligible": true
        })
    }

    /// 已终止的商业会员
    pub fn terminated_commercial() -> Value {
        json!({
            "active": false,
            "subscriber": true,
            "medical": true,
            "dental": true,
            "vision": true,
            "pharmacy": true,
            "commercial": true,
            "terminated": true
        })
    }

    /// 尚未生效的个人险会员
    pub fn future_effective_individual() -> Value {
        json!({
            "active": true,
            "subscriber": true,
            "medical": true,
            "pharmacy": true,
            "individual": true,
            "id_card_eligible": true,
            "future_effective": true
        })
    }

    /// Medicare Advantage 会员（含处方药计划）
    pub fn medicare_advantage() -> Value {
        json!({
            "active": true,
            "subscriber": true,
            "medical": true,
            "pharmacy": true,
            "medicare_advantage": true,
            "medicare_prescription": true,
            "id_card_eligible": true,
            "chat_eligible": true
        })
    }

    /// Medicaid 会员
    pub fn medicaid() -> Value {
        json!({
            "active": true,
            "medical": true,
            "pharmacy": true,
            "medicaid": true,
            "chat_eligible": true,
            "id_card_eligible": true
        })
    }

    /// 仅 FSA 账户的会员（无医疗/牙科/视力）
    pub fn fsa_only() -> Value {
        json!({
            "active": true,
            "subscriber": true,
            "commercial": true,
            "fsa_only": true
        })
    }

    /// 仅健康管理计划的会员
    pub fn wellness_only() -> Value {
        json!({
            "active": true,
            "commercial": true,
            "wellness_only": true
        })
    }

    /// 使用 JS 风格真值的原始会话属性（数字、字符串、null 混合）
    pub fn loosely_typed() -> Value {
        json!({
            "active": 1,
            "medical": "Y",
            "dental": 0,
            "vision": "",
            "pharmacy": null,
            "commercial": [],
            "terminated": false
        })
    }

    /// 所有 fixture，带名称
    pub fn all() -> Vec<(&'static str, Value)> {
        vec![
            ("active_commercial", Self::active_commercial()),
            ("terminated_commercial", Self::terminated_commercial()),
            ("future_effective_individual", Self::future_effective_individual()),
            ("medicare_advantage", Self::medicare_advantage()),
            ("medicaid", Self::medicaid()),
            ("fsa_only", Self::fsa_only()),
            ("wellness_only", Self::wellness_only()),
            ("loosely_typed", Self::loosely_typed()),
        ]
    }
}
