//! 会员门户派生谓词
//!
//! 所有函数都是属性集（及显式上下文）的纯函数，缺失属性按 false 处理。
//! 依赖型谓词只调用本文件中更早定义的谓词，依赖关系构成 DAG。

use crate::context::{GroupId, PlanTerm};
use crate::models::{CoverageStatus, PlanKind, VisibilityRules};
use chrono::NaiveDate;

/// 参与会员奖励计划的团体号
pub const REWARDS_GROUP_ALLOW_LIST: &[&str] = &[
    "100000", "112233", "129800", "130441", "145520", "87500A", "CORP01", "STATE2",
];

/// 续保提醒窗口（终止日前的天数，含当天）
pub const RENEWAL_WINDOW_DAYS: i64 = 60;

// ==================== 直通谓词 ====================

pub fn has_medical(rules: &VisibilityRules) -> bool {
    rules.get("medical")
}

pub fn has_dental(rules: &VisibilityRules) -> bool {
    rules.get("dental")
}

pub fn has_vision(rules: &VisibilityRules) -> bool {
    rules.get("vision")
}

pub fn has_pharmacy(rules: &VisibilityRules) -> bool {
    rules.get("pharmacy")
}

pub fn has_behavioral_health(rules: &VisibilityRules) -> bool {
    rules.get("behavioral_health")
}

pub fn is_subscriber(rules: &VisibilityRules) -> bool {
    rules.get("subscriber")
}

// ==================== 组合谓词 ====================

/// 当前在保：已激活、未终止、且已过生效日
pub fn is_active_member(rules: &VisibilityRules) -> bool {
    rules.get("active") && !rules.get("terminated") && !rules.get("future_effective")
}

pub fn is_future_effective(rules: &VisibilityRules) -> bool {
    rules.get("future_effective") && !rules.get("terminated")
}

pub fn is_vision_eligible(rules: &VisibilityRules) -> bool {
    rules.get("vision") && !rules.get("terminated")
}

pub fn is_dental_eligible(rules: &VisibilityRules) -> bool {
    rules.get("dental") && !rules.get("terminated")
}

pub fn is_pharmacy_eligible(rules: &VisibilityRules) -> bool {
    rules.get("pharmacy") && !rules.get("terminated") && !rules.get("wellness_only")
}

pub fn is_medicare(rules: &VisibilityRules) -> bool {
    rules.get("medicare") || rules.get("medicare_advantage")
}

pub fn is_wellness_only(rules: &VisibilityRules) -> bool {
    rules.get("wellness_only") && !rules.get("medical")
}

pub fn is_fsa_only(rules: &VisibilityRules) -> bool {
    rules.get("fsa_only") && !rules.get("medical") && !rules.get("dental") && !rules.get("vision")
}

/// 计划类型，多个标记同时存在时按 Medicare > Medicaid > 个人 > 商业 取第一个
pub fn plan_kind(rules: &VisibilityRules) -> PlanKind {
    if is_medicare(rules) {
        PlanKind::Medicare
    } else if rules.get("medicaid") {
        PlanKind::Medicaid
    } else if rules.get("individual") {
        PlanKind::Individual
    } else if rules.get("commercial") {
        PlanKind::Commercial
    } else {
        PlanKind::Unknown
    }
}

pub fn coverage_status(rules: &VisibilityRules) -> CoverageStatus {
    if rules.get("terminated") {
        CoverageStatus::Terminated
    } else if rules.get("future_effective") {
        CoverageStatus::FutureEffective
    } else if rules.get("active") {
        CoverageStatus::Active
    } else {
        CoverageStatus::Inactive
    }
}

// ==================== 上下文谓词 ====================

pub fn is_rewards_group(rules: &VisibilityRules, group_id: &GroupId) -> bool {
    rules.get("commercial")
        && !rules.get("terminated")
        && REWARDS_GROUP_ALLOW_LIST.contains(&group_id.as_str())
}

pub fn is_plan_in_effect(rules: &VisibilityRules, plan_term: &PlanTerm, as_of: NaiveDate) -> bool {
    !rules.get("terminated") && plan_term.covers(as_of)
}

pub fn is_in_renewal_window(
    rules: &VisibilityRules,
    plan_term: &PlanTerm,
    as_of: NaiveDate,
) -> bool {
    (rules.get("individual") || rules.get("commercial"))
        && !rules.get("terminated")
        && plan_term
            .days_until_term(as_of)
            .is_some_and(|days| (0..=RENEWAL_WINDOW_DAYS).contains(&days))
}

// ==================== 依赖型谓词 ====================

/// 理赔页面：终止会员仍可查看历史理赔
pub fn show_claims(rules: &VisibilityRules) -> bool {
    (has_medical(rules) || is_dental_eligible(rules) || is_vision_eligible(rules))
        && !is_fsa_only(rules)
        && !is_wellness_only(rules)
}

pub fn show_benefits(rules: &VisibilityRules) -> bool {
    is_active_member(rules) && !is_wellness_only(rules)
}

/// 药房页面：Medicare 会员需另有处方药计划
pub fn show_pharmacy(rules: &VisibilityRules) -> bool {
    is_pharmacy_eligible(rules) && (!is_medicare(rules) || rules.get("medicare_prescription"))
}

/// 电子会员卡：未生效会员也可提前查看
pub fn show_id_card(rules: &VisibilityRules) -> bool {
    rules.get("id_card_eligible") && (is_active_member(rules) || is_future_effective(rules))
}

pub fn show_chat(rules: &VisibilityRules) -> bool {
    rules.get("chat_eligible") && is_active_member(rules) && plan_kind(rules) != PlanKind::Medicaid
}

pub fn show_spending_accounts(rules: &VisibilityRules) -> bool {
    (rules.get("hsa_eligible") || rules.get("hra_eligible") || is_fsa_only(rules))
        && coverage_status(rules) != CoverageStatus::Terminated
}

pub fn show_prior_authorization(rules: &VisibilityRules) -> bool {
    rules.get("prior_authorization") && has_medical(rules) && is_active_member(rules)
}

pub fn show_care_management(rules: &VisibilityRules) -> bool {
    rules.get("care_management")
        && is_active_member(rules)
        && (is_medicare(rules) || has_behavioral_health(rules))
}

pub fn show_telehealth(rules: &VisibilityRules) -> bool {
    rules.get("telehealth") && has_medical(rules) && is_active_member(rules)
}

// ==================== 依赖型 + 上下文谓词 ====================

pub fn show_rewards(rules: &VisibilityRules, group_id: &GroupId) -> bool {
    is_active_member(rules) && is_rewards_group(rules, group_id)
}

pub fn show_renewal_banner(
    rules: &VisibilityRules,
    plan_term: &PlanTerm,
    as_of: NaiveDate,
) -> bool {
    is_in_renewal_window(rules, plan_term, as_of) && !is_medicare(rules)
}
