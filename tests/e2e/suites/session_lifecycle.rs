//! 会话生命周期测试套件
//!
//! 登录签发令牌，后续请求解码令牌并决定页面可见性。

use crate::helpers::*;
use crate::setup::TestEnvironment;
use crate::{assert_hidden, assert_visible};
use chrono::NaiveDate;
use portal_shared::test_utils::MemberFixtures;
use visibility_rules::{EvaluationContext, GroupId, PlanTerm, TokenCarrier, VisibilityRules};

/// 登录流程测试
#[cfg(test)]
mod login_tests {
    use super::*;

    #[test]
    fn test_login_issues_compact_token() {
        let env = TestEnvironment::setup();
        let mut session = CookieSession::new("M1001");

        let rules = VisibilityRules::from_json(&MemberFixtures::active_commercial());
        let token = env.gate.issue(&mut session, &rules);

        // 30 个属性 -> 5 个字符
        assert_eq!(token.len(), 5);
        assert_eq!(session.visibility_token(), Some(token.as_str()));
    }

    #[test]
    fn test_every_request_sees_login_attributes() {
        let env = TestEnvironment::setup();
        let mut session = CookieSession::new("M1002");
        let rules = VisibilityRules::from_json(&MemberFixtures::medicare_advantage());
        env.gate.issue(&mut session, &rules);

        for _ in 0..3 {
            let request = env.gate.rules_for_request(&session).unwrap();
            assert!(!request.is_fallback());
            assert_eq!(request.rules().enabled(), rules.enabled());
        }
    }

    #[test]
    fn test_all_fixtures_survive_session() {
        let env = TestEnvironment::setup();

        for (name, profile) in MemberFixtures::all() {
            let mut session = CookieSession::new(name);
            let rules = VisibilityRules::from_json(&profile);
            env.gate.issue(&mut session, &rules);

            let decoded = env.gate.rules_for_request(&session).unwrap().into_rules();
            for (attribute, value) in rules.iter() {
                assert_eq!(decoded.get(attribute), value, "{}: {}", name, attribute);
            }
        }
    }
}

/// 页面可见性测试
#[cfg(test)]
mod page_visibility_tests {
    use super::*;

    #[test]
    fn test_active_member_pages() {
        let env = TestEnvironment::setup();
        let mut session = CookieSession::new("M2001");
        env.gate.issue(
            &mut session,
            &VisibilityRules::from_json(&MemberFixtures::active_commercial()),
        );

        let request = env.gate.rules_for_request(&session).unwrap();
        let rules = request.rules();

        assert_visible!(env, rules, "show_claims");
        assert_visible!(env, rules, "show_benefits");
        assert_visible!(env, rules, "show_id_card");
        assert_hidden!(env, rules, "show_telehealth");
        assert_hidden!(env, rules, "show_rewards");
    }

    #[test]
    fn test_terminated_member_pages() {
        let env = TestEnvironment::setup();
        let mut session = CookieSession::new("M2002");
        env.gate.issue(
            &mut session,
            &VisibilityRules::from_json(&MemberFixtures::terminated_commercial()),
        );

        let request = env.gate.rules_for_request(&session).unwrap();
        let rules = request.rules();

        assert_visible!(env, rules, "show_claims");
        assert_hidden!(env, rules, "show_benefits");
        assert_hidden!(env, rules, "show_pharmacy");
        assert_hidden!(env, rules, "is_vision_eligible");
    }

    #[test]
    fn test_contextual_pages_with_request_context() {
        let context = EvaluationContext::new()
            .with_group_id(GroupId::parse("129800").unwrap())
            .with_plan_term(PlanTerm::parse("2024-01-01", Some("2024-12-31")).unwrap())
            .with_as_of(NaiveDate::from_ymd_opt(2024, 11, 15).unwrap());
        let env = TestEnvironment::setup().with_context(context);

        let mut session = CookieSession::new("M2003");
        env.gate.issue(
            &mut session,
            &VisibilityRules::from_json(&MemberFixtures::active_commercial()),
        );
        let request = env.gate.rules_for_request(&session).unwrap();

        assert_visible!(env, request.rules(), "show_rewards");
        assert_visible!(env, request.rules(), "show_renewal_banner");
    }

    #[test]
    fn test_logout_hides_everything() {
        let env = TestEnvironment::setup();
        let mut session = CookieSession::new("M2004");
        env.gate.issue(
            &mut session,
            &VisibilityRules::from_json(&MemberFixtures::active_commercial()),
        );
        session.logout();

        let request = env.gate.rules_for_request(&session).unwrap();
        assert!(request.is_fallback());
        assert_hidden!(env, request.rules(), "show_claims");
        assert_hidden!(env, request.rules(), "show_id_card");
    }
}
