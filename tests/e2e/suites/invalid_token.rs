//! 损坏令牌测试套件
//!
//! 验证令牌被篡改时按配置策略回退或拒绝。

use crate::helpers::*;
use crate::setup::TestEnvironment;
use portal_shared::config::InvalidTokenPolicy;
use portal_shared::test_utils::MemberFixtures;
use visibility_rules::{RuleError, VisibilityRules};

#[cfg(test)]
mod policy_tests {
    use super::*;

    fn tampered_session(env: &TestEnvironment) -> CookieSession {
        let mut session = CookieSession::new("M3001");
        let token = env.gate.issue(
            &mut session,
            &VisibilityRules::from_json(&MemberFixtures::active_commercial()),
        );
        // 把第二个字符替换为 URL 编码残留
        session.tamper(&format!("{}%{}", &token[..1], &token[2..]));
        session
    }

    #[test]
    fn test_fallback_policy_hides_all_pages() {
        let env = TestEnvironment::with_policy(InvalidTokenPolicy::Fallback);
        let session = tampered_session(&env);

        let request = env.gate.rules_for_request(&session).unwrap();

        assert!(request.is_fallback());
        assert_eq!(request.rules().len(), 30);
        assert!(request.rules().enabled().is_empty());
    }

    #[test]
    fn test_reject_policy_reports_offset() {
        let env = TestEnvironment::with_policy(InvalidTokenPolicy::Reject);
        let session = tampered_session(&env);

        match env.gate.rules_for_request(&session) {
            Err(RuleError::MalformedToken { offset, character }) => {
                assert_eq!(offset, 1);
                assert_eq!(character, '%');
            }
            other => panic!("应该拒绝损坏的令牌: {:?}", other),
        }
    }

    #[test]
    fn test_base64_padding_is_not_accepted() {
        let env = TestEnvironment::with_policy(InvalidTokenPolicy::Reject);
        let mut session = CookieSession::new("M3002");
        session.tamper("gA==");

        let err = env.gate.rules_for_request(&session).unwrap_err();
        assert_eq!(err.code(), "MALFORMED_TOKEN");
    }

    #[test]
    fn test_empty_token_decodes_to_all_false() {
        // 空字符串是合法令牌（无任何比特）
        let env = TestEnvironment::with_policy(InvalidTokenPolicy::Reject);
        let mut session = CookieSession::new("M3003");
        session.tamper("");

        let request = env.gate.rules_for_request(&session).unwrap();
        assert!(!request.is_fallback());
        assert!(request.rules().enabled().is_empty());
    }
}
