//! 注册表升级测试套件
//!
//! 滚动发布期间，新旧版本的服务实例共享同一批会话。

use crate::helpers::*;
use crate::setup::TestEnvironment;
use crate::{assert_hidden, assert_visible};
use portal_shared::test_utils::MemberFixtures;
use visibility_rules::VisibilityRules;

/// `future_effective` 之前的发布版本只有 7 个属性
const OLD_RELEASE_LEN: usize = 7;

#[cfg(test)]
mod upgrade_tests {
    use super::*;

    #[test]
    fn test_old_session_read_by_new_release() {
        let old = TestEnvironment::release(OLD_RELEASE_LEN);
        let new = TestEnvironment::setup();

        let mut session = CookieSession::new("M4001");
        let token = old.gate.issue(
            &mut session,
            &VisibilityRules::from_json(&MemberFixtures::active_commercial()),
        );
        assert_eq!(token.len(), 2);

        let request = new.gate.rules_for_request(&session).unwrap();
        let rules = request.rules();

        // 旧版本已有的属性保留，新增属性为 false
        assert!(rules.get("active"));
        assert!(rules.get("medical"));
        assert!(!rules.get("commercial"));
        assert!(!rules.get("id_card_eligible"));
        assert_eq!(rules.len(), 30);

        assert_visible!(new, rules, "show_claims");
        assert_hidden!(new, rules, "show_id_card");
    }

    #[test]
    fn test_new_session_read_by_old_release() {
        let old = TestEnvironment::release(OLD_RELEASE_LEN);
        let new = TestEnvironment::setup();

        let mut session = CookieSession::new("M4002");
        new.gate.issue(
            &mut session,
            &VisibilityRules::from_json(&MemberFixtures::terminated_commercial()),
        );

        let request = old.gate.rules_for_request(&session).unwrap();
        assert!(!request.is_fallback());
        assert_eq!(request.rules().len(), OLD_RELEASE_LEN);
        assert!(request.rules().get("terminated"));
        assert!(!request.rules().contains("commercial"));
    }

    #[test]
    fn test_reissue_after_upgrade_restores_new_attributes() {
        let old = TestEnvironment::release(OLD_RELEASE_LEN);
        let new = TestEnvironment::setup();
        let profile = VisibilityRules::from_json(&MemberFixtures::active_commercial());

        let mut session = CookieSession::new("M4003");
        old.gate.issue(&mut session, &profile);
        new.gate.issue(&mut session, &profile);

        let request = new.gate.rules_for_request(&session).unwrap();
        assert!(request.rules().get("commercial"));
        assert_visible!(new, request.rules(), "show_id_card");
    }
}

/// 任意历史版本与当前版本之间的会话互通
#[cfg(test)]
mod upgrade_properties {
    use super::*;
    use proptest::prelude::*;

    const CURRENT_LEN: usize = 30;

    proptest! {
        /// 旧版本签发、新版本读取：旧版本已有的属性原样保留，其余为 false
        #[test]
        fn old_release_session_survives_upgrade(
            bits in proptest::collection::vec(any::<bool>(), CURRENT_LEN),
            release_len in 0usize..=CURRENT_LEN,
        ) {
            let old = TestEnvironment::release(release_len);
            let new = TestEnvironment::setup();
            let registry = new.gate.codec().registry();
            let profile = VisibilityRules::from_pairs(registry.names().zip(bits.iter().copied()));

            let mut session = CookieSession::new("M4100");
            old.gate.issue(&mut session, &profile);
            let request = new.gate.rules_for_request(&session).unwrap();

            prop_assert!(!request.is_fallback());
            for (position, name) in registry.names().enumerate() {
                let expected = position < release_len && bits[position];
                prop_assert_eq!(request.rules().get(name), expected, "attribute {}", name);
            }
        }

        /// 新版本签发、旧版本读取：旧版本只看到自己的前缀
        #[test]
        fn new_release_session_readable_by_rollback(
            bits in proptest::collection::vec(any::<bool>(), CURRENT_LEN),
            release_len in 0usize..=CURRENT_LEN,
        ) {
            let old = TestEnvironment::release(release_len);
            let new = TestEnvironment::setup();
            let registry = new.gate.codec().registry();
            let profile = VisibilityRules::from_pairs(registry.names().zip(bits.iter().copied()));

            let mut session = CookieSession::new("M4101");
            new.gate.issue(&mut session, &profile);
            let request = old.gate.rules_for_request(&session).unwrap();

            prop_assert_eq!(request.rules().len(), release_len);
            for (position, name) in old.gate.codec().registry().names().enumerate() {
                prop_assert_eq!(request.rules().get(name), bits[position]);
            }
        }
    }
}
