//! 模拟会话载体
//!
//! 以 claims 映射模拟加密 cookie / JWT 中的会话字段。

use std::collections::HashMap;
use visibility_rules::TokenCarrier;

/// 会话中存放令牌的字段名
pub const TOKEN_CLAIM: &str = "vis";

/// 模拟的会话 cookie
#[derive(Debug, Clone, Default)]
pub struct CookieSession {
    pub member_id: String,
    claims: HashMap<String, String>,
}

impl CookieSession {
    pub fn new(member_id: &str) -> Self {
        Self {
            member_id: member_id.to_string(),
            claims: HashMap::new(),
        }
    }

    /// 直接改写令牌字段，模拟被篡改或截断的 cookie
    pub fn tamper(&mut self, token: &str) {
        self.claims.insert(TOKEN_CLAIM.to_string(), token.to_string());
    }

    pub fn logout(&mut self) {
        self.claims.remove(TOKEN_CLAIM);
    }
}

impl TokenCarrier for CookieSession {
    fn visibility_token(&self) -> Option<&str> {
        self.claims.get(TOKEN_CLAIM).map(String::as_str)
    }

    fn set_visibility_token(&mut self, token: String) {
        self.claims.insert(TOKEN_CLAIM.to_string(), token);
    }
}
