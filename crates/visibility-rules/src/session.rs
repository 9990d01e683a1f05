//! 会话接入层
//!
//! 会话提供方在登录时签发令牌、每次请求时解码令牌。本模块只定义令牌在
//! 会话载体中的读写接口（`TokenCarrier`），以及解码失败时的处理策略；
//! 会话载体的外层格式、认证与传输均由外部负责。

use crate::codec::VisibilityCodec;
use crate::error::{Result, RuleError};
use crate::models::VisibilityRules;
use portal_shared::config::{InvalidTokenPolicy, SessionConfig};
use portal_shared::observability::metrics::{
    record_token_decoded, record_token_issued, record_token_rejected,
};
use tracing::{debug, warn};

/// 承载可见性令牌的会话载体（如 JWT claims、加密 cookie 的某个字段）
pub trait TokenCarrier {
    fn visibility_token(&self) -> Option<&str>;

    fn set_visibility_token(&mut self, token: String);
}

/// 请求级解码结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestRules {
    /// 令牌正常解码
    Decoded(VisibilityRules),
    /// 令牌缺失或损坏，已回退为全 false 属性集
    Fallback(VisibilityRules),
}

impl RequestRules {
    pub fn rules(&self) -> &VisibilityRules {
        match self {
            Self::Decoded(rules) | Self::Fallback(rules) => rules,
        }
    }

    pub fn into_rules(self) -> VisibilityRules {
        match self {
            Self::Decoded(rules) | Self::Fallback(rules) => rules,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// 可见性令牌网关
#[derive(Debug, Clone)]
pub struct VisibilityGate {
    codec: VisibilityCodec,
    policy: InvalidTokenPolicy,
}

impl VisibilityGate {
    pub fn new(codec: VisibilityCodec, policy: InvalidTokenPolicy) -> Self {
        Self { codec, policy }
    }

    /// 按会话配置中的损坏令牌策略构建
    pub fn from_config(codec: VisibilityCodec, config: &SessionConfig) -> Self {
        Self::new(codec, config.invalid_token_policy)
    }

    pub fn codec(&self) -> &VisibilityCodec {
        &self.codec
    }

    pub fn policy(&self) -> InvalidTokenPolicy {
        self.policy
    }

    /// 登录时将属性集编码写入会话载体，返回令牌
    pub fn issue(&self, carrier: &mut impl TokenCarrier, rules: &VisibilityRules) -> String {
        let token = self.codec.encode(rules);
        carrier.set_visibility_token(token.clone());
        record_token_issued();
        debug!(token_len = token.len(), "visibility token issued");
        token
    }

    /// 请求时从会话载体解码属性集
    ///
    /// 令牌缺失视为未登录，返回全 false 属性集。
    /// 令牌损坏时按策略回退或返回 `MalformedToken`。
    pub fn rules_for_request(&self, carrier: &impl TokenCarrier) -> Result<RequestRules> {
        let Some(token) = carrier.visibility_token() else {
            debug!("session carries no visibility token");
            return Ok(RequestRules::Fallback(self.all_false()));
        };

        match self.codec.decode(token) {
            Ok(rules) => {
                record_token_decoded();
                Ok(RequestRules::Decoded(rules))
            }
            Err(err @ RuleError::MalformedToken { .. }) => match self.policy {
                InvalidTokenPolicy::Fallback => {
                    warn!(error = %err, "discarding malformed visibility token");
                    record_token_rejected("fallback");
                    Ok(RequestRules::Fallback(self.all_false()))
                }
                InvalidTokenPolicy::Reject => {
                    warn!(error = %err, "rejecting request with malformed visibility token");
                    record_token_rejected("reject");
                    Err(err)
                }
            },
            Err(err) => Err(err),
        }
    }

    /// 覆盖当前注册表全部属性、值均为 false 的属性集
    pub fn all_false(&self) -> VisibilityRules {
        VisibilityRules::from_pairs(self.codec.registry().names().map(|n| (n, false)))
    }
}
