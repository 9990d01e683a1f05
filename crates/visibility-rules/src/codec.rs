//! 可见性属性编解码
//!
//! 将属性集按注册表顺序打包为比特向量，右侧补 0 至 6 的倍数，
//! 每 6 位映射为字母表 `A-Za-z0-9+/` 中的一个字符。
//!
//! 令牌不含填充字符，长度为 `ceil(注册表长度 / 6)`。

use crate::error::{Result, RuleError};
use crate::models::VisibilityRules;
use crate::registry::AttributeRegistry;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// 编码字母表，下标即 6 位取值
pub const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// 每个字符承载的比特数
pub const BITS_PER_SYMBOL: usize = 6;

/// 给定属性数量时的令牌长度
pub fn encoded_len(attribute_count: usize) -> usize {
    attribute_count.div_ceil(BITS_PER_SYMBOL)
}

/// 字符在字母表中的下标
fn symbol_value(c: char) -> Option<u8> {
    match c {
        'A'..='Z' => Some(c as u8 - b'A'),
        'a'..='z' => Some(c as u8 - b'a' + 26),
        '0'..='9' => Some(c as u8 - b'0' + 52),
        '+' => Some(62),
        '/' => Some(63),
        _ => None,
    }
}

/// 可见性令牌编解码器
///
/// 无状态，仅持有只读注册表，可跨线程共享。
#[derive(Debug, Clone)]
pub struct VisibilityCodec {
    registry: Arc<AttributeRegistry>,
}

impl VisibilityCodec {
    pub fn new(registry: Arc<AttributeRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &AttributeRegistry {
        &self.registry
    }

    /// 编码属性集
    ///
    /// 未注册的属性被忽略；缺失的属性编码为 0。结果与输入的键顺序无关。
    pub fn encode(&self, rules: &VisibilityRules) -> String {
        let mut token = String::with_capacity(encoded_len(self.registry.len()));
        let mut group: u8 = 0;
        let mut filled = 0;

        for name in self.registry.names() {
            group = (group << 1) | u8::from(rules.get(name));
            filled += 1;

            if filled == BITS_PER_SYMBOL {
                token.push(ALPHABET[group as usize] as char);
                group = 0;
                filled = 0;
            }
        }

        // 末组右侧补 0；恰好对齐时不补
        if filled > 0 {
            group <<= BITS_PER_SYMBOL - filled;
            token.push(ALPHABET[group as usize] as char);
        }

        token
    }

    /// 编码会话提供方给出的原始 JSON 属性（按 JS 真值转换）
    pub fn encode_json(&self, attributes: &Value) -> String {
        self.encode(&VisibilityRules::from_json(attributes))
    }

    /// 解码令牌为完整属性集
    ///
    /// - 令牌短于注册表（旧版本签发）：缺失的尾部属性为 false
    /// - 令牌长于注册表（新版本签发）：超出的比特被丢弃
    /// - 任一字符不在字母表中：返回 `MalformedToken`，不产生部分结果
    pub fn decode(&self, token: &str) -> Result<VisibilityRules> {
        let symbols = token
            .chars()
            .enumerate()
            .map(|(offset, character)| {
                symbol_value(character).ok_or(RuleError::MalformedToken { offset, character })
            })
            .collect::<Result<Vec<u8>>>()?;

        let expected = encoded_len(self.registry.len());
        if symbols.len() != expected {
            debug!(
                token_len = symbols.len(),
                expected_len = expected,
                "visibility token was issued under a different registry version"
            );
        }

        let mut rules = VisibilityRules::new();
        for (position, name) in self.registry.names().enumerate() {
            let bit = symbols
                .get(position / BITS_PER_SYMBOL)
                .is_some_and(|symbol| {
                    (symbol >> (BITS_PER_SYMBOL - 1 - position % BITS_PER_SYMBOL)) & 1 == 1
                });
            rules.set(name, bit);
        }

        Ok(rules)
    }
}
