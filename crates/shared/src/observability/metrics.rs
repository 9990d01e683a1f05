//! 指标定义
//!
//! 基于 metrics crate 描述会话令牌相关指标。
//! 本工作区不安装 exporter，recorder 由嵌入的宿主服务提供；未安装时宏调用为空操作。

/// 成功解码的令牌数
pub const TOKENS_DECODED: &str = "visibility_tokens_decoded_total";
/// 无法解码而被回退或拒绝的令牌数（标签 outcome = fallback | reject）
pub const TOKENS_REJECTED: &str = "visibility_tokens_rejected_total";
/// 登录时签发的令牌数
pub const TOKENS_ISSUED: &str = "visibility_tokens_issued_total";

/// 注册指标描述（出现在 exporter 的 HELP 注释中）
pub fn describe() {
    metrics::describe_counter!(TOKENS_DECODED, "Visibility tokens decoded successfully");
    metrics::describe_counter!(
        TOKENS_REJECTED,
        "Visibility tokens that failed to decode, by policy outcome"
    );
    metrics::describe_counter!(TOKENS_ISSUED, "Visibility tokens issued at login");
}

/// 记录一次成功解码
pub fn record_token_decoded() {
    metrics::counter!(TOKENS_DECODED).increment(1);
}

/// 记录一次解码失败及其处理结果
pub fn record_token_rejected(outcome: &'static str) {
    metrics::counter!(TOKENS_REJECTED, "outcome" => outcome).increment(1);
}

/// 记录一次令牌签发
pub fn record_token_issued() {
    metrics::counter!(TOKENS_ISSUED).increment(1);
}
