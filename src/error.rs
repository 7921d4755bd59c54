//! 错误类型定义

use crate::types::ApiErrorDetail;

pub type Result<T, E = ChallengeError> = std::result::Result<T, E>;

/// 挑战流程错误
///
/// 所有公开入口都以返回值的形式交付错误，不会 panic 越过调用边界。
#[derive(Debug, thiserror::Error)]
pub enum ChallengeError {
    /// keyAuthorization 非法（为空）
    #[error("expected keyAuthorization to be a non-empty string")]
    InvalidKeyAuthorization,

    /// 账户下没有覆盖目标域名的 Zone
    #[error("could not find a zone for '{domain}'")]
    ZoneNotFound { domain: String },

    /// 目标名称下没有 TXT 记录可删
    #[error("could not find a TXT record for '{fqdn}'")]
    RecordNotFound { fqdn: String },

    /// Cloudflare API 返回 success=false，携带原始错误负载
    #[error("Cloudflare API error: {}", format_api_errors(.errors))]
    Api { errors: Vec<ApiErrorDetail> },

    /// 请求 Cloudflare API 时的网络错误
    #[error("network error while calling the Cloudflare API: {detail}")]
    Network { detail: String },

    /// Cloudflare API 响应无法解析
    #[error("failed to parse Cloudflare API response: {detail}")]
    Parse { detail: String },

    /// DNS 查询失败（如 NXDOMAIN）
    #[error("could not resolve TXT records for '{fqdn}': {detail}")]
    Resolution { fqdn: String, detail: String },

    /// DoH 响应缺少 Answer 段
    #[error("received no answer for '{fqdn}'")]
    NoAnswer { fqdn: String },

    /// 传播验证重试耗尽
    #[error("could not verify challenge for '{domain}' after {attempts} attempts")]
    PropagationTimeout { domain: String, attempts: u32 },

    /// 解析结果中不包含期望的挑战内容
    #[error("could not verify '{domain}'")]
    Verification { domain: String },
}

fn format_api_errors(errors: &[ApiErrorDetail]) -> String {
    if errors.is_empty() {
        return "unknown error".to_string();
    }
    errors
        .iter()
        .map(|error| format!("{} (code {})", error.message, error.code))
        .collect::<Vec<_>>()
        .join("; ")
}
