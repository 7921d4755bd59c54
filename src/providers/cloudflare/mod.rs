//! Cloudflare DNS Provider

mod http;
mod provider;
mod types;

use reqwest::Client;

pub(crate) use types::{CloudflareResponse, CloudflareResultInfo};

pub(crate) const CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Cloudflare v4 API 客户端
///
/// 只覆盖挑战流程用到的接口: Zone 列表、DNS 记录的列表/增/改/删。
pub struct CloudflareProvider {
    pub(crate) client: Client,
    pub(crate) api_token: String,
}

impl CloudflareProvider {
    pub fn new(api_token: String) -> Self {
        Self {
            client: Client::new(),
            api_token,
        }
    }
}
