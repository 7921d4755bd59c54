//! Cloudflare HTTP 请求方法

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::{ChallengeError, Result};

use super::{CF_API_BASE, CloudflareProvider, CloudflareResponse, CloudflareResultInfo};

impl CloudflareProvider {
    /// 构造带鉴权头的请求
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{CF_API_BASE}{path}"))
            .bearer_auth(&self.api_token)
    }

    /// 发送请求并取出 result
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        what: &str,
    ) -> Result<(T, Option<CloudflareResultInfo>)> {
        let envelope = self.send_raw::<T>(builder, what).await?;
        let result = envelope.result.ok_or_else(|| ChallengeError::Parse {
            detail: format!("missing result in response for {what}"),
        })?;
        Ok((result, envelope.result_info))
    }

    /// 发送请求并校验响应 envelope
    ///
    /// `success=false` 时携带原始错误负载失败；提供商调用不做重试，
    /// 一次失败就中止整个操作。
    pub(crate) async fn send_raw<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        what: &str,
    ) -> Result<CloudflareResponse<T>> {
        log::debug!("[cloudflare] {what}");

        let response = builder.send().await.map_err(|e| ChallengeError::Network {
            detail: e.to_string(),
        })?;

        let status = response.status();
        log::debug!("[cloudflare] Response Status: {status}");

        let response_text = response.text().await.map_err(|e| ChallengeError::Network {
            detail: format!("读取响应失败: {e}"),
        })?;
        log::debug!("[cloudflare] Response Body: {response_text}");

        let envelope: CloudflareResponse<T> =
            serde_json::from_str(&response_text).map_err(|e| {
                log::error!("[cloudflare] JSON 解析失败: {e}");
                log::error!("[cloudflare] 原始响应: {response_text}");
                ChallengeError::Parse {
                    detail: e.to_string(),
                }
            })?;

        if !envelope.success {
            let errors = envelope.errors.unwrap_or_default();
            log::error!("[cloudflare] API 错误: {errors:?}");
            return Err(ChallengeError::Api { errors });
        }

        Ok(envelope)
    }
}
