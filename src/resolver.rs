//! TXT 记录解析
//!
//! 验证查询支持两种通道: 系统解析器（hickory）和 DNS-over-HTTPS（Google
//! Public DNS 的 JSON 接口，适合出口被 HTTP 代理限制的环境）。两种结果
//! 都归一化成扁平的字符串列表。

use std::fmt;

use async_trait::async_trait;
use hickory_resolver::TokioResolver;
use serde::Deserialize;

use crate::error::{ChallengeError, Result};
use crate::traits::TxtLookup;

/// Google Public DNS 的 DoH JSON 接口
const DOH_ENDPOINT: &str = "https://dns.google/resolve";

/// DNS 查询通道
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DnsTransport {
    /// 系统解析器
    Native,
    /// DNS-over-HTTPS
    DnsOverHttps,
}

impl fmt::Display for DnsTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => f.write_str("native DNS"),
            Self::DnsOverHttps => f.write_str("DNS over HTTPS"),
        }
    }
}

/// DoH 响应体
#[derive(Debug, Deserialize)]
struct DohResponse {
    #[serde(rename = "Status")]
    #[allow(dead_code)]
    status: u32,
    #[serde(rename = "Answer")]
    answer: Option<Vec<DohAnswer>>,
}

#[derive(Debug, Deserialize)]
struct DohAnswer {
    data: String,
}

/// 生产环境 TXT 解析器
pub struct Resolver {
    http: reqwest::Client,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// 通过系统解析器查询
    ///
    /// 一条 TXT 记录的多个分段用单个空格拼接成一个值。
    async fn resolve_native(&self, fqdn: &str) -> Result<Vec<String>> {
        let resolver = TokioResolver::builder_tokio()
            .map_err(|e| ChallengeError::Resolution {
                fqdn: fqdn.to_string(),
                detail: e.to_string(),
            })?
            .build();

        let lookup = resolver
            .txt_lookup(fqdn)
            .await
            .map_err(|e| ChallengeError::Resolution {
                fqdn: fqdn.to_string(),
                detail: e.to_string(),
            })?;

        Ok(lookup
            .iter()
            .map(|txt| {
                txt.txt_data()
                    .iter()
                    .map(|segment| String::from_utf8_lossy(segment).into_owned())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect())
    }

    /// 通过 DoH 查询
    async fn resolve_doh(&self, fqdn: &str) -> Result<Vec<String>> {
        let response = self
            .http
            .get(DOH_ENDPOINT)
            .query(&[("name", fqdn), ("type", "TXT")])
            .send()
            .await
            .map_err(|e| ChallengeError::Resolution {
                fqdn: fqdn.to_string(),
                detail: e.to_string(),
            })?;

        let body: DohResponse = response.json().await.map_err(|e| ChallengeError::Resolution {
            fqdn: fqdn.to_string(),
            detail: e.to_string(),
        })?;

        records_from_doh(body, fqdn)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TxtLookup for Resolver {
    async fn resolve_txt(&self, fqdn: &str, transport: DnsTransport) -> Result<Vec<String>> {
        match transport {
            DnsTransport::Native => self.resolve_native(fqdn).await,
            DnsTransport::DnsOverHttps => self.resolve_doh(fqdn).await,
        }
    }
}

/// 归一化 DoH 响应
///
/// 缺少 Answer 段视为 NoAnswer；Answer 存在但为空是"成功但无记录"，
/// 返回空列表。每条数据剥掉一对包裹引号。
fn records_from_doh(response: DohResponse, fqdn: &str) -> Result<Vec<String>> {
    let Some(answers) = response.answer else {
        return Err(ChallengeError::NoAnswer {
            fqdn: fqdn.to_string(),
        });
    };

    Ok(answers
        .into_iter()
        .map(|answer| unquote(&answer.data).to_string())
        .collect())
}

/// 剥掉一对包裹引号（两端都有时才剥）
fn unquote(data: &str) -> &str {
    data.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquote_strips_one_pair_of_quotes() {
        assert_eq!(unquote("\"value\""), "value");
        assert_eq!(unquote("\"\"nested\"\""), "\"nested\"");
        assert_eq!(unquote("bare"), "bare");
        assert_eq!(unquote(""), "");
    }

    #[test]
    fn doh_answers_are_unquoted() {
        let response: DohResponse = serde_json::from_str(
            r#"{
                "Status": 0,
                "Answer": [
                    { "name": "x.example.com.", "type": 16, "TTL": 120, "data": "\"first\"" },
                    { "name": "x.example.com.", "type": 16, "TTL": 120, "data": "\"second\"" }
                ]
            }"#,
        )
        .unwrap();

        let records = records_from_doh(response, "x.example.com").unwrap();
        assert_eq!(records, vec!["first", "second"]);
    }

    #[test]
    fn empty_answer_section_is_an_empty_list() {
        let response: DohResponse =
            serde_json::from_str(r#"{ "Status": 0, "Answer": [] }"#).unwrap();
        let records = records_from_doh(response, "x.example.com").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn missing_answer_section_is_no_answer() {
        let response: DohResponse = serde_json::from_str(r#"{ "Status": 3 }"#).unwrap();
        let error = records_from_doh(response, "gone.example.com").unwrap_err();
        assert!(matches!(error, ChallengeError::NoAnswer { fqdn } if fqdn == "gone.example.com"));
    }
}
