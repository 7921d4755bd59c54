//! 通用数据类型
//!
//! 数据形状与 Cloudflare v4 API 的返回结构一致，可直接用 serde 反序列化。

use serde::{Deserialize, Serialize};

/// DNS Zone（只读）
#[derive(Debug, Clone, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// DNS 记录
///
/// 更新时整条序列化回传，未被挑战流程触碰的字段原样保留。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<String>,
}

/// 新建 DNS 记录的请求体
#[derive(Debug, Clone, Serialize)]
pub struct NewDnsRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
}

impl NewDnsRecord {
    /// TXT 记录创建请求
    pub fn txt(name: &str, content: &str, ttl: u32) -> Self {
        Self {
            record_type: "TXT".to_string(),
            name: name.to_string(),
            content: content.to_string(),
            ttl,
        }
    }
}

/// Cloudflare API 错误明细
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub code: i32,
    pub message: String,
}
