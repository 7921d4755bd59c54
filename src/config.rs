//! 挑战配置
//!
//! 对应宿主编排器识别的配置项（`acmePrefix` / `verifyPropagation` /
//! `useDNSOverHTTPS`）。每个公开入口都显式接收一份生效配置，
//! 因此同一个实例可以服务多组不同配置的调用。

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::resolver::DnsTransport;

/// 默认的 ACME 记录名前缀
pub const DEFAULT_ACME_PREFIX: &str = "_acme-challenge";

/// 传播验证策略
///
/// 固定间隔轮询，不做指数退避。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropagationPolicy {
    /// 两次尝试之间等待的毫秒数
    pub wait_for: u64,
    /// 首次尝试之外允许的最大重试次数
    pub retries: u32,
}

impl Default for PropagationPolicy {
    fn default() -> Self {
        Self {
            wait_for: 5000,
            retries: 20,
        }
    }
}

impl PropagationPolicy {
    /// 重试间隔
    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_for)
    }
}

/// 挑战选项
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChallengeOptions {
    /// ACME 记录名前缀，挑战记录写在 `<prefix>.<domain>`
    pub acme_prefix: String,
    /// 传播验证策略，`None` 表示写入后不等待传播
    pub verify_propagation: Option<PropagationPolicy>,
    /// 用 DNS-over-HTTPS 代替系统解析器做验证查询
    #[serde(rename = "useDNSOverHTTPS")]
    pub use_dns_over_https: bool,
}

impl Default for ChallengeOptions {
    fn default() -> Self {
        Self {
            acme_prefix: DEFAULT_ACME_PREFIX.to_string(),
            verify_propagation: Some(PropagationPolicy::default()),
            use_dns_over_https: false,
        }
    }
}

impl ChallengeOptions {
    /// 本次调用使用的 DNS 查询通道
    pub fn transport(&self) -> DnsTransport {
        if self.use_dns_over_https {
            DnsTransport::DnsOverHttps
        } else {
            DnsTransport::Native
        }
    }

    /// 挑战记录的完整名称
    pub(crate) fn fqdn(&self, domain: &str) -> String {
        format!("{}.{domain}", self.acme_prefix)
    }
}
