//! Cloudflare ACME DNS-01 挑战库
//!
//! 面向外部 ACME 客户端编排器: 在 Cloudflare 托管的 Zone 里写入
//! `_acme-challenge.<domain>` 的 TXT 记录，等待其在权威解析中可见，
//! 验证完成后清理。挑战内容是 key authorization 的 SHA-256 摘要
//! （去填充的 base64url 编码）。
//!
//! Zone 定位和记录列表都走惰性分页消费；传播验证是固定间隔的有界
//! 重试循环，可以整个关掉。验证查询支持系统解析器和 DNS-over-HTTPS
//! 两种通道。
//!
//! # 使用
//!
//! ```no_run
//! use acme_dns01_cloudflare::{ChallengeOptions, CloudflareChallenge};
//!
//! # async fn run() -> Result<(), acme_dns01_cloudflare::ChallengeError> {
//! let challenge = CloudflareChallenge::new("api-token".to_string(), ChallengeOptions::default());
//! let options = challenge.options().clone();
//!
//! challenge
//!     .set(&options, "example.com", "challenge-token", "key-authorization")
//!     .await?;
//! // ... ACME 服务器完成验证 ...
//! challenge
//!     .remove(&options, "example.com", "challenge-token")
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod challenge;
mod config;
mod error;
mod pagination;
mod providers;
mod resolver;
mod traits;
mod types;

pub use challenge::CloudflareChallenge;
pub use config::{ChallengeOptions, DEFAULT_ACME_PREFIX, PropagationPolicy};
pub use error::{ChallengeError, Result};
pub use pagination::{Page, PageQuery};
pub use providers::cloudflare::CloudflareProvider;
pub use resolver::{DnsTransport, Resolver};
pub use traits::{DnsProviderApi, TxtLookup};
pub use types::{ApiErrorDetail, DnsRecord, NewDnsRecord, Zone};
