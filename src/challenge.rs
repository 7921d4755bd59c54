//! ACME DNS-01 挑战编排
//!
//! `set` 写入挑战记录并等待其在权威解析中可见，`remove` 负责善后清理，
//! `loopback` 是独立的验证原语。Zone 定位与记录调和都建立在惰性分页
//! 消费之上，传播验证是固定间隔的有界重试循环。

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use futures::{TryStreamExt, pin_mut};
use sha2::{Digest, Sha256};

use crate::config::ChallengeOptions;
use crate::error::{ChallengeError, Result};
use crate::pagination::{PAGE_SIZE, consume_pages};
use crate::providers::cloudflare::CloudflareProvider;
use crate::resolver::Resolver;
use crate::traits::{DnsProviderApi, TxtLookup};
use crate::types::{DnsRecord, NewDnsRecord, Zone};

/// 挑战记录的 TTL（秒）
const CHALLENGE_TTL: u32 = 120;

/// ACME DNS-01 挑战供应器
///
/// 一个实例可以并发服务不同域名的调用；对同一域名的并发 `set` 会在
/// 记录调和上竞争（后写者胜），需要串行化时由调用方负责。
pub struct CloudflareChallenge {
    provider: Arc<dyn DnsProviderApi>,
    resolver: Arc<dyn TxtLookup>,
    options: ChallengeOptions,
}

impl CloudflareChallenge {
    /// 用 API Token 创建生产实例
    pub fn new(api_token: String, options: ChallengeOptions) -> Self {
        Self::with_collaborators(
            Arc::new(CloudflareProvider::new(api_token)),
            Arc::new(Resolver::new()),
            options,
        )
    }

    /// 注入自定义协作者（其他提供商后端或测试替身）
    pub fn with_collaborators(
        provider: Arc<dyn DnsProviderApi>,
        resolver: Arc<dyn TxtLookup>,
        options: ChallengeOptions,
    ) -> Self {
        log::debug!("Creating new CloudflareChallenge instance: {options:?}");
        Self {
            provider,
            resolver,
            options,
        }
    }

    /// 实例的默认配置，宿主编排器会在每次调用时原样传回
    pub fn options(&self) -> &ChallengeOptions {
        &self.options
    }

    /// 计算挑战记录内容: 去填充的 base64url(sha256(keyAuthorization))
    pub fn auth_content(key_authorization: &str) -> Result<String> {
        if key_authorization.is_empty() {
            return Err(ChallengeError::InvalidKeyAuthorization);
        }
        Ok(URL_SAFE_NO_PAD.encode(Sha256::digest(key_authorization.as_bytes())))
    }

    /// 写入挑战记录，并在配置了传播验证时等待记录可见
    ///
    /// 记录调和把目标名称下的 TXT 记录收敛到恰好一条: 没有则创建，
    /// 已有则更新首条并删掉此前失败运行残留的重复记录。验证超时不回滚
    /// 已写入的记录，留给下次运行或 `remove` 清理。
    pub async fn set(
        &self,
        options: &ChallengeOptions,
        domain: &str,
        challenge: &str,
        key_authorization: &str,
    ) -> Result<()> {
        log::debug!("Trying to set ACME challenge for '{domain}'");

        let auth_content = Self::auth_content(key_authorization)?;
        let fqdn = options.fqdn(domain);

        let zone = self.zone_for_domain(domain).await?;
        let mut records = self.txt_records(&zone.id, &fqdn).await?.into_iter();

        match records.next() {
            None => {
                log::debug!(
                    "Found no pre-existing TXT record for '{fqdn}'. Creating a new one with '{auth_content}'"
                );
                self.provider
                    .create_record(&zone.id, &NewDnsRecord::txt(&fqdn, &auth_content, CHALLENGE_TTL))
                    .await?;
            }
            Some(mut survivor) => {
                let stale: Vec<_> = records.collect();
                if !stale.is_empty() {
                    log::debug!(
                        "Found {} existing records for '{fqdn}'. Deleting all but the first one",
                        stale.len() + 1
                    );
                    for record in &stale {
                        self.provider.delete_record(&zone.id, &record.id).await?;
                    }
                }

                log::debug!("Updating existing TXT record for '{fqdn}' with '{auth_content}'");
                survivor.content = auth_content.clone();
                survivor.ttl = CHALLENGE_TTL;
                self.provider.update_record(&zone.id, &survivor).await?;
            }
        }

        if options.verify_propagation.is_some() {
            self.verify_propagation(options, domain, challenge, &auth_content)
                .await?;
        }

        Ok(())
    }

    /// 清理挑战记录: 删除目标名称下的所有 TXT 记录
    pub async fn remove(
        &self,
        options: &ChallengeOptions,
        domain: &str,
        _challenge: &str,
    ) -> Result<()> {
        log::debug!("Trying to remove ACME challenge for '{domain}'");

        let zone = self.zone_for_domain(domain).await?;
        let fqdn = options.fqdn(domain);

        let records = self.txt_records(&zone.id, &fqdn).await?;
        if records.is_empty() {
            return Err(ChallengeError::RecordNotFound { fqdn });
        }

        for record in &records {
            self.provider.delete_record(&zone.id, &record.id).await?;
        }

        log::debug!("Successfully removed ACME challenge for '{domain}'");
        Ok(())
    }

    /// 独立的验证原语: 解析挑战名称的 TXT 值
    ///
    /// 给定 `expected_content` 时校验其在解析结果之内，缺失即验证失败；
    /// 传播循环内部用它轮询，宿主编排器也可以直接调用做手工检查。
    pub async fn loopback(
        &self,
        options: &ChallengeOptions,
        domain: &str,
        _challenge: &str,
        expected_content: Option<&str>,
    ) -> Result<Vec<String>> {
        let fqdn = options.fqdn(domain);
        let transport = options.transport();
        log::debug!("Testing TXT record existence for '{fqdn}' using {transport}");

        let records = self.resolver.resolve_txt(&fqdn, transport).await?;
        log::debug!("Found these TXT records for '{fqdn}': {records:?}");

        if let Some(expected) = expected_content {
            log::debug!("Verifying presence of '{expected}'");
            if !records.iter().any(|value| value == expected) {
                return Err(ChallengeError::Verification {
                    domain: domain.to_string(),
                });
            }
        }

        Ok(records)
    }

    /// 传播验证循环
    ///
    /// 共 `retries + 1` 次尝试，失败后等待固定间隔再试；最后一次失败
    /// 不再等待，直接以重试耗尽收场。
    async fn verify_propagation(
        &self,
        options: &ChallengeOptions,
        domain: &str,
        challenge: &str,
        auth_content: &str,
    ) -> Result<()> {
        let Some(policy) = options.verify_propagation else {
            return Ok(());
        };

        log::debug!("Awaiting propagation of TXT record for '{domain}'");
        for attempt in 0..=policy.retries {
            match self.loopback(options, domain, challenge, Some(auth_content)).await {
                Ok(_) => {
                    log::debug!("Successfully propagated challenge for '{domain}'");
                    return Ok(());
                }
                Err(error) if attempt < policy.retries => {
                    log::debug!("{error}");
                    log::debug!(
                        "Waiting for {} ms before attempting retry {} / {}",
                        policy.wait_for,
                        attempt + 1,
                        policy.retries
                    );
                    tokio::time::sleep(policy.wait()).await;
                }
                Err(error) => {
                    log::debug!("{error}");
                }
            }
        }

        Err(ChallengeError::PropagationTimeout {
            domain: domain.to_string(),
            attempts: policy.retries + 1,
        })
    }

    /// 最长后缀匹配定位域名所属的 Zone
    ///
    /// 提供商的返回顺序没有保证，取首个匹配可能命中较短的父 Zone，
    /// 所以遍历全部 Zone 并保留名称最长的匹配。
    async fn zone_for_domain(&self, domain: &str) -> Result<Zone> {
        let zones = consume_pages(|query| self.provider.list_zones(query), PAGE_SIZE);
        pin_mut!(zones);

        let mut best: Option<Zone> = None;
        while let Some(zone) = zones.try_next().await? {
            if domain.ends_with(&zone.name)
                && best.as_ref().is_none_or(|b| zone.name.len() > b.name.len())
            {
                best = Some(zone);
            }
        }

        best.ok_or_else(|| ChallengeError::ZoneNotFound {
            domain: domain.to_string(),
        })
    }

    /// 列出 Zone 内指定名称的全部 TXT 记录
    ///
    /// 提供商侧的名称过滤不保证精确，拉回后再按名称做一次精确匹配。
    async fn txt_records(&self, zone_id: &str, fqdn: &str) -> Result<Vec<DnsRecord>> {
        let stream = consume_pages(
            |query| self.provider.list_txt_records(zone_id, fqdn, query),
            PAGE_SIZE,
        );
        pin_mut!(stream);

        let mut records = Vec::new();
        while let Some(record) = stream.try_next().await? {
            if record.name == fqdn {
                records.push(record);
            }
        }
        Ok(records)
    }
}
