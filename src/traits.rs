//! 协作者抽象 Trait

use async_trait::async_trait;

use crate::error::Result;
use crate::pagination::{Page, PageQuery};
use crate::resolver::DnsTransport;
use crate::types::{DnsRecord, NewDnsRecord, Zone};

/// DNS 提供商 API 抽象
///
/// 生产实现: [`CloudflareProvider`](crate::CloudflareProvider)。
/// 测试中用内存实现替换。
#[async_trait]
pub trait DnsProviderApi: Send + Sync {
    /// 按页列出账户下的 Zone
    async fn list_zones(&self, query: PageQuery) -> Result<Page<Zone>>;

    /// 按页列出 Zone 内指定名称的 TXT 记录
    ///
    /// 提供商侧的名称过滤不保证精确，调用方需要再按名称精确匹配一次。
    async fn list_txt_records(
        &self,
        zone_id: &str,
        name: &str,
        query: PageQuery,
    ) -> Result<Page<DnsRecord>>;

    /// 创建记录
    async fn create_record(&self, zone_id: &str, record: &NewDnsRecord) -> Result<DnsRecord>;

    /// 更新记录（整条覆盖）
    async fn update_record(&self, zone_id: &str, record: &DnsRecord) -> Result<DnsRecord>;

    /// 删除记录
    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()>;
}

/// TXT 解析抽象
#[async_trait]
pub trait TxtLookup: Send + Sync {
    /// 查询 FQDN 的全部 TXT 值
    async fn resolve_txt(&self, fqdn: &str, transport: DnsTransport) -> Result<Vec<String>>;
}
