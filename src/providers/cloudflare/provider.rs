//! Cloudflare 的 DnsProviderApi 实现

use async_trait::async_trait;
use reqwest::Method;

use crate::error::Result;
use crate::pagination::{Page, PageQuery};
use crate::traits::DnsProviderApi;
use crate::types::{DnsRecord, NewDnsRecord, Zone};

use super::CloudflareProvider;

#[async_trait]
impl DnsProviderApi for CloudflareProvider {
    async fn list_zones(&self, query: PageQuery) -> Result<Page<Zone>> {
        let builder = self
            .request(Method::GET, "/zones")
            .query(&[("page", query.page), ("per_page", query.per_page)]);
        let (zones, info) = self.send::<Vec<Zone>>(builder, "GET /zones").await?;

        Ok(Page {
            items: zones,
            total_pages: info.map_or(1, |info| info.total_pages),
        })
    }

    async fn list_txt_records(
        &self,
        zone_id: &str,
        name: &str,
        query: PageQuery,
    ) -> Result<Page<DnsRecord>> {
        let path = format!("/zones/{zone_id}/dns_records");
        let builder = self
            .request(Method::GET, &path)
            .query(&[("type", "TXT"), ("name", name)])
            .query(&[("page", query.page), ("per_page", query.per_page)]);
        let (records, info) = self
            .send::<Vec<DnsRecord>>(builder, &format!("GET {path}"))
            .await?;

        Ok(Page {
            items: records,
            total_pages: info.map_or(1, |info| info.total_pages),
        })
    }

    async fn create_record(&self, zone_id: &str, record: &NewDnsRecord) -> Result<DnsRecord> {
        let path = format!("/zones/{zone_id}/dns_records");
        let builder = self.request(Method::POST, &path).json(record);
        let (created, _) = self
            .send::<DnsRecord>(builder, &format!("POST {path}"))
            .await?;
        Ok(created)
    }

    async fn update_record(&self, zone_id: &str, record: &DnsRecord) -> Result<DnsRecord> {
        let path = format!("/zones/{zone_id}/dns_records/{}", record.id);
        let builder = self.request(Method::PUT, &path).json(record);
        let (updated, _) = self
            .send::<DnsRecord>(builder, &format!("PUT {path}"))
            .await?;
        Ok(updated)
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        let path = format!("/zones/{zone_id}/dns_records/{record_id}");
        let builder = self.request(Method::DELETE, &path);
        self.send_raw::<serde_json::Value>(builder, &format!("DELETE {path}"))
            .await?;
        Ok(())
    }
}
