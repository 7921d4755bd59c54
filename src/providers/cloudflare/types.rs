//! Cloudflare API 类型定义

use serde::Deserialize;

use crate::types::ApiErrorDetail;

/// Cloudflare API 通用响应
#[derive(Debug, Deserialize)]
pub(crate) struct CloudflareResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    pub errors: Option<Vec<ApiErrorDetail>>,
    pub result_info: Option<CloudflareResultInfo>,
}

/// 分页信息
#[derive(Debug, Deserialize)]
pub(crate) struct CloudflareResultInfo {
    #[allow(dead_code)]
    pub page: u32,
    #[allow(dead_code)]
    pub per_page: u32,
    pub total_pages: u32,
}
