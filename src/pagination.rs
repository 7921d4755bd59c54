//! 分页结果的惰性消费
//!
//! Cloudflare 的列表接口按页返回。这里把"逐页拉取"封装成一个顺序的元素流:
//! 每次只缓冲一页，取完一页才请求下一页，页与页之间严格串行。

use std::collections::VecDeque;
use std::future::Future;

use futures::{Stream, stream};

use crate::error::Result;

/// 默认每页条数
pub(crate) const PAGE_SIZE: u32 = 10;

/// 分页请求参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    /// 页码，从 1 开始
    pub page: u32,
    /// 每页条数
    pub per_page: u32,
}

/// 单页结果
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 来自 `result_info.total_pages`
    pub total_pages: u32,
}

/// 把按页加载的接口展开成跨页的元素流
///
/// 加载器一旦出错，流立即以该错误终止，不做部分页重试。
pub(crate) fn consume_pages<T, F, Fut>(loader: F, per_page: u32) -> impl Stream<Item = Result<T>>
where
    F: FnMut(PageQuery) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    struct State<F, T> {
        loader: F,
        page: u32,
        total_pages: Option<u32>,
        buffer: VecDeque<T>,
    }

    let state = State {
        loader,
        page: 1,
        total_pages: None,
        buffer: VecDeque::new(),
    };

    stream::try_unfold(state, move |mut state| async move {
        loop {
            if let Some(item) = state.buffer.pop_front() {
                return Ok(Some((item, state)));
            }
            if let Some(total) = state.total_pages
                && state.page > total
            {
                return Ok(None);
            }

            let page = (state.loader)(PageQuery {
                page: state.page,
                per_page,
            })
            .await?;

            state.total_pages = Some(page.total_pages);
            state.page += 1;
            state.buffer.extend(page.items);

            if state.buffer.is_empty() && state.page > page.total_pages {
                return Ok(None);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use futures::{StreamExt, TryStreamExt};

    use super::*;
    use crate::error::ChallengeError;
    use crate::types::ApiErrorDetail;

    fn slice_page(items: &[u32], query: PageQuery) -> Page<u32> {
        let start = ((query.page - 1) * query.per_page) as usize;
        let end = (start + query.per_page as usize).min(items.len());
        Page {
            items: items.get(start..end).unwrap_or_default().to_vec(),
            total_pages: items.len().div_ceil(query.per_page as usize) as u32,
        }
    }

    #[tokio::test]
    async fn yields_all_items_in_order_across_pages() {
        let items: Vec<u32> = (0..25).collect();
        let calls = AtomicU32::new(0);

        let stream = consume_pages(
            |query| {
                calls.fetch_add(1, Ordering::SeqCst);
                let page = slice_page(&items, query);
                async move { Ok(page) }
            },
            PAGE_SIZE,
        );

        let collected: Vec<u32> = stream.try_collect().await.unwrap();
        assert_eq!(collected, items);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn fetches_pages_lazily() {
        let items: Vec<u32> = (0..25).collect();
        let calls = AtomicU32::new(0);

        let stream = consume_pages(
            |query| {
                calls.fetch_add(1, Ordering::SeqCst);
                let page = slice_page(&items, query);
                async move { Ok(page) }
            },
            PAGE_SIZE,
        );

        let first_five: Vec<Result<u32, ChallengeError>> = stream.take(5).collect().await;
        assert_eq!(first_five.len(), 5);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn terminates_with_error_on_failed_page() {
        let items: Vec<u32> = (0..25).collect();
        let calls = AtomicU32::new(0);

        let stream = consume_pages(
            |query| {
                calls.fetch_add(1, Ordering::SeqCst);
                let result = if query.page == 2 {
                    Err(ChallengeError::Api {
                        errors: vec![ApiErrorDetail {
                            code: 10000,
                            message: "Authentication error".to_string(),
                        }],
                    })
                } else {
                    Ok(slice_page(&items, query))
                };
                async move { result }
            },
            PAGE_SIZE,
        );
        futures::pin_mut!(stream);

        let mut seen = 0;
        let error = loop {
            match stream.try_next().await {
                Ok(Some(_)) => seen += 1,
                Ok(None) => panic!("stream ended without surfacing the error"),
                Err(error) => break error,
            }
        };

        assert_eq!(seen, 10);
        assert!(matches!(error, ChallengeError::Api { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(stream.try_next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_listing_yields_nothing() {
        let stream = consume_pages(
            |_query| async move {
                Ok(Page::<u32> {
                    items: Vec::new(),
                    total_pages: 0,
                })
            },
            PAGE_SIZE,
        );

        let collected: Vec<u32> = stream.try_collect().await.unwrap();
        assert!(collected.is_empty());
    }
}
