//! Pagination helpers
//!
//! Both helpers are all-or-nothing: the first failed page discards
//! everything collected so far and returns that page's error.

use crate::aws::{DescribePage, ListingPage};
use anyhow::Result;
use std::future::Future;
use tracing::debug;

/// Follow `next_token` until it is absent or empty, concatenating pages.
pub(crate) async fn describe_all<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<DescribePage<T>>>,
{
    let mut records = Vec::new();
    let mut next_token = None;
    let mut pages = 0usize;

    loop {
        let page = fetch(next_token.take()).await?;
        pages += 1;
        records.extend(page.records);

        match page.next_token {
            Some(token) if !token.is_empty() => next_token = Some(token),
            _ => break,
        }
    }

    debug!(pages, count = records.len(), "Collected described pages");
    Ok(records)
}

/// Follow `marker` while the listing reports truncation, concatenating pages.
pub(crate) async fn list_all<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<ListingPage<T>>>,
{
    let mut records = Vec::new();
    let mut marker = None;
    let mut pages = 0usize;

    loop {
        let page = fetch(marker.take()).await?;
        pages += 1;
        records.extend(page.records);

        if !page.is_truncated {
            break;
        }
        marker = page.marker;
    }

    debug!(pages, count = records.len(), "Collected listed pages");
    Ok(records)
}
