//! Budgeted, cursor-driven pagination over the TzKT operations endpoint
//!
//! One request at a time, newest first: each page's last record id becomes
//! the `lastId` cursor of the next request. Results are memoized per address
//! so re-exploring the same account does not refetch, but only while the
//! requested record budget matches the cached one.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use super::operation::RawOperation;

/// Records requested per page. TzKT caps `limit` at 1000.
pub const PAGE_SIZE: usize = 1000;

/// Outcome of one page request. Exhaustion and transport failure both end
/// pagination, but they are distinct so callers can log or retry them
/// differently.
#[derive(Debug)]
pub enum PageFetch {
    Page(Vec<RawOperation>),
    EndOfData,
    Failed(String),
}

/// Source of operation pages. The paginator is written against this seam so
/// tests can script pages without a network.
#[async_trait]
pub trait OperationSource: Send + Sync {
    async fn fetch_page(&self, address: &str, cursor: Option<i64>) -> PageFetch;
}

/// TzKT REST implementation of [`OperationSource`].
pub struct TzktSource {
    client: reqwest::Client,
    base_url: String,
}

impl TzktSource {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn page_url(&self, address: &str, cursor: Option<i64>) -> String {
        let mut url = format!(
            "{}/v1/accounts/{}/operations?type=activation,transaction,origination,migration&status=applied&sort.desc=level&limit={}",
            self.base_url, address, PAGE_SIZE
        );
        if let Some(last_id) = cursor {
            url.push_str(&format!("&lastId={}", last_id));
        }
        url
    }
}

#[async_trait]
impl OperationSource for TzktSource {
    async fn fetch_page(&self, address: &str, cursor: Option<i64>) -> PageFetch {
        let url = self.page_url(address, cursor);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return PageFetch::Failed(format!("request error: {}", e)),
        };

        if !response.status().is_success() {
            return PageFetch::Failed(format!("TzKT API error: {}", response.status()));
        }

        match response.json::<Vec<RawOperation>>().await {
            Ok(records) if records.is_empty() => PageFetch::EndOfData,
            Ok(records) => PageFetch::Page(records),
            Err(e) => PageFetch::Failed(format!("malformed payload: {}", e)),
        }
    }
}

struct CachedFetch {
    record_budget: usize,
    records: Vec<RawOperation>,
}

/// Sequential page fetcher with a per-address memo cache.
///
/// Cursor state lives inside each `fetch_all` call, so paginators for
/// different queries cannot trample each other's position.
pub struct Paginator<S> {
    source: S,
    cache: HashMap<String, CachedFetch>,
}

impl<S: OperationSource> Paginator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: HashMap::new(),
        }
    }

    /// Fetch pages until the source runs dry, a page fails, or the
    /// accumulated count reaches `record_budget`. The budget is checked
    /// after appending, so the result can overshoot it by up to one page.
    ///
    /// Failures end pagination with whatever arrived before them; the
    /// caller sees fewer records, never an error.
    pub async fn fetch_all(&mut self, address: &str, record_budget: usize) -> Vec<RawOperation> {
        if let Some(cached) = self.cache.get(address) {
            if cached.record_budget == record_budget {
                log::debug!(
                    "cache hit for {} ({} records, budget {})",
                    address,
                    cached.records.len(),
                    record_budget
                );
                return cached.records.clone();
            }
        }

        let mut records: Vec<RawOperation> = Vec::new();
        let mut cursor: Option<i64> = None;

        loop {
            match self.source.fetch_page(address, cursor).await {
                PageFetch::Page(page) => {
                    let page_len = page.len();
                    cursor = page.last().and_then(|op| op.id());
                    records.extend(page);
                    log::debug!("page of {} for {}, {} total", page_len, address, records.len());

                    if records.len() >= record_budget {
                        break;
                    }
                    if page_len < PAGE_SIZE {
                        // short page: nothing older remains
                        break;
                    }
                    if cursor.is_none() {
                        log::warn!(
                            "page for {} ended on a record without an id, stopping",
                            address
                        );
                        break;
                    }
                }
                PageFetch::EndOfData => break,
                PageFetch::Failed(reason) => {
                    log::warn!(
                        "page fetch for {} failed, keeping {} records: {}",
                        address,
                        records.len(),
                        reason
                    );
                    break;
                }
            }
        }

        self.cache.insert(
            address.to_string(),
            CachedFetch {
                record_budget,
                records: records.clone(),
            },
        );
        records
    }

    /// Drop the cached result for one address.
    pub fn invalidate(&mut self, address: &str) {
        self.cache.remove(address);
    }

    /// Drop every cached result, as when starting a fresh exploration session.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
