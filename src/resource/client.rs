use std::sync::Arc;

use reqwest::{Client, header};

use crate::LogLevel;
use crate::auth::CredentialProvider;
use crate::error::{ConnectorError, Result, classify};
use crate::resource::kind::{ResourceKind, Verb};
use crate::resource::parse::{Page, parse_page, parse_record};
use crate::resource::value::WireRecord;

const PAGE_PARAM: &str = "_page";
const PER_PAGE_PARAM: &str = "_per_page";

/// Equality predicates sent as query parameters on a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    params: Vec<(String, String)>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((field.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Position of the pagination loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub page_size: usize,
    pub page_number: usize,
}

impl PageCursor {
    fn first(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page_number: 1,
        }
    }

    fn next(self) -> Self {
        Self {
            page_number: self.page_number + 1,
            ..self
        }
    }
}

/// HTTP client for one resource collection.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    client: Client,
    base_url: String,
    kind: ResourceKind,
    credentials: Arc<CredentialProvider>,
    log_level: LogLevel,
}

impl ResourceClient {
    pub fn new(
        client: Client,
        base_url: &str,
        kind: ResourceKind,
        credentials: Arc<CredentialProvider>,
        log_level: LogLevel,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            kind,
            credentials,
            log_level,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.kind.base_path(), urlencoding::encode(id))
    }

    fn search_path(&self, criteria: &SearchCriteria, cursor: PageCursor) -> String {
        let mut path = self.kind.base_path().to_string();
        path.push('?');
        for (field, value) in criteria.params() {
            path.push_str(&urlencoding::encode(field));
            path.push('=');
            path.push_str(&urlencoding::encode(value));
            path.push('&');
        }
        path.push_str(&format!(
            "{PAGE_PARAM}={}&{PER_PAGE_PARAM}={}",
            cursor.page_number, cursor.page_size
        ));
        path
    }

    /// Issue one request and return the body of a 2xx response.
    async fn execute(&self, verb: Verb, path: &str, body: Option<&WireRecord>) -> Result<String> {
        let method = verb.method();
        let description = format!("{method} {path}");
        let url = format!("{}{}", self.base_url, path);

        if self.log_level.is_debug() {
            log::debug!("{description}");
            if let Some(body) = body {
                let keys: Vec<&str> = body.keys().map(String::as_str).collect();
                log::debug!("payload fields: {}", keys.join(", "));
            }
        }

        let mut builder = self
            .client
            .request(method, &url)
            .header(header::ACCEPT, "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let builder = self.credentials.authorize(builder).await?;

        let resp = builder
            .send()
            .await
            .map_err(|e| ConnectorError::from_transport(&description, &e))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ConnectorError::from_transport(&description, &e))?;

        if let Some(err) = classify(status.as_u16(), self.kind, verb, &description, &text) {
            log::warn!("{description} failed with {status}");
            return Err(err);
        }

        if self.log_level.is_debug() {
            log::debug!("{description} -> {status}");
        }

        Ok(text)
    }

    /// Fetch one record by identifier.
    pub async fn get(&self, id: &str) -> Result<WireRecord> {
        let body = self.execute(Verb::Get, &self.item_path(id), None).await?;
        parse_record(&body)
    }

    /// Create a record; returns the body of the response.
    pub async fn create(&self, record: &WireRecord) -> Result<WireRecord> {
        let body = self
            .execute(Verb::Create, self.kind.base_path(), Some(record))
            .await?;
        parse_record(&body)
    }

    /// Replace the writable fields of a record. A bodiless response yields
    /// an empty record.
    pub async fn update(&self, id: &str, record: &WireRecord) -> Result<WireRecord> {
        let body = self
            .execute(Verb::Update, &self.item_path(id), Some(record))
            .await?;
        parse_record(&body)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.execute(Verb::Delete, &self.item_path(id), None).await?;
        Ok(())
    }

    async fn fetch_page(&self, criteria: &SearchCriteria, cursor: PageCursor) -> Result<Page> {
        if self.log_level.is_debug() {
            log::debug!("{} page {}", self.kind, cursor.page_number);
        }
        let body = self
            .execute(Verb::Search, &self.search_path(criteria, cursor), None)
            .await?;
        parse_page(&body, self.kind.collection_key())
    }

    /// Prepare a paginated search. Nothing is sent until the returned
    /// request is driven; every run starts again from page 1.
    pub fn search(&self, criteria: SearchCriteria, page_size: usize) -> SearchRequest<'_> {
        SearchRequest {
            client: self,
            criteria,
            page_size,
        }
    }
}

/// A restartable paginated search over one resource collection.
#[derive(Debug, Clone)]
pub struct SearchRequest<'a> {
    client: &'a ResourceClient,
    criteria: SearchCriteria,
    page_size: usize,
}

impl SearchRequest<'_> {
    /// Stream records to `handler` page by page. Returning `false` from the
    /// handler stops the search. Returns the number of records delivered.
    ///
    /// A page shorter than the page size ends the search, as does a response
    /// consisting of a single bare object.
    pub async fn for_each<F>(&self, mut handler: F) -> Result<usize>
    where
        F: FnMut(WireRecord) -> bool,
    {
        let mut cursor = PageCursor::first(self.page_size);
        let mut delivered = 0usize;

        loop {
            let page = self.client.fetch_page(&self.criteria, cursor).await?;
            let single = matches!(page, Page::Single(_));
            let count = page.len();

            for record in page.into_records() {
                delivered += 1;
                if !handler(record) {
                    return Ok(delivered);
                }
            }

            if single || count < cursor.page_size {
                break;
            }
            cursor = cursor.next();
        }

        Ok(delivered)
    }

    /// Run the search to completion and return every record. On failure no
    /// partial result is returned.
    pub async fn collect(&self) -> Result<Vec<WireRecord>> {
        let mut records = Vec::new();
        self.for_each(|record| {
            records.push(record);
            true
        })
        .await?;
        Ok(records)
    }
}
