use std::time::Duration;

use inkstone_core::{ChatMessage, Collection, FetchTicket, PoemFields, PublishedItem};
use url::Url;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::{ApiError, FailureKind};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Root of the REST API, e.g. `http://club.local/api`.
    pub base_url: String,
    /// Session token added to write requests.
    pub token: Option<String>,
    /// Account id recorded on poems this client creates.
    pub author_id: Option<u64>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1/api".to_string(),
            token: None,
            author_id: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
    pub query: Option<String>,
}

impl From<&FetchTicket> for PageQuery {
    fn from(ticket: &FetchTicket) -> Self {
        Self {
            page: ticket.page,
            limit: ticket.limit,
            query: ticket.query.clone(),
        }
    }
}

/// Server side of the poem collection.
#[async_trait::async_trait]
pub trait ContentApi: Send + Sync {
    async fn list(&self, query: &PageQuery) -> Result<Vec<PublishedItem>, ApiError>;
    async fn create(&self, fields: &PoemFields) -> Result<PublishedItem, ApiError>;
    async fn update(&self, id: u64, fields: &PoemFields) -> Result<(), ApiError>;
    async fn delete(&self, id: u64) -> Result<(), ApiError>;
}

#[async_trait::async_trait]
pub trait ChatApi: Send + Sync {
    /// Messages with an id above `after_id`, oldest first; 0 returns all.
    async fn messages_after(&self, after_id: u64) -> Result<Vec<ChatMessage>, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    settings: ApiSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestApiClient {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as an API base", settings.base_url),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            base,
            client,
        })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    /// One page of any paginated collection.
    pub async fn list_page<T: DeserializeOwned>(
        &self,
        collection: Collection,
        query: &PageQuery,
    ) -> Result<Vec<T>, ApiError> {
        let mut url = self.endpoint(&[collection.path()])?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &query.page.to_string());
            pairs.append_pair("limit", &query.limit.to_string());
            if let Some(q) = query.query.as_deref() {
                pairs.append_pair("q", q);
            }
        }
        self.get_json(url).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::new(FailureKind::InvalidUrl, self.settings.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let response = check_status(response)?;
        response.json::<T>().await.map_err(map_reqwest_error)
    }

    async fn post_json(&self, segments: &[&str], body: Value) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint(segments)?;
        let body = self.with_token(body);
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(response)
    }

    fn with_token(&self, mut body: Value) -> Value {
        if let (Some(token), Value::Object(map)) = (self.settings.token.as_ref(), &mut body) {
            map.insert("token".to_string(), Value::String(token.clone()));
        }
        body
    }
}

#[async_trait::async_trait]
impl ContentApi for ReqwestApiClient {
    async fn list(&self, query: &PageQuery) -> Result<Vec<PublishedItem>, ApiError> {
        self.list_page(Collection::Poems, query).await
    }

    async fn create(&self, fields: &PoemFields) -> Result<PublishedItem, ApiError> {
        let mut body = serde_json::to_value(fields)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        if let (Some(author_id), Value::Object(map)) = (self.settings.author_id, &mut body) {
            map.insert("author_id".to_string(), Value::from(author_id));
        }
        let response = self.post_json(&[Collection::Poems.path()], body).await?;
        response
            .json::<PublishedItem>()
            .await
            .map_err(map_reqwest_error)
    }

    async fn update(&self, id: u64, fields: &PoemFields) -> Result<(), ApiError> {
        let body = json!({
            "id": id,
            "title": fields.title,
            "type": fields.kind,
            "content": fields.content,
            "date": fields.date,
        });
        self.post_json(&[Collection::Poems.path(), "update"], body)
            .await
            .map(|_| ())
    }

    async fn delete(&self, id: u64) -> Result<(), ApiError> {
        self.post_json(&[Collection::Poems.path(), "delete"], json!({ "id": id }))
            .await
            .map(|_| ())
    }
}

#[async_trait::async_trait]
impl ChatApi for ReqwestApiClient {
    async fn messages_after(&self, after_id: u64) -> Result<Vec<ChatMessage>, ApiError> {
        let mut url = self.endpoint(&["chat", "messages"])?;
        url.query_pairs_mut()
            .append_pair("after", &after_id.to_string());
        self.get_json(url).await
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
