//! Article API Client
//!
//! Thin reqwest wrapper over the article server's REST API. Every request
//! carries `Authorization: Bearer <token>` when a token is configured and
//! every response outside 200-299 becomes [`ClientError::Status`].

use crate::client::config::Config;
use crate::client::error::{ClientError, Result};
use crate::shared::{ArchivedPage, Article};
use reqwest::{Client, Method, RequestBuilder};
use std::time::Duration;

/// HTTP verbs used against the article server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }

    fn to_reqwest(self) -> Method {
        match self {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// A request the client can send without interpreting the response body
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl Endpoint {
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            body: None,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Delete,
            path: path.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Client for the article server
#[derive(Debug, Clone)]
pub struct ArticleClient {
    config: Config,
    http: Client,
}

impl ArticleClient {
    /// Build a client using the request timeout from the sync settings
    pub fn new(config: Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.sync().request_timeout_seconds))
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn request(&self, method: HttpMethod, path: &str) -> Result<RequestBuilder> {
        let url = self.config.api_url(path)?;
        let mut builder = self.http.request(method.to_reqwest(), url);
        if let Some(token) = self.config.api_token() {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    async fn execute(&self, method: HttpMethod, path: &str, builder: RequestBuilder) -> Result<reqwest::Response> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                method: method.as_str(),
                path: path.to_string(),
            });
        }
        Ok(response)
    }

    /// `GET /api/articles`
    pub async fn fetch_articles(&self) -> Result<Vec<Article>> {
        let path = "/api/articles";
        let builder = self.request(HttpMethod::Get, path)?;
        let response = self.execute(HttpMethod::Get, path, builder).await?;
        Ok(response.json().await?)
    }

    /// `GET /api/articles/archived?page&pageSize`
    pub async fn fetch_archived(&self, page: u32, page_size: u32) -> Result<ArchivedPage> {
        let path = format!("/api/articles/archived?page={page}&pageSize={page_size}");
        let builder = self.request(HttpMethod::Get, &path)?;
        let response = self.execute(HttpMethod::Get, &path, builder).await?;
        Ok(response.json().await?)
    }

    /// Send a request and discard the response body
    pub async fn send(&self, endpoint: &Endpoint) -> Result<()> {
        let mut builder = self.request(endpoint.method, &endpoint.path)?;
        if let Some(body) = &endpoint.body {
            builder = builder.json(body);
        }
        self.execute(endpoint.method, &endpoint.path, builder).await?;
        Ok(())
    }

    /// Whether the server answers at all; any HTTP status counts as reachable
    pub async fn probe(&self) -> bool {
        match self.request(HttpMethod::Get, "/api/articles") {
            Ok(builder) => builder.send().await.is_ok(),
            Err(_) => false,
        }
    }
}
