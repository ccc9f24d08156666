//! HTTP client for the Jikan (MyAnimeList) REST API.
//!
//! This crate provides the live `AnimeSource`. It handles:
//! - Building search and discovery requests from `FilterCriteria`
//! - Pacing requests to stay under the public rate limit
//! - Mapping HTTP failures onto `SourceError`
//! - Decoding payloads through `anime_data::parser`
//!
//! It never retries. A 429 surfaces as `SourceError::RateLimited` and it is
//! the caller's call what to do next.

use std::time::{Duration, Instant};

use anime_data::parser::{self, SearchPage};
use anime_data::{AnimeId, AnimeRecord, AnimeSource, FilterCriteria, GenreTag, SourceError};
use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.jikan.moe/v4";

/// Connection and pacing settings
#[derive(Debug, Clone)]
pub struct JikanConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Minimum gap between two requests (the public API allows ~3/s)
    pub min_interval: Duration,
    /// Results per page, at most 25
    pub page_limit: u32,
    /// Ask the API to leave out adult titles
    pub sfw: bool,
}

impl Default for JikanConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("aniepick/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(15),
            min_interval: Duration::from_millis(350),
            page_limit: 25,
            sfw: true,
        }
    }
}

/// Client for the Jikan API.
pub struct JikanClient {
    http: reqwest::Client,
    config: JikanConfig,
    last_request: Mutex<Option<Instant>>,
}

impl JikanClient {
    /// Build a client. Fails only if the TLS backend cannot be initialised.
    pub fn new(config: JikanConfig) -> Result<Self, SourceError> {
        info!("Creating Jikan client for {}", config.base_url);
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| SourceError::Network(format!("building HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config,
            last_request: Mutex::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Look a single title up by id.
    pub async fn anime_by_id(&self, id: AnimeId) -> Result<AnimeRecord, SourceError> {
        let body = self.get_text(&format!("/anime/{}", id), &[]).await?;
        Ok(parser::parse_anime_response(&body)?)
    }

    /// Wait until `min_interval` has passed since the previous request.
    async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.config.min_interval {
                tokio::time::sleep(self.config.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn get_text(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<String, SourceError> {
        self.pace().await;

        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        debug!("GET {} {:?}", url, params);

        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                error!("Request to {} failed: {}", url, e);
                SourceError::Network(e.to_string())
            })?;

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        if let Some(err) = classify_status(response.status(), retry_after, &url) {
            warn!("{}", err);
            return Err(err);
        }

        response
            .text()
            .await
            .map_err(|e| SourceError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl AnimeSource for JikanClient {
    fn name(&self) -> &str {
        "jikan"
    }

    async fn search_anime(&self, query: &str) -> Result<Vec<AnimeRecord>, SourceError> {
        let body = self
            .get_text("/anime", &search_params(query, &self.config))
            .await?;
        let records = parser::parse_search_response(&body)?;
        debug!("Search {:?} returned {} records", query, records.len());
        Ok(records)
    }

    async fn discover(
        &self,
        criteria: &FilterCriteria,
        page: u32,
    ) -> Result<SearchPage, SourceError> {
        let params = discover_params(criteria, page, &self.config);
        let body = self.get_text("/anime", &params).await?;
        Ok(parser::parse_search_page(&body)?)
    }

    async fn genres(&self) -> Result<Vec<GenreTag>, SourceError> {
        let body = self.get_text("/genres/anime", &[]).await?;
        Ok(parser::parse_genres_response(&body)?)
    }
}

/// Map a response status onto the upstream error taxonomy; `None` on success.
pub fn classify_status(
    status: StatusCode,
    retry_after_secs: Option<u64>,
    url: &str,
) -> Option<SourceError> {
    if status.is_success() {
        None
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        Some(SourceError::RateLimited { retry_after_secs })
    } else if status == StatusCode::NOT_FOUND {
        Some(SourceError::NotFound(url.to_string()))
    } else {
        Some(SourceError::Network(format!("{} returned {}", url, status)))
    }
}

fn search_params(query: &str, config: &JikanConfig) -> Vec<(String, String)> {
    let mut params = vec![
        ("q".to_string(), query.trim().to_string()),
        ("limit".to_string(), config.page_limit.to_string()),
    ];
    if config.sfw {
        params.push(("sfw".to_string(), "true".to_string()));
    }
    params
}

/// Query parameters for one discovery page.
///
/// Season, episode bucket and source material have no server-side filter;
/// callers re-check those with `FilterCriteria::matches`.
pub fn discover_params(
    criteria: &FilterCriteria,
    page: u32,
    config: &JikanConfig,
) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = Vec::new();
    let mut push = |key: &str, value: String| params.push((key.to_string(), value));

    if !criteria.genres.is_empty() {
        let ids: Vec<String> = criteria.genres.iter().map(|g| g.to_string()).collect();
        push("genres", ids.join(","));
    }
    if let Some(media_type) = criteria.media_type {
        push("type", media_type.as_query().to_string());
    }
    if criteria.min_score > 0.0 {
        push("min_score", criteria.min_score.to_string());
    }
    if let Some(status) = criteria.status {
        push("status", status.as_query().to_string());
    }
    if let Some(rating) = criteria.rating {
        push("rating", rating.as_query().to_string());
    }
    if let Some(start) = criteria.start_year {
        push("start_date", format!("{:04}-01-01", start));
    }
    if let Some(end) = criteria.end_year {
        push("end_date", format!("{:04}-12-31", end));
    }
    push("order_by", criteria.order_by.as_query().to_string());
    push("sort", criteria.sort.as_query().to_string());
    push("page", page.max(1).to_string());
    push("limit", config.page_limit.to_string());
    if config.sfw {
        push("sfw", "true".to_string());
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use anime_data::{AiringStatus, MediaType, Season, SortDirection, SortField};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_discover_params_default_criteria() {
        let params = discover_params(&FilterCriteria::default(), 1, &JikanConfig::default());
        assert_eq!(param(&params, "min_score"), Some("1"));
        assert_eq!(param(&params, "order_by"), Some("score"));
        assert_eq!(param(&params, "sort"), Some("desc"));
        assert_eq!(param(&params, "page"), Some("1"));
        assert_eq!(param(&params, "limit"), Some("25"));
        assert_eq!(param(&params, "sfw"), Some("true"));
        assert_eq!(param(&params, "genres"), None);
        assert_eq!(param(&params, "type"), None);
    }

    #[test]
    fn test_discover_params_full_criteria() {
        let criteria = FilterCriteria {
            genres: [4, 1].into_iter().collect(),
            media_type: Some(MediaType::Movie),
            min_score: 7.5,
            status: Some(AiringStatus::Complete),
            season: Some(Season::Fall),
            start_year: Some(2005),
            end_year: Some(2010),
            order_by: SortField::Members,
            sort: SortDirection::Asc,
            ..FilterCriteria::default()
        };
        let config = JikanConfig {
            sfw: false,
            ..JikanConfig::default()
        };
        let params = discover_params(&criteria, 0, &config);

        assert_eq!(param(&params, "genres"), Some("1,4"));
        assert_eq!(param(&params, "type"), Some("movie"));
        assert_eq!(param(&params, "min_score"), Some("7.5"));
        assert_eq!(param(&params, "status"), Some("complete"));
        assert_eq!(param(&params, "start_date"), Some("2005-01-01"));
        assert_eq!(param(&params, "end_date"), Some("2010-12-31"));
        assert_eq!(param(&params, "order_by"), Some("members"));
        assert_eq!(param(&params, "sort"), Some("asc"));
        assert_eq!(param(&params, "page"), Some("1"));
        assert_eq!(param(&params, "sfw"), None);
        // No server-side season filter
        assert_eq!(param(&params, "season"), None);
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(StatusCode::OK, None, "u"), None);
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, Some(2), "u"),
            Some(SourceError::RateLimited {
                retry_after_secs: Some(2)
            })
        );
        assert_eq!(
            classify_status(StatusCode::NOT_FOUND, None, "u"),
            Some(SourceError::NotFound("u".to_string()))
        );
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, None, "u"),
            Some(SourceError::Network(_))
        ));
    }

    // ============================================================================
    // Mock Jikan service
    // ============================================================================

    /// Serve exactly one canned HTTP response on a random local port.
    async fn serve_once(status_line: &'static str, extra_headers: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock Jikan service");
        let addr = listener.local_addr().expect("Failed to get local address");

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept failed");
            let mut buf = vec![0u8; 8192];
            let mut read = 0;
            loop {
                let n = socket.read(&mut buf[read..]).await.expect("read failed");
                read += n;
                if n == 0 || buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n{}",
                status_line,
                body.len(),
                extra_headers,
                body
            );
            socket.write_all(response.as_bytes()).await.expect("write failed");
            socket.shutdown().await.ok();
        });

        format!("http://{}", addr)
    }

    fn client_for(base_url: String) -> JikanClient {
        JikanClient::new(JikanConfig {
            base_url,
            min_interval: Duration::from_millis(0),
            ..JikanConfig::default()
        })
        .expect("client")
    }

    #[tokio::test]
    async fn test_search_against_mock_service() {
        let base = serve_once(
            "HTTP/1.1 200 OK",
            "",
            r#"{"data": [{"mal_id": 21, "title": "One Piece", "episodes": null, "score": 8.7}]}"#,
        )
        .await;
        let client = client_for(base);

        let records = client.search_anime("one piece").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 21);
        assert_eq!(records[0].episodes, None);
    }

    #[tokio::test]
    async fn test_empty_search_is_not_an_error() {
        let base = serve_once("HTTP/1.1 200 OK", "", r#"{"data": []}"#).await;
        let client = client_for(base);
        assert!(client.search_anime("zzzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rate_limit_is_propagated() {
        let base = serve_once(
            "HTTP/1.1 429 Too Many Requests",
            "Retry-After: 3\r\n",
            r#"{"status": 429}"#,
        )
        .await;
        let client = client_for(base);

        let err = client.search_anime("naruto").await.unwrap_err();
        assert_eq!(
            err,
            SourceError::RateLimited {
                retry_after_secs: Some(3)
            }
        );
    }

    #[tokio::test]
    async fn test_lookup_not_found() {
        let base = serve_once("HTTP/1.1 404 Not Found", "", r#"{"status": 404}"#).await;
        let client = client_for(base);
        let err = client.anime_by_id(123456789).await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_garbage_body_is_invalid_response() {
        let base = serve_once("HTTP/1.1 200 OK", "", "<html>oops</html>").await;
        let client = client_for(base);
        let err = client.genres().await.unwrap_err();
        assert!(matches!(err, SourceError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{}", addr));
        let err = client.search_anime("anything").await.unwrap_err();
        assert!(matches!(err, SourceError::Network(_)));
    }
}
