//! News API backend adapter implementation.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::{debug, warn};
use serde_json::Value;

use crate::backends::{NewsBackend, SearchPage, SearchQuery};
use crate::config::ApiConfig;
use crate::content::{
    Category, ContentItem, EngagementCounters, Language, LifecycleFlags, MediaAttachment,
};
use crate::errors::{ApiError, ApiErrorKind};

const SEARCH_PATH: &str = "/news/filter-multi-categories";
const CATEGORIES_PATH: &str = "/news/categories";
const LANGUAGES_PATH: &str = "/news/languages";
const SINGLE_ITEM_PATH: &str = "/news";
const USER_AGENT: &str = "newsdesk/0.1.0";

/// News API adapter backed by `ureq`.
pub struct NewsApiAdapter {
    http_client: ureq::Agent,
    base_url: String,
    client_type: String,
    bearer_token: Option<String>,
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl NewsApiAdapter {
    /// Creates an adapter for `config`; `bearer_token` is attached to every request when set.
    pub fn new(config: &ApiConfig, bearer_token: Option<String>) -> Self {
        let http_client = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent(USER_AGENT)
            .build();
        let per_second =
            NonZeroU32::new(config.max_requests_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            http_client,
            base_url: Self::endpoint_base(&config.base_url),
            client_type: config.client_type.clone(),
            bearer_token: bearer_token.filter(|token| !token.trim().is_empty()),
            limiter: RateLimiter::direct(Quota::per_second(per_second)),
        }
    }

    fn endpoint_base(endpoint: &str) -> String {
        endpoint.trim().trim_end_matches('/').to_string()
    }

    fn api_url(&self, path: &str, params: &[(&str, String)]) -> String {
        let query: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect();
        if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query.join("&"))
        }
    }

    fn wait_for_request_slot(&self) {
        while let Err(not_until) = self.limiter.check() {
            let wait = not_until.wait_time_from(self.limiter.clock().now());
            debug!("NewsApi: request rate saturated, waiting {:?}", wait);
            std::thread::sleep(wait);
        }
    }

    fn classify_ureq_failure(operation: &'static str, error: ureq::Error) -> ApiError {
        match error {
            ureq::Error::Status(code, response) => {
                let body = response.into_string().unwrap_or_default();
                ApiError::new(ApiErrorKind::from_status(code), operation, body).with_status(code)
            }
            ureq::Error::Transport(transport) => {
                let detail = transport.to_string();
                let lowered = detail.to_ascii_lowercase();
                let kind = if lowered.contains("timed out") || lowered.contains("timeout") {
                    ApiErrorKind::Timeout
                } else {
                    ApiErrorKind::Network
                };
                ApiError::new(kind, operation, detail)
            }
        }
    }

    fn request_json(
        &self,
        operation: &'static str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value, ApiError> {
        self.wait_for_request_slot();
        let url = self.api_url(path, params);
        debug!("NewsApi({operation}): GET {url}");
        let mut request = self
            .http_client
            .get(&url)
            .set("Content-Type", "application/json")
            .set("X-Client-Type", &self.client_type);
        if let Some(token) = &self.bearer_token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }
        let response = request.call().map_err(|err| {
            let error = Self::classify_ureq_failure(operation, err);
            warn!("NewsApi({operation}): {} ({})", error.user_message(), error.detail);
            error
        })?;
        response
            .into_json::<Value>()
            .map_err(|err| ApiError::new(ApiErrorKind::Malformed, operation, err.to_string()))
    }

    /// Returns `result` of a `{status, message, result}` envelope, rejecting `status != 1`.
    fn envelope_result(operation: &'static str, payload: Value) -> Result<Value, ApiError> {
        let status = payload.get("status").and_then(value_as_i64);
        match status {
            Some(1) => Ok(payload.get("result").cloned().unwrap_or(Value::Null)),
            Some(_) => {
                let message = payload
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("news API rejected the request");
                Err(ApiError::new(ApiErrorKind::Rejected, operation, message))
            }
            None => Err(ApiError::new(
                ApiErrorKind::Malformed,
                operation,
                "response envelope missing status",
            )),
        }
    }

    fn array_items(value: Option<&Value>) -> Vec<&Value> {
        match value {
            Some(Value::Array(items)) => items.iter().collect(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn parse_item(raw: &Value) -> Option<ContentItem> {
        let id = string_field(raw, &["id"])?;
        let mut item = ContentItem::new(
            id,
            string_field(raw, &["title"]).unwrap_or_else(|| "Untitled".to_string()),
        );
        item.slug = string_field(raw, &["slug"]).unwrap_or_default();
        item.excerpt = string_field(raw, &["excerpt"]);
        item.short_content = string_field(raw, &["shortNewsContent", "short_news_content"])
            .unwrap_or_default();
        item.long_content = raw
            .get("longNewsContent")
            .and_then(|value| value.get("content"))
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
            .or_else(|| string_field(raw, &["content", "long_news_content"]))
            .unwrap_or_default();
        item.category_id = string_field(raw, &["categoryId", "category_id"]).unwrap_or_default();
        item.category_name =
            string_field(raw, &["categoryName", "category_name"]).unwrap_or_default();
        item.language_id = string_field(raw, &["language_id", "languageId"]).unwrap_or_default();
        item.language_name = string_field(raw, &["languageName"]).unwrap_or_default();
        item.state_id = string_field(raw, &["state_id", "stateId"]).unwrap_or_default();
        item.state_name = string_field(raw, &["stateName"]).unwrap_or_default();
        item.district_id = string_field(raw, &["district_id", "districtId"]).unwrap_or_default();
        item.district_name = string_field(raw, &["districtName"]).unwrap_or_default();
        item.author_name = string_field(raw, &["authorName", "author_name"]).unwrap_or_default();
        item.source = string_field(raw, &["source"]);
        item.read_time_minutes = raw
            .get("readTime")
            .and_then(value_as_i64)
            .and_then(|minutes| u32::try_from(minutes).ok());
        item.published_at = string_field(raw, &["publishedAt", "published_at"]);
        item.created_at = string_field(raw, &["createdAt", "created_at"]);
        item.updated_at = string_field(raw, &["updatedAt", "updated_at"]);
        item.media = Self::array_items(raw.get("media"))
            .into_iter()
            .filter_map(|media| {
                let url = string_field(media, &["mediaUrl", "media_url", "url"])?;
                Some(MediaAttachment {
                    media_type: string_field(media, &["mediaType", "media_type", "type"])
                        .unwrap_or_else(|| "image".to_string()),
                    url,
                    caption: string_field(media, &["caption"]).unwrap_or_default(),
                })
            })
            .collect();
        item.lifecycle = LifecycleFlags {
            status: string_field(raw, &["status"]).unwrap_or_else(|| "published".to_string()),
            approved: bool_field(raw, &["isApproved", "is_approved"]).unwrap_or(false),
            deleted: bool_field(raw, &["isDeleted", "is_deleted"]).unwrap_or(false),
        };
        item.engagement = EngagementCounters {
            views: count_field(raw, "viewCount"),
            unique_views: count_field(raw, "uniqueViewCount"),
            likes: count_field(raw, "likeCount"),
            dislikes: count_field(raw, "dislikeCount"),
            shares: count_field(raw, "shareCount"),
            comments: count_field(raw, "commentCount"),
        };
        Some(item)
    }

    pub(crate) fn parse_category(raw: &Value) -> Option<Category> {
        let id = string_field(raw, &["id"])?;
        Some(Category {
            id,
            name: string_field(raw, &["category_name", "categoryName", "name"])
                .unwrap_or_default(),
            icon: string_field(raw, &["icon"]),
            color: string_field(raw, &["color"]),
            active: bool_field(raw, &["is_active", "isActive"]).unwrap_or(true),
            language_id: string_field(raw, &["language_id", "languageId"]),
        })
    }

    fn parse_language(raw: &Value) -> Option<Language> {
        let id = string_field(raw, &["id"])?;
        let name = string_field(raw, &["languageName", "name"]).unwrap_or_default();
        Some(Language {
            id,
            code: string_field(raw, &["code"]).unwrap_or_default(),
            name,
        })
    }
}

fn value_as_i64(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|text| text.trim().parse().ok()))
}

/// First non-empty string among `keys`; numeric ids are rendered as strings.
fn string_field(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match raw.get(*key)? {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

/// Accepts JSON booleans as well as `1`/`0` and `"1"`/`"0"`.
fn bool_field(raw: &Value, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|key| match raw.get(*key)? {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_i64().map(|value| value != 0),
        Value::String(text) => match text.trim() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

fn count_field(raw: &Value, key: &str) -> u64 {
    raw.get(key)
        .and_then(value_as_i64)
        .and_then(|count| u64::try_from(count).ok())
        .unwrap_or(0)
}

impl NewsApiAdapter {
    fn search_page_from_payload(payload: Value) -> Result<SearchPage, ApiError> {
        let result = Self::envelope_result("search", payload)?;
        let items = Self::array_items(result.get("items"))
            .into_iter()
            .filter_map(Self::parse_item)
            .collect();
        Ok(SearchPage { items })
    }

    fn categories_from_payload(payload: Value) -> Result<Vec<Category>, ApiError> {
        let result = Self::envelope_result("list_categories", payload)?;
        Ok(Self::array_items(Some(&result))
            .into_iter()
            .filter_map(Self::parse_category)
            .collect())
    }

    fn languages_from_payload(payload: Value) -> Result<Vec<Language>, ApiError> {
        let result = Self::envelope_result("list_languages", payload)?;
        Ok(Self::array_items(Some(&result))
            .into_iter()
            .filter_map(Self::parse_language)
            .collect())
    }

    /// Accepts either a `{status, result}` envelope or a bare item.
    ///
    /// Items carry their own textual `status`, so only a payload with `result`,
    /// or a numeric `status` and no `id`, is treated as an envelope.
    fn single_item_from_payload(payload: Value) -> Result<ContentItem, ApiError> {
        let is_envelope = payload.get("result").is_some()
            || (payload.get("id").is_none()
                && payload.get("status").and_then(value_as_i64).is_some());
        let raw = if is_envelope {
            Self::envelope_result("get_one", payload)?
        } else {
            payload
        };
        Self::parse_item(&raw).ok_or_else(|| {
            ApiError::new(ApiErrorKind::Malformed, "get_one", "item payload missing id")
        })
    }
}

impl NewsBackend for NewsApiAdapter {
    fn search_by_categories(&self, query: &SearchQuery) -> Result<SearchPage, ApiError> {
        let mut params = vec![
            ("categoryIds", query.category_ids.clone()),
            ("language_id", query.language_id.clone()),
            ("limit", query.limit.to_string()),
            ("page", query.page.to_string()),
        ];
        if let Some(state_id) = &query.state_id {
            params.push(("state_id", state_id.clone()));
        }
        if let Some(district_id) = &query.district_id {
            params.push(("district_id", district_id.clone()));
        }
        let payload = self.request_json("search", SEARCH_PATH, &params)?;
        Self::search_page_from_payload(payload)
    }

    fn list_categories(&self, language_id: &str) -> Result<Vec<Category>, ApiError> {
        let params = [("language_id", language_id.to_string())];
        let payload = self.request_json("list_categories", CATEGORIES_PATH, &params)?;
        Self::categories_from_payload(payload)
    }

    fn get_one(&self, id: &str) -> Result<ContentItem, ApiError> {
        let path = format!("{SINGLE_ITEM_PATH}/{}", urlencoding::encode(id.trim()));
        let payload = self.request_json("get_one", &path, &[])?;
        Self::single_item_from_payload(payload)
    }

    fn list_languages(&self) -> Result<Vec<Language>, ApiError> {
        let payload = self.request_json("list_languages", LANGUAGES_PATH, &[])?;
        Self::languages_from_payload(payload)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::NewsApiAdapter;
    use crate::backends::{NewsBackend, SearchQuery};
    use crate::config::ApiConfig;
    use crate::errors::ApiErrorKind;

    /// Serves one canned JSON response per accepted connection.
    fn serve_json(bodies: Vec<String>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
        let address = listener.local_addr().expect("listener has an address");
        thread::spawn(move || {
            for body in bodies {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                let mut reader = BufReader::new(stream);
                let mut line = String::new();
                while reader.read_line(&mut line).map(|read| read > 0).unwrap_or(false) {
                    if line == "\r\n" {
                        break;
                    }
                    line.clear();
                }
                let mut stream = reader.into_inner();
                let response = format!(
                    concat!(
                        "HTTP/1.1 200 OK\r\n",
                        "Content-Type: application/json\r\n",
                        "Content-Length: {}\r\n",
                        "Connection: close\r\n\r\n{}"
                    ),
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });
        format!("http://{address}/api")
    }

    fn adapter_for(base_url: String) -> NewsApiAdapter {
        let config = ApiConfig {
            base_url,
            max_requests_per_second: 100,
            ..ApiConfig::default()
        };
        NewsApiAdapter::new(&config, None)
    }

    #[test]
    fn test_api_url_encodes_comma_joined_ids() {
        let config = ApiConfig {
            base_url: "https://news.example/api/".to_string(),
            ..ApiConfig::default()
        };
        let adapter = NewsApiAdapter::new(&config, None);
        let url = adapter.api_url(
            "/news/filter-multi-categories",
            &[("categoryIds", "a,b".to_string()), ("page", "1".to_string())],
        );
        assert_eq!(
            url,
            "https://news.example/api/news/filter-multi-categories?categoryIds=a%2Cb&page=1"
        );
    }

    #[test]
    fn test_blank_bearer_token_is_dropped() {
        let adapter = NewsApiAdapter::new(&ApiConfig::default(), Some("  ".to_string()));
        assert!(adapter.bearer_token.is_none());
    }

    #[test]
    fn test_envelope_result_rejects_status_zero() {
        let error = NewsApiAdapter::envelope_result(
            "search",
            json!({"status": 0, "message": "bad language"}),
        )
        .unwrap_err();
        assert_eq!(error.kind, ApiErrorKind::Rejected);
        assert_eq!(error.detail, "bad language");
    }

    #[test]
    fn test_envelope_result_without_status_is_malformed() {
        let error = NewsApiAdapter::envelope_result("search", json!({"result": []})).unwrap_err();
        assert_eq!(error.kind, ApiErrorKind::Malformed);
    }

    #[test]
    fn test_parse_item_reads_mixed_case_fields_and_media() {
        let raw = json!({
            "id": 42,
            "title": "Rains lash coast",
            "categoryId": "C1",
            "language_id": "L1",
            "state_id": "S1",
            "district_id": "D1",
            "longNewsContent": {"content": "<p>body</p>"},
            "isApproved": 1,
            "isDeleted": false,
            "viewCount": "17",
            "media": [
                {"mediaType": "image", "mediaUrl": "/img/a.jpg", "caption": "Shore"},
                {"mediaType": "video"}
            ]
        });
        let item = NewsApiAdapter::parse_item(&raw).unwrap();
        assert_eq!(item.id, "42");
        assert_eq!(item.category_id, "C1");
        assert_eq!(item.language_id, "L1");
        assert_eq!(item.long_content, "<p>body</p>");
        assert!(item.lifecycle.approved);
        assert_eq!(item.engagement.views, 17);
        assert_eq!(item.media.len(), 1);
        assert_eq!(item.media[0].url, "/img/a.jpg");
    }

    #[test]
    fn test_parse_item_requires_id() {
        assert!(NewsApiAdapter::parse_item(&json!({"title": "No id"})).is_none());
    }

    #[test]
    fn test_parse_category_reads_string_active_flag() {
        let raw = json!({"id": "C9", "category_name": "Sports", "is_active": "0"});
        let category = NewsApiAdapter::parse_category(&raw).unwrap();
        assert_eq!(category.name, "Sports");
        assert!(!category.active);
    }

    #[test]
    fn test_bare_item_with_textual_status_is_parsed_directly() {
        let item = NewsApiAdapter::single_item_from_payload(
            json!({"id": "abc", "title": "Real story", "status": "published"}),
        )
        .unwrap();
        assert_eq!(item.id, "abc");
        assert_eq!(item.title, "Real story");
        assert!(item.lifecycle.is_published());
    }

    #[test]
    fn test_enveloped_item_is_unwrapped() {
        let item = NewsApiAdapter::single_item_from_payload(json!({
            "status": 1,
            "message": "ok",
            "result": {"id": "abc", "title": "Wrapped", "status": "published"}
        }))
        .unwrap();
        assert_eq!(item.id, "abc");
        assert_eq!(item.title, "Wrapped");
    }

    #[test]
    fn test_rejected_item_envelope_is_an_error() {
        let error = NewsApiAdapter::single_item_from_payload(
            json!({"status": 0, "message": "News not found"}),
        )
        .unwrap_err();
        assert_eq!(error.kind, ApiErrorKind::Rejected);
    }

    #[test]
    fn test_search_payload_with_empty_items_is_an_empty_page() {
        let page = NewsApiAdapter::search_page_from_payload(
            json!({"status": 1, "result": {"items": []}}),
        )
        .unwrap();
        assert!(page.items.is_empty());

        let page = NewsApiAdapter::search_page_from_payload(json!({
            "status": 1,
            "result": {"items": [{"id": "n1"}, {"title": "no id"}, {"id": 7}]}
        }))
        .unwrap();
        let ids: Vec<&str> = page.items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["n1", "7"]);
    }

    #[test]
    fn test_search_payload_with_status_zero_is_rejected() {
        let error =
            NewsApiAdapter::search_page_from_payload(json!({"status": 0, "message": "no"}))
                .unwrap_err();
        assert_eq!(error.kind, ApiErrorKind::Rejected);
    }

    #[test]
    fn test_category_and_language_payloads_read_result_array() {
        let categories = NewsApiAdapter::categories_from_payload(json!({
            "status": 1,
            "result": [{"id": "C1", "category_name": "Politics"}, {"id": "C2"}]
        }))
        .unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Politics");

        let languages = NewsApiAdapter::languages_from_payload(json!({
            "status": "1",
            "result": [{"id": "L1", "code": "te", "languageName": "Telugu"}]
        }))
        .unwrap();
        assert_eq!(languages.len(), 1);
        assert_eq!(languages[0].name, "Telugu");
    }

    #[test]
    fn test_get_one_over_http_returns_bare_item_verbatim() {
        let base_url = serve_json(vec![
            r#"{"id":"abc","title":"Real story","status":"published"}"#.to_string(),
        ]);
        let adapter = adapter_for(base_url);

        let item = adapter.get_one("abc").expect("bare item should parse");
        assert_eq!(item.id, "abc");
        assert_eq!(item.title, "Real story");
    }

    #[test]
    fn test_search_over_http_reads_enveloped_items() {
        let base_url = serve_json(vec![
            r#"{"status":1,"message":"ok","result":{"items":[{"id":"n1","title":"One"}]}}"#
                .to_string(),
        ]);
        let adapter = adapter_for(base_url);

        let page = adapter
            .search_by_categories(&SearchQuery::new("C1,C2", "L1"))
            .expect("search should succeed");
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "One");
    }
}
