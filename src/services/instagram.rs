use crate::config::InstagramConfig;
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Mobile app User-Agent; the web one gets redirected to an HTML login page
const MOBILE_USER_AGENT: &str = "Instagram 273.0.0.9.100 (iPhone; iOS 14_0; Scale/2.00)";

/// One public post of the venue's Instagram account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstagramPost {
    pub id: String,
    pub permalink: String,
    pub media_url: String,
    pub thumbnail: String,
    pub caption: String,
    pub is_video: bool,
    pub video_url: String,
}

struct CachedFeed {
    posts: Vec<InstagramPost>,
    fetched_at: Instant,
}

fn str_at<'a>(node: &'a Value, pointer: &str) -> &'a str {
    node.pointer(pointer).and_then(Value::as_str).unwrap_or_default()
}

/// Extract the most recent posts from a `web_profile_info` response
///
/// A profile without a timeline (private, empty or reshaped) yields no posts.
pub fn parse_posts(body: &Value, limit: usize) -> Vec<InstagramPost> {
    let edges = match body
        .pointer("/data/user/edge_owner_to_timeline_media/edges")
        .and_then(Value::as_array)
    {
        Some(edges) => edges,
        None => return Vec::new(),
    };

    edges
        .iter()
        .take(limit)
        .filter_map(|edge| edge.get("node"))
        .map(|node| InstagramPost {
            id: str_at(node, "/id").to_string(),
            permalink: format!("https://www.instagram.com/p/{}/", str_at(node, "/shortcode")),
            media_url: str_at(node, "/display_url").to_string(),
            thumbnail: str_at(node, "/thumbnail_src").to_string(),
            caption: str_at(node, "/edge_media_to_caption/edges/0/node/text").to_string(),
            is_video: node.get("is_video").and_then(Value::as_bool).unwrap_or(false),
            video_url: str_at(node, "/video_url").to_string(),
        })
        .collect()
}

/// Cached proxy in front of Instagram's profile API
pub struct InstagramFeed {
    config: InstagramConfig,
    client: reqwest::Client,
    cache: RwLock<Option<CachedFeed>>,
}

impl InstagramFeed {
    pub fn new(config: InstagramConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(MOBILE_USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            cache: RwLock::new(None),
        })
    }

    /// Latest posts, served from cache while it is fresh
    pub async fn latest(&self) -> AppResult<Vec<InstagramPost>> {
        if let Some(posts) = self.cached().await {
            return Ok(posts);
        }

        let posts = match self.fetch().await {
            Ok(posts) => posts,
            Err(e) => {
                warn!("Instagram scrape failed for {}: {}", self.config.username, e);
                return Err(e);
            }
        };

        let mut cache = self.cache.write().await;
        *cache = Some(CachedFeed {
            posts: posts.clone(),
            fetched_at: Instant::now(),
        });

        Ok(posts)
    }

    async fn cached(&self) -> Option<Vec<InstagramPost>> {
        let cache = self.cache.read().await;
        cache
            .as_ref()
            .filter(|feed| feed.fetched_at.elapsed() < self.config.cache_ttl())
            .map(|feed| feed.posts.clone())
    }

    async fn fetch(&self) -> AppResult<Vec<InstagramPost>> {
        let response = self
            .client
            .get(&self.config.api_url)
            .query(&[("username", self.config.username.as_str())])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Instagram answered {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Invalid JSON: {}", e)))?;

        let posts = parse_posts(&body, self.config.post_limit);
        info!("Fetched {} Instagram posts for {}", posts.len(), self.config.username);
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(edges: Value) -> Value {
        json!({ "data": { "user": { "edge_owner_to_timeline_media": { "edges": edges } } } })
    }

    #[test]
    fn test_parse_posts_maps_fields() {
        let body = profile(json!([{
            "node": {
                "id": "311",
                "shortcode": "Cx9",
                "display_url": "https://cdn/full.jpg",
                "thumbnail_src": "https://cdn/thumb.jpg",
                "is_video": true,
                "video_url": "https://cdn/clip.mp4",
                "edge_media_to_caption": { "edges": [{ "node": { "text": "Friday night" } }] }
            }
        }]));

        let posts = parse_posts(&body, 10);
        assert_eq!(
            posts,
            vec![InstagramPost {
                id: "311".to_string(),
                permalink: "https://www.instagram.com/p/Cx9/".to_string(),
                media_url: "https://cdn/full.jpg".to_string(),
                thumbnail: "https://cdn/thumb.jpg".to_string(),
                caption: "Friday night".to_string(),
                is_video: true,
                video_url: "https://cdn/clip.mp4".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_posts_defaults_missing_fields() {
        let body = profile(json!([{ "node": { "id": "1", "shortcode": "A" } }]));
        let post = &parse_posts(&body, 10)[0];
        assert_eq!(post.caption, "");
        assert_eq!(post.video_url, "");
        assert!(!post.is_video);
    }

    #[test]
    fn test_parse_posts_respects_limit() {
        let edges: Vec<Value> = (0..15)
            .map(|i| json!({ "node": { "id": i.to_string(), "shortcode": "x" } }))
            .collect();
        assert_eq!(parse_posts(&profile(Value::Array(edges)), 10).len(), 10);
    }

    #[test]
    fn test_parse_posts_without_timeline_is_empty() {
        assert!(parse_posts(&json!({ "status": "fail" }), 10).is_empty());
        assert!(parse_posts(&json!({ "data": { "user": null } }), 10).is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_api_is_an_external_error() {
        let feed = InstagramFeed::new(InstagramConfig {
            api_url: "http://127.0.0.1:9/".to_string(),
            timeout_secs: 1,
            ..InstagramConfig::default()
        })
        .unwrap();

        let err = feed.latest().await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_GATEWAY);
        assert!(feed.cached().await.is_none());
    }

    #[tokio::test]
    async fn test_stale_cache_is_kept_but_not_served_when_refresh_fails() {
        let feed = InstagramFeed::new(InstagramConfig {
            api_url: "http://127.0.0.1:9/".to_string(),
            cache_ttl_secs: 1,
            timeout_secs: 1,
            ..InstagramConfig::default()
        })
        .unwrap();
        let stale_at = Instant::now()
            .checked_sub(std::time::Duration::from_secs(5))
            .unwrap();
        *feed.cache.write().await = Some(CachedFeed {
            posts: parse_posts(&profile(json!([{ "node": { "id": "1", "shortcode": "A" } }])), 1),
            fetched_at: stale_at,
        });

        let err = feed.latest().await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_GATEWAY);

        let cache = feed.cache.read().await;
        let kept = cache.as_ref().expect("stale entry kept");
        assert_eq!(kept.posts.len(), 1);
        assert_eq!(kept.fetched_at, stale_at);
    }

    #[test]
    fn test_fresh_cache_is_served_without_fetching() {
        let feed = InstagramFeed::new(InstagramConfig {
            api_url: "http://127.0.0.1:9/".to_string(),
            ..InstagramConfig::default()
        })
        .unwrap();
        let post = parse_posts(&profile(json!([{ "node": { "id": "7", "shortcode": "Q" } }])), 1).remove(0);

        tokio_test::block_on(async {
            *feed.cache.write().await = Some(CachedFeed {
                posts: vec![post.clone()],
                fetched_at: Instant::now(),
            });
            assert_eq!(feed.latest().await.unwrap(), vec![post]);
        });
    }
}
