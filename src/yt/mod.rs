//! YouTube Data API v3: finding a song and reading what is trending.
//!
//! Both calls degrade instead of failing. See [SearchResult] and
//! [TrendingSnapshot] for the states a caller has to handle.

use async_trait::async_trait;
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, time::Duration};

use crate::{
    net::{self, HttpsClient},
    Config,
};

/// Root of the Data API. `/search` is keyword search, `/videos` serves the
/// most-popular chart.
pub const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// How many popular videos one trending fetch asks for.
pub const TRENDING_BATCH: u32 = 10;

const FALLBACK_PATTERNS: [&str; 5] = [
    "Official Music Video",
    "Lyric Video",
    "Official Audio",
    "Live Performance",
    "Acoustic Version",
];

const FALLBACK_TAGS: [&str; 7] = [
    "#music", "#viral", "#trending", "#lyrics", "#song", "#fyp", "#shorts",
];

/// `"The Weeknd"` becomes `"#theweeknd"`. Blank tags yield nothing.
pub fn hashtag(raw: &str) -> Option<String> {
    let word: String = raw
        .trim_start_matches('#')
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    if word.is_empty() || word.starts_with('#') {
        None
    } else {
        Some(format!("#{}", word))
    }
}

/// Public watch link for a video ID.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Outcome of a lyrics search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    Found { title: String, url: String },
    NotFound,

    /// The provider could not be reached or rejected the call. Reads the
    /// same as [SearchResult::NotFound] through every accessor.
    Failed,
}

impl SearchResult {
    pub fn found(&self) -> bool {
        matches!(self, SearchResult::Found { .. })
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            SearchResult::Found { title, .. } => Some(title),
            _ => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            SearchResult::Found { url, .. } => Some(url),
            _ => None,
        }
    }
}

/// Titles and tags of currently popular videos.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendingSnapshot {
    /// Titles in chart order.
    pub title_patterns: Vec<String>,

    /// Union of every video's tags, as lowercase hashtags.
    pub tags: BTreeSet<String>,
}

impl TrendingSnapshot {
    /// Fixed snapshot used whenever the chart cannot be fetched.
    pub fn fallback() -> Self {
        Self {
            title_patterns: FALLBACK_PATTERNS.iter().map(|s| s.to_string()).collect(),
            tags: FALLBACK_TAGS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn tag_list(&self) -> Vec<String> {
        self.tags.iter().cloned().collect()
    }
}

#[async_trait]
/// Something that can find the single best video for a query.
pub trait VideoSearch: Send + Sync {
    async fn search(&self, query: &str) -> SearchResult;
}

#[async_trait]
/// Something that can tell what is popular right now.
pub trait TrendingSource: Send + Sync {
    async fn fetch_trending(&self) -> TrendingSnapshot;
}

#[derive(Serialize)]
struct SearchParams<'a> {
    part: &'static str,
    q: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(rename = "maxResults")]
    max_results: u32,
    key: &'a str,
}

#[derive(Serialize)]
struct ChartParams<'a> {
    part: &'static str,
    chart: &'static str,
    #[serde(rename = "videoCategoryId")]
    category: &'a str,
    #[serde(rename = "regionCode")]
    region: &'a str,
    #[serde(rename = "maxResults")]
    max_results: u32,
    key: &'a str,
}

#[derive(Deserialize, Clone, Debug)]
/// search.list response. Only the fields lyricast reads.
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize, Clone, Debug)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Deserialize, Clone, Debug)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
/// videos.list response for `chart=mostPopular`.
struct ChartResponse {
    #[serde(default)]
    items: Vec<ChartItem>,
}

#[derive(Deserialize, Clone, Debug)]
struct ChartItem {
    snippet: Snippet,
}

#[derive(Deserialize, Clone, Debug)]
struct Snippet {
    #[serde(deserialize_with = "crate::serde::html::unescaped")]
    title: String,

    #[serde(default, deserialize_with = "crate::serde::list::or_empty")]
    tags: Vec<String>,
}

impl SearchResult {
    fn from_response(resp: SearchResponse) -> Self {
        resp.items
            .into_iter()
            .find_map(|item| {
                let id = item.id.video_id?;
                Some(SearchResult::Found {
                    title: item.snippet.title,
                    url: watch_url(&id),
                })
            })
            .unwrap_or(SearchResult::NotFound)
    }
}

impl TrendingSnapshot {
    fn from_response(resp: ChartResponse) -> Self {
        let mut title_patterns = Vec::with_capacity(resp.items.len());
        let mut tags = BTreeSet::new();
        for item in resp.items {
            title_patterns.push(item.snippet.title);
            tags.extend(item.snippet.tags.iter().filter_map(|t| hashtag(t)));
        }
        Self {
            title_patterns,
            tags,
        }
    }
}

/// Client for the two YouTube calls lyricast makes.
#[derive(Clone)]
pub struct YouTube {
    client: HttpsClient,
    api_base: String,
    api_key: String,
    category: String,
    region: String,
    timeout: Duration,
}

impl YouTube {
    pub fn new(config: &Config) -> Self {
        Self {
            client: net::https_client(),
            api_base: API_BASE.to_string(),
            api_key: config.youtube_api_key.clone(),
            category: config.trending_category.clone(),
            region: config.trending_region.clone(),
            timeout: config.timeout,
        }
    }

    /// Send requests somewhere other than [API_BASE].
    pub fn with_api_base(mut self, base: &str) -> Self {
        self.api_base = base.trim_end_matches('/').to_string();
        self
    }

    async fn try_search(&self, query: &str) -> crate::Result<SearchResult> {
        let uri = net::build_uri(
            &format!("{}/search", self.api_base),
            &SearchParams {
                part: "snippet",
                q: query,
                kind: "video",
                max_results: 1,
                key: &self.api_key,
            },
        )?;
        let resp: SearchResponse = net::get_json(&self.client, uri, self.timeout).await?;
        Ok(SearchResult::from_response(resp))
    }

    async fn try_fetch_trending(&self) -> crate::Result<TrendingSnapshot> {
        let uri = net::build_uri(
            &format!("{}/videos", self.api_base),
            &ChartParams {
                part: "snippet",
                chart: "mostPopular",
                category: &self.category,
                region: &self.region,
                max_results: TRENDING_BATCH,
                key: &self.api_key,
            },
        )?;
        let resp: ChartResponse = net::get_json(&self.client, uri, self.timeout).await?;
        Ok(TrendingSnapshot::from_response(resp))
    }
}

#[async_trait]
impl VideoSearch for YouTube {
    async fn search(&self, query: &str) -> SearchResult {
        match self.try_search(query).await {
            Ok(result) => {
                debug!("Search for {:?} found={}", query, result.found());
                result
            }
            Err(e) => {
                error!("Error searching YouTube: {}", e);
                SearchResult::Failed
            }
        }
    }
}

#[async_trait]
impl TrendingSource for YouTube {
    async fn fetch_trending(&self) -> TrendingSnapshot {
        match self.try_fetch_trending().await {
            Ok(snapshot) if !snapshot.title_patterns.is_empty() => snapshot,
            Ok(_) => {
                warn!("Trending chart came back empty, using fallback snapshot");
                TrendingSnapshot::fallback()
            }
            Err(e) => {
                error!("Error fetching trending videos: {}", e);
                TrendingSnapshot::fallback()
            }
        }
    }
}
