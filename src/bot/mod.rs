//! Turning inbound chat text into reply text.
//!
//! The [Router] runs search, then trending, then synthesis, and renders the
//! result. It never fails: every path ends in a natural-language reply.

use log::{debug, info};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::{
    metadata::{self, Metadata},
    query::Query,
    random::RandomSource,
    yt::{SearchResult, TrendingSource, VideoSearch},
};

pub const GREETING: &str = "Hello! Send me lyrics and I will search for the song on YouTube.";

pub const HELP: &str = "Commands:\n\
/search <lyrics> - find the song only\n\
/metadata <lyrics> - find the song and draft Shorts metadata\n\
/help - show this message\n\
\n\
Plain messages are treated as lyrics.";

/// Interim reply sent while the search runs.
pub const SEARCHING: &str = "Searching for the song...";

pub const NOT_FOUND: &str = "Sorry, I couldn't find a song with these lyrics.";
pub const SEARCH_ERROR: &str = "Sorry, there was an error searching for the song.";
pub const GENERIC_NOTICE: &str =
    "⚠️ Sorry, I couldn't find a song with these lyrics, but I still generated some generic metadata for you.";

/// How a lyrics message is answered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    /// Reply with the matching video only.
    SearchOnly,

    /// Reply with the video plus title, description and tags.
    FullMetadata,
}

impl FromStr for Mode {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "search" => Ok(Mode::SearchOnly),
            "metadata" => Ok(Mode::FullMetadata),
            _ => Err("expected `search` or `metadata`"),
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Mode::SearchOnly => write!(f, "search"),
            Mode::FullMetadata => write!(f, "metadata"),
        }
    }
}

/// Whether replying to `text` involves a provider round trip, in which
/// case the transport sends [SEARCHING] first.
pub fn needs_search(query: &Query) -> bool {
    match query {
        Query::Text(_) => true,
        Query::Command { name, text } => {
            (name == "search" || name == "metadata") && !text.is_empty()
        }
    }
}

/// Routes messages through a [VideoSearch] and a [TrendingSource].
pub struct Router<S, T> {
    search: S,
    trending: T,
    mode: Mode,
}

impl<S: VideoSearch, T: TrendingSource> Router<S, T> {
    pub fn new(search: S, trending: T, mode: Mode) -> Self {
        Self {
            search,
            trending,
            mode,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Answer an already classified message.
    pub async fn handle<R: RandomSource>(&self, query: Query, rng: &mut R) -> String {
        match query {
            Query::Text(text) => self.on_text_message(&text, rng).await,
            Query::Command { name, text } => self.on_command(&name, &text, rng).await,
        }
    }

    /// Plain lyrics, answered in the router's default mode.
    pub async fn on_text_message<R: RandomSource>(&self, text: &str, rng: &mut R) -> String {
        match self.mode {
            Mode::SearchOnly => self.search_reply(text).await,
            Mode::FullMetadata => self.metadata_reply(text, rng).await,
        }
    }

    pub async fn on_command<R: RandomSource>(&self, name: &str, text: &str, rng: &mut R) -> String {
        debug!("Command /{} with {} bytes of text", name, text.len());
        match name {
            "start" => format!("{}\n\n{}", GREETING, HELP),
            "help" => HELP.to_string(),
            "search" if text.is_empty() => "Please send some lyrics after /search.".to_string(),
            "search" => self.search_reply(text).await,
            "metadata" if text.is_empty() => "Please send some lyrics after /metadata.".to_string(),
            "metadata" => self.metadata_reply(text, rng).await,
            _ => format!("Unknown command /{}.\n\n{}", name, HELP),
        }
    }

    /// Search-only entry point.
    pub async fn search_reply(&self, lyrics: &str) -> String {
        info!("Searching for lyrics ({} bytes)", lyrics.len());
        render_search(&self.search.search(lyrics).await)
    }

    /// Full-metadata entry point.
    pub async fn metadata_reply<R: RandomSource>(&self, lyrics: &str, rng: &mut R) -> String {
        info!("Building metadata for lyrics ({} bytes)", lyrics.len());
        let result = self.search.search(lyrics).await;
        let snapshot = self.trending.fetch_trending().await;
        let meta = metadata::compose(
            rng,
            result.title(),
            &snapshot.title_patterns,
            &snapshot.tag_list(),
        );
        render_metadata(&result, &meta)
    }
}

pub fn render_search(result: &SearchResult) -> String {
    match result {
        SearchResult::Found { title, url } => format!("Found song: {}\nWatch here: {}", title, url),
        SearchResult::NotFound => NOT_FOUND.to_string(),
        SearchResult::Failed => SEARCH_ERROR.to_string(),
    }
}

pub fn render_metadata(result: &SearchResult, meta: &Metadata) -> String {
    let header = match result {
        SearchResult::Found { title, url } => format!("🎵 Found song: {} - {}", title, url),
        _ => GENERIC_NOTICE.to_string(),
    };
    format!(
        "{}\n\n📌 Title:\n{}\n\n📝 Description:\n{}\n\n🏷️ Tags:\n{}",
        header, meta.viral_title, meta.description, meta.tags
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{random::Entropy, yt::TrendingSnapshot};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedSearch(SearchResult);

    #[async_trait]
    impl VideoSearch for FixedSearch {
        async fn search(&self, _query: &str) -> SearchResult {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct CountingTrending {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TrendingSource for CountingTrending {
        async fn fetch_trending(&self) -> TrendingSnapshot {
            self.calls.fetch_add(1, Ordering::SeqCst);
            TrendingSnapshot::fallback()
        }
    }

    fn blinding_lights() -> SearchResult {
        SearchResult::Found {
            title: "Blinding Lights".to_string(),
            url: "https://www.youtube.com/watch?v=4NRXx6U8ABQ".to_string(),
        }
    }

    fn router(result: SearchResult, mode: Mode) -> Router<FixedSearch, CountingTrending> {
        Router::new(FixedSearch(result), CountingTrending::default(), mode)
    }

    /// Text following `heading` up to the next blank line.
    fn section<'a>(reply: &'a str, heading: &str) -> &'a str {
        let start = reply.find(heading).expect("missing section") + heading.len();
        let rest = &reply[start..];
        rest.split("\n\n").next().unwrap_or_default().trim()
    }

    #[tokio::test]
    async fn not_found_still_generates_metadata() {
        let r = router(SearchResult::NotFound, Mode::FullMetadata);
        let reply = r
            .on_text_message("some lyrics nobody wrote", &mut Entropy::seeded(1))
            .await;

        assert!(reply.contains("I still generated some generic metadata for you"));
        assert_eq!(section(&reply, "Title:\n"), metadata::FALLBACK_TITLE);
        assert!(!section(&reply, "Description:\n").is_empty());
        assert!(!section(&reply, "Tags:\n").is_empty());
    }

    #[tokio::test]
    async fn found_song_metadata() {
        let r = router(blinding_lights(), Mode::FullMetadata);
        let reply = r
            .on_text_message("I said ooh I'm blinded by the lights", &mut Entropy::seeded(2))
            .await;

        let first = reply.lines().next().unwrap();
        assert!(first.contains("Blinding Lights"));
        assert!(first.contains("https://www.youtube.com/watch?v=4NRXx6U8ABQ"));
        assert!(section(&reply, "Title:\n").contains("Blinding Lights"));
        assert!(!section(&reply, "Description:\n").is_empty());
        assert!(section(&reply, "Tags:\n").starts_with('#'));
        assert_eq!(r.trending.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn search_only_replies() {
        let mut rng = Entropy::seeded(3);

        let r = router(blinding_lights(), Mode::SearchOnly);
        assert_eq!(
            r.on_text_message("lyrics", &mut rng).await,
            "Found song: Blinding Lights\nWatch here: https://www.youtube.com/watch?v=4NRXx6U8ABQ"
        );
        assert_eq!(r.trending.calls.load(Ordering::SeqCst), 0);

        let r = router(SearchResult::NotFound, Mode::SearchOnly);
        assert_eq!(r.on_text_message("lyrics", &mut rng).await, NOT_FOUND);

        let r = router(SearchResult::Failed, Mode::SearchOnly);
        assert_eq!(r.on_text_message("lyrics", &mut rng).await, SEARCH_ERROR);
    }

    #[tokio::test]
    async fn failed_search_degrades_to_generic_metadata() {
        let r = router(SearchResult::Failed, Mode::FullMetadata);
        let reply = r.metadata_reply("lyrics", &mut Entropy::seeded(4)).await;
        assert!(reply.starts_with(GENERIC_NOTICE));
    }

    #[tokio::test]
    async fn commands() {
        let mut rng = Entropy::seeded(5);
        let r = router(blinding_lights(), Mode::SearchOnly);

        assert!(r.on_command("start", "", &mut rng).await.starts_with(GREETING));
        assert_eq!(r.on_command("help", "", &mut rng).await, HELP);
        assert!(r
            .on_command("search", "", &mut rng)
            .await
            .contains("after /search"));
        assert!(r
            .on_command("search", "lyrics", &mut rng)
            .await
            .starts_with("Found song: Blinding Lights"));
        assert!(r
            .on_command("metadata", "lyrics", &mut rng)
            .await
            .contains("Tags:"));
        assert!(r
            .on_command("karaoke", "", &mut rng)
            .await
            .starts_with("Unknown command /karaoke."));
    }

    #[tokio::test]
    async fn handle_dispatches_parsed_queries() {
        let mut rng = Entropy::seeded(6);
        let r = router(SearchResult::NotFound, Mode::SearchOnly);

        let plain: Query = "some words".parse().unwrap();
        assert_eq!(r.handle(plain, &mut rng).await, NOT_FOUND);

        let command: Query = "/metadata@lyricast_bot some words".parse().unwrap();
        assert!(r.handle(command, &mut rng).await.starts_with(GENERIC_NOTICE));

        let start: Query = "/start".parse().unwrap();
        assert!(r.handle(start, &mut rng).await.starts_with(GREETING));
    }

    #[test]
    fn searching_notice() {
        assert!(needs_search(&Query::Text("x".to_string())));
        assert!(needs_search(&Query::Command {
            name: "search".to_string(),
            text: "x".to_string(),
        }));
        assert!(!needs_search(&Query::Command {
            name: "search".to_string(),
            text: String::new(),
        }));
        assert!(!needs_search(&Query::Command {
            name: "start".to_string(),
            text: String::new(),
        }));
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("Search".parse::<Mode>(), Ok(Mode::SearchOnly));
        assert_eq!("metadata".parse::<Mode>(), Ok(Mode::FullMetadata));
        assert!("both".parse::<Mode>().is_err());
        assert_eq!(Mode::FullMetadata.to_string(), "metadata");
    }
}
