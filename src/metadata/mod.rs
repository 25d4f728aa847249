//! Shorts metadata synthesis.
//!
//! Everything here is pure: the only input besides the song title and the
//! trending snapshot is the [RandomSource] the caller hands in, so a seeded
//! source reproduces the same title, description and tags.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use crate::random::RandomSource;

/// Title used when no song was found.
pub const FALLBACK_TITLE: &str = "This Song Is Going Viral Right Now 🔥 #shorts";

/// Description used when no song was found.
pub const FALLBACK_DESCRIPTION: &str = "🎵 The song everyone can't stop singing!\n\
\n\
👉 Follow for more trending lyrics\n\
💾 Save this for later\n\
❤️ Like if this song hits different";

/// Every tag line starts from these.
pub const BASE_TAGS: [&str; 13] = [
    "#shorts",
    "#lyrics",
    "#music",
    "#viral",
    "#trending",
    "#fyp",
    "#foryou",
    "#song",
    "#musicvideo",
    "#lyricsvideo",
    "#explore",
    "#newmusic",
    "#hits",
];

/// Most tags emitted in one tag string.
pub const MAX_TAGS: usize = 15;

/// Most tags sampled into a description.
pub const DESCRIPTION_TAGS: usize = 5;

const MAX_SONG_TAGS: usize = 5;
const MAX_PATTERN_LEN: usize = 30;
const MAX_FULL_TITLE_TAG_LEN: usize = 20;
const PATTERN_SEPARATOR: char = '-';
const STOP_WORDS: [&str; 4] = ["feat", "featuring", "with", "lyrics"];

lazy_static! {
    static ref STRIPPED: Regex = Regex::new(r"['’()]").unwrap();
}

/// Title, description and tag line for one upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub viral_title: String,
    pub description: String,
    pub tags: String,
}

/// Compose all three fields in one go.
pub fn compose<R: RandomSource>(
    rng: &mut R,
    song_title: Option<&str>,
    title_patterns: &[String],
    trending_tags: &[String],
) -> Metadata {
    Metadata {
        viral_title: compose_viral_title(rng, song_title, title_patterns),
        description: compose_description(rng, song_title, trending_tags),
        tags: compose_tags(rng, song_title),
    }
}

pub fn compose_viral_title<R: RandomSource>(
    rng: &mut R,
    song_title: Option<&str>,
    title_patterns: &[String],
) -> String {
    let song = match song_title {
        Some(s) => s,
        None => return FALLBACK_TITLE.to_string(),
    };

    let mut candidates = vec![
        format!("{} 🔥 This Song Is Going Viral!", song),
        format!("Everyone Is Singing {} Right Now 🎶", song),
        format!("{} (Lyrics) | Trending Everywhere 📈", song),
        format!("Why Is {} Stuck In Everyone's Head? 🤯", song),
        format!("{} - The Sound Of The Moment ✨", song),
        format!("POV: {} Hits Different 💫", song),
    ];

    let short_patterns = short_patterns(title_patterns);
    if let Some(pattern) = rng.choose_one(&short_patterns) {
        candidates.push(format!("{} Vibes: {} 🔥", pattern, song));
    }

    rng.choose_one(&candidates)
        .cloned()
        .unwrap_or_else(|| FALLBACK_TITLE.to_string())
}

/// Leading segment of each trending title, kept only when it is short.
fn short_patterns(title_patterns: &[String]) -> Vec<String> {
    title_patterns
        .iter()
        .map(|t| {
            t.split(PATTERN_SEPARATOR)
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        })
        .filter(|p| !p.is_empty() && p.chars().count() < MAX_PATTERN_LEN)
        .collect()
}

pub fn compose_description<R: RandomSource>(
    rng: &mut R,
    song_title: Option<&str>,
    trending_tags: &[String],
) -> String {
    let song = match song_title {
        Some(s) => s,
        None => return FALLBACK_DESCRIPTION.to_string(),
    };

    let mut lines = vec![
        format!("🎵 {}", song),
        String::new(),
        "🎤 Lyrics in this short!".to_string(),
        "Sing along and send it to someone who needs this song today.".to_string(),
        String::new(),
        "👉 Follow for more trending lyrics".to_string(),
        "💾 Save this for later".to_string(),
        "❤️ Like if this song hits different".to_string(),
    ];

    let picked = rng.sample(trending_tags, DESCRIPTION_TAGS);
    if !picked.is_empty() {
        lines.push(String::new());
        lines.push(
            picked
                .into_iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" "),
        );
    }

    lines.join("\n")
}

pub fn compose_tags<R: RandomSource>(rng: &mut R, song_title: Option<&str>) -> String {
    let mut tags: Vec<String> = BASE_TAGS.iter().map(|t| t.to_string()).collect();
    if let Some(song) = song_title {
        tags.extend(song_tags(song));
    }

    rng.shuffle(&mut tags);
    tags.truncate(MAX_TAGS);
    tags.join(" ")
}

/// Hashtags derived from the song title, none of which repeat a base tag.
fn song_tags(song: &str) -> Vec<String> {
    let cleaned = STRIPPED.replace_all(&song.to_lowercase(), "").into_owned();
    let words: Vec<&str> = cleaned.split_whitespace().collect();

    let mut candidates = Vec::new();
    for word in &words {
        if word.chars().count() > 3 && !STOP_WORDS.contains(word) {
            candidates.push(format!("#{}", word));
        }
    }
    if words.len() >= 2 {
        candidates.push(format!("#{}", words.iter().take(3).cloned().collect::<String>()));
    }
    let full: String = words.concat();
    if !full.is_empty() && full.chars().count() < MAX_FULL_TITLE_TAG_LEN {
        candidates.push(format!("#{}", full));
    }

    let mut seen: HashSet<&str> = BASE_TAGS.iter().cloned().collect();
    let mut tags = Vec::new();
    for tag in &candidates {
        if tags.len() == MAX_SONG_TAGS {
            break;
        }
        if seen.insert(tag.as_str()) {
            tags.push(tag.clone());
        }
    }
    tags
}
