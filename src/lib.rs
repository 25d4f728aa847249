//! # lyricast
//!
//! An async library (and Telegram bot) that turns a snippet of lyrics into
//! a YouTube match and a ready-to-paste block of Shorts metadata.
//!
//! ## Features
//!
//! lyricast talks to two providers over [hyper](https://hyper.rs/):
//!
//! * The YouTube Data API, for finding the song and for reading what is
//!   currently trending in the music category.
//! * The Telegram Bot API, for receiving lyrics and sending replies.
//!
//! Provider failures never bubble up to the chat. A failed search is reported
//! as "not found", and a failed trending fetch is replaced by a fixed fallback
//! snapshot.
//!
//! ## Example
//!
//! ```
//! use lyricast::{bot::Router, random::Entropy, yt::YouTube, Config};
//!
//! // ...
//!
//! let config = Config::from_env()?;
//! let youtube = YouTube::new(&config);
//! let router = Router::new(youtube.clone(), youtube, config.default_mode);
//!
//! let mut rng = Entropy::from_os();
//! let reply = router.on_text_message("I said ooh, I'm blinded by the lights", &mut rng).await;
//! println!("{}", reply);
//! ```

use std::{
    error,
    fmt::{self, Display, Formatter},
    time::Duration,
};

pub mod bot;
pub mod config;
pub mod metadata;
pub mod net;
pub mod query;
pub mod random;
pub mod serde;
pub mod telegram;
pub mod yt;

pub use config::{Config, ConfigError};

/// Anything that can go wrong while talking to a provider.
#[derive(Debug)]
pub enum Error {
    Http(hyper::Error),
    Request(hyper::http::Error),
    Uri(hyper::http::uri::InvalidUri),
    Encode(serde_urlencoded::ser::Error),
    Json(serde_json::Error),

    /// Provider answered with a non-success status.
    Status {
        status: hyper::StatusCode,
        body: String,
    },

    /// No answer within the configured timeout.
    Timeout(Duration),

    /// Provider answered, but flagged the call as failed.
    Api(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl error::Error for Error {}
impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(e) => write!(f, "http error: {}", e),
            Error::Request(e) => write!(f, "malformed request: {}", e),
            Error::Uri(e) => write!(f, "invalid uri: {}", e),
            Error::Encode(e) => write!(f, "failed to encode query: {}", e),
            Error::Json(e) => write!(f, "failed to parse response: {}", e),
            Error::Status { status, body } => write!(f, "provider returned {}: {}", status, body),
            Error::Timeout(d) => write!(f, "no response after {:?}", d),
            Error::Api(description) => write!(f, "provider error: {}", description),
        }
    }
}

impl From<hyper::Error> for Error {
    fn from(e: hyper::Error) -> Self {
        Error::Http(e)
    }
}

impl From<hyper::http::Error> for Error {
    fn from(e: hyper::http::Error) -> Self {
        Error::Request(e)
    }
}

impl From<hyper::http::uri::InvalidUri> for Error {
    fn from(e: hyper::http::uri::InvalidUri) -> Self {
        Error::Uri(e)
    }
}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(e: serde_urlencoded::ser::Error) -> Self {
        Error::Encode(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}
