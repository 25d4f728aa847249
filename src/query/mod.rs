//! Inbound messages resolved by lyricast.
//!
//! Handles parsing chat text into either a bot command or plain lyrics.

use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

/// One inbound chat message, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// `/name[@bot] [text]`. `name` is lowercased, `text` trimmed.
    Command { name: String, text: String },

    /// Anything that is not a command.
    Text(String),
}

impl FromStr for Query {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static! {
          // First capture group is always the command name.
          static ref COMMAND: Regex = Regex::new(r"(?s)^/([A-Za-z0-9_]+)(?:@[A-Za-z0-9_]+)?(?:\s+(.*))?$").unwrap();
        }

        let s = s.trim();
        if s.is_empty() {
            return Err("empty message");
        }

        Ok(match COMMAND.captures(s) {
            Some(caps) => Query::Command {
                name: caps[1].to_lowercase(),
                text: caps
                    .get(2)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default(),
            },
            None => Query::Text(s.to_string()),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn plain_lyrics() {
        assert_eq!(
            Query::from_str("  I said, ooh, I'm blinded by the lights  ").unwrap(),
            Query::Text("I said, ooh, I'm blinded by the lights".to_string())
        );
    }

    #[test]
    fn bare_command() {
        assert_eq!(
            Query::from_str("/start").unwrap(),
            Query::Command {
                name: "start".to_string(),
                text: String::new(),
            }
        );
    }

    #[test]
    fn command_with_bot_name_and_text() {
        assert_eq!(
            Query::from_str("/Search@lyricast_bot   hello from\nthe other side ").unwrap(),
            Query::Command {
                name: "search".to_string(),
                text: "hello from\nthe other side".to_string(),
            }
        );
    }

    #[test]
    fn slash_inside_text_is_not_a_command() {
        assert_eq!(
            Query::from_str("24/7 365").unwrap(),
            Query::Text("24/7 365".to_string())
        );
        assert_eq!(
            Query::from_str("/ not really").unwrap(),
            Query::Text("/ not really".to_string())
        );
    }

    #[test]
    fn empty_is_rejected() {
        assert!(Query::from_str("   ").is_err());
    }
}
