//! Extensions to serde for deserializing provider payloads.
//!
//! Provides deserializers for string lists that may be absent or `null`,
//! and for HTML-escaped text as returned by the YouTube search endpoint.

use serde::{
    de::{Error, Visitor},
    Deserialize, Deserializer,
};

pub mod list {
    //! Lists of strings that providers sometimes omit or send as `null`.

    use super::*;
    use std::fmt;

    struct StringListVisitor;

    impl<'de> Visitor<'de> for StringListVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            write!(formatter, "a list of strings or null")
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            let items: Vec<String> = Deserialize::deserialize(deserializer)?;
            Ok(items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect())
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(Vec::new())
        }
    }

    /// Use together with `#[serde(default)]` so a missing field also
    /// lands as an empty list. Blank entries are dropped.
    pub fn or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(StringListVisitor)
    }
}

pub mod html {
    //! Text fields that arrive with HTML entities escaped.

    use super::*;

    pub fn unescape(s: &str) -> String {
        html_escape::decode_html_entities(s).into_owned()
    }

    pub fn unescaped<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        Ok(unescape(&s))
    }
}
