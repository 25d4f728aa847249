//! Minimal Telegram Bot API transport: long-poll for updates, send replies.

use hyper::Uri;
use log::{debug, error, info, warn};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{str::FromStr, time::Duration};
use tokio::time;

use crate::{
    bot::{self, Router},
    net::{self, HttpsClient},
    query::Query,
    random::RandomSource,
    yt::{TrendingSource, VideoSearch},
    Error, Result,
};

const API_ROOT: &str = "https://api.telegram.org";

/// Seconds Telegram holds a `getUpdates` call open when idle.
pub const LONG_POLL_SECS: u64 = 30;

/// Pause after a failed poll before trying again.
const RETRY_PAUSE: Duration = Duration::from_secs(5);

#[derive(Deserialize, Debug)]
/// Envelope of every Bot API response.
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(Error::Api(
                self.description
                    .unwrap_or_else(|| "request was not ok".to_string()),
            )),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Chat {
    pub id: i64,
}

#[derive(Serialize)]
struct GetUpdates {
    offset: i64,
    timeout: u64,
    allowed_updates: [&'static str; 1],
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Deserialize, Debug)]
struct Sent {
    message_id: i64,
}

/// Bot API client bound to one token.
#[derive(Clone)]
pub struct Telegram {
    client: HttpsClient,
    token: String,
    timeout: Duration,
}

impl Telegram {
    /// `timeout` bounds `sendMessage`; `getUpdates` waits the long-poll
    /// window on top of it.
    pub fn new(token: &str, timeout: Duration) -> Self {
        Self {
            client: net::https_client(),
            token: token.to_string(),
            timeout,
        }
    }

    fn method_uri(&self, method: &str) -> Result<Uri> {
        Ok(Uri::from_str(&format!("{}/bot{}/{}", API_ROOT, self.token, method))?)
    }

    async fn call<P: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        payload: &P,
        timeout: Duration,
    ) -> Result<T> {
        let resp: ApiResponse<T> =
            net::post_json(&self.client, self.method_uri(method)?, payload, timeout).await?;
        resp.into_result()
    }

    /// Updates with an ID of at least `offset`.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let payload = GetUpdates {
            offset,
            timeout: LONG_POLL_SECS,
            allowed_updates: ["message"],
        };
        let timeout = self.timeout + Duration::from_secs(LONG_POLL_SECS);
        self.call("getUpdates", &payload, timeout).await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let payload = SendMessage {
            chat_id,
            text,
            disable_web_page_preview: false,
        };
        let sent: Sent = self.call("sendMessage", &payload, self.timeout).await?;
        debug!("Sent message {} to chat {}", sent.message_id, chat_id);
        Ok(())
    }

    /// Answer one update. Non-text updates are skipped.
    pub async fn dispatch<S, T, R>(&self, router: &Router<S, T>, update: Update, rng: &mut R)
    where
        S: VideoSearch,
        T: TrendingSource,
        R: RandomSource,
    {
        let (chat_id, text) = match update.message {
            Some(Message {
                chat,
                text: Some(text),
            }) => (chat.id, text),
            _ => {
                debug!("Ignoring update {} without text", update.update_id);
                return;
            }
        };

        let query = match Query::from_str(&text) {
            Ok(q) => q,
            Err(e) => {
                debug!("Ignoring update {}: {}", update.update_id, e);
                return;
            }
        };

        if bot::needs_search(&query) {
            self.reply(chat_id, bot::SEARCHING).await;
        }
        let reply = router.handle(query, rng).await;
        self.reply(chat_id, &reply).await;
    }

    async fn reply(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.send_message(chat_id, text).await {
            error!("Failed to reply to chat {}: {}", chat_id, e);
        }
    }

    /// Poll forever, answering updates one at a time in arrival order.
    pub async fn run<S, T, R>(&self, router: &Router<S, T>, rng: &mut R)
    where
        S: VideoSearch,
        T: TrendingSource,
        R: RandomSource,
    {
        info!("Bot started successfully");
        let mut offset = 0;
        loop {
            let updates = match self.get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    warn!("Polling for updates failed: {}", e);
                    time::sleep(RETRY_PAUSE).await;
                    continue;
                }
            };

            for update in updates {
                offset = next_offset(offset, &update);
                self.dispatch(router, update, rng).await;
            }
        }
    }
}

/// Offset acknowledging `update` and everything before it.
fn next_offset(current: i64, update: &Update) -> i64 {
    current.max(update.update_id + 1)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_updates() {
        let body = r#"{"ok":true,"result":[
            {"update_id":100,"message":{"message_id":1,"chat":{"id":42,"type":"private"},"text":"hello"}},
            {"update_id":101,"message":{"message_id":2,"chat":{"id":42,"type":"private"},"sticker":{}}},
            {"update_id":102,"edited_message":{"message_id":1,"chat":{"id":42,"type":"private"}}}
        ]}"#;
        let resp: ApiResponse<Vec<Update>> = serde_json::from_str(body).unwrap();
        let updates = resp.into_result().unwrap();

        assert_eq!(updates.len(), 3);
        assert_eq!(
            updates[0].message,
            Some(Message {
                chat: Chat { id: 42 },
                text: Some("hello".to_string()),
            })
        );
        assert_eq!(updates[1].message.as_ref().unwrap().text, None);
        assert_eq!(updates[2].message, None);
    }

    #[test]
    fn api_failure_carries_description() {
        let body = r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#;
        let resp: ApiResponse<Vec<Update>> = serde_json::from_str(body).unwrap();
        match resp.into_result() {
            Err(Error::Api(description)) => assert_eq!(description, "Unauthorized"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn send_message_payload() {
        let payload = SendMessage {
            chat_id: 42,
            text: "Found song: x",
            disable_web_page_preview: false,
        };
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"chat_id":42,"text":"Found song: x","disable_web_page_preview":false}"#
        );
    }

    #[test]
    fn method_uri_embeds_token() {
        let tg = Telegram::new("123:abc", Duration::from_secs(1));
        assert_eq!(
            tg.method_uri("getUpdates").unwrap().to_string(),
            "https://api.telegram.org/bot123:abc/getUpdates"
        );
    }

    #[test]
    fn offsets_only_move_forward() {
        let update = |id| Update {
            update_id: id,
            message: None,
        };
        assert_eq!(next_offset(0, &update(100)), 101);
        assert_eq!(next_offset(101, &update(100)), 101);
    }
}
