//! Thin helpers over a shared hyper HTTPS client.

use hyper::{body, client::HttpConnector, header, Body, Client, Method, Request, Uri};
use hyper_tls::HttpsConnector;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tokio::time;

use crate::{Error, Result};

pub type HttpsClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Build a client that speaks HTTPS. Cheap to clone.
pub fn https_client() -> HttpsClient {
    let https = HttpsConnector::new();
    Client::builder().build::<_, Body>(https)
}

/// Join `base` and the url-encoded form of `params`.
pub fn build_uri<P: Serialize>(base: &str, params: &P) -> Result<Uri> {
    let query = serde_urlencoded::to_string(params)?;
    Ok(format!("{}?{}", base, query).parse()?)
}

/// GET `uri` and deserialize the JSON body.
pub async fn get_json<T: DeserializeOwned>(
    client: &HttpsClient,
    uri: Uri,
    timeout: Duration,
) -> Result<T> {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())?;
    send(client, req, timeout).await
}

/// POST `payload` as JSON to `uri` and deserialize the JSON body.
pub async fn post_json<P: Serialize, T: DeserializeOwned>(
    client: &HttpsClient,
    uri: Uri,
    payload: &P,
    timeout: Duration,
) -> Result<T> {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload)?))?;
    send(client, req, timeout).await
}

async fn send<T: DeserializeOwned>(
    client: &HttpsClient,
    req: Request<Body>,
    timeout: Duration,
) -> Result<T> {
    let exchange = async {
        let mut res = client.request(req).await?;
        let status = res.status();
        let bytes = body::to_bytes(res.body_mut()).await?;
        Ok::<_, Error>((status, bytes))
    };

    let (status, bytes) = time::timeout(timeout, exchange)
        .await
        .map_err(|_| Error::Timeout(timeout))??;

    if !status.is_success() {
        return Err(Error::Status {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct Params<'a> {
        q: &'a str,
        #[serde(rename = "maxResults")]
        max_results: u32,
    }

    #[test]
    fn query_is_url_encoded() {
        let uri = build_uri(
            "https://example.com/search",
            &Params {
                q: "ooh & ahh?",
                max_results: 1,
            },
        )
        .unwrap();
        assert_eq!(
            uri.to_string(),
            "https://example.com/search?q=ooh+%26+ahh%3F&maxResults=1"
        );
    }
}
