//! HTTP client for the official joke API.
//!
//! `GET {base}/random` answers either `{"setup": .., "punchline": ..}` or
//! `{"joke": ..}`; both decode into [`Joke`].

use std::time::Duration;

use async_trait::async_trait;
use buzzbot_core::{BotError, Joke, JokeSource, Result};
use reqwest::header::ACCEPT;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const DEFAULT_JOKE_API_URL: &str = "https://official-joke-api.appspot.com/jokes";

const SOURCE_NAME: &str = "joke-api";

pub struct JokeApiClient {
    random_url: String,
    http: reqwest::Client,
}

impl JokeApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("buzzbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BotError::Configuration(format!("cannot build joke API client: {e}")))?;
        Ok(Self {
            random_url: format!("{}/random", base_url.trim_end_matches('/')),
            http,
        })
    }

    async fn request(&self) -> Result<Joke> {
        let response = self
            .http
            .get(&self.random_url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BotError::Timeout(SOURCE_NAME.into())
                } else {
                    BotError::upstream(SOURCE_NAME, e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BotError::upstream(SOURCE_NAME, format!("status {status}")));
        }

        let joke: Joke = response
            .json()
            .await
            .map_err(|e| BotError::upstream(SOURCE_NAME, format!("malformed payload: {e}")))?;
        if joke.is_empty() {
            return Err(BotError::upstream(SOURCE_NAME, "empty joke"));
        }
        Ok(joke)
    }
}

#[async_trait]
impl JokeSource for JokeApiClient {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn fetch(&self, cancel: &CancellationToken) -> Result<Joke> {
        debug!(url = %self.random_url, "Fetching joke");
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(BotError::Cancelled(SOURCE_NAME.into())),
            joke = self.request() => joke,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer, body: ResponseTemplate) -> JokeApiClient {
        Mock::given(method("GET"))
            .and(path("/jokes/random"))
            .respond_with(body)
            .mount(server)
            .await;
        JokeApiClient::new(&format!("{}/jokes/", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn decodes_two_part_joke() {
        let server = MockServer::start().await;
        let client = client_for(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "id": 1, "type": "general",
                "setup": "Why?", "punchline": "Because."
            })),
        )
        .await;

        let joke = client.fetch(&CancellationToken::new()).await.unwrap();
        assert_eq!(joke.render(), "> Why? \n || Because. ||");
    }

    #[tokio::test]
    async fn decodes_single_joke() {
        let server = MockServer::start().await;
        let client = client_for(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"joke": "One-liner."})),
        )
        .await;

        let joke = client.fetch(&CancellationToken::new()).await.unwrap();
        assert_eq!(joke.render(), "> One-liner.");
    }

    #[tokio::test]
    async fn error_status_is_upstream_failure() {
        let server = MockServer::start().await;
        let client = client_for(&server, ResponseTemplate::new(503)).await;

        let err = client.fetch(&CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, BotError::UpstreamUnavailable { .. }));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn malformed_payload_is_upstream_failure() {
        let server = MockServer::start().await;
        let client = client_for(&server, ResponseTemplate::new(200).set_body_string("<html>")).await;

        let err = client.fetch(&CancellationToken::new()).await.unwrap_err();
        assert!(err.to_string().contains("malformed payload"));
    }

    #[tokio::test]
    async fn cancellation_wins_over_slow_upstream() {
        let server = MockServer::start().await;
        let client = client_for(
            &server,
            ResponseTemplate::new(200)
                .set_body_json(json!({"joke": "late"}))
                .set_delay(Duration::from_secs(30)),
        )
        .await;

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = client.fetch(&cancel).await.unwrap_err();
        assert!(matches!(err, BotError::Cancelled(_)));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
            .mount(&server)
            .await;
        let client = JokeApiClient::new(&server.uri(), Duration::from_millis(100)).unwrap();

        let err = client.fetch(&CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, BotError::Timeout(_)));
    }
}
