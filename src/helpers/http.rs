use crate::errors::FetchError;
use crate::types::HttpConfig;

use std::time::Duration;

use async_trait::async_trait;
use governor::Jitter;
use serde_json::Value;
use tracing::instrument;
use url::Url;

/// The outbound side of every retrieval: a single JSON GET.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn get_json(&self, url: &Url) -> Result<Value, FetchError>;
}

pub struct HttpClient {
    client: reqwest::Client,
    secrets: Vec<String>,
}

impl HttpClient {
    /// `secrets` are masked wherever a request URL shows up in an error
    pub fn new(config: &HttpConfig, secrets: Vec<String>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self::from_client(builder.build()?, secrets))
    }

    pub(crate) fn from_client(client: reqwest::Client, secrets: Vec<String>) -> Self {
        Self { client, secrets }
    }
}

#[async_trait]
impl Fetch for HttpClient {
    #[instrument(name = "http-get", skip_all, fields(host = url.host_str().unwrap_or_default()))]
    async fn get_json(&self, url: &Url) -> Result<Value, FetchError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: redact(url, &self.secrets),
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

pub fn parse_url(url: &str) -> Result<Url, FetchError> {
    Url::parse(url).map_err(|source| FetchError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

/// Append `segments` to the path of `base`, percent-encoding each one
pub fn with_segments<S: AsRef<str>>(base: &str, segments: &[S]) -> Result<Url, FetchError> {
    let mut url = parse_url(base)?;
    url.path_segments_mut()
        .map_err(|_| FetchError::NotABase(base.to_string()))?
        .pop_if_empty()
        .extend(segments.iter().map(AsRef::<str>::as_ref));
    Ok(url)
}

const MASK: &str = "***";

/// Mask credentials before an URL ends up in an error or a log line.
///
/// `key` and `api_key` query values are always masked. So is any query value
/// or path segment equal to one of `secrets`.
pub fn redact(url: &Url, secrets: &[String]) -> String {
    let secrets: Vec<&str> = secrets
        .iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();
    let encoded: Vec<String> = secrets.iter().filter_map(|s| encode_segment(s)).collect();
    let is_secret = |value: &str| {
        secrets.iter().any(|s| *s == value) || encoded.iter().any(|e| e.as_str() == value)
    };

    let mut redacted = url.clone();
    if redacted.query().is_some() {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| {
                if matches!(k.as_ref(), "key" | "api_key") || is_secret(v.as_ref()) {
                    (k.into_owned(), MASK.to_string())
                } else {
                    (k.into_owned(), v.into_owned())
                }
            })
            .collect();
        redacted.query_pairs_mut().clear().extend_pairs(pairs);
    }

    if let Some(segments) = url.path_segments() {
        let segments: Vec<&str> = segments.collect();
        if segments.iter().any(|&segment| is_secret(segment)) {
            let path = segments
                .iter()
                .map(|&segment| if is_secret(segment) { MASK } else { segment })
                .collect::<Vec<_>>()
                .join("/");
            redacted.set_path(&format!("/{path}"));
        }
    }

    redacted.to_string()
}

// How `value` reads once it was pushed as a path segment
fn encode_segment(value: &str) -> Option<String> {
    let mut url = Url::parse("http://localhost/").ok()?;
    url.path_segments_mut().ok()?.clear().push(value);
    Some(url.path().trim_start_matches('/').to_string())
}

pub(crate) fn jitter() -> Jitter {
    Jitter::new(Duration::from_millis(50), Duration::from_millis(250))
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Clone)]
    struct Route {
        response: Result<Value, u16>,
        delay: Duration,
    }

    /// Canned responses keyed by full URL, unknown URLs answer with a 404
    #[derive(Default)]
    pub(crate) struct MockFetch {
        routes: HashMap<String, Route>,
        calls: Mutex<Vec<String>>,
    }

    impl MockFetch {
        pub(crate) fn with_json(mut self, url: &str, body: Value) -> Self {
            self.routes.insert(
                url.to_string(),
                Route {
                    response: Ok(body),
                    delay: Duration::ZERO,
                },
            );
            self
        }

        pub(crate) fn with_delayed_json(mut self, url: &str, body: Value, delay: Duration) -> Self {
            self.routes.insert(
                url.to_string(),
                Route {
                    response: Ok(body),
                    delay,
                },
            );
            self
        }

        pub(crate) fn with_status(mut self, url: &str, status: u16) -> Self {
            self.routes.insert(
                url.to_string(),
                Route {
                    response: Err(status),
                    delay: Duration::ZERO,
                },
            );
            self
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetch for MockFetch {
        async fn get_json(&self, url: &Url) -> Result<Value, FetchError> {
            self.calls.lock().unwrap().push(url.to_string());
            let route = self.routes.get(url.as_str()).cloned().unwrap_or(Route {
                response: Err(404),
                delay: Duration::ZERO,
            });

            if !route.delay.is_zero() {
                tokio::time::sleep(route.delay).await;
            }

            route.response.map_err(|status| FetchError::Status {
                status,
                url: url.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn client(secrets: &[&str]) -> HttpClient {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpClient::from_client(client, secrets.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_redact_api_keys() {
        let url = parse_url("https://example.org/videos?id=abc&key=secret&part=snippet").unwrap();
        assert_eq!(
            "https://example.org/videos?id=abc&key=***&part=snippet",
            redact(&url, &[])
        );

        let url = parse_url("https://example.org/movie/1?api_key=secret").unwrap();
        assert_eq!("https://example.org/movie/1?api_key=***", redact(&url, &[]));
    }

    #[test]
    fn test_redact_secrets_in_path_and_query() {
        let secrets = vec!["s3cr3t".to_string(), "a b/c".to_string(), String::new()];

        let url = with_segments("https://example.org/forecast", &["s3cr3t", "s3cr3t", "1,2"]).unwrap();
        assert_eq!("https://example.org/forecast/***/***/1,2", redact(&url, &secrets));

        let url = with_segments("https://example.org/forecast", &["a b/c", "1,2"]).unwrap();
        assert_eq!("https://example.org/forecast/***/1,2", redact(&url, &secrets));

        let url = parse_url("https://example.org/feed?token=s3cr3t&page=1").unwrap();
        assert_eq!("https://example.org/feed?token=***&page=1", redact(&url, &secrets));

        // Nothing to mask
        let url = parse_url("https://example.org/feed/1?page=1").unwrap();
        assert_eq!("https://example.org/feed/1?page=1", redact(&url, &secrets));
    }

    #[test]
    fn test_with_segments_encodes() {
        let url = with_segments("https://example.org/forecast/", &["k?y#1", "39.5,-105"]).unwrap();
        assert_eq!("https://example.org/forecast/k%3Fy%231/39.5,-105", url.as_str());

        assert!(matches!(
            with_segments("mailto:someone@example.org", &["x"]),
            Err(FetchError::NotABase(_))
        ));
    }

    #[tokio::test]
    async fn test_status_error_hides_path_secret() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buffer = [0u8; 1024];
            let _ = socket.read(&mut buffer).await.unwrap();
            socket
                .write_all(b"HTTP/1.1 403 Forbidden\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                .await
                .unwrap();
        });

        let base = format!("http://{address}/forecast");
        let url = with_segments(&base, &["PATHSECRET", "PATHSECRET", "39.5,-105"]).unwrap();
        let error = client(&["PATHSECRET"]).get_json(&url).await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(error, FetchError::Status { status: 403, .. }));
        let message = error.to_string();
        assert!(!message.contains("PATHSECRET"), "{message}");
        assert!(message.contains("/forecast/***/***/39.5,-105"), "{message}");
    }

    #[tokio::test]
    async fn test_transport_error_hides_url() {
        // Grab a free port and close it again so the connection is refused
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let url = parse_url(&format!("http://{address}/movie/1?api_key=QUERYSECRET")).unwrap();
        let error = client(&[]).get_json(&url).await.unwrap_err();

        assert!(matches!(error, FetchError::Transport(_)));
        assert!(!error.to_string().contains("QUERYSECRET"));
        assert!(!format!("{error:?}").contains("QUERYSECRET"));
    }

    #[test]
    fn test_parse_url_rejects_relative() {
        assert!(matches!(
            parse_url("forecast/abc"),
            Err(FetchError::InvalidUrl { .. })
        ));
    }
}
