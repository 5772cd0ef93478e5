use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::element::ElementRef;
use crate::error::Result;
use crate::rule::{Rule, Verdict};

/// Answers whether a URL is reachable.
#[async_trait]
pub trait UrlProbe: Send + Sync {
    /// `Ok(false)` for a URL that answered badly or cannot be requested;
    /// `Err` only when the probe itself failed.
    async fn is_active(&self, url: &str) -> Result<bool>;
}

/// Every text value is a URL the probe reports as active.
///
/// Probes for all values run concurrently; the verdict is always deferred.
#[derive(Clone)]
pub struct ActiveUrl {
    probe: Arc<dyn UrlProbe>,
}

impl ActiveUrl {
    pub fn new(probe: Arc<dyn UrlProbe>) -> Self {
        Self { probe }
    }
}

impl std::fmt::Debug for ActiveUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveUrl").finish_non_exhaustive()
    }
}

impl Rule for ActiveUrl {
    fn passed(&self, elements: &[ElementRef], _args: &[String]) -> Result<Verdict> {
        let urls: Vec<String> = elements
            .iter()
            .filter(|element| element.kind().is_input_like())
            .flat_map(|element| element.values())
            .collect();
        let probe = Arc::clone(&self.probe);

        Ok(Verdict::deferred(async move {
            let answers = try_join_all(urls.iter().map(|url| probe.is_active(url))).await?;
            Ok(answers.into_iter().all(|active| active))
        }))
    }

    fn message(&self) -> Cow<'static, str> {
        Cow::Borrowed("{name} is not an active url")
    }
}

// ============================================================================
// HTTP PROBE
// ============================================================================

#[cfg(feature = "http")]
pub use http::HttpProbe;

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::{Client, StatusCode, Url};

    use super::UrlProbe;
    use crate::error::{Error, Result};

    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Issues a GET and expects `200 OK`.
    ///
    /// A client that failed to build makes every check fail with
    /// [`Error::Probe`].
    #[derive(Debug, Clone)]
    pub struct HttpProbe {
        client: std::result::Result<Client, String>,
    }

    impl HttpProbe {
        pub fn with_client(client: Client) -> Self {
            Self { client: Ok(client) }
        }

        #[cfg(test)]
        pub(crate) fn broken(reason: &str) -> Self {
            Self {
                client: Err(reason.to_string()),
            }
        }
    }

    impl Default for HttpProbe {
        fn default() -> Self {
            let client = Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .map_err(|err| {
                    tracing::warn!(error = %err, "Could not build HTTP client for URL checks");
                    err.to_string()
                });
            Self { client }
        }
    }

    #[async_trait]
    impl UrlProbe for HttpProbe {
        async fn is_active(&self, url: &str) -> Result<bool> {
            let client = self.client.as_ref().map_err(|reason| Error::Probe {
                url: url.to_string(),
                reason: reason.clone(),
            })?;

            let Ok(parsed) = Url::parse(url) else {
                tracing::debug!(url = %url, "Not a URL, skipping probe");
                return Ok(false);
            };

            let response = client.get(parsed).send().await.map_err(|err| {
                if err.is_builder() {
                    return None;
                }
                Some(Error::Probe {
                    url: url.to_string(),
                    reason: err.to_string(),
                })
            });

            match response {
                Ok(response) => Ok(response.status() == StatusCode::OK),
                Err(None) => Ok(false),
                Err(Some(err)) => {
                    tracing::warn!(url = %url, error = %err, "URL probe failed");
                    Err(err)
                }
            }
        }
    }
}
