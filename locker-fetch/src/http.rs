//! HTTP client with tracing, retries, and a domain allowlist.

use reqwest::{Client, Response, header};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::HttpError;
use crate::retry::RetryStrategy;

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent sent with every request.
const USER_AGENT: &str = concat!("Locker/", env!("CARGO_PKG_VERSION"));

/// Hosts the bot talks to: the identity and game services plus the public catalog.
pub const DEFAULT_ALLOWED_DOMAINS: &[&str] = &["epicgames.com", "fortnite-api.com"];

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with tracing, retries, and an optional domain allowlist.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    allowed_domains: Option<Vec<String>>,
    retry: RetryStrategy,
}

impl HttpClient {
    /// Creates an unrestricted client with the default timeout.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates an unrestricted client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let inner = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner,
            allowed_domains: None,
            retry: RetryStrategy::default(),
        })
    }

    /// Creates a client restricted to [`DEFAULT_ALLOWED_DOMAINS`].
    pub fn for_game_services() -> Result<Self, HttpError> {
        Ok(Self::new()?.with_allowed_domains(
            DEFAULT_ALLOWED_DOMAINS.iter().map(|d| (*d).to_string()).collect(),
        ))
    }

    /// Restricts requests to the given domains and their subdomains.
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Sets the retry policy used by [`HttpClient::get`].
    pub fn with_retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry = strategy;
        self
    }

    fn is_domain_allowed(&self, url: &str) -> Result<(), HttpError> {
        let parsed = Url::parse(url).map_err(|e| HttpError::InvalidUrl(e.to_string()))?;

        let Some(ref allowed) = self.allowed_domains else {
            return Ok(());
        };

        let host = parsed
            .host_str()
            .ok_or_else(|| HttpError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(HttpError::DomainNotAllowed(host.to_string()))
        }
    }

    /// Performs a GET request, retrying transport failures, 429 and 5xx.
    ///
    /// Any other status, including 404, is returned to the caller as-is.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get(&self, url: &str) -> Result<Response, HttpError> {
        self.is_domain_allowed(url)?;
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(attempt, "GET request");

            match self.inner.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if !self.retry.should_retry_status(status) {
                        debug!(status = %status, "Response received");
                        return Ok(response);
                    }
                    if !self.retry.has_attempts_left(attempt) {
                        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                            return Err(HttpError::RateLimited {
                                retry_after: retry_after_secs(&response),
                            });
                        }
                        return Ok(response);
                    }
                    let delay = self
                        .retry
                        .delay_with_hint(attempt, retry_after_secs(&response));
                    warn!(status = %status, delay_ms = delay.as_millis(), "Retrying GET");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    if self.retry.has_attempts_left(attempt) && self.retry.should_retry(&e) {
                        let delay = self.retry.delay_for_attempt(attempt);
                        warn!(error = %e, delay_ms = delay.as_millis(), "Request failed, retrying");
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }

    /// Performs a GET request with an authorization header.
    #[instrument(skip(self, auth_header), fields(url = %url))]
    pub async fn get_with_auth(&self, url: &str, auth_header: &str) -> Result<Response, HttpError> {
        self.is_domain_allowed(url)?;
        debug!("GET request with auth");

        let response = self
            .inner
            .get(url)
            .header(header::AUTHORIZATION, auth_header)
            .send()
            .await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Performs a form-encoded POST with an authorization header.
    #[instrument(skip(self, auth_header, form), fields(url = %url))]
    pub async fn post_form<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        auth_header: &str,
        form: &T,
    ) -> Result<Response, HttpError> {
        self.is_domain_allowed(url)?;
        debug!("POST request with form data");

        let response = self
            .inner
            .post(url)
            .header(header::AUTHORIZATION, auth_header)
            .form(form)
            .send()
            .await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Performs a JSON POST with an authorization header.
    #[instrument(skip(self, auth_header, body), fields(url = %url))]
    pub async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        auth_header: &str,
        body: &T,
    ) -> Result<Response, HttpError> {
        self.is_domain_allowed(url)?;
        debug!("POST request with JSON");

        let response = self
            .inner
            .post(url)
            .header(header::AUTHORIZATION, auth_header)
            .json(body)
            .send()
            .await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }
}

/// Reads the `Retry-After` header in seconds.
fn retry_after_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// Formats a bearer authorization header.
pub fn bearer(token: &str) -> String {
    format!("bearer {token}")
}

/// Formats a basic authorization header from an already-encoded client token.
pub fn basic(client_token: &str) -> String {
    format!("basic {client_token}")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_service_allowlist() {
        let client = HttpClient::for_game_services().unwrap();

        assert!(client
            .is_domain_allowed("https://account-public-service-prod03.ol.epicgames.com/account/api/oauth/token")
            .is_ok());
        assert!(client.is_domain_allowed("https://fortnite-api.com/v1/banners").is_ok());
        assert!(matches!(
            client.is_domain_allowed("https://evil.com/steal"),
            Err(HttpError::DomainNotAllowed(_))
        ));
        // Suffix match must respect the label boundary.
        assert!(client.is_domain_allowed("https://notepicgames.com").is_err());
    }

    #[test]
    fn test_unrestricted_client() {
        let client = HttpClient::new().unwrap();
        assert!(client.is_domain_allowed("https://any.domain.com").is_ok());
        assert!(matches!(
            client.is_domain_allowed("not-a-url"),
            Err(HttpError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_auth_headers() {
        assert_eq!(bearer("abc"), "bearer abc");
        assert_eq!(basic("Zm9v"), "basic Zm9v");
    }
}
