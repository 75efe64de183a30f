//! Device-code login against the game's identity service.
//!
//! ## Flow
//!
//! 1. **Client token**: `client_credentials` grant with the switch client
//! 2. **Start**: POST `deviceAuthorization` for a verification URL and device code
//! 3. **Poll**: `device_code` grant every five seconds until the user approves
//! 4. **Exchange**: trade the approved token for an exchange code, then redeem
//!    it with the iOS client for the final [`EpicSession`]
//!
//! ## Example
//!
//! ```ignore
//! let flow = DeviceAuthFlow::new(HttpClient::for_game_services()?, ClientCredentials::from_env()?);
//! let session = flow
//!     .run_with_callback(|start| println!("Open {}", start.verification_uri_complete))
//!     .await?;
//! ```

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::error::AuthError;
use crate::http::{HttpClient, basic, bearer};

// ============================================================================
// Constants
// ============================================================================

/// Token endpoint used for the initial client-credentials grant.
const CLIENT_TOKEN_URL: &str =
    "https://account-public-service-prod.ol.epicgames.com/account/api/oauth/token";

/// Device authorization endpoint.
const DEVICE_AUTHORIZATION_URL: &str =
    "https://account-public-service-prod03.ol.epicgames.com/account/api/oauth/deviceAuthorization";

/// Token endpoint used for polling and the exchange-code grant.
const TOKEN_URL: &str =
    "https://account-public-service-prod03.ol.epicgames.com/account/api/oauth/token";

/// Exchange-code endpoint.
const EXCHANGE_URL: &str =
    "https://account-public-service-prod03.ol.epicgames.com/account/api/oauth/exchange";

/// Environment variable holding the encoded switch client token.
pub const SWITCH_TOKEN_ENV: &str = "LOCKER_SWITCH_TOKEN";

/// Environment variable holding the encoded iOS client token.
pub const IOS_TOKEN_ENV: &str = "LOCKER_IOS_TOKEN";

/// Interval between device-code polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Deadline used when the service does not report `expires_in`.
const DEFAULT_EXPIRY_SECS: u64 = 600;

// ============================================================================
// Types
// ============================================================================

/// Encoded OAuth client tokens for the two clients the flow uses.
#[derive(Clone)]
pub struct ClientCredentials {
    switch_token: String,
    ios_token: String,
}

impl ClientCredentials {
    /// Creates credentials from encoded client tokens.
    pub fn new(switch_token: impl Into<String>, ios_token: impl Into<String>) -> Self {
        Self {
            switch_token: switch_token.into(),
            ios_token: ios_token.into(),
        }
    }

    /// Reads both tokens from [`SWITCH_TOKEN_ENV`] and [`IOS_TOKEN_ENV`].
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads both tokens through `lookup`, failing on the first absent or blank one.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(AuthError::MissingCredentials(key))
        };
        Ok(Self::new(read(SWITCH_TOKEN_ENV)?, read(IOS_TOKEN_ENV)?))
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials").finish_non_exhaustive()
    }
}

/// Device authorization started by [`DeviceAuthFlow::start`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceAuthorization {
    /// URL the user opens to approve the login, code included.
    pub verification_uri_complete: String,
    /// Code polled until approval.
    pub device_code: String,
    /// Seconds until the device code expires.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Suggested polling interval in seconds.
    #[serde(default)]
    pub interval: Option<u64>,
}

/// Result of one poll.
#[derive(Debug, Clone)]
pub enum DevicePoll {
    /// Not approved yet; keep polling.
    Pending,
    /// Approved; carries the short-lived switch-client token.
    Approved(String),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ExchangeResponse {
    code: String,
}

/// Authenticated account session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EpicSession {
    /// Bearer token for game-service calls.
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
    /// Token expiry timestamp.
    pub expires_at: String,
    /// Token type.
    pub token_type: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Refresh token expiry timestamp.
    pub refresh_expires_at: String,
    /// Account identifier.
    pub account_id: String,
    /// OAuth client that issued the token.
    pub client_id: String,
    /// Account display name.
    #[serde(rename = "displayName")]
    pub display_name: String,
    /// Issuing application.
    pub app: String,
    /// In-app identifier.
    pub in_app_id: String,
}

// ============================================================================
// Device Auth Flow
// ============================================================================

/// Device-code login flow.
#[derive(Debug, Clone)]
pub struct DeviceAuthFlow {
    http: HttpClient,
    credentials: ClientCredentials,
}

impl DeviceAuthFlow {
    /// Creates a flow over the given client.
    pub fn new(http: HttpClient, credentials: ClientCredentials) -> Self {
        Self { http, credentials }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AuthError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "Failed to parse identity service response");
            AuthError::InvalidResponse(format!("JSON parse error: {e}"))
        })
    }

    /// Obtains a client token and starts a device authorization.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<DeviceAuthorization, AuthError> {
        debug!("Requesting client credentials token");
        let response = self
            .http
            .post_form(
                CLIENT_TOKEN_URL,
                &basic(&self.credentials.switch_token),
                &[("grant_type", "client_credentials")],
            )
            .await?;
        let client: TokenResponse = Self::read_json(response).await?;

        let response = self
            .http
            .post_form(
                DEVICE_AUTHORIZATION_URL,
                &bearer(&client.access_token),
                &[("prompt", "login")],
            )
            .await?;
        let start: DeviceAuthorization = Self::read_json(response).await?;

        debug!(expires_in = ?start.expires_in, "Device authorization started");
        Ok(start)
    }

    /// Polls once for approval.
    ///
    /// Any non-200 answer counts as still pending; the caller's deadline bounds the wait.
    #[instrument(skip(self, device_code))]
    pub async fn poll(&self, device_code: &str) -> Result<DevicePoll, AuthError> {
        let response = self
            .http
            .post_form(
                TOKEN_URL,
                &basic(&self.credentials.switch_token),
                &[("grant_type", "device_code"), ("device_code", device_code)],
            )
            .await?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "Authorization pending");
            return Ok(DevicePoll::Pending);
        }

        let token: TokenResponse = Self::read_json(response).await?;
        Ok(DevicePoll::Approved(token.access_token))
    }

    /// Redeems an approved token for the final session.
    #[instrument(skip(self, approved_token))]
    pub async fn complete(&self, approved_token: &str) -> Result<EpicSession, AuthError> {
        let response = self
            .http
            .get_with_auth(EXCHANGE_URL, &bearer(approved_token))
            .await?;
        let exchange: ExchangeResponse = Self::read_json(response).await?;

        let response = self
            .http
            .post_form(
                TOKEN_URL,
                &basic(&self.credentials.ios_token),
                &[
                    ("grant_type", "exchange_code"),
                    ("exchange_code", exchange.code.as_str()),
                ],
            )
            .await?;
        let session: EpicSession = Self::read_json(response).await?;

        if session.account_id.is_empty() || session.access_token.is_empty() {
            return Err(AuthError::InvalidResponse(
                "session without account id or token".to_string(),
            ));
        }
        info!(account = %session.display_name, "Login completed");
        Ok(session)
    }

    /// Runs the whole flow, invoking `on_start` once the verification URL is known.
    ///
    /// Polls every [`POLL_INTERVAL`] until approval or until the device code expires.
    #[instrument(skip(self, on_start))]
    pub async fn run_with_callback<F>(&self, on_start: F) -> Result<EpicSession, AuthError>
    where
        F: FnOnce(&DeviceAuthorization),
    {
        let start = self.start().await?;
        on_start(&start);

        let interval = POLL_INTERVAL.max(Duration::from_secs(start.interval.unwrap_or(0)));
        let deadline = Instant::now()
            + Duration::from_secs(start.expires_in.unwrap_or(DEFAULT_EXPIRY_SECS));

        loop {
            if Instant::now() > deadline {
                return Err(AuthError::Expired);
            }

            match self.poll(&start.device_code).await? {
                DevicePoll::Pending => tokio::time::sleep(interval).await,
                DevicePoll::Approved(token) => return self.complete(&token).await,
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
