//! Service-account authorization.
//!
//! A signed RS256 assertion is exchanged at the key's `token_uri` for a
//! short-lived bearer token, which is cached until shortly before it expires.

use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::StoreError;

/// Scopes requested for the token.
pub const SCOPES: [&str; 3] = [
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive.file",
    "https://www.googleapis.com/auth/drive",
];

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens are refreshed this long before their reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Fields of a service-account key file that are needed for authorization.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Loads a key from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Credentials(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_json(&content)
            .map_err(|e| StoreError::Credentials(format!("'{}': {}", path.display(), e)))
    }

    /// Parses a key from JSON text.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json)
            .map_err(|e| StoreError::Credentials(format!("invalid service-account key: {}", e)))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

/// Builds the signed assertion for `key`, issued at `issued_at` (Unix seconds).
pub(crate) fn build_assertion(key: &ServiceAccountKey, issued_at: i64) -> Result<String, StoreError> {
    let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| StoreError::Credentials(format!("invalid private key: {}", e)))?;

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let claims = Claims {
        iss: key.client_email.clone(),
        scope: SCOPES.join(" "),
        aud: key.token_uri.clone(),
        iat: issued_at,
        exp: issued_at + ASSERTION_LIFETIME_SECS,
    };

    jsonwebtoken::encode(&header, &claims, &signing_key)
        .map_err(|e| StoreError::Credentials(format!("cannot sign assertion: {}", e)))
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Supplies bearer tokens for a service account.
pub struct TokenSource {
    key: ServiceAccountKey,
    cached: Option<CachedToken>,
}

impl TokenSource {
    pub fn new(key: ServiceAccountKey) -> Self {
        Self { key, cached: None }
    }

    /// Service-account email the tokens are issued for.
    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Returns a valid token, exchanging a fresh assertion when needed.
    pub fn token(&mut self, http: &Client) -> Result<String, StoreError> {
        let now = Instant::now();
        if let Some(token) = self.cached_at(now) {
            return Ok(token.to_string());
        }

        debug!("Requesting access token for {}", self.key.client_email);
        let assertion = build_assertion(&self.key, Utc::now().timestamp())?;
        let response = http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(StoreError::Auth(describe_token_error(status.as_u16(), &body)));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| StoreError::Decode(format!("token response: {}", e)))?;
        self.store(token.access_token.clone(), token.expires_in, now);
        Ok(token.access_token)
    }

    fn cached_at(&self, now: Instant) -> Option<&str> {
        self.cached
            .as_ref()
            .filter(|t| now < t.refresh_at)
            .map(|t| t.value.as_str())
    }

    fn store(&mut self, value: String, expires_in: u64, now: Instant) {
        let lifetime = Duration::from_secs(expires_in).saturating_sub(EXPIRY_MARGIN);
        self.cached = Some(CachedToken {
            value,
            refresh_at: now + lifetime,
        });
    }
}

fn describe_token_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<TokenErrorResponse>(body) {
        Ok(err) => match err.error_description {
            Some(desc) => format!("{} ({})", err.error, desc),
            None => err.error,
        },
        Err(_) => format!("HTTP {}", status),
    }
}
