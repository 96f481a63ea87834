use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use super::SheetsError;
use crate::config::SheetsConfig;

pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Claims of a service-account JWT bearer assertion.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(client_email: &str, token_uri: &str) -> Self {
        let now = Utc::now();
        Self {
            iss: client_email.to_string(),
            scope: SPREADSHEETS_SCOPE.to_string(),
            aud: token_uri.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        }
    }
}

pub fn encode_assertion(claims: &Claims, private_key_pem: &str) -> Result<String, SheetsError> {
    let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
        .map_err(|e| SheetsError::Credentials(format!("Invalid service account private key: {e}")))?;

    encode(&Header::new(Algorithm::RS256), claims, &key)
        .map_err(|e| SheetsError::Credentials(format!("JWT encode failed: {e}")))
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

/// Exchange a freshly signed assertion for an access token.
/// Nothing is cached: every call signs and exchanges again.
pub async fn fetch_access_token(
    http: &reqwest::Client,
    config: &SheetsConfig,
) -> Result<String, SheetsError> {
    let claims = Claims::new(&config.client_email, &config.token_uri);
    let assertion = encode_assertion(&claims, &config.private_key)?;

    let resp = http
        .post(&config.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await
        .map_err(|e| SheetsError::Transport(format!("Token request failed: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<TokenErrorResponse>(&body) {
            Ok(TokenErrorResponse {
                error,
                error_description: Some(desc),
            }) => format!("{error}: {desc}"),
            Ok(TokenErrorResponse { error, .. }) => error,
            Err(_) => body,
        };
        return Err(SheetsError::Token {
            status: status.as_u16(),
            message,
        });
    }

    let token: TokenResponse = resp
        .json()
        .await
        .map_err(|e| SheetsError::Transport(format!("Invalid token response: {e}")))?;

    Ok(token.access_token)
}
