use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde_json::Value;

/// Lifetime assumed when the token endpoint omits `expires_in`.
pub const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

pub struct ClientCredentialsToken {
    pub access_token: String,
    pub expires_at: u64,
}

pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// `Authorization` value for static username/password credentials.
pub fn basic_auth_header(username: &str, password: &str) -> String {
    let encoded = STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}

/// Run one client-credentials grant against `token_url`.
pub async fn fetch_client_credentials_token_with_expiry(
    client: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<ClientCredentialsToken, String> {
    let params = [
        ("grant_type", "client_credentials"),
        ("client_id", client_id),
        ("client_secret", client_secret),
    ];

    let resp = client
        .post(token_url)
        .header("Accept", "application/json")
        .form(&params)
        .send()
        .await
        .map_err(|e| format!("Token request failed: {e}"))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(format!("Token endpoint returned {status}: {body}"));
    }

    let json: Value = resp
        .json()
        .await
        .map_err(|e| format!("Failed to parse token response: {e}"))?;

    let access_token = json
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or("No access_token in response")?;

    if access_token.trim().is_empty() {
        return Err("Access token was empty".to_string());
    }

    let expires_in = match json.get("expires_in") {
        None | Some(Value::Null) => DEFAULT_EXPIRES_IN_SECS,
        Some(Value::Number(n)) => n.as_u64().ok_or("Invalid expires_in in response")?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| "Invalid expires_in in response")?,
        Some(_) => return Err("Invalid expires_in in response".to_string()),
    };

    Ok(ClientCredentialsToken {
        access_token: access_token.to_string(),
        expires_at: now_secs().saturating_add(expires_in),
    })
}
