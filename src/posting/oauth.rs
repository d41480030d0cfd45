//! OAuth 1.0a (HMAC-SHA1) request signing for user-context API calls.

use base64::{engine::general_purpose, Engine as _};
use rand::{distributions::Alphanumeric, Rng};
use ring::hmac;

/// Consumer and token credentials
#[derive(Debug, Clone)]
pub struct OAuthCredentials<'a> {
    pub consumer_key: &'a str,
    pub consumer_secret: &'a str,
    pub token: &'a str,
    pub token_secret: &'a str,
}

/// RFC 3986 percent-encoding (everything but `A-Z a-z 0-9 - . _ ~`)
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Random alphanumeric nonce
pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Build the `Authorization` header value with a fresh nonce and timestamp
pub fn authorization_header(
    credentials: &OAuthCredentials<'_>,
    method: &str,
    url: &str,
    extra_params: &[(&str, &str)],
) -> String {
    let nonce = generate_nonce();
    let timestamp = chrono::Utc::now().timestamp().to_string();
    authorization_header_with(credentials, method, url, extra_params, &nonce, &timestamp)
}

/// Deterministic variant of [`authorization_header`]
pub fn authorization_header_with(
    credentials: &OAuthCredentials<'_>,
    method: &str,
    url: &str,
    extra_params: &[(&str, &str)],
    nonce: &str,
    timestamp: &str,
) -> String {
    let mut oauth_params = vec![
        ("oauth_consumer_key", credentials.consumer_key.to_string()),
        ("oauth_nonce", nonce.to_string()),
        ("oauth_signature_method", "HMAC-SHA1".to_string()),
        ("oauth_timestamp", timestamp.to_string()),
        ("oauth_token", credentials.token.to_string()),
        ("oauth_version", "1.0".to_string()),
    ];

    let signature = sign(credentials, method, url, &oauth_params, extra_params);
    oauth_params.push(("oauth_signature", signature));
    oauth_params.sort_by(|a, b| a.0.cmp(b.0));

    let fields: Vec<String> = oauth_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect();

    format!("OAuth {}", fields.join(", "))
}

/// Compute the base64 HMAC-SHA1 signature
pub fn sign(
    credentials: &OAuthCredentials<'_>,
    method: &str,
    url: &str,
    oauth_params: &[(&str, String)],
    extra_params: &[(&str, &str)],
) -> String {
    let base = signature_base_string(method, url, oauth_params, extra_params);
    let key = format!(
        "{}&{}",
        percent_encode(credentials.consumer_secret),
        percent_encode(credentials.token_secret)
    );

    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, key.as_bytes());
    let tag = hmac::sign(&key, base.as_bytes());
    general_purpose::STANDARD.encode(tag.as_ref())
}

fn signature_base_string(
    method: &str,
    url: &str,
    oauth_params: &[(&str, String)],
    extra_params: &[(&str, &str)],
) -> String {
    let mut encoded: Vec<(String, String)> = oauth_params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .chain(
            extra_params
                .iter()
                .map(|(k, v)| (percent_encode(k), percent_encode(v))),
        )
        .collect();
    encoded.sort();

    let parameter_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(url),
        percent_encode(&parameter_string)
    )
}
