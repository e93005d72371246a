//! # Azure Blob Storage Client
//!
//! Minimal REST client for the one call the catalog needs: Put Blob.
//!
//! ## Request
//! ```text
//! PUT {endpoint}/{container}/{key}[?{sas}]
//! x-ms-blob-type: BlockBlob
//! x-ms-date:      Tue, 06 Oct 2026 12:00:00 GMT
//! x-ms-version:   2021-08-06
//! Content-Type:   image/png
//! Authorization:  SharedKey {account}:{base64(hmac_sha256(key, string_to_sign))}
//! ```
//!
//! SAS credentials replace the `Authorization` header with the token in the
//! query string. The returned public URL never carries the token.
//!
//! ## Connection Strings
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │ AccountName=a;AccountKey=k[;DefaultEndpointsProtocol=https]             │
//! │              [;EndpointSuffix=core.windows.net][;BlobEndpoint=url]      │
//! │ BlobEndpoint=url;SharedAccessSignature=sv=...&sig=...                   │
//! │ UseDevelopmentStorage=true      (local emulator, well-known account)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use std::collections::HashMap;
use tracing::{debug, error, instrument};

use crate::error::{BlobError, BlobResult};
use crate::store::BlobStore;

/// REST API version sent with every request.
pub const API_VERSION: &str = "2021-08-06";

const DEV_ACCOUNT_NAME: &str = "devstoreaccount1";
const DEV_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
const DEV_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

// =============================================================================
// Connection String
// =============================================================================

/// How requests are authorized.
#[derive(Clone)]
pub enum Credentials {
    /// Account name + base64 account key, signed per request.
    SharedKey { account: String, key: SecretString },
    /// Pre-signed token appended to the request URL.
    Sas(SecretString),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::SharedKey { account, .. } => f
                .debug_struct("SharedKey")
                .field("account", account)
                .field("key", &"[REDACTED]")
                .finish(),
            Credentials::Sas(_) => f.debug_tuple("Sas").field(&"[REDACTED]").finish(),
        }
    }
}

/// A parsed storage connection string.
#[derive(Debug, Clone)]
pub struct ConnectionString {
    /// Blob service endpoint without a trailing slash.
    pub endpoint: String,
    pub credentials: Credentials,
}

impl ConnectionString {
    /// Parses a `Key=Value;Key=Value` connection string.
    ///
    /// ```rust
    /// use vitrine_blob::ConnectionString;
    ///
    /// let conn = ConnectionString::parse(
    ///     "DefaultEndpointsProtocol=https;AccountName=loja;AccountKey=a2V5;EndpointSuffix=core.windows.net",
    /// ).unwrap();
    /// assert_eq!(conn.endpoint, "https://loja.blob.core.windows.net");
    /// ```
    pub fn parse(raw: &str) -> BlobResult<Self> {
        let settings: HashMap<String, String> = raw
            .split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.split_once('=')
                    .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
                    .ok_or_else(|| {
                        BlobError::InvalidConnectionString(format!("malformed segment '{}'", setting_name(part)))
                    })
            })
            .collect::<BlobResult<_>>()?;

        if settings
            .get("usedevelopmentstorage")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
        {
            return Ok(ConnectionString {
                endpoint: DEV_BLOB_ENDPOINT.to_string(),
                credentials: Credentials::SharedKey {
                    account: DEV_ACCOUNT_NAME.to_string(),
                    key: SecretString::from(DEV_ACCOUNT_KEY.to_string()),
                },
            });
        }

        let account = settings.get("accountname").filter(|v| !v.is_empty());

        let endpoint = match (settings.get("blobendpoint"), account) {
            (Some(endpoint), _) => endpoint.trim_end_matches('/').to_string(),
            (None, Some(account)) => {
                let protocol = settings
                    .get("defaultendpointsprotocol")
                    .map(String::as_str)
                    .unwrap_or("https");
                let suffix = settings
                    .get("endpointsuffix")
                    .map(String::as_str)
                    .unwrap_or("core.windows.net");
                format!("{protocol}://{account}.blob.{suffix}")
            }
            (None, None) => {
                return Err(BlobError::InvalidConnectionString(
                    "neither BlobEndpoint nor AccountName is set".to_string(),
                ))
            }
        };

        Url::parse(&endpoint)
            .map_err(|e| BlobError::InvalidConnectionString(format!("bad endpoint: {e}")))?;

        let credentials = if let Some(sas) = settings.get("sharedaccesssignature") {
            Credentials::Sas(SecretString::from(sas.trim_start_matches('?').to_string()))
        } else {
            match (account, settings.get("accountkey")) {
                (Some(account), Some(key)) => {
                    STANDARD
                        .decode(key)
                        .map_err(|_| BlobError::InvalidAccountKey)?;
                    Credentials::SharedKey {
                        account: account.clone(),
                        key: SecretString::from(key.clone()),
                    }
                }
                _ => {
                    return Err(BlobError::InvalidConnectionString(
                        "no AccountName/AccountKey pair or SharedAccessSignature".to_string(),
                    ))
                }
            }
        };

        Ok(ConnectionString {
            endpoint,
            credentials,
        })
    }
}

/// Name half of a `Name=Value` segment, so error messages never echo secrets.
fn setting_name(segment: &str) -> &str {
    segment.split_once('=').map_or(segment, |(name, _)| name)
}

// =============================================================================
// Shared Key Signing
// =============================================================================

/// Builds the Shared Key string-to-sign for a request with no conditional or
/// range headers.
///
/// `ms_headers` must hold every `x-ms-*` header sent; they are lowercased and
/// sorted here. `Content-Length` is empty for zero-length bodies.
pub fn string_to_sign(
    verb: &str,
    content_length: usize,
    content_type: &str,
    ms_headers: &[(&str, &str)],
    canonical_resource: &str,
) -> String {
    let length = if content_length == 0 {
        String::new()
    } else {
        content_length.to_string()
    };

    let mut headers: Vec<(String, &str)> = ms_headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.trim()))
        .collect();
    headers.sort_by(|a, b| a.0.cmp(&b.0));

    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect();

    // VERB, Content-Encoding, Content-Language, Content-Length, Content-MD5,
    // Content-Type, Date, If-Modified-Since, If-Match, If-None-Match,
    // If-Unmodified-Since, Range
    format!(
        "{verb}\n\n\n{length}\n\n{content_type}\n\n\n\n\n\n\n{canonical_headers}{canonical_resource}"
    )
}

/// Signs a string-to-sign with a base64 account key and returns the base64
/// signature.
pub fn sign(account_key: &str, string_to_sign: &str) -> BlobResult<String> {
    let key = STANDARD
        .decode(account_key)
        .map_err(|_| BlobError::InvalidAccountKey)?;

    let mut mac = Hmac::<Sha256>::new_from_slice(&key)
        .map_err(|e| BlobError::Internal(e.to_string()))?;
    mac.update(string_to_sign.as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// RFC 1123 date as required by `x-ms-date`.
pub fn ms_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

// =============================================================================
// Store
// =============================================================================

/// Blob store backed by an Azure Storage container.
#[derive(Clone)]
pub struct AzureBlobStore {
    client: Client,
    connection: ConnectionString,
    container: String,
}

impl std::fmt::Debug for AzureBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureBlobStore")
            .field("endpoint", &self.connection.endpoint)
            .field("credentials", &self.connection.credentials)
            .field("container", &self.container)
            .finish_non_exhaustive()
    }
}

impl AzureBlobStore {
    pub fn new(connection: ConnectionString, container: impl Into<String>) -> Self {
        AzureBlobStore {
            client: Client::new(),
            connection,
            container: container.into(),
        }
    }

    /// Parses the connection string and targets `container`.
    pub fn from_connection_string(raw: &str, container: impl Into<String>) -> BlobResult<Self> {
        let connection = ConnectionString::parse(raw)?;
        let store = AzureBlobStore::new(connection, container);
        debug!(store = ?store, "Blob store configured");
        Ok(store)
    }

    /// Public URL of a blob in this container.
    pub fn blob_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.connection.endpoint, self.container, key)
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    #[instrument(skip(self, bytes), fields(container = %self.container, size = bytes.len()))]
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> BlobResult<String> {
        let public_url = self.blob_url(key);
        let date = ms_date(Utc::now());

        let mut request_url = public_url.clone();
        let mut authorization = None;

        match &self.connection.credentials {
            Credentials::SharedKey { account, key: account_key } => {
                let path = Url::parse(&public_url)
                    .map_err(|e| BlobError::Internal(e.to_string()))?
                    .path()
                    .to_string();
                let to_sign = string_to_sign(
                    "PUT",
                    bytes.len(),
                    content_type,
                    &[
                        ("x-ms-blob-type", "BlockBlob"),
                        ("x-ms-date", &date),
                        ("x-ms-version", API_VERSION),
                    ],
                    &format!("/{account}{path}"),
                );
                let signature = sign(account_key.expose_secret(), &to_sign)?;
                authorization = Some(format!("SharedKey {account}:{signature}"));
            }
            Credentials::Sas(token) => {
                request_url = format!("{public_url}?{}", token.expose_secret());
            }
        }

        let mut request = self
            .client
            .put(&request_url)
            .header("x-ms-blob-type", "BlockBlob")
            .header("x-ms-date", &date)
            .header("x-ms-version", API_VERSION)
            .header(CONTENT_TYPE, content_type);

        if let Some(authorization) = authorization {
            request = request.header(AUTHORIZATION, authorization);
        }

        let response = request.body(bytes).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!(status, key = %key, "Blob upload rejected");
            return Err(BlobError::UploadFailed { status, body });
        }

        debug!(key = %key, "Blob uploaded");
        Ok(public_url)
    }

    fn container(&self) -> &str {
        &self.container
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const KEY: &str = "a2V5LWZvci10ZXN0cw==";

    #[test]
    fn test_parse_account_key() {
        let conn = ConnectionString::parse(&format!(
            "DefaultEndpointsProtocol=https;AccountName=loja;AccountKey={KEY};EndpointSuffix=core.windows.net"
        ))
        .unwrap();

        assert_eq!(conn.endpoint, "https://loja.blob.core.windows.net");
        match conn.credentials {
            Credentials::SharedKey { account, key } => {
                assert_eq!(account, "loja");
                assert_eq!(key.expose_secret(), KEY);
            }
            Credentials::Sas(_) => panic!("expected shared key"),
        }
    }

    #[test]
    fn test_parse_defaults_protocol_and_suffix() {
        let conn = ConnectionString::parse(&format!("AccountName=loja;AccountKey={KEY}")).unwrap();
        assert_eq!(conn.endpoint, "https://loja.blob.core.windows.net");
    }

    #[test]
    fn test_parse_sas() {
        let conn = ConnectionString::parse(
            "BlobEndpoint=https://loja.blob.core.windows.net/;SharedAccessSignature=?sv=2021-08-06&sig=abc%3D",
        )
        .unwrap();

        assert_eq!(conn.endpoint, "https://loja.blob.core.windows.net");
        match conn.credentials {
            Credentials::Sas(token) => assert_eq!(token.expose_secret(), "sv=2021-08-06&sig=abc%3D"),
            Credentials::SharedKey { .. } => panic!("expected SAS"),
        }
    }

    #[test]
    fn test_parse_development_storage() {
        let conn = ConnectionString::parse("UseDevelopmentStorage=true").unwrap();
        assert_eq!(conn.endpoint, DEV_BLOB_ENDPOINT);
        assert!(matches!(
            conn.credentials,
            Credentials::SharedKey { ref account, .. } if account == DEV_ACCOUNT_NAME
        ));
    }

    #[test]
    fn test_parse_rejects_incomplete_strings() {
        assert!(matches!(
            ConnectionString::parse("AccountName=loja"),
            Err(BlobError::InvalidConnectionString(_))
        ));
        assert!(matches!(
            ConnectionString::parse("EndpointSuffix=core.windows.net"),
            Err(BlobError::InvalidConnectionString(_))
        ));
        assert!(matches!(
            ConnectionString::parse("AccountName=loja;AccountKey=not base64!"),
            Err(BlobError::InvalidAccountKey)
        ));
        assert!(ConnectionString::parse("garbage").is_err());
    }

    #[test]
    fn test_string_to_sign_layout() {
        let s = string_to_sign(
            "PUT",
            3,
            "image/png",
            &[
                ("x-ms-version", API_VERSION),
                ("x-ms-blob-type", "BlockBlob"),
                ("X-Ms-Date", "Tue, 06 Oct 2026 12:00:00 GMT"),
            ],
            "/loja/imagens/a.png",
        );

        assert_eq!(
            s,
            "PUT\n\n\n3\n\nimage/png\n\n\n\n\n\n\n\
             x-ms-blob-type:BlockBlob\n\
             x-ms-date:Tue, 06 Oct 2026 12:00:00 GMT\n\
             x-ms-version:2021-08-06\n\
             /loja/imagens/a.png"
        );
    }

    #[test]
    fn test_zero_length_body_leaves_length_empty() {
        let s = string_to_sign("PUT", 0, "", &[], "/a/b/c");
        assert_eq!(s, "PUT\n\n\n\n\n\n\n\n\n\n\n\n/a/b/c");
    }

    #[test]
    fn test_sign_is_deterministic() {
        let first = sign(KEY, "payload").unwrap();
        let second = sign(KEY, "payload").unwrap();
        let other = sign(KEY, "payload2").unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(STANDARD.decode(&first).unwrap().len(), 32);
    }

    #[test]
    fn test_ms_date_format() {
        let at = Utc.with_ymd_and_hms(2026, 10, 6, 9, 5, 3).unwrap();
        assert_eq!(ms_date(at), "Tue, 06 Oct 2026 09:05:03 GMT");
    }

    #[test]
    fn test_blob_url_has_no_sas() {
        let store = AzureBlobStore::from_connection_string(
            "BlobEndpoint=https://loja.blob.core.windows.net;SharedAccessSignature=sig=secret",
            "imagens",
        )
        .unwrap();

        assert_eq!(
            store.blob_url("k.png"),
            "https://loja.blob.core.windows.net/imagens/k.png"
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let store = AzureBlobStore::from_connection_string(
            &format!("AccountName=loja;AccountKey={KEY}"),
            "imagens",
        )
        .unwrap();

        let rendered = format!("{store:?}");
        assert!(rendered.contains("loja"));
        assert!(!rendered.contains(KEY));
    }
}
