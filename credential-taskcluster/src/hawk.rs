//! Hawk request signing for Taskcluster.
//!
//! Only the header scheme is implemented, without payload hashing, which is
//! all a bodiless `GET` needs.

use crate::error::TaskclusterError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use reqwest::{Method, Url};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const HEADER_VERSION: &str = "hawk.1.header";

/// Taskcluster client credentials.
#[derive(Debug)]
pub struct Credentials {
    pub client_id: String,
    pub access_token: SecretString,
    /// JSON certificate of temporary credentials.
    pub certificate: Option<SecretString>,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, access_token: impl Into<SecretString>) -> Self {
        Self {
            client_id: client_id.into(),
            access_token: access_token.into(),
            certificate: None,
        }
    }

    pub fn with_certificate(mut self, certificate: impl Into<SecretString>) -> Self {
        self.certificate = Some(certificate.into());
        self
    }

    /// Returns the Hawk `ext` value carrying the certificate, if any.
    pub fn ext(&self) -> Result<Option<String>, TaskclusterError> {
        let Some(certificate) = &self.certificate else {
            return Ok(None);
        };
        let certificate: serde_json::Value = serde_json::from_str(certificate.expose_secret())
            .map_err(TaskclusterError::InvalidCertificate)?;
        let ext = serde_json::json!({ "certificate": certificate });
        Ok(Some(STANDARD.encode(ext.to_string())))
    }

    /// Builds the `Authorization` header for a request.
    pub fn authorization(&self, method: &Method, url: &Url) -> Result<String, TaskclusterError> {
        let ts = chrono::Utc::now().timestamp();
        let nonce: String = std::iter::repeat_with(fastrand::alphanumeric)
            .take(8)
            .collect();
        self.authorization_at(method, url, ts, &nonce)
    }

    fn authorization_at(
        &self,
        method: &Method,
        url: &Url,
        ts: i64,
        nonce: &str,
    ) -> Result<String, TaskclusterError> {
        let ext = self.ext()?;
        let artifacts = Artifacts::from_url(method, url, ts, nonce, ext.as_deref())?;
        let mac = artifacts.mac(self.access_token.expose_secret());

        let mut header = format!(
            "Hawk id=\"{}\", ts=\"{}\", nonce=\"{}\"",
            self.client_id, ts, nonce
        );
        if let Some(ext) = &ext {
            header.push_str(&format!(", ext=\"{}\"", ext));
        }
        header.push_str(&format!(", mac=\"{}\"", mac));
        Ok(header)
    }
}

/// Request properties covered by the MAC.
#[derive(Debug, Clone)]
pub struct Artifacts<'a> {
    pub ts: i64,
    pub nonce: &'a str,
    pub method: String,
    /// Path and query.
    pub resource: String,
    pub host: String,
    pub port: u16,
    pub ext: Option<&'a str>,
}

impl<'a> Artifacts<'a> {
    pub fn from_url(
        method: &Method,
        url: &Url,
        ts: i64,
        nonce: &'a str,
        ext: Option<&'a str>,
    ) -> Result<Self, TaskclusterError> {
        let host = url
            .host_str()
            .ok_or_else(|| TaskclusterError::InvalidUrl(format!("{} has no host", url)))?
            .to_ascii_lowercase();
        let port = url
            .port_or_known_default()
            .ok_or_else(|| TaskclusterError::InvalidUrl(format!("{} has no port", url)))?;
        let resource = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        Ok(Self {
            ts,
            nonce,
            method: method.as_str().to_ascii_uppercase(),
            resource,
            host,
            port,
            ext,
        })
    }

    /// Returns the normalized string the MAC is computed over.
    pub fn normalized(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}\n{}\n{}\n{}\n\n{}\n",
            HEADER_VERSION,
            self.ts,
            self.nonce,
            self.method,
            self.resource,
            self.host,
            self.port,
            self.ext.unwrap_or(""),
        )
    }

    /// Computes the base64 HMAC-SHA256 of the normalized string.
    pub fn mac(&self, key: &str) -> String {
        // HMAC accepts any key length
        let mut mac =
            HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
        mac.update(self.normalized().as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }
}
