//! HTTP Basic authentication for protected forward rules.

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// Credentials guarding one forward rule.
///
/// The realm, user and pass are forwarded verbatim into the challenge; on
/// failure the challenge owns the response and the forward step never runs.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub realm: String,
    pub user: String,
    pub pass: String,
}

impl Credentials {
    pub fn new(
        realm: impl Into<String>,
        user: impl Into<String>,
        pass: impl Into<String>,
    ) -> Self {
        Self {
            realm: realm.into(),
            user: user.into(),
            pass: pass.into(),
        }
    }

    /// Check the Authorization header. On failure the 401 challenge
    /// response is returned for the caller to send.
    pub fn check(&self, headers: &HeaderMap) -> Result<(), Response> {
        match self.verify(headers) {
            Some(()) => Ok(()),
            None => Err(self.challenge()),
        }
    }

    fn verify(&self, headers: &HeaderMap) -> Option<()> {
        let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        let encoded = value.strip_prefix("Basic ")?;
        let decoded = BASE64.decode(encoded.trim()).ok()?;
        let text = String::from_utf8(decoded).ok()?;
        let (user, pass) = text.split_once(':')?;
        (user == self.user && pass == self.pass).then_some(())
    }

    fn challenge(&self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            [(
                header::WWW_AUTHENTICATE,
                format!("Basic realm=\"{}\"", self.realm),
            )],
            "Unauthorized",
        )
            .into_response()
    }
}
