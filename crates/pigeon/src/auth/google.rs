//! Google OAuth authorization-code capture
//!
//! Implements the authorization-code leg of the Google sign-in flow: a local
//! HTTP server receives the OAuth callback, and the captured code is handed
//! to the backend for the actual token exchange. The client secret never
//! lives on the device.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;

use anyhow::{Context, Result};

/// Captured authorization code plus the redirect URI it was issued for.
///
/// The backend needs both for the code exchange.
#[derive(Debug, Clone)]
pub struct AuthorizationCode {
    pub code: String,
    pub redirect_uri: String,
}

/// Google OAuth flow configuration
pub struct GoogleAuthFlow {
    client_id: String,
}

impl GoogleAuthFlow {
    /// Google OAuth2 authorization endpoint
    const AUTH_URL: &'static str = "https://accounts.google.com/o/oauth2/v2/auth";

    /// Scopes needed for backend identity verification
    const SCOPE: &'static str = "openid email profile";

    /// Port range to try for the local callback server
    const PORT_RANGE_START: u16 = 8080;
    const PORT_RANGE_END: u16 = 8090;

    pub fn new(client_id: String) -> Self {
        Self { client_id }
    }

    /// Run the browser leg of the flow and capture the authorization code.
    ///
    /// Opens the system browser at the consent URL and blocks until the
    /// local callback server receives the redirect.
    pub fn obtain_authorization_code(&self) -> Result<AuthorizationCode> {
        let (listener, port) = Self::start_local_server()?;
        let redirect_uri = format!("http://localhost:{}", port);

        let auth_url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}",
            Self::AUTH_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&redirect_uri),
            urlencoding::encode(Self::SCOPE),
        );

        if let Err(e) = open::that(&auth_url) {
            log::warn!("Failed to open browser for Google sign-in: {}", e);
        }

        let code = Self::wait_for_callback(listener)?;
        Ok(AuthorizationCode { code, redirect_uri })
    }

    /// Bind the callback server to the first free port in the range
    fn start_local_server() -> Result<(TcpListener, u16)> {
        for port in Self::PORT_RANGE_START..=Self::PORT_RANGE_END {
            if let Ok(listener) = TcpListener::bind(format!("127.0.0.1:{}", port)) {
                return Ok((listener, port));
            }
        }
        anyhow::bail!(
            "Could not bind to any port in range {}-{}",
            Self::PORT_RANGE_START,
            Self::PORT_RANGE_END
        )
    }

    /// Accept one connection and extract the authorization code from the
    /// request line ("GET /?code=...&scope=... HTTP/1.1")
    fn wait_for_callback(listener: TcpListener) -> Result<String> {
        let (mut stream, _) = listener.accept().context("Failed to accept connection")?;

        let mut reader = BufReader::new(&stream);
        let mut request_line = String::new();
        reader
            .read_line(&mut request_line)
            .context("Failed to read request")?;

        let code = query_param(&request_line, "code");
        let error = query_param(&request_line, "error");

        let (status, body) = if code.is_some() {
            ("200 OK", "Sign-in complete. You can close this window.")
        } else {
            ("400 Bad Request", "Sign-in failed. Please try again.")
        };
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n<html><body><h1>{}</h1></body></html>",
            status, body
        );
        stream.write_all(response.as_bytes()).ok();

        if let Some(err) = error {
            anyhow::bail!("OAuth error: {}", err);
        }

        code.context("No authorization code received")
    }
}

/// Extract a query parameter from an HTTP request line
fn query_param(request_line: &str, name: &str) -> Option<String> {
    let path = request_line.split_whitespace().nth(1)?;
    let query = path.split('?').nth(1)?;
    query.split('&').find_map(|param| {
        let (key, value) = param.split_once('=')?;
        (key == name && !value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_extracts_code() {
        let line = "GET /?code=abc123&scope=openid HTTP/1.1";
        assert_eq!(query_param(line, "code"), Some("abc123".to_string()));
        assert_eq!(query_param(line, "scope"), Some("openid".to_string()));
    }

    #[test]
    fn test_query_param_missing() {
        let line = "GET /?error=access_denied HTTP/1.1";
        assert_eq!(query_param(line, "code"), None);
        assert_eq!(query_param(line, "error"), Some("access_denied".to_string()));
    }

    #[test]
    fn test_query_param_no_query_string() {
        assert_eq!(query_param("GET / HTTP/1.1", "code"), None);
    }

    #[test]
    fn test_query_param_empty_value() {
        assert_eq!(query_param("GET /?code= HTTP/1.1", "code"), None);
    }
}
