//! HTTP client with the shared request interceptor.
//!
//! Every backend call goes through [`ApiClient::execute`]. It attaches the
//! stored bearer token, classifies the response and turns failures into an
//! [`ApiError`]. An authorisation failure also clears the stored session so
//! the next protected view sends the user back to the login screen.

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, error, warn};

use crate::{errors::ApiError, session::SessionStore};

/// Backend client for one base URL.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: &str, session: Arc<dyn SessionStore>) -> Self {
        Self::with_client(Client::new(), base_url, session)
    }

    /// Share one connection pool between clients of different services.
    #[must_use]
    pub fn with_client(http: Client, base_url: &str, session: Arc<dyn SessionStore>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The session store requests are authorised from.
    #[must_use]
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    #[must_use]
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    /// `GET` and decode.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_json(self.request(Method::GET, path)).await
    }

    /// `POST` a JSON body and decode.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send_json(self.request(Method::POST, path).json(body))
            .await
    }

    /// `PUT` a JSON body and decode.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send_json(self.request(Method::PUT, path).json(body))
            .await
    }

    /// `DELETE` and decode.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_json(self.request(Method::DELETE, path)).await
    }

    /// Send and decode a JSON answer. An empty body decodes as `null`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; also fails with [`ApiError::Decode`].
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.execute(request).await?;

        decode_body(&body)
    }

    /// Send and return the raw answer, for endpoints that reply in plain text.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn send_text(&self, request: RequestBuilder) -> Result<String, ApiError> {
        self.execute(request).await
    }

    /// The interceptor.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] when no response arrives.
    /// - [`ApiError::Unauthorized`] on 401 or 403; the session is cleared.
    /// - [`ApiError::Rejected`] on any other non-success status.
    pub async fn execute(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let request = match self.session.load() {
            Ok(Some(session)) if !session.token.is_empty() => {
                request.bearer_auth(session.token.expose())
            }
            Ok(_) => request,
            Err(source) => {
                warn!("could not read stored session: {source}");

                request
            }
        };

        let response = request.send().await.map_err(|source| {
            error!("request failed: {source}");

            ApiError::Transport(source)
        })?;

        let status = response.status();
        let url = response.url().clone();

        let body = response.text().await.map_err(|source| {
            error!(%url, "failed to read response body: {source}");

            ApiError::Transport(source)
        })?;

        debug!(%url, status = status.as_u16(), "response received");

        match classify(status) {
            Outcome::Success => Ok(body),
            Outcome::Unauthorized => {
                warn!(%url, status = status.as_u16(), "authorisation failed, clearing session");

                if let Err(source) = self.session.clear() {
                    error!("failed to clear session: {source}");
                }

                Err(ApiError::Unauthorized)
            }
            Outcome::Rejected => {
                let message = extract_message(&body);

                warn!(%url, status = status.as_u16(), message = message.as_deref(), "request rejected");

                Err(ApiError::Rejected {
                    status: Some(status.as_u16()),
                    message,
                })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    Unauthorized,
    Rejected,
}

fn classify(status: StatusCode) -> Outcome {
    if status.is_success() {
        Outcome::Success
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Outcome::Unauthorized
    } else {
        Outcome::Rejected
    }
}

/// Human-readable message from an error body.
///
/// JSON bodies carry it in `message`. Other JSON fields, such as the
/// framework's `error` reason phrase, are not meant for users. A plain-text
/// body is the message unless it is an HTML error page.
#[must_use]
pub fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();

    if body.is_empty() || body.starts_with('<') {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(fields)) => fields
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string),
        Ok(serde_json::Value::String(message)) => {
            Some(message).filter(|message| !message.trim().is_empty())
        }
        Ok(_) => None,
        Err(_) => Some(body.to_string()),
    }
}

fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let body = body.trim();
    let body = if body.is_empty() { "null" } else { body };

    serde_json::from_str(body).map_err(|source| {
        error!("failed to decode response body: {source}");

        ApiError::Decode(source)
    })
}

/// Mutation answer: `{success, message, data}`.
///
/// The payload has been seen under `data`, `cart` and `order`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    #[serde(alias = "cart", alias = "order")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// The payload, which may legitimately be absent.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] with the server's message when
    /// `success` is false.
    pub fn into_result(self) -> Result<Option<T>, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected {
                status: None,
                message: self.message,
            });
        }

        Ok(self.data)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::{errors::Notice, session::MemorySessionStore};

    #[test]
    fn message_from_json_body() {
        assert_eq!(
            extract_message(r#"{"success": false, "message": "Restaurant is closed"}"#).as_deref(),
            Some("Restaurant is closed")
        );
        assert_eq!(
            extract_message(r#"{"error": "Bad Request", "status": 400}"#),
            None
        );
    }

    #[test]
    fn framework_error_bodies_fall_back_to_the_generic_notice() {
        let body = r#"{"timestamp": "2024-05-01T10:00:00", "status": 500, "error": "Internal Server Error", "path": "/customer/cart/items/3"}"#;
        let error = ApiError::Rejected {
            status: Some(500),
            message: extract_message(body),
        };

        assert_eq!(
            Notice::for_mutation(&error, "Failed to update cart item"),
            Notice::Alert("Failed to update cart item".to_string())
        );
    }

    #[test]
    fn html_error_pages_are_not_messages() {
        let page = "<html><body><h1>Whitelabel Error Page</h1><p>There was an unexpected error (type=Internal Server Error, status=500).</p></body></html>";

        assert_eq!(extract_message(page), None);
        assert_eq!(extract_message("<!DOCTYPE html><html></html>"), None);
    }

    #[test]
    fn message_from_plain_text_body() {
        assert_eq!(
            extract_message("Order not found or already accepted.").as_deref(),
            Some("Order not found or already accepted.")
        );
    }

    #[test]
    fn no_message_from_empty_or_structured_bodies() {
        assert_eq!(extract_message("   "), None);
        assert_eq!(extract_message(r#"{"message": ""}"#), None);
        assert_eq!(extract_message("[1, 2]"), None);
    }

    #[test]
    fn classifies_statuses() {
        assert_eq!(classify(StatusCode::OK), Outcome::Success);
        assert_eq!(classify(StatusCode::NO_CONTENT), Outcome::Success);
        assert_eq!(classify(StatusCode::UNAUTHORIZED), Outcome::Unauthorized);
        assert_eq!(classify(StatusCode::FORBIDDEN), Outcome::Unauthorized);
        assert_eq!(classify(StatusCode::BAD_REQUEST), Outcome::Rejected);
        assert_eq!(classify(StatusCode::INTERNAL_SERVER_ERROR), Outcome::Rejected);
    }

    #[test]
    fn urls_join_without_double_slashes() {
        let client = ApiClient::new("http://localhost:9090/", Arc::new(MemorySessionStore::new()));

        assert_eq!(client.url("/customer/cart"), "http://localhost:9090/customer/cart");
        assert_eq!(client.url("login"), "http://localhost:9090/login");
    }

    #[test]
    fn empty_body_decodes_as_absent() -> TestResult {
        let decoded: Option<u32> = decode_body("")?;

        assert_eq!(decoded, None);

        Ok(())
    }

    #[test]
    fn failed_envelope_carries_server_message() -> TestResult {
        let envelope: Envelope<u32> =
            serde_json::from_str(r#"{"success": false, "message": "Minimum order not met"}"#)?;

        let Err(error) = envelope.into_result() else {
            return Err("expected a rejection".into());
        };

        assert_eq!(error.server_message(), Some("Minimum order not met"));

        Ok(())
    }

    #[test]
    fn envelope_payload_aliases() -> TestResult {
        for body in [
            r#"{"success": true, "data": 7}"#,
            r#"{"success": true, "cart": 7}"#,
            r#"{"success": true, "order": 7}"#,
        ] {
            let envelope: Envelope<u32> = serde_json::from_str(body)?;

            assert_eq!(envelope.into_result()?, Some(7));
        }

        Ok(())
    }
}
