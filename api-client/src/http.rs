use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::ApiError;
use tracing::error;

/// Response envelope used by the single-resource endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Thin wrapper around `reqwest` that owns the API origin, merges the default
/// JSON headers, and normalizes failures into `ApiError`.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let request = self.client.get(self.endpoint(path)).query(params);
        self.send_json(path, request).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.client.post(self.endpoint(path)).json(body);
        self.send_json(path, request).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.client.put(self.endpoint(path)).json(body);
        self.send_json(path, request).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.client.patch(self.endpoint(path)).json(body);
        self.send_json(path, request).await
    }

    /// DELETE sends no body and ignores any response payload.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.client.delete(self.endpoint(path));
        let response = self.send(path, request).await?;
        drop(response);
        Ok(())
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(path, request).await?;
        response.json::<T>().await.map_err(|e| {
            error!(path, "failed to decode API response: {}", e);
            ApiError::Network(format!("invalid response body: {e}"))
        })
    }

    async fn send(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                error!(path, "API request failed: {}", e);
                ApiError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            // The server may carry a human message in a JSON body; fall back
            // to a generic status line when it does not.
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("HTTP error: {}", status.as_u16()));
            error!(path, status = status.as_u16(), "API request failed: {}", message);
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_and_path() {
        let client = HttpClient::new("http://localhost:3000/api");
        assert_eq!(
            client.endpoint("/products/3/stock"),
            "http://localhost:3000/api/products/3/stock"
        );
    }

    #[test]
    fn error_body_message_is_optional() {
        let body: ErrorBody = serde_json::from_str("{\"message\":\"Product not found\"}").unwrap();
        assert_eq!(body.message.as_deref(), Some("Product not found"));
        let empty: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(empty.message.is_none());
    }
}
