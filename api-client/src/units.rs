use shared::{ApiError, NewUnit, Unit};

use crate::http::{Envelope, HttpClient};

/// REST client for the `/units` resource.
#[derive(Debug, Clone)]
pub struct UnitsClient {
    http: HttpClient,
}

impl UnitsClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self) -> Result<Vec<Unit>, ApiError> {
        let envelope: Envelope<Vec<Unit>> = self.http.get("/units", &[]).await?;
        Ok(envelope.data)
    }

    pub async fn get(&self, id: i64) -> Result<Unit, ApiError> {
        let envelope: Envelope<Unit> = self.http.get(&format!("/units/{id}"), &[]).await?;
        Ok(envelope.data)
    }

    pub async fn create(&self, draft: &NewUnit) -> Result<Unit, ApiError> {
        let envelope: Envelope<Unit> = self.http.post("/units", draft).await?;
        Ok(envelope.data)
    }

    pub async fn update(&self, id: i64, draft: &NewUnit) -> Result<Unit, ApiError> {
        let envelope: Envelope<Unit> = self.http.put(&format!("/units/{id}"), draft).await?;
        Ok(envelope.data)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/units/{id}")).await
    }
}
