use crate::error::UserClientError;
use crate::{ApiEnvelope, HealthCheck, User, UserApi, UserId, UserInput};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

#[derive(Clone)]
pub struct UserClientHttp {
    client: Client,
    base_url: String,
}

impl UserClientHttp {
    pub fn connect(endpoint: &str) -> Result<Self, UserClientError> {
        let base_url = endpoint.trim_end_matches('/').to_string();
        Ok(Self {
            client: Client::builder().build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        request: RequestBuilder,
    ) -> Result<ApiEnvelope<T>, UserClientError> {
        let resp = request.send().await?;
        let status = resp.status();
        debug!(status = status.as_u16(), url = %resp.url(), "response received");

        if !status.is_success() {
            return Err(UserClientError::from_http_response(resp).await);
        }

        let envelope: ApiEnvelope<T> = resp.json().await?;
        if envelope.success {
            Ok(envelope)
        } else {
            Err(UserClientError::Api {
                status: status.as_u16(),
                message: envelope.message.unwrap_or_default(),
            })
        }
    }

    async fn send_data<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, UserClientError> {
        Self::send::<T>(request)
            .await?
            .data
            .ok_or_else(|| UserClientError::InvalidResponse("missing data".into()))
    }

    async fn probe(&self, path: &str) -> Result<HealthCheck, UserClientError> {
        let resp = self.client.get(self.url(path)).send().await?;
        let http_status = resp.status().as_u16();
        let envelope: ApiEnvelope<serde_json::Value> = resp.json().await?;

        Ok(HealthCheck {
            healthy: envelope.success,
            http_status,
            message: envelope.message,
            details: envelope.data.unwrap_or(serde_json::Value::Null),
        })
    }
}

#[async_trait]
impl UserApi for UserClientHttp {
    async fn list_users(&self) -> Result<Vec<User>, UserClientError> {
        Self::send_data(self.client.get(self.url("/api/users"))).await
    }

    async fn get_user(&self, id: UserId) -> Result<User, UserClientError> {
        Self::send_data(self.client.get(self.url(&format!("/api/users/{}", id)))).await
    }

    async fn create_user(&self, input: &UserInput) -> Result<User, UserClientError> {
        Self::send_data(self.client.post(self.url("/api/users")).json(input)).await
    }

    async fn update_user(&self, id: UserId, input: &UserInput) -> Result<User, UserClientError> {
        let request = self
            .client
            .put(self.url(&format!("/api/users/{}", id)))
            .json(input);
        Self::send_data(request).await
    }

    async fn delete_user(&self, id: UserId) -> Result<(), UserClientError> {
        let request = self.client.delete(self.url(&format!("/api/users/{}", id)));
        Self::send::<serde_json::Value>(request).await.map(|_| ())
    }

    async fn health(&self) -> Result<HealthCheck, UserClientError> {
        self.probe("/api/health").await
    }

    async fn liveness(&self) -> Result<HealthCheck, UserClientError> {
        self.probe("/api/health/live").await
    }

    async fn readiness(&self) -> Result<HealthCheck, UserClientError> {
        self.probe("/api/health/ready").await
    }
}
