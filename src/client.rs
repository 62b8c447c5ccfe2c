//! HTTP client for the catalog API.
//!
//! Every call is a single request with no retries. Failures come back as
//! [ClientError], which keeps the server's message when there is one.

use crate::api::{ErrorBody, HealthStatus, PLANTS_PATH};
use crate::models::{Category, Plant};
use crate::query::PlantQuery;
use crate::schema::{FieldError, PlantInput};
use reqwest::{RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};

/// Shown when the API could not be reached at all.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Failed to reach the plant store API";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The API answered with a failure status.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        errors: Vec<FieldError>,
    },
    #[error("Failed to reach the plant store API: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }

    /// Text to put in front of a user: the server's message, or a generic
    /// one with the cause and a retry hint when the request never got an answer.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, errors, .. } if !errors.is_empty() => {
                let details: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                format!("{message} ({})", details.join("; "))
            }
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Transport(e) => format!(
                "{TRANSPORT_FAILURE_MESSAGE}: {e}. Check that the server is running and retry."
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    count: Option<usize>,
    #[serde(default)]
    message: Option<String>,
    data: T,
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    message: String,
}

/// Result of a listing: the matching plants and the count the server reported.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantList {
    pub count: usize,
    pub plants: Vec<Plant>,
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    url: String,
    client: reqwest::Client,
}

impl CatalogClient {
    /// `url` is the server root, e.g. `http://localhost:5000`.
    pub fn new(url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(url, client))
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        let url = url.into().trim_end_matches('/').to_string();
        CatalogClient { url, client }
    }

    fn plants_url(&self, suffix: &str) -> String {
        format!("{}{}{}", self.url, PLANTS_PATH, suffix)
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn list_plants(&self, query: &PlantQuery) -> Result<PlantList, ClientError> {
        let request = self.client.get(self.plants_url("")).query(query);
        let envelope: Envelope<Vec<Plant>> = send(request).await?;
        Ok(PlantList {
            count: envelope.count.unwrap_or(envelope.data.len()),
            plants: envelope.data,
        })
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn get_plant(&self, id: &str) -> Result<Plant, ClientError> {
        let request = self.client.get(self.plants_url(&format!("/{id}")));
        let envelope: Envelope<Plant> = send(request).await?;
        Ok(envelope.data)
    }

    #[tracing::instrument(skip(self, input), err)]
    pub async fn create_plant(&self, input: &PlantInput) -> Result<Plant, ClientError> {
        let request = self.client.post(self.plants_url("")).json(input);
        let envelope: Envelope<Plant> = send(request).await?;
        tracing::debug!(message = ?envelope.message, "plant created");
        Ok(envelope.data)
    }

    #[tracing::instrument(skip(self, input), err)]
    pub async fn update_plant(&self, id: &str, input: &PlantInput) -> Result<Plant, ClientError> {
        let request = self
            .client
            .put(self.plants_url(&format!("/{id}")))
            .json(input);
        let envelope: Envelope<Plant> = send(request).await?;
        Ok(envelope.data)
    }

    /// Returns the server's confirmation message.
    #[tracing::instrument(skip(self), err)]
    pub async fn delete_plant(&self, id: &str) -> Result<String, ClientError> {
        let request = self.client.delete(self.plants_url(&format!("/{id}")));
        let envelope: MessageEnvelope = send(request).await?;
        Ok(envelope.message)
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        let request = self.client.get(self.plants_url("/categories/all"));
        let envelope: Envelope<Vec<Category>> = send(request).await?;
        Ok(envelope.data)
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let request = self.client.get(format!("{}/health", self.url));
        send(request).await
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await?;
    tracing::debug!(status = %status, body = %body, "unexpected response from plant store API");

    Err(match serde_json::from_str::<ErrorBody>(&body) {
        Ok(error) => ClientError::Api {
            status: status.as_u16(),
            message: error.message,
            errors: error.errors.unwrap_or_default(),
        },
        Err(_) => ClientError::Api {
            status: status.as_u16(),
            message: format!("HTTP {status}"),
            errors: Vec::new(),
        },
    })
}
