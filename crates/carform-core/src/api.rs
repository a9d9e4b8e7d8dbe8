//! REST client for the cars backend.

use crate::error::ApiError;
use crate::models::Car;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Error code the backend uses for a duplicate license plate number.
pub const CONFLICT_CODE: i64 = 2;

/// Envelope returned by every cars endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

/// Error details attached to an unsuccessful response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiResponse {
    /// A bare `{ "success": true }` response.
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    /// An unsuccessful response carrying `code`.
    pub fn failure(code: i64) -> Self {
        Self {
            success: false,
            error: Some(ApiErrorBody {
                code,
                message: None,
            }),
            payload: None,
        }
    }

    pub fn error_code(&self) -> Option<i64> {
        self.error.as_ref().map(|e| e.code)
    }

    pub fn is_conflict(&self) -> bool {
        !self.success && self.error_code() == Some(CONFLICT_CODE)
    }
}

/// Operations the car dialog and list need from the backend.
pub trait CarApi: Send + Sync {
    /// Fetch every car.
    fn list(&self) -> Result<Vec<Car>, ApiError>;

    /// `POST /cars`
    fn create(&self, car: &Car) -> Result<ApiResponse, ApiError>;

    /// `PUT /cars/{original_id}`
    fn update(&self, original_id: &str, car: &Car) -> Result<ApiResponse, ApiError>;
}

/// Blocking HTTP implementation of [`CarApi`].
pub struct HttpCarApi {
    client: reqwest::blocking::Client,
    base_url: Url,
}

impl HttpCarApi {
    /// Create a client for the backend rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|source| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::OpaqueBaseUrl(base_url.to_string()));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Build `<base>/cars[/<id>]`, encoding the id as a single path segment.
    fn cars_url(&self, id: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::OpaqueBaseUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push("cars");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn read_envelope(response: reqwest::blocking::Response) -> Result<ApiResponse, ApiError> {
        let status = response.status();
        let body = response.text()?;
        let envelope: ApiResponse = serde_json::from_str(&body)?;
        if !status.is_success() {
            tracing::debug!("Backend answered {} with envelope {:?}", status, envelope);
        }
        Ok(envelope)
    }
}

impl CarApi for HttpCarApi {
    fn list(&self) -> Result<Vec<Car>, ApiError> {
        let url = self.cars_url(None)?;
        tracing::info!("GET {}", url);
        let envelope = Self::read_envelope(self.client.get(url).send()?)?;
        if !envelope.success {
            return Err(ApiError::Rejected {
                code: envelope.error_code(),
            });
        }
        match envelope.payload {
            Some(payload) => Ok(serde_json::from_value(payload)?),
            None => Ok(Vec::new()),
        }
    }

    fn create(&self, car: &Car) -> Result<ApiResponse, ApiError> {
        let url = self.cars_url(None)?;
        tracing::info!("POST {} ({})", url, car.license_plate_number);
        Self::read_envelope(self.client.post(url).json(car).send()?)
    }

    fn update(&self, original_id: &str, car: &Car) -> Result<ApiResponse, ApiError> {
        let url = self.cars_url(Some(original_id))?;
        tracing::info!("PUT {} ({})", url, car.license_plate_number);
        Self::read_envelope(self.client.put(url).json(car).send()?)
    }
}
