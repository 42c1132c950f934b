//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{Notice, StatusView};

/// API response structure for control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub notices: Vec<Notice>,
    pub timestamp: DateTime<Utc>,
    pub view: StatusView,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, notices: Vec<Notice>, view: StatusView) -> Self {
        Self {
            status: status.to_string(),
            message,
            notices,
            timestamp: Utc::now(),
            view,
        }
    }

    /// Create an active response
    pub fn active(message: String, notices: Vec<Notice>, view: StatusView) -> Self {
        Self::new("active", message, notices, view)
    }

    /// Create an inactive response
    pub fn inactive(message: String, notices: Vec<Notice>, view: StatusView) -> Self {
        Self::new("inactive", message, notices, view)
    }

    /// Create an error response
    pub fn error(message: String, view: StatusView) -> Self {
        Self::new("error", message, Vec::new(), view)
    }

    /// Create a response asking the caller to confirm
    pub fn confirm(message: String, view: StatusView) -> Self {
        Self::new("confirm", message, Vec::new(), view)
    }
}

/// Body of POST /anti-sleep/start
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartRequest {
    pub interval_seconds: Option<u64>,
}

/// Body of POST /shutdown/schedule
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub hours: Option<u32>,
    pub minutes: Option<u32>,
}

/// Query of POST /close
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloseParams {
    #[serde(default)]
    pub confirm: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
