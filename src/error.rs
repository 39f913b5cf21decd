//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Pricing(err) => match err {
                PricingError::ItemNotFound { .. } => StatusCode::NOT_FOUND,
                PricingError::RateUnavailable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                PricingError::InvalidRentalDays { .. } => StatusCode::BAD_REQUEST,
                PricingError::NonNumericMultiplier { .. } | PricingError::NonNumericCost { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::Pricing(err) => err.kind(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (message, details) = match &self {
            AppError::Pricing(PricingError::RateUnavailable {
                sku,
                usage_type,
                rental_days,
                message,
            }) => (
                message.clone(),
                Some(json!({"sku": sku, "usage_type": usage_type, "rental_days": rental_days})),
            ),
            AppError::Pricing(PricingError::ItemNotFound { sku }) => {
                (self.to_string(), Some(json!({"sku": sku})))
            }
            // Corrupt data is logged in full but not echoed to the client
            AppError::Pricing(
                PricingError::NonNumericMultiplier { .. } | PricingError::NonNumericCost { .. },
            ) => ("Pricing data error".to_string(), None),
            _ => (self.to_string(), None),
        };

        let body = PricingErrorResponse {
            error_type: self.error_type().to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
