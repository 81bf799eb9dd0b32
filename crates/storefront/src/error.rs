//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Error bodies are JSON: `{"error": "<kind>", "message": "<notification>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::cart::{CartError, CartErrorKind, CartOperation};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// A cart operation failed; the cart is unchanged.
    #[error("Cart {operation:?} failed: {source}")]
    Cart {
        operation: CartOperation,
        #[source]
        source: CartError,
    },
}

impl AppError {
    /// Wrap a cart failure together with the operation it came from.
    #[must_use]
    pub const fn cart(operation: CartOperation, source: CartError) -> Self {
        Self::Cart { operation, source }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Cart { source, .. } => match source.kind() {
                CartErrorKind::StockExceeded => StatusCode::CONFLICT,
                CartErrorKind::NotFound => StatusCode::NOT_FOUND,
                CartErrorKind::RemoteFailure => StatusCode::BAD_GATEWAY,
                CartErrorKind::StorageFailure | CartErrorKind::InternalFailure => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    const fn is_server_error(&self) -> bool {
        match self {
            Self::Cart { source, .. } => !matches!(
                source.kind(),
                CartErrorKind::StockExceeded | CartErrorKind::NotFound
            ),
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Only the shopper notification leaves the server
        let body = match &self {
            Self::Cart { operation, source } => ErrorBody {
                error: match source.kind() {
                    CartErrorKind::StockExceeded => "stock_exceeded",
                    CartErrorKind::NotFound => "not_found",
                    CartErrorKind::RemoteFailure => "remote_failure",
                    CartErrorKind::StorageFailure => "storage_failure",
                    CartErrorKind::InternalFailure => "internal",
                },
                message: source.notification(*operation).to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use rocket_shoes_core::{DuplicateItemError, ProductId};

    use super::*;
    use crate::catalog::CatalogError;
    use crate::storage::StorageError;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::cart(CartOperation::Remove, CartError::NotFound(ProductId::new(3)));
        assert_eq!(
            err.to_string(),
            "Cart Remove failed: Product 3 is not in the cart"
        );
    }

    #[test]
    fn test_cart_error_status_codes() {
        assert_eq!(
            get_status(AppError::cart(
                CartOperation::Add,
                CartError::StockExceeded {
                    product_id: ProductId::new(1),
                    requested: 2,
                    available: 1,
                }
            )),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::cart(
                CartOperation::Remove,
                CartError::NotFound(ProductId::new(1))
            )),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::cart(
                CartOperation::Add,
                CartError::Remote(CatalogError::RateLimited(3))
            )),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_server_failures_are_internal_errors() {
        let storage = AppError::cart(
            CartOperation::Remove,
            CartError::Storage(StorageError::Io(std::io::Error::other("disk full"))),
        );
        assert_eq!(get_status(storage), StatusCode::INTERNAL_SERVER_ERROR);

        let inconsistent = AppError::cart(
            CartOperation::Add,
            CartError::Inconsistent(DuplicateItemError(ProductId::new(1))),
        );
        assert_eq!(get_status(inconsistent), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
