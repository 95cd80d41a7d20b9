use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, admin_active_loans, check_loan_status, loan_history, my_books, rent_book,
};

/// Creates the API router with all loan endpoints
///
/// Command endpoints (Write operations):
/// - POST /loans/rent/:book_id - Rent a book as the authenticated caller
///
/// Query endpoints (Read operations):
/// - GET /loans/my-books - Caller's currently active loans
/// - GET /loans/history - Caller's loan history
/// - GET /loans/admin/active - All currently active loans
/// - GET /loans/check/:book_id - Whether the caller currently rents a book
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Command endpoints (Write operations)
        .route("/loans/rent/:book_id", post(rent_book))
        // Query endpoints (Read operations)
        .route("/loans/my-books", get(my_books))
        .route("/loans/history", get(loan_history))
        .route("/loans/admin/active", get(admin_active_loans))
        .route("/loans/check/:book_id", get(check_loan_status))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
