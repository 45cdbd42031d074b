pub mod categories;
pub mod category_maps;
pub mod dashboard;
pub mod feedbacks;
pub mod order_journeys;
pub mod orders;
pub mod products;
pub mod restaurants;
pub mod revenue;
pub mod users;

use crate::domain::errors::DomainError;

// ── Error conversions (persistence concern only) ─────────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}
