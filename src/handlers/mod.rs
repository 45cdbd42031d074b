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

use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;

// ── Shared query types ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct Pagination {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

pub(crate) fn default_page() -> i64 {
    1
}

pub(crate) fn default_limit() -> i64 {
    20
}

impl Pagination {
    pub fn clamped(&self) -> (i64, i64) {
        (self.page.max(1), self.limit.clamp(1, 100))
    }
}

/// Parse a comma-separated UUID list query parameter. Absent or blank means
/// "no filter"; a malformed id is a caller error.
pub fn parse_id_list(raw: Option<&str>) -> Result<Vec<Uuid>, AppError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Uuid::parse_str(s).map_err(|_| AppError::BadRequest(format!("invalid id '{s}'"))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_out_of_range_values() {
        let p = Pagination { page: 0, limit: 1000 };
        assert_eq!(p.clamped(), (1, 100));
    }

    #[test]
    fn id_list_parsing_handles_blanks_and_garbage() {
        assert!(parse_id_list(None).unwrap().is_empty());
        assert!(parse_id_list(Some("")).unwrap().is_empty());
        assert!(parse_id_list(Some(" , ,")).unwrap().is_empty());

        let id = Uuid::new_v4();
        let parsed = parse_id_list(Some(&format!(" {id} , {id}"))).unwrap();
        assert_eq!(parsed, vec![id, id]);

        assert!(parse_id_list(Some("not-a-uuid")).is_err());
    }
}
