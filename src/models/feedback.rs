use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::feedbacks;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = feedbacks)]
#[diesel(belongs_to(crate::models::order::Order))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Feedback {
    pub id: Uuid,
    /// Normalized at the write edge: 1..=5, or 0 for unusable input.
    pub rating: i32,
    pub content: Option<String>,
    pub order_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = feedbacks)]
pub struct NewFeedback {
    pub id: Uuid,
    pub rating: i32,
    pub content: Option<String>,
    pub order_id: Uuid,
}

#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = feedbacks)]
pub struct FeedbackChanges {
    pub rating: Option<i32>,
    pub content: Option<Option<String>>,
}
