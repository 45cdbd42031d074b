use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::order_journeys;

/// A waypoint in an order's delivery trail. Journeys are append-only: rows
/// are created and soft-deleted but never updated.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_journeys)]
#[diesel(belongs_to(crate::models::order::Order))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderJourney {
    pub id: Uuid,
    pub order_id: Uuid,
    pub content: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timeline: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_journeys)]
pub struct NewOrderJourney {
    pub id: Uuid,
    pub order_id: Uuid,
    pub content: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timeline: DateTime<Utc>,
}
