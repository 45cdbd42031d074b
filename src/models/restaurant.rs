use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::restaurants;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = restaurants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Derived rounded mean of active feedback, written only by the rating
    /// recompute. NULL until the first feedback lands.
    pub rating: Option<i32>,
    pub category_id: Option<Uuid>,
    pub user_id: Uuid,
    pub address_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = restaurants)]
pub struct NewRestaurant {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub user_id: Uuid,
    pub address_id: Option<Uuid>,
}

/// Caller-editable fields; `rating` is deliberately absent.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = restaurants)]
pub struct RestaurantChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub category_id: Option<Option<Uuid>>,
    pub address_id: Option<Option<Uuid>>,
}
