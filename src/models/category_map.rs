use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{category_product_map, category_restaurant_map};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = category_product_map)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryProductMap {
    pub id: Uuid,
    pub category_id: Uuid,
    pub product_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = category_product_map)]
pub struct NewCategoryProductMap {
    pub id: Uuid,
    pub category_id: Uuid,
    pub product_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = category_restaurant_map)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRestaurantMap {
    pub id: Uuid,
    pub category_id: Uuid,
    pub restaurant_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = category_restaurant_map)]
pub struct NewCategoryRestaurantMap {
    pub id: Uuid,
    pub category_id: Uuid,
    pub restaurant_id: Uuid,
}
