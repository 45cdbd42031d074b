use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::orders;

/// Order lifecycle codes. Stored as a plain integer column; 4 means the
/// order is completed and paid, which is what revenue sums key on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending = 1,
    Accepted = 2,
    Delivering = 3,
    Completed = 4,
    Cancelled = 5,
}

impl OrderStatus {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(OrderStatus::Pending),
            2 => Some(OrderStatus::Accepted),
            3 => Some(OrderStatus::Delivering),
            4 => Some(OrderStatus::Completed),
            5 => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Order {
    pub id: Uuid,
    pub total_price: BigDecimal,
    pub status: i32,
    pub shipping_fee: BigDecimal,
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub address_id: Option<Uuid>,
    pub discount_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrder {
    pub id: Uuid,
    pub total_price: BigDecimal,
    pub status: i32,
    pub shipping_fee: BigDecimal,
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub address_id: Option<Uuid>,
    pub discount_id: Option<Uuid>,
}

#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = orders)]
pub struct OrderChanges {
    pub total_price: Option<BigDecimal>,
    pub status: Option<i32>,
    pub shipping_fee: Option<BigDecimal>,
    pub address_id: Option<Option<Uuid>>,
    pub discount_id: Option<Option<Uuid>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_round_trip() {
        for code in 1..=5 {
            let status = OrderStatus::from_code(code).unwrap();
            assert_eq!(status.code(), code);
        }
    }

    #[test]
    fn unknown_status_code_is_rejected() {
        assert!(OrderStatus::from_code(0).is_none());
        assert!(OrderStatus::from_code(6).is_none());
    }

    #[test]
    fn completed_is_code_four() {
        assert_eq!(OrderStatus::Completed.code(), 4);
    }
}
