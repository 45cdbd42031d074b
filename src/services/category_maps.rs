//! Join rows tying products and restaurants to category tags. These are the
//! inputs of the intersection search.

use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::models::category_map::{
    CategoryProductMap, CategoryRestaurantMap, NewCategoryProductMap, NewCategoryRestaurantMap,
};
use crate::schema::{category_product_map, category_restaurant_map, products, restaurants};

use super::categories;

pub fn create_product_map(
    conn: &mut PgConnection,
    category_id: Uuid,
    product_id: Uuid,
) -> Result<CategoryProductMap, DomainError> {
    categories::ensure_active(conn, category_id)?;
    let product_present: bool = diesel::select(diesel::dsl::exists(
        products::table
            .filter(products::id.eq(product_id))
            .filter(products::is_active.eq(true)),
    ))
    .get_result(conn)?;
    if !product_present {
        return Err(DomainError::NotFound(format!("product {product_id} not found")));
    }

    let duplicate: bool = diesel::select(diesel::dsl::exists(
        category_product_map::table
            .filter(category_product_map::category_id.eq(category_id))
            .filter(category_product_map::product_id.eq(product_id))
            .filter(category_product_map::is_active.eq(true)),
    ))
    .get_result(conn)?;
    if duplicate {
        return Err(DomainError::InvalidInput(format!(
            "product {product_id} already carries category {category_id}"
        )));
    }

    diesel::insert_into(category_product_map::table)
        .values(&NewCategoryProductMap {
            id: Uuid::new_v4(),
            category_id,
            product_id,
        })
        .returning(CategoryProductMap::as_returning())
        .get_result(conn)
        .map_err(Into::into)
}

pub fn list_product_maps(conn: &mut PgConnection) -> Result<Vec<CategoryProductMap>, DomainError> {
    category_product_map::table
        .filter(category_product_map::is_active.eq(true))
        .select(CategoryProductMap::as_select())
        .order(category_product_map::created_at.desc())
        .load(conn)
        .map_err(Into::into)
}

pub fn soft_delete_product_map(conn: &mut PgConnection, id: Uuid) -> Result<(), DomainError> {
    let affected = diesel::update(
        category_product_map::table
            .filter(category_product_map::id.eq(id))
            .filter(category_product_map::is_active.eq(true)),
    )
    .set((
        category_product_map::is_active.eq(false),
        category_product_map::updated_at.eq(Utc::now()),
    ))
    .execute(conn)?;
    if affected == 0 {
        return Err(DomainError::NotFound(format!("category-product map {id} not found")));
    }
    Ok(())
}

pub fn create_restaurant_map(
    conn: &mut PgConnection,
    category_id: Uuid,
    restaurant_id: Uuid,
) -> Result<CategoryRestaurantMap, DomainError> {
    categories::ensure_active(conn, category_id)?;
    let restaurant_present: bool = diesel::select(diesel::dsl::exists(
        restaurants::table
            .filter(restaurants::id.eq(restaurant_id))
            .filter(restaurants::is_active.eq(true)),
    ))
    .get_result(conn)?;
    if !restaurant_present {
        return Err(DomainError::NotFound(format!(
            "restaurant {restaurant_id} not found"
        )));
    }

    let duplicate: bool = diesel::select(diesel::dsl::exists(
        category_restaurant_map::table
            .filter(category_restaurant_map::category_id.eq(category_id))
            .filter(category_restaurant_map::restaurant_id.eq(restaurant_id))
            .filter(category_restaurant_map::is_active.eq(true)),
    ))
    .get_result(conn)?;
    if duplicate {
        return Err(DomainError::InvalidInput(format!(
            "restaurant {restaurant_id} already carries category {category_id}"
        )));
    }

    diesel::insert_into(category_restaurant_map::table)
        .values(&NewCategoryRestaurantMap {
            id: Uuid::new_v4(),
            category_id,
            restaurant_id,
        })
        .returning(CategoryRestaurantMap::as_returning())
        .get_result(conn)
        .map_err(Into::into)
}

pub fn list_restaurant_maps(
    conn: &mut PgConnection,
) -> Result<Vec<CategoryRestaurantMap>, DomainError> {
    category_restaurant_map::table
        .filter(category_restaurant_map::is_active.eq(true))
        .select(CategoryRestaurantMap::as_select())
        .order(category_restaurant_map::created_at.desc())
        .load(conn)
        .map_err(Into::into)
}

pub fn soft_delete_restaurant_map(conn: &mut PgConnection, id: Uuid) -> Result<(), DomainError> {
    let affected = diesel::update(
        category_restaurant_map::table
            .filter(category_restaurant_map::id.eq(id))
            .filter(category_restaurant_map::is_active.eq(true)),
    )
    .set((
        category_restaurant_map::is_active.eq(false),
        category_restaurant_map::updated_at.eq(Utc::now()),
    ))
    .execute(conn)?;
    if affected == 0 {
        return Err(DomainError::NotFound(format!(
            "category-restaurant map {id} not found"
        )));
    }
    Ok(())
}
