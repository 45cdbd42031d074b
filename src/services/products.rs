use std::collections::{HashMap, HashSet};

use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::models::product::{NewProduct, Product, ProductChanges};
use crate::schema::{category_product_map, products, restaurants};

use super::Page;

#[derive(Debug)]
pub struct CreateProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub restaurant_id: Uuid,
}

pub fn create(conn: &mut PgConnection, input: CreateProduct) -> Result<Product, DomainError> {
    if input.name.trim().is_empty() {
        return Err(DomainError::InvalidInput("name must not be empty".into()));
    }
    if input.price < BigDecimal::from(0) {
        return Err(DomainError::InvalidInput("price must not be negative".into()));
    }
    let restaurant_present: bool = diesel::select(diesel::dsl::exists(
        restaurants::table
            .filter(restaurants::id.eq(input.restaurant_id))
            .filter(restaurants::is_active.eq(true)),
    ))
    .get_result(conn)?;
    if !restaurant_present {
        return Err(DomainError::NotFound(format!(
            "restaurant {} not found",
            input.restaurant_id
        )));
    }

    diesel::insert_into(products::table)
        .values(&NewProduct {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            price: input.price,
            restaurant_id: input.restaurant_id,
        })
        .returning(Product::as_returning())
        .get_result(conn)
        .map_err(Into::into)
}

pub fn list(conn: &mut PgConnection, page: i64, limit: i64) -> Result<Page<Product>, DomainError> {
    let offset = (page - 1) * limit;
    let total: i64 = products::table
        .filter(products::is_active.eq(true))
        .count()
        .get_result(conn)?;
    let items = products::table
        .filter(products::is_active.eq(true))
        .select(Product::as_select())
        .order(products::created_at.desc())
        .limit(limit)
        .offset(offset)
        .load(conn)?;
    Ok(Page { items, total })
}

/// Name substring plus all-of category filter, same superset policy as the
/// restaurant search but applied to the products themselves.
pub fn search(
    conn: &mut PgConnection,
    name: Option<&str>,
    category_ids: &[Uuid],
) -> Result<Vec<Product>, DomainError> {
    let restricted: Option<Vec<Uuid>> = if category_ids.is_empty() {
        None
    } else {
        let wanted: HashSet<Uuid> = category_ids.iter().copied().collect();
        let rows: Vec<(Uuid, Uuid)> = category_product_map::table
            .filter(category_product_map::category_id.eq_any(category_ids))
            .filter(category_product_map::is_active.eq(true))
            .select((
                category_product_map::product_id,
                category_product_map::category_id,
            ))
            .load(conn)?;
        let mut per_product: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
        for (product_id, category_id) in rows {
            per_product.entry(product_id).or_default().insert(category_id);
        }
        let qualifying: Vec<Uuid> = per_product
            .into_iter()
            .filter(|(_, carried)| wanted.is_subset(carried))
            .map(|(product_id, _)| product_id)
            .collect();
        if qualifying.is_empty() {
            return Ok(Vec::new());
        }
        Some(qualifying)
    };

    let mut query = products::table
        .filter(products::is_active.eq(true))
        .into_boxed();
    if let Some(ids) = &restricted {
        query = query.filter(products::id.eq_any(ids));
    }
    if let Some(name) = name {
        if !name.is_empty() {
            query = query.filter(products::name.ilike(format!("%{name}%")));
        }
    }
    query
        .select(Product::as_select())
        .order(products::created_at.desc())
        .load(conn)
        .map_err(Into::into)
}

pub fn get(conn: &mut PgConnection, id: Uuid) -> Result<Product, DomainError> {
    products::table
        .filter(products::id.eq(id))
        .filter(products::is_active.eq(true))
        .select(Product::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| DomainError::NotFound(format!("product {id} not found")))
}

pub fn update(
    conn: &mut PgConnection,
    id: Uuid,
    changes: ProductChanges,
) -> Result<Product, DomainError> {
    if let Some(name) = &changes.name {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidInput("name must not be empty".into()));
        }
    }
    if let Some(price) = &changes.price {
        if *price < BigDecimal::from(0) {
            return Err(DomainError::InvalidInput("price must not be negative".into()));
        }
    }

    diesel::update(
        products::table
            .filter(products::id.eq(id))
            .filter(products::is_active.eq(true)),
    )
    .set((&changes, products::updated_at.eq(Utc::now())))
    .returning(Product::as_returning())
    .get_result(conn)
    .optional()?
    .ok_or_else(|| DomainError::NotFound(format!("product {id} not found")))
}

pub fn soft_delete(conn: &mut PgConnection, id: Uuid) -> Result<(), DomainError> {
    let affected = diesel::update(
        products::table
            .filter(products::id.eq(id))
            .filter(products::is_active.eq(true)),
    )
    .set((products::is_active.eq(false), products::updated_at.eq(Utc::now())))
    .execute(conn)?;
    if affected == 0 {
        return Err(DomainError::NotFound(format!("product {id} not found")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::category_maps;
    use crate::test_support::{seed_category, seed_product, seed_restaurant, seed_user, setup_db};

    #[tokio::test]
    async fn search_requires_every_requested_category() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("connection");

        let owner = seed_user(&mut conn);
        let restaurant = seed_restaurant(&mut conn, owner.id, "Bistro");
        let cat_a = seed_category(&mut conn, "spicy");
        let cat_b = seed_category(&mut conn, "noodles");

        let p1 = seed_product(&mut conn, restaurant.id, "Dan dan noodles");
        let p2 = seed_product(&mut conn, restaurant.id, "Mapo tofu");
        category_maps::create_product_map(&mut conn, cat_a.id, p1.id).expect("map");
        category_maps::create_product_map(&mut conn, cat_b.id, p1.id).expect("map");
        category_maps::create_product_map(&mut conn, cat_a.id, p2.id).expect("map");

        let hits = search(&mut conn, None, &[cat_a.id, cat_b.id]).expect("search");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, p1.id);

        // A single category matches both.
        let hits = search(&mut conn, None, &[cat_a.id]).expect("search");
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn soft_deleted_products_drop_out_of_search() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("connection");

        let owner = seed_user(&mut conn);
        let restaurant = seed_restaurant(&mut conn, owner.id, "Bistro");
        let product = seed_product(&mut conn, restaurant.id, "Tonkotsu ramen");
        soft_delete(&mut conn, product.id).expect("delete");

        let hits = search(&mut conn, Some("ramen"), &[]).expect("search");
        assert!(hits.is_empty());
    }
}
