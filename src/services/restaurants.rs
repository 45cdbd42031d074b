use std::collections::{HashMap, HashSet};

use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::models::restaurant::{NewRestaurant, Restaurant, RestaurantChanges};
use crate::schema::{category_product_map, category_restaurant_map, products, restaurants, users};

use super::categories;

#[derive(Debug)]
pub struct CreateRestaurant {
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub user_id: Uuid,
    pub address_id: Option<Uuid>,
}

/// Search filters. Multiple category ids must ALL be satisfied
/// (intersection); an empty list means no restriction on that dimension.
#[derive(Debug, Default)]
pub struct RestaurantSearch {
    pub name: Option<String>,
    pub product_category_ids: Vec<Uuid>,
    pub restaurant_category_ids: Vec<Uuid>,
}

pub fn create(conn: &mut PgConnection, input: CreateRestaurant) -> Result<Restaurant, DomainError> {
    if input.name.trim().is_empty() {
        return Err(DomainError::InvalidInput("name must not be empty".into()));
    }
    let owner_present: bool = diesel::select(diesel::dsl::exists(
        users::table
            .filter(users::id.eq(input.user_id))
            .filter(users::is_active.eq(true)),
    ))
    .get_result(conn)?;
    if !owner_present {
        return Err(DomainError::NotFound(format!("user {} not found", input.user_id)));
    }
    if let Some(category_id) = input.category_id {
        categories::ensure_active(conn, category_id)?;
    }

    diesel::insert_into(restaurants::table)
        .values(&NewRestaurant {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            category_id: input.category_id,
            user_id: input.user_id,
            address_id: input.address_id,
        })
        .returning(Restaurant::as_returning())
        .get_result(conn)
        .map_err(Into::into)
}

/// Products that carry every requested category id, resolved to the ids of
/// the active restaurants owning them. `None` means the filter produced an
/// empty set and the caller must short-circuit.
fn restaurants_by_product_categories(
    conn: &mut PgConnection,
    wanted: &[Uuid],
) -> Result<Option<Vec<Uuid>>, DomainError> {
    let wanted_set: HashSet<Uuid> = wanted.iter().copied().collect();
    let rows: Vec<(Uuid, Uuid)> = category_product_map::table
        .filter(category_product_map::category_id.eq_any(wanted))
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
        .filter(|(_, carried)| wanted_set.is_subset(carried))
        .map(|(product_id, _)| product_id)
        .collect();
    if qualifying.is_empty() {
        return Ok(None);
    }

    let owners: Vec<Uuid> = products::table
        .filter(products::id.eq_any(&qualifying))
        .filter(products::is_active.eq(true))
        .select(products::restaurant_id)
        .distinct()
        .load(conn)?;
    if owners.is_empty() {
        return Ok(None);
    }
    Ok(Some(owners))
}

/// Restaurants whose realized category set covers every requested id.
fn restaurants_by_own_categories(
    conn: &mut PgConnection,
    wanted: &[Uuid],
) -> Result<Option<Vec<Uuid>>, DomainError> {
    let wanted_set: HashSet<Uuid> = wanted.iter().copied().collect();
    let rows: Vec<(Uuid, Uuid)> = category_restaurant_map::table
        .filter(category_restaurant_map::category_id.eq_any(wanted))
        .filter(category_restaurant_map::is_active.eq(true))
        .select((
            category_restaurant_map::restaurant_id,
            category_restaurant_map::category_id,
        ))
        .load(conn)?;

    let mut per_restaurant: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
    for (restaurant_id, category_id) in rows {
        per_restaurant
            .entry(restaurant_id)
            .or_default()
            .insert(category_id);
    }
    let qualifying: Vec<Uuid> = per_restaurant
        .into_iter()
        .filter(|(_, carried)| wanted_set.is_subset(carried))
        .map(|(restaurant_id, _)| restaurant_id)
        .collect();
    if qualifying.is_empty() {
        return Ok(None);
    }
    Ok(Some(qualifying))
}

/// Intersection search. The product-category path takes precedence over the
/// restaurant-category path when both are present; the name substring filter
/// is ANDed on top of either.
pub fn search(
    conn: &mut PgConnection,
    filter: &RestaurantSearch,
) -> Result<Vec<Restaurant>, DomainError> {
    let restricted = if !filter.product_category_ids.is_empty() {
        match restaurants_by_product_categories(conn, &filter.product_category_ids)? {
            Some(ids) => Some(ids),
            None => return Ok(Vec::new()),
        }
    } else if !filter.restaurant_category_ids.is_empty() {
        match restaurants_by_own_categories(conn, &filter.restaurant_category_ids)? {
            Some(ids) => Some(ids),
            None => return Ok(Vec::new()),
        }
    } else {
        None
    };

    let mut query = restaurants::table
        .filter(restaurants::is_active.eq(true))
        .into_boxed();
    if let Some(ids) = &restricted {
        query = query.filter(restaurants::id.eq_any(ids));
    }
    if let Some(name) = filter.name.as_deref() {
        if !name.is_empty() {
            query = query.filter(restaurants::name.ilike(format!("%{name}%")));
        }
    }
    query
        .select(Restaurant::as_select())
        .order(restaurants::created_at.desc())
        .load(conn)
        .map_err(Into::into)
}

pub fn get(conn: &mut PgConnection, id: Uuid) -> Result<Restaurant, DomainError> {
    restaurants::table
        .filter(restaurants::id.eq(id))
        .filter(restaurants::is_active.eq(true))
        .select(Restaurant::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| DomainError::NotFound(format!("restaurant {id} not found")))
}

pub fn update(
    conn: &mut PgConnection,
    id: Uuid,
    changes: RestaurantChanges,
) -> Result<Restaurant, DomainError> {
    if let Some(name) = &changes.name {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidInput("name must not be empty".into()));
        }
    }
    if let Some(Some(category_id)) = changes.category_id {
        categories::ensure_active(conn, category_id)?;
    }

    diesel::update(
        restaurants::table
            .filter(restaurants::id.eq(id))
            .filter(restaurants::is_active.eq(true)),
    )
    .set((&changes, restaurants::updated_at.eq(Utc::now())))
    .returning(Restaurant::as_returning())
    .get_result(conn)
    .optional()?
    .ok_or_else(|| DomainError::NotFound(format!("restaurant {id} not found")))
}

pub fn soft_delete(conn: &mut PgConnection, id: Uuid) -> Result<(), DomainError> {
    let affected = diesel::update(
        restaurants::table
            .filter(restaurants::id.eq(id))
            .filter(restaurants::is_active.eq(true)),
    )
    .set((restaurants::is_active.eq(false), restaurants::updated_at.eq(Utc::now())))
    .execute(conn)?;
    if affected == 0 {
        return Err(DomainError::NotFound(format!("restaurant {id} not found")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::category_maps;
    use crate::test_support::{seed_category, seed_product, seed_restaurant, seed_user, setup_db};

    #[tokio::test]
    async fn product_category_intersection_requires_all_categories() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("connection");

        let owner = seed_user(&mut conn);
        let r1 = seed_restaurant(&mut conn, owner.id, "Trattoria Uno");
        let r2 = seed_restaurant(&mut conn, owner.id, "Trattoria Due");
        let cat_a = seed_category(&mut conn, "vegan");
        let cat_b = seed_category(&mut conn, "gluten-free");

        // p1 carries both categories, p2 only one.
        let p1 = seed_product(&mut conn, r1.id, "Zucchini bowl");
        let p2 = seed_product(&mut conn, r2.id, "Lentil soup");
        category_maps::create_product_map(&mut conn, cat_a.id, p1.id).expect("map a/p1");
        category_maps::create_product_map(&mut conn, cat_b.id, p1.id).expect("map b/p1");
        category_maps::create_product_map(&mut conn, cat_a.id, p2.id).expect("map a/p2");

        let hits = search(
            &mut conn,
            &RestaurantSearch {
                product_category_ids: vec![cat_a.id, cat_b.id],
                ..Default::default()
            },
        )
        .expect("search");

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, r1.id);
    }

    #[tokio::test]
    async fn unmatched_product_categories_short_circuit_to_empty() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("connection");

        let owner = seed_user(&mut conn);
        let restaurant = seed_restaurant(&mut conn, owner.id, "Casa Nostra");
        seed_product(&mut conn, restaurant.id, "Focaccia");
        let lonely = seed_category(&mut conn, "unassigned");

        let hits = search(
            &mut conn,
            &RestaurantSearch {
                // Name alone would match, but the empty product set wins.
                name: Some("Casa".into()),
                product_category_ids: vec![lonely.id],
                ..Default::default()
            },
        )
        .expect("search");

        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn restaurant_category_intersection_post_filters_supersets() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("connection");

        let owner = seed_user(&mut conn);
        let r1 = seed_restaurant(&mut conn, owner.id, "Sakura");
        let r2 = seed_restaurant(&mut conn, owner.id, "Edo");
        let cat_a = seed_category(&mut conn, "sushi");
        let cat_b = seed_category(&mut conn, "ramen");
        category_maps::create_restaurant_map(&mut conn, cat_a.id, r1.id).expect("map a/r1");
        category_maps::create_restaurant_map(&mut conn, cat_b.id, r1.id).expect("map b/r1");
        category_maps::create_restaurant_map(&mut conn, cat_a.id, r2.id).expect("map a/r2");

        let hits = search(
            &mut conn,
            &RestaurantSearch {
                restaurant_category_ids: vec![cat_a.id, cat_b.id],
                ..Default::default()
            },
        )
        .expect("search");

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, r1.id);
    }

    #[tokio::test]
    async fn name_filter_composes_with_category_restriction() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("connection");

        let owner = seed_user(&mut conn);
        let r1 = seed_restaurant(&mut conn, owner.id, "Green Garden");
        let r2 = seed_restaurant(&mut conn, owner.id, "Green Valley");
        let cat = seed_category(&mut conn, "salads");
        category_maps::create_restaurant_map(&mut conn, cat.id, r1.id).expect("map");
        category_maps::create_restaurant_map(&mut conn, cat.id, r2.id).expect("map");

        let hits = search(
            &mut conn,
            &RestaurantSearch {
                name: Some("garden".into()),
                restaurant_category_ids: vec![cat.id],
                ..Default::default()
            },
        )
        .expect("search");

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, r1.id);
    }

    #[tokio::test]
    async fn soft_deleted_restaurants_never_match() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("connection");

        let owner = seed_user(&mut conn);
        let restaurant = seed_restaurant(&mut conn, owner.id, "Ghost Kitchen");
        soft_delete(&mut conn, restaurant.id).expect("delete");

        let hits = search(
            &mut conn,
            &RestaurantSearch {
                name: Some("Ghost".into()),
                ..Default::default()
            },
        )
        .expect("search");
        assert!(hits.is_empty());

        let err = get(&mut conn, restaurant.id).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
