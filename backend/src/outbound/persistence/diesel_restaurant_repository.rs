//! PostgreSQL-backed `RestaurantRepository` implementation using Diesel.
//!
//! Filter translation lives here so both HTTP surfaces share identical
//! semantics: `city` and `cuisine` become escaped `ILIKE` substring matches
//! (the cuisine match runs over the unnested tag array), `min_rating` an
//! inclusive bound, and listings always order by rating descending then
//! name ascending.

use async_trait::async_trait;
use diesel::dsl::{sql, AsSelect, SqlTypeOf};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Bool, Text};
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};
use tracing::{debug, warn};

use crate::domain::ports::{
    RestaurantPersistenceError, RestaurantRepository, SEARCH_RESULT_CAP,
};
use crate::domain::restaurant::{
    Address, GeoPoint, PriceRange, Restaurant, RestaurantFilter, RestaurantId, Review,
};
use crate::domain::user::UserId;

use super::diesel_helpers::{cast_count, cast_count_for_db, like_pattern};
use super::models::{NewRestaurantRow, RestaurantRow, RestaurantUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::restaurants;

/// Diesel-backed implementation of the `RestaurantRepository` port.
#[derive(Clone)]
pub struct DieselRestaurantRepository {
    pool: DbPool,
}

impl DieselRestaurantRepository {
    /// Create a new repository with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RestaurantPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            RestaurantPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> RestaurantPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RestaurantPersistenceError::connection("database connection error")
        }
        _ => RestaurantPersistenceError::query("database error"),
    }
}

/// Apply the optional filters to an already-boxed query, whatever it
/// selects. The cuisine match runs over the unnested tag array.
fn apply_filters<'a, ST>(
    mut query: restaurants::BoxedQuery<'a, Pg, ST>,
    filter: &RestaurantFilter,
) -> restaurants::BoxedQuery<'a, Pg, ST> {
    if let Some(city) = &filter.city {
        query = query.filter(restaurants::city.ilike(like_pattern(city)));
    }
    if let Some(cuisine) = &filter.cuisine {
        query = query.filter(
            sql::<Bool>("EXISTS (SELECT 1 FROM unnest(cuisines) AS cuisine WHERE cuisine ILIKE ")
                .bind::<Text, _>(like_pattern(cuisine))
                .sql(")"),
        );
    }
    if let Some(min_rating) = filter.min_rating {
        query = query.filter(restaurants::rating.ge(min_rating));
    }
    query
}

/// Filtered row query, sorted for listings: rating descending, name
/// ascending.
fn filtered_rows(
    filter: &RestaurantFilter,
) -> restaurants::BoxedQuery<'static, Pg, SqlTypeOf<AsSelect<RestaurantRow, Pg>>> {
    apply_filters(
        restaurants::table
            .select(RestaurantRow::as_select())
            .into_boxed(),
        filter,
    )
    .order((restaurants::rating.desc(), restaurants::name.asc()))
}

/// Filtered match count for pagination metadata.
fn filtered_count(filter: &RestaurantFilter) -> restaurants::BoxedQuery<'static, Pg, BigInt> {
    apply_filters(restaurants::table.count().into_boxed(), filter)
}

fn row_to_restaurant(row: RestaurantRow) -> Restaurant {
    let price_range = row.price_range.parse().unwrap_or_else(|_| {
        warn!(id = %row.id, value = %row.price_range, "unrecognised price tier, defaulting");
        PriceRange::Moderate
    });
    let reviews: Vec<Review> = serde_json::from_value(row.reviews).unwrap_or_else(|error| {
        warn!(id = %row.id, %error, "stored reviews failed to decode, dropping");
        Vec::new()
    });

    Restaurant {
        id: RestaurantId::from_uuid(row.id),
        name: row.name,
        rating: row.rating,
        address: Address {
            street: row.street,
            city: row.city,
            country: row.country,
        },
        cuisines: row.cuisines,
        amenities: row.amenities,
        has_wifi: row.has_wifi,
        image: row.image,
        location: row.location,
        geo: GeoPoint {
            lat: row.latitude,
            lng: row.longitude,
        },
        reviews,
        price_range,
        average_cost_for_two: cast_count(row.average_cost_for_two),
        currency: row.currency,
        votes: cast_count(row.votes),
        created_by: row.created_by.map(UserId::from_uuid),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn reviews_to_json(restaurant: &Restaurant) -> Result<serde_json::Value, RestaurantPersistenceError> {
    serde_json::to_value(&restaurant.reviews).map_err(|err| {
        RestaurantPersistenceError::query(format!("failed to serialize reviews: {err}"))
    })
}

fn offset_for_db(offset: u64) -> i64 {
    i64::try_from(offset).unwrap_or(i64::MAX)
}

#[async_trait]
impl RestaurantRepository for DieselRestaurantRepository {
    async fn insert(&self, restaurant: &Restaurant) -> Result<(), RestaurantPersistenceError> {
        let reviews = reviews_to_json(restaurant)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewRestaurantRow {
            id: *restaurant.id.as_uuid(),
            name: &restaurant.name,
            rating: restaurant.rating,
            street: &restaurant.address.street,
            city: &restaurant.address.city,
            country: &restaurant.address.country,
            cuisines: &restaurant.cuisines,
            amenities: &restaurant.amenities,
            has_wifi: restaurant.has_wifi,
            image: &restaurant.image,
            location: &restaurant.location,
            latitude: restaurant.geo.lat,
            longitude: restaurant.geo.lng,
            reviews,
            price_range: restaurant.price_range.as_symbol(),
            average_cost_for_two: cast_count_for_db(restaurant.average_cost_for_two),
            currency: &restaurant.currency,
            votes: cast_count_for_db(restaurant.votes),
            created_by: restaurant.created_by.map(|id| *id.as_uuid()),
            created_at: restaurant.created_at,
            updated_at: restaurant.updated_at,
        };

        diesel::insert_into(restaurants::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<Restaurant>, RestaurantPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<RestaurantRow> = restaurants::table
            .find(id.as_uuid())
            .select(RestaurantRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_restaurant))
    }

    async fn replace(&self, restaurant: &Restaurant) -> Result<bool, RestaurantPersistenceError> {
        let reviews = reviews_to_json(restaurant)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = RestaurantUpdate {
            name: &restaurant.name,
            rating: restaurant.rating,
            street: &restaurant.address.street,
            city: &restaurant.address.city,
            country: &restaurant.address.country,
            cuisines: &restaurant.cuisines,
            amenities: &restaurant.amenities,
            has_wifi: restaurant.has_wifi,
            image: &restaurant.image,
            location: &restaurant.location,
            latitude: restaurant.geo.lat,
            longitude: restaurant.geo.lng,
            reviews,
            price_range: restaurant.price_range.as_symbol(),
            average_cost_for_two: cast_count_for_db(restaurant.average_cost_for_two),
            currency: &restaurant.currency,
            votes: cast_count_for_db(restaurant.votes),
            updated_at: restaurant.updated_at,
        };

        let updated_rows = diesel::update(restaurants::table.find(restaurant.id.as_uuid()))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated_rows > 0)
    }

    async fn delete(&self, id: &RestaurantId) -> Result<bool, RestaurantPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted_rows = diesel::delete(restaurants::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted_rows > 0)
    }

    async fn page(
        &self,
        filter: &RestaurantFilter,
        request: PageRequest,
    ) -> Result<Page<Restaurant>, RestaurantPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = filtered_count(filter)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<RestaurantRow> = filtered_rows(filter)
            .offset(offset_for_db(request.offset()))
            .limit(i64::from(request.per_page()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = rows.into_iter().map(row_to_restaurant).collect();
        Ok(Page::new(items, request, u64::try_from(total).unwrap_or(0)))
    }

    async fn search(
        &self,
        filter: &RestaurantFilter,
    ) -> Result<Vec<Restaurant>, RestaurantPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<RestaurantRow> = filtered_rows(filter)
            .limit(i64::from(SEARCH_RESULT_CAP))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_restaurant).collect())
    }
}
