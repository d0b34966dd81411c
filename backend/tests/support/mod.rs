//! Shared doubles and fixtures for the integration tests.
//!
//! The HTTP surface is exercised against in-memory port implementations so
//! the full router, extractors, and envelopes run without PostgreSQL. The
//! doubles reproduce the repository contract, including sort order and
//! duplicate detection.

use std::sync::{Arc, Mutex};

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App};
use async_trait::async_trait;
use chrono::Duration;
use pagination::{Page, PageRequest};

use backend::domain::ports::{
    RestaurantPersistenceError, RestaurantRepository, UserPersistenceError, UserRepository,
    SEARCH_RESULT_CAP,
};
use backend::domain::user::{Email, PasswordHash, Role, User, UserId, Username};
use backend::domain::{
    AddressDraft, GeoDraft, Restaurant, RestaurantDraft, RestaurantFilter, RestaurantId,
    TokenIssuer,
};
use backend::inbound::http::state::{CookiePolicy, HttpState};
use backend::inbound::{http, pages};
use backend::Trace;

/// Signing secret shared by the test state and token helpers.
pub const TEST_SECRET: &[u8] = b"integration-secret";

/// In-memory `UserRepository` enforcing the duplicate contract.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.users.lock().expect("user store lock").len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.lock().expect("user store lock");
        if users
            .iter()
            .any(|existing| existing.username().as_ref() == user.username().as_ref())
        {
            return Err(UserPersistenceError::DuplicateUsername);
        }
        if users
            .iter()
            .any(|existing| existing.email().as_ref() == user.email().as_ref())
        {
            return Err(UserPersistenceError::DuplicateEmail);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.lock().expect("user store lock");
        Ok(users
            .iter()
            .find(|user| user.email().as_ref() == email.as_ref())
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.lock().expect("user store lock");
        Ok(users.iter().find(|user| user.id() == id).cloned())
    }
}

/// In-memory `RestaurantRepository` reproducing filter and sort semantics.
#[derive(Default)]
pub struct InMemoryRestaurantRepository {
    rows: Mutex<Vec<Restaurant>>,
    connection_down: Mutex<bool>,
}

impl InMemoryRestaurantRepository {
    /// Simulate a store outage; every call afterwards fails with a
    /// connection error.
    pub fn take_down(&self) {
        *self.connection_down.lock().expect("outage lock") = true;
    }

    /// Number of stored restaurants.
    pub fn len(&self) -> usize {
        self.rows.lock().expect("restaurant store lock").len()
    }

    /// Insert directly, bypassing the HTTP surface.
    pub fn seed(&self, restaurant: Restaurant) {
        self.rows
            .lock()
            .expect("restaurant store lock")
            .push(restaurant);
    }

    fn check_connection(&self) -> Result<(), RestaurantPersistenceError> {
        if *self.connection_down.lock().expect("outage lock") {
            return Err(RestaurantPersistenceError::connection(
                "simulated outage",
            ));
        }
        Ok(())
    }

    fn matching(&self, filter: &RestaurantFilter) -> Vec<Restaurant> {
        let rows = self.rows.lock().expect("restaurant store lock");
        let mut matches: Vec<Restaurant> = rows
            .iter()
            .filter(|restaurant| matches_filter(restaurant, filter))
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            b.rating
                .total_cmp(&a.rating)
                .then_with(|| a.name.cmp(&b.name))
        });
        matches
    }
}

fn matches_filter(restaurant: &Restaurant, filter: &RestaurantFilter) -> bool {
    if let Some(city) = &filter.city {
        let needle = city.to_lowercase();
        if !restaurant.address.city.to_lowercase().contains(&needle) {
            return false;
        }
    }
    if let Some(cuisine) = &filter.cuisine {
        let needle = cuisine.to_lowercase();
        if !restaurant
            .cuisines
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle))
        {
            return false;
        }
    }
    if let Some(min_rating) = filter.min_rating {
        if restaurant.rating < min_rating {
            return false;
        }
    }
    true
}

#[async_trait]
impl RestaurantRepository for InMemoryRestaurantRepository {
    async fn insert(&self, restaurant: &Restaurant) -> Result<(), RestaurantPersistenceError> {
        self.check_connection()?;
        self.seed(restaurant.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<Restaurant>, RestaurantPersistenceError> {
        self.check_connection()?;
        let rows = self.rows.lock().expect("restaurant store lock");
        Ok(rows.iter().find(|restaurant| restaurant.id == *id).cloned())
    }

    async fn replace(&self, restaurant: &Restaurant) -> Result<bool, RestaurantPersistenceError> {
        self.check_connection()?;
        let mut rows = self.rows.lock().expect("restaurant store lock");
        match rows.iter_mut().find(|stored| stored.id == restaurant.id) {
            Some(stored) => {
                *stored = restaurant.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &RestaurantId) -> Result<bool, RestaurantPersistenceError> {
        self.check_connection()?;
        let mut rows = self.rows.lock().expect("restaurant store lock");
        let before = rows.len();
        rows.retain(|restaurant| restaurant.id != *id);
        Ok(rows.len() < before)
    }

    async fn page(
        &self,
        filter: &RestaurantFilter,
        request: PageRequest,
    ) -> Result<Page<Restaurant>, RestaurantPersistenceError> {
        self.check_connection()?;
        let matches = self.matching(filter);
        let total = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(usize::try_from(request.offset()).expect("offset fits usize"))
            .take(request.per_page() as usize)
            .collect();
        Ok(Page::new(items, request, total))
    }

    async fn search(
        &self,
        filter: &RestaurantFilter,
    ) -> Result<Vec<Restaurant>, RestaurantPersistenceError> {
        self.check_connection()?;
        Ok(self
            .matching(filter)
            .into_iter()
            .take(SEARCH_RESULT_CAP as usize)
            .collect())
    }
}

/// Bundle of handles the tests keep alongside the app state.
pub struct TestContext {
    pub state: web::Data<HttpState>,
    pub users: Arc<InMemoryUserRepository>,
    pub restaurants: Arc<InMemoryRestaurantRepository>,
    pub tokens: TokenIssuer,
}

/// Build the shared state over fresh in-memory stores.
pub fn test_context() -> TestContext {
    let users = Arc::new(InMemoryUserRepository::default());
    let restaurants = Arc::new(InMemoryRestaurantRepository::default());
    let tokens = TokenIssuer::new(TEST_SECRET, Duration::hours(1));
    let state = web::Data::new(HttpState::new(
        users.clone(),
        restaurants.clone(),
        tokens.clone(),
        CookiePolicy {
            secure: false,
            max_age_hours: 24,
        },
    ));
    TestContext {
        state,
        users,
        restaurants,
        tokens,
    }
}

/// Application with the full route table, as the server wires it.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .wrap(Trace)
        .configure(http::configure)
        .configure(pages::configure)
}

/// Issue a token for a synthetic account with the given role.
pub fn token_for(tokens: &TokenIssuer, role: Role) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let short: String = suffix.chars().take(8).collect();
    let username = format!("user_{short}");
    let user = User::register(
        Username::new(username).expect("valid username"),
        Email::new(format!("{suffix}@example.com")).expect("valid email"),
        role,
        PasswordHash::new("unused-digest".to_owned()),
    );
    tokens.issue(&user).expect("token issues")
}

/// Draft for a fully valid restaurant with the given shape.
pub fn draft(name: &str, city: &str, cuisine: &str, rating: f64) -> RestaurantDraft {
    RestaurantDraft {
        name: Some(name.to_owned()),
        rating: Some(rating),
        address: AddressDraft {
            street: Some("1 Main St".to_owned()),
            city: Some(city.to_owned()),
            country: Some("France".to_owned()),
        },
        cuisines: vec![cuisine.to_owned()],
        amenities: Vec::new(),
        has_wifi: false,
        image: None,
        location: Some("Downtown".to_owned()),
        geo: GeoDraft {
            lat: Some(48.85),
            lng: Some(2.35),
        },
        price_range: Some("$$".to_owned()),
        average_cost_for_two: Some(40),
        currency: Some("EUR".to_owned()),
        reviews: Vec::new(),
    }
}

/// Seed one valid restaurant and return it.
pub fn seed_restaurant(
    restaurants: &InMemoryRestaurantRepository,
    name: &str,
    city: &str,
    cuisine: &str,
    rating: f64,
) -> Restaurant {
    let restaurant =
        Restaurant::from_draft(draft(name, city, cuisine, rating), None).expect("valid draft");
    restaurants.seed(restaurant.clone());
    restaurant
}
