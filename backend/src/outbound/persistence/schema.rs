//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them for
//! compile-time query validation and type-safe SQL generation. Regenerate
//! with `diesel print-schema` after changing migrations.

diesel::table! {
    /// Registered accounts.
    ///
    /// `username` and `email` carry unique indexes; the application relies
    /// on those for duplicate detection rather than pre-checking.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login name.
        username -> Varchar,
        /// Unique lowercased email address.
        email -> Varchar,
        /// Argon2id digest in PHC string format.
        password_hash -> Varchar,
        /// Authorization tier: "user" or "admin".
        role -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Restaurant directory records.
    ///
    /// Indexed by city, cuisines (GIN), and rating descending to back the
    /// listing filters and sort order.
    restaurants (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name (max 100 characters).
        name -> Varchar,
        /// Aggregate rating in [0, 5].
        rating -> Float8,
        /// Address street line.
        street -> Varchar,
        /// Address city; filter target.
        city -> Varchar,
        /// Address country.
        country -> Varchar,
        /// Cuisine tags; filter target.
        cuisines -> Array<Text>,
        /// Amenity tags.
        amenities -> Array<Text>,
        /// Wifi availability flag.
        has_wifi -> Bool,
        /// Image URL.
        image -> Varchar,
        /// Free-text location label.
        location -> Varchar,
        /// Latitude in decimal degrees.
        latitude -> Float8,
        /// Longitude in decimal degrees.
        longitude -> Float8,
        /// Embedded reviews as a JSON array.
        reviews -> Jsonb,
        /// Price tier symbol: "$" through "$$$$".
        price_range -> Varchar,
        /// Average cost for two, non-negative.
        average_cost_for_two -> Int4,
        /// Currency code for the cost figure.
        currency -> Varchar,
        /// Vote count, non-negative.
        votes -> Int4,
        /// Creator user id; no foreign key on purpose.
        created_by -> Nullable<Uuid>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}
