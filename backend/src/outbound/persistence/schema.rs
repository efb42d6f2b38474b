//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the statements in `bootstrap` exactly; they
//! are what Diesel uses for type-safe SQL generation.

diesel::table! {
    /// Registered users with their credential digest and profile fields.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Login identifier, unique, stored lowercase.
        email -> Varchar,
        /// bcrypt digest; never leaves the persistence layer.
        password_hash -> Varchar,
        /// Display name (2–30 characters).
        name -> Varchar,
        /// Short bio (2–30 characters).
        about -> Varchar,
        /// Avatar image address.
        avatar_url -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Published image cards.
    cards (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Card caption (2–30 characters).
        name -> Varchar,
        /// Image address.
        link -> Varchar,
        /// Publishing user; immutable after creation.
        owner_id -> Uuid,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Like-set membership rows; the composite key keeps the set free of
    /// duplicates.
    card_likes (card_id, user_id) {
        /// The liked card.
        card_id -> Uuid,
        /// The liking user.
        user_id -> Uuid,
    }
}

diesel::joinable!(cards -> users (owner_id));
diesel::joinable!(card_likes -> cards (card_id));

diesel::allow_tables_to_appear_in_same_query!(users, cards, card_likes);
