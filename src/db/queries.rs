//! SQL query constants
//!
//! Contains all SQL used by the PostgreSQL store. Searches use
//! `strpos(lower(..), lower($1)) > 0` so user input is never treated as a
//! LIKE pattern.

/// Schema bootstrap, executed in order at startup
pub const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id SERIAL PRIMARY KEY,
        email VARCHAR(100) NOT NULL UNIQUE,
        password_hash VARCHAR(255) NOT NULL,
        first_name VARCHAR(50),
        last_name VARCHAR(50),
        phone_number VARCHAR(10),
        image TEXT,
        description TEXT,
        role VARCHAR(20) NOT NULL DEFAULT 'customer',
        registration_status VARCHAR(20),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tour_guides (
        tour_guide_id SERIAL PRIMARY KEY,
        first_name VARCHAR(50) NOT NULL,
        last_name VARCHAR(50) NOT NULL,
        phone_number VARCHAR(10) NOT NULL,
        email VARCHAR(50) NOT NULL,
        description VARCHAR(50),
        image TEXT,
        rate DOUBLE PRECISION
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS hotels (
        hotel_id SERIAL PRIMARY KEY,
        hotel_name VARCHAR(100) NOT NULL,
        image TEXT,
        location VARCHAR(200),
        price_per_night DOUBLE PRECISION,
        check_in_time TIME,
        check_out_time TIME,
        contact_number VARCHAR(20),
        description TEXT,
        rating DOUBLE PRECISION,
        created_at TIMESTAMPTZ DEFAULT NOW(),
        updated_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS restaurants (
        restaurant_id SERIAL PRIMARY KEY,
        restaurant_name VARCHAR(100) NOT NULL,
        image TEXT,
        location VARCHAR(200),
        average_price DOUBLE PRECISION,
        price_list TEXT,
        opened_time TIME,
        closed_time TIME,
        contact_number VARCHAR(20),
        description TEXT,
        summary TEXT,
        parking TEXT,
        rating DOUBLE PRECISION,
        regulations TEXT,
        utilities TEXT,
        created_at TIMESTAMPTZ DEFAULT NOW(),
        updated_at TIMESTAMPTZ,
        user_id INTEGER REFERENCES users(user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vehicles (
        vehicle_id SERIAL PRIMARY KEY,
        vehicle_name VARCHAR(100) NOT NULL,
        vehicle_type VARCHAR(50),
        image TEXT,
        location VARCHAR(200),
        price DOUBLE PRECISION,
        seats INTEGER,
        departure_time TIME,
        contact_number VARCHAR(20),
        description TEXT,
        rating DOUBLE PRECISION,
        created_at TIMESTAMPTZ DEFAULT NOW(),
        updated_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tours (
        tour_id SERIAL PRIMARY KEY,
        name VARCHAR(50) NOT NULL,
        description VARCHAR(200) NOT NULL,
        image TEXT,
        price DOUBLE PRECISION,
        duration VARCHAR(50),
        air_plane VARCHAR(100),
        rating DOUBLE PRECISION,
        itinerary TEXT,
        inclusions TEXT,
        exclusions TEXT,
        group_size INTEGER,
        guide TEXT,
        create_date DATE,
        hotel_id INTEGER REFERENCES hotels(hotel_id),
        restaurant_id INTEGER REFERENCES restaurants(restaurant_id),
        staff_id INTEGER REFERENCES users(user_id),
        vehicle_id INTEGER REFERENCES vehicles(vehicle_id),
        row_version INTEGER NOT NULL DEFAULT 1
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS bookings (
        booking_id SERIAL PRIMARY KEY,
        user_id INTEGER REFERENCES users(user_id),
        hotel_id INTEGER REFERENCES hotels(hotel_id),
        restaurant_id INTEGER REFERENCES restaurants(restaurant_id),
        tour_id INTEGER REFERENCES tours(tour_id),
        vehicle_id INTEGER REFERENCES vehicles(vehicle_id),
        start_date DATE NOT NULL,
        end_date DATE NOT NULL,
        name VARCHAR(50) NOT NULL,
        phone VARCHAR(10) NOT NULL,
        message VARCHAR(200),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CHECK (num_nonnulls(hotel_id, restaurant_id, tour_id, vehicle_id) = 1),
        CHECK (end_date >= start_date)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS feedbacks (
        feedback_id SERIAL PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(user_id),
        parent_id INTEGER REFERENCES feedbacks(feedback_id),
        content TEXT NOT NULL,
        created_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        modified_date TIMESTAMPTZ
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_feedbacks_parent ON feedbacks(parent_id, created_date DESC)",
    "CREATE INDEX IF NOT EXISTS idx_bookings_user ON bookings(user_id)",
];

// ---------------------------------------------------------------------------
// Tours
// ---------------------------------------------------------------------------

const TOUR_COLUMNS: &str = "tour_id, name, description, image, price, duration, air_plane, \
    rating, itinerary, inclusions, exclusions, group_size, guide, create_date, hotel_id, \
    restaurant_id, staff_id, vehicle_id, row_version";

pub fn list_tours() -> String {
    format!(
        "SELECT {} FROM tours \
         WHERE $1::text IS NULL OR strpos(lower(name), lower($1)) > 0 \
         ORDER BY tour_id",
        TOUR_COLUMNS
    )
}

pub fn find_tour() -> String {
    format!("SELECT {} FROM tours WHERE tour_id = $1", TOUR_COLUMNS)
}

pub const TOUR_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM tours WHERE tour_id = $1)";

pub fn insert_tour() -> String {
    format!(
        "INSERT INTO tours (name, description, price, image, create_date) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {}",
        TOUR_COLUMNS
    )
}

/// Matches only the version the editor loaded, and bumps it
pub fn update_tour() -> String {
    format!(
        "UPDATE tours SET name = $3, description = $4, image = $5, price = $6, \
         duration = $7, air_plane = $8, rating = $9, itinerary = $10, inclusions = $11, \
         exclusions = $12, group_size = $13, guide = $14, row_version = row_version + 1 \
         WHERE tour_id = $1 AND row_version = $2 \
         RETURNING {}",
        TOUR_COLUMNS
    )
}

pub const DELETE_TOUR: &str = "DELETE FROM tours WHERE tour_id = $1";

// ---------------------------------------------------------------------------
// Tour guides
// ---------------------------------------------------------------------------

const TOUR_GUIDE_COLUMNS: &str =
    "tour_guide_id, first_name, last_name, phone_number, email, description, image, rate";

pub fn list_tour_guides() -> String {
    format!(
        "SELECT {} FROM tour_guides \
         WHERE $1::text IS NULL \
            OR strpos(lower(email), lower($1)) > 0 \
            OR strpos(lower(first_name), lower($1)) > 0 \
            OR strpos(lower(last_name), lower($1)) > 0 \
            OR strpos(lower(first_name || ' ' || last_name), lower($1)) > 0 \
            OR strpos(phone_number, $1) > 0 \
         ORDER BY tour_guide_id",
        TOUR_GUIDE_COLUMNS
    )
}

pub fn find_tour_guide() -> String {
    format!(
        "SELECT {} FROM tour_guides WHERE tour_guide_id = $1",
        TOUR_GUIDE_COLUMNS
    )
}

pub fn insert_tour_guide() -> String {
    format!(
        "INSERT INTO tour_guides (first_name, last_name, phone_number, email, description, image, rate) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {}",
        TOUR_GUIDE_COLUMNS
    )
}

pub fn update_tour_guide() -> String {
    format!(
        "UPDATE tour_guides SET first_name = $2, last_name = $3, phone_number = $4, \
         email = $5, description = $6, image = $7, rate = $8 \
         WHERE tour_guide_id = $1 \
         RETURNING {}",
        TOUR_GUIDE_COLUMNS
    )
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

const FEEDBACK_COLUMNS: &str =
    "feedback_id, user_id, parent_id, content, created_date, modified_date";

/// Shared filter for the page and its count: top-level rows matching content or author
const TOP_LEVEL_FILTER: &str = "f.parent_id IS NULL AND ($1::text IS NULL \
    OR strpos(lower(f.content), lower($1)) > 0 \
    OR strpos(lower(coalesce(u.first_name, '')), lower($1)) > 0 \
    OR strpos(lower(coalesce(u.last_name, '')), lower($1)) > 0)";

pub fn page_top_level_feedback() -> String {
    format!(
        "SELECT f.feedback_id, f.user_id, f.parent_id, f.content, f.created_date, \
                f.modified_date, u.first_name, u.last_name, u.image \
         FROM feedbacks f LEFT JOIN users u ON u.user_id = f.user_id \
         WHERE {} \
         ORDER BY f.created_date DESC, f.feedback_id DESC \
         OFFSET $2 LIMIT $3",
        TOP_LEVEL_FILTER
    )
}

pub fn count_top_level_feedback() -> String {
    format!(
        "SELECT COUNT(*) FROM feedbacks f LEFT JOIN users u ON u.user_id = f.user_id WHERE {}",
        TOP_LEVEL_FILTER
    )
}

pub fn find_feedback() -> String {
    format!(
        "SELECT {} FROM feedbacks WHERE feedback_id = $1",
        FEEDBACK_COLUMNS
    )
}

pub fn feedback_replies() -> String {
    format!(
        "SELECT {} FROM feedbacks WHERE parent_id = $1 ORDER BY created_date, feedback_id",
        FEEDBACK_COLUMNS
    )
}

pub fn insert_feedback() -> String {
    format!(
        "INSERT INTO feedbacks (user_id, parent_id, content) VALUES ($1, $2, $3) RETURNING {}",
        FEEDBACK_COLUMNS
    )
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

const USER_COLUMNS: &str = "user_id, email, password_hash, first_name, last_name, phone_number, \
    image, description, role, registration_status, created_at";

pub fn find_user() -> String {
    format!("SELECT {} FROM users WHERE user_id = $1", USER_COLUMNS)
}

pub fn find_user_by_email() -> String {
    format!(
        "SELECT {} FROM users WHERE lower(email) = lower($1)",
        USER_COLUMNS
    )
}

pub fn insert_user() -> String {
    format!(
        "INSERT INTO users (email, password_hash, first_name, last_name, phone_number, role, registration_status) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {}",
        USER_COLUMNS
    )
}

pub fn pending_travel_agents() -> String {
    format!(
        "SELECT {} FROM users \
         WHERE role = 'travel_agent' AND registration_status = 'Pending' \
         ORDER BY created_at, user_id",
        USER_COLUMNS
    )
}

pub const SET_REGISTRATION_STATUS: &str =
    "UPDATE users SET registration_status = $2 WHERE user_id = $1";

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

const BOOKING_COLUMNS: &str = "booking_id, user_id, hotel_id, restaurant_id, tour_id, vehicle_id, \
    start_date, end_date, name, phone, message, created_at";

pub fn insert_booking() -> String {
    format!(
        "INSERT INTO bookings (user_id, hotel_id, restaurant_id, tour_id, vehicle_id, \
                               start_date, end_date, name, phone, message) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING {}",
        BOOKING_COLUMNS
    )
}

pub fn bookings_for_user() -> String {
    format!(
        "SELECT {} FROM bookings WHERE user_id = $1 ORDER BY start_date DESC, booking_id DESC",
        BOOKING_COLUMNS
    )
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

const HOTEL_COLUMNS: &str = "hotel_id, hotel_name, image, location, price_per_night, \
    check_in_time, check_out_time, contact_number, description, rating, created_at, updated_at";

const RESTAURANT_COLUMNS: &str = "restaurant_id, restaurant_name, image, location, average_price, \
    price_list, opened_time, closed_time, contact_number, description, summary, parking, rating, \
    regulations, utilities, created_at, updated_at, user_id";

const VEHICLE_COLUMNS: &str = "vehicle_id, vehicle_name, vehicle_type, image, location, price, \
    seats, departure_time, contact_number, description, rating, created_at, updated_at";

pub fn list_hotels() -> String {
    format!(
        "SELECT {} FROM hotels \
         WHERE $1::text IS NULL OR strpos(lower(hotel_name), lower($1)) > 0 \
         ORDER BY hotel_id",
        HOTEL_COLUMNS
    )
}

pub fn find_hotel() -> String {
    format!("SELECT {} FROM hotels WHERE hotel_id = $1", HOTEL_COLUMNS)
}

pub fn list_restaurants() -> String {
    format!(
        "SELECT {} FROM restaurants \
         WHERE $1::text IS NULL OR strpos(lower(restaurant_name), lower($1)) > 0 \
         ORDER BY restaurant_id",
        RESTAURANT_COLUMNS
    )
}

pub fn find_restaurant() -> String {
    format!(
        "SELECT {} FROM restaurants WHERE restaurant_id = $1",
        RESTAURANT_COLUMNS
    )
}

pub fn list_vehicles() -> String {
    format!(
        "SELECT {} FROM vehicles \
         WHERE $1::text IS NULL OR strpos(lower(vehicle_name), lower($1)) > 0 \
         ORDER BY vehicle_id",
        VEHICLE_COLUMNS
    )
}

pub fn find_vehicle() -> String {
    format!("SELECT {} FROM vehicles WHERE vehicle_id = $1", VEHICLE_COLUMNS)
}
