//! PostgreSQL implementation of every repository

use super::queries;
use super::{
    BookingRepository, CatalogRepository, FeedbackRepository, TourGuideRepository,
    TourRepository, UserRepository,
};
use crate::auth::Role;
use crate::error::{ApiResult, AppError};
use crate::models::{
    Booking, Feedback, FeedbackWithAuthor, Hotel, NewBooking, NewFeedback, NewTour, NewUser,
    PageRequest, RegistrationStatus, Restaurant, Tour, TourChanges, TourGuide, TourGuideRecord,
    User, Vehicle,
};
use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::error::SqlState;
use tokio_postgres::Row;
use tracing::debug;

/// All repositories backed by one connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

fn tour_from_row(row: &Row) -> Tour {
    Tour {
        tour_id: row.get("tour_id"),
        name: row.get("name"),
        description: row.get("description"),
        image: row.get("image"),
        price: row.get("price"),
        duration: row.get("duration"),
        air_plane: row.get("air_plane"),
        rating: row.get("rating"),
        itinerary: row.get("itinerary"),
        inclusions: row.get("inclusions"),
        exclusions: row.get("exclusions"),
        group_size: row.get("group_size"),
        guide: row.get("guide"),
        create_date: row.get("create_date"),
        hotel_id: row.get("hotel_id"),
        restaurant_id: row.get("restaurant_id"),
        staff_id: row.get("staff_id"),
        vehicle_id: row.get("vehicle_id"),
        row_version: row.get("row_version"),
    }
}

fn tour_guide_from_row(row: &Row) -> TourGuide {
    TourGuide {
        tour_guide_id: row.get("tour_guide_id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        phone_number: row.get("phone_number"),
        email: row.get("email"),
        description: row.get("description"),
        image: row.get("image"),
        rate: row.get("rate"),
    }
}

fn feedback_from_row(row: &Row) -> Feedback {
    Feedback {
        feedback_id: row.get("feedback_id"),
        user_id: row.get("user_id"),
        parent_id: row.get("parent_id"),
        content: row.get("content"),
        created_date: row.get("created_date"),
        modified_date: row.get("modified_date"),
    }
}

fn user_from_row(row: &Row) -> ApiResult<User> {
    let role: String = row.get("role");
    let status: Option<String> = row.get("registration_status");
    let registration_status = status
        .map(|s| s.parse::<RegistrationStatus>())
        .transpose()
        .map_err(AppError::Internal)?;

    Ok(User {
        user_id: row.get("user_id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        phone_number: row.get("phone_number"),
        image: row.get("image"),
        description: row.get("description"),
        role: role.parse::<Role>()?,
        registration_status,
        created_at: row.get("created_at"),
    })
}

fn booking_from_row(row: &Row) -> Booking {
    Booking {
        booking_id: row.get("booking_id"),
        user_id: row.get("user_id"),
        hotel_id: row.get("hotel_id"),
        restaurant_id: row.get("restaurant_id"),
        tour_id: row.get("tour_id"),
        vehicle_id: row.get("vehicle_id"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        name: row.get("name"),
        phone: row.get("phone"),
        message: row.get("message"),
        created_at: row.get("created_at"),
    }
}

fn hotel_from_row(row: &Row) -> Hotel {
    Hotel {
        hotel_id: row.get("hotel_id"),
        hotel_name: row.get("hotel_name"),
        image: row.get("image"),
        location: row.get("location"),
        price_per_night: row.get("price_per_night"),
        check_in_time: row.get("check_in_time"),
        check_out_time: row.get("check_out_time"),
        contact_number: row.get("contact_number"),
        description: row.get("description"),
        rating: row.get("rating"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn restaurant_from_row(row: &Row) -> Restaurant {
    Restaurant {
        restaurant_id: row.get("restaurant_id"),
        restaurant_name: row.get("restaurant_name"),
        image: row.get("image"),
        location: row.get("location"),
        average_price: row.get("average_price"),
        price_list: row.get("price_list"),
        opened_time: row.get("opened_time"),
        closed_time: row.get("closed_time"),
        contact_number: row.get("contact_number"),
        description: row.get("description"),
        summary: row.get("summary"),
        parking: row.get("parking"),
        rating: row.get("rating"),
        regulations: row.get("regulations"),
        utilities: row.get("utilities"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        user_id: row.get("user_id"),
    }
}

fn vehicle_from_row(row: &Row) -> Vehicle {
    Vehicle {
        vehicle_id: row.get("vehicle_id"),
        vehicle_name: row.get("vehicle_name"),
        vehicle_type: row.get("vehicle_type"),
        image: row.get("image"),
        location: row.get("location"),
        price: row.get("price"),
        seats: row.get("seats"),
        departure_time: row.get("departure_time"),
        contact_number: row.get("contact_number"),
        description: row.get("description"),
        rating: row.get("rating"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl TourRepository for PgStore {
    async fn list(&self, name_contains: Option<&str>) -> ApiResult<Vec<Tour>> {
        let client = self.pool.get().await?;
        let rows = client.query(&queries::list_tours(), &[&name_contains]).await?;
        Ok(rows.iter().map(tour_from_row).collect())
    }

    async fn find(&self, id: i32) -> ApiResult<Option<Tour>> {
        let client = self.pool.get().await?;
        let row = client.query_opt(&queries::find_tour(), &[&id]).await?;
        Ok(row.as_ref().map(tour_from_row))
    }

    async fn exists(&self, id: i32) -> ApiResult<bool> {
        let client = self.pool.get().await?;
        let row = client.query_one(queries::TOUR_EXISTS, &[&id]).await?;
        Ok(row.get(0))
    }

    async fn insert(&self, tour: NewTour) -> ApiResult<Tour> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                &queries::insert_tour(),
                &[
                    &tour.name,
                    &tour.description,
                    &tour.price,
                    &tour.image,
                    &tour.create_date,
                ],
            )
            .await?;
        Ok(tour_from_row(&row))
    }

    async fn update(
        &self,
        id: i32,
        expected_version: i32,
        changes: TourChanges,
    ) -> ApiResult<Option<Tour>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                &queries::update_tour(),
                &[
                    &id,
                    &expected_version,
                    &changes.name,
                    &changes.description,
                    &changes.image,
                    &changes.price,
                    &changes.duration,
                    &changes.air_plane,
                    &changes.rating,
                    &changes.itinerary,
                    &changes.inclusions,
                    &changes.exclusions,
                    &changes.group_size,
                    &changes.guide,
                ],
            )
            .await?;
        Ok(row.as_ref().map(tour_from_row))
    }

    async fn delete(&self, id: i32) -> ApiResult<bool> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute(queries::DELETE_TOUR, &[&id])
            .await
            .map_err(|e| match e.code() {
                Some(code) if *code == SqlState::FOREIGN_KEY_VIOLATION => AppError::Conflict(
                    "The tour is still referenced by bookings and cannot be deleted".to_string(),
                ),
                _ => AppError::from(e),
            })?;
        debug!("Deleted {} tour row(s) for id {}", deleted, id);
        Ok(deleted > 0)
    }
}

#[async_trait]
impl TourGuideRepository for PgStore {
    async fn list(&self, search: Option<&str>) -> ApiResult<Vec<TourGuide>> {
        let client = self.pool.get().await?;
        let rows = client.query(&queries::list_tour_guides(), &[&search]).await?;
        Ok(rows.iter().map(tour_guide_from_row).collect())
    }

    async fn find(&self, id: i32) -> ApiResult<Option<TourGuide>> {
        let client = self.pool.get().await?;
        let row = client.query_opt(&queries::find_tour_guide(), &[&id]).await?;
        Ok(row.as_ref().map(tour_guide_from_row))
    }

    async fn insert(&self, guide: TourGuideRecord) -> ApiResult<TourGuide> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                &queries::insert_tour_guide(),
                &[
                    &guide.first_name,
                    &guide.last_name,
                    &guide.phone_number,
                    &guide.email,
                    &guide.description,
                    &guide.image,
                    &guide.rate,
                ],
            )
            .await?;
        Ok(tour_guide_from_row(&row))
    }

    async fn update(&self, id: i32, guide: TourGuideRecord) -> ApiResult<Option<TourGuide>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                &queries::update_tour_guide(),
                &[
                    &id,
                    &guide.first_name,
                    &guide.last_name,
                    &guide.phone_number,
                    &guide.email,
                    &guide.description,
                    &guide.image,
                    &guide.rate,
                ],
            )
            .await?;
        Ok(row.as_ref().map(tour_guide_from_row))
    }
}

#[async_trait]
impl FeedbackRepository for PgStore {
    async fn page_top_level(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> ApiResult<(Vec<FeedbackWithAuthor>, i64)> {
        let client = self.pool.get().await?;

        let total: i64 = client
            .query_one(&queries::count_top_level_feedback(), &[&search])
            .await?
            .get(0);

        let rows = client
            .query(
                &queries::page_top_level_feedback(),
                &[&search, &page.offset(), &page.page_size],
            )
            .await?;

        let items = rows
            .iter()
            .map(|row| FeedbackWithAuthor {
                feedback: feedback_from_row(row),
                author_first_name: row.get("first_name"),
                author_last_name: row.get("last_name"),
                author_image: row.get("image"),
            })
            .collect();

        Ok((items, total))
    }

    async fn find(&self, id: i32) -> ApiResult<Option<Feedback>> {
        let client = self.pool.get().await?;
        let row = client.query_opt(&queries::find_feedback(), &[&id]).await?;
        Ok(row.as_ref().map(feedback_from_row))
    }

    async fn replies(&self, parent_id: i32) -> ApiResult<Vec<Feedback>> {
        let client = self.pool.get().await?;
        let rows = client.query(&queries::feedback_replies(), &[&parent_id]).await?;
        Ok(rows.iter().map(feedback_from_row).collect())
    }

    async fn insert(&self, feedback: NewFeedback) -> ApiResult<Feedback> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                &queries::insert_feedback(),
                &[&feedback.user_id, &feedback.parent_id, &feedback.content],
            )
            .await?;
        Ok(feedback_from_row(&row))
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find(&self, id: i32) -> ApiResult<Option<User>> {
        let client = self.pool.get().await?;
        client
            .query_opt(&queries::find_user(), &[&id])
            .await?
            .as_ref()
            .map(user_from_row)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let client = self.pool.get().await?;
        client
            .query_opt(&queries::find_user_by_email(), &[&email])
            .await?
            .as_ref()
            .map(user_from_row)
            .transpose()
    }

    async fn insert(&self, user: NewUser) -> ApiResult<User> {
        let client = self.pool.get().await?;
        let status = user.registration_status.map(|s| s.as_str());
        let row = client
            .query_one(
                &queries::insert_user(),
                &[
                    &user.email,
                    &user.password_hash,
                    &user.first_name,
                    &user.last_name,
                    &user.phone_number,
                    &user.role.as_str(),
                    &status,
                ],
            )
            .await
            .map_err(|e| match e.code() {
                Some(code) if *code == SqlState::UNIQUE_VIOLATION => {
                    AppError::Conflict("Email already registered".to_string())
                }
                _ => AppError::from(e),
            })?;
        user_from_row(&row)
    }

    async fn pending_travel_agents(&self) -> ApiResult<Vec<User>> {
        let client = self.pool.get().await?;
        let rows = client.query(&queries::pending_travel_agents(), &[]).await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn set_registration_status(
        &self,
        id: i32,
        status: RegistrationStatus,
    ) -> ApiResult<bool> {
        let client = self.pool.get().await?;
        let updated = client
            .execute(queries::SET_REGISTRATION_STATUS, &[&id, &status.as_str()])
            .await?;
        Ok(updated > 0)
    }
}

#[async_trait]
impl BookingRepository for PgStore {
    async fn insert(&self, booking: NewBooking) -> ApiResult<Booking> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                &queries::insert_booking(),
                &[
                    &booking.user_id,
                    &booking.target.hotel_id(),
                    &booking.target.restaurant_id(),
                    &booking.target.tour_id(),
                    &booking.target.vehicle_id(),
                    &booking.start_date,
                    &booking.end_date,
                    &booking.name,
                    &booking.phone,
                    &booking.message,
                ],
            )
            .await?;
        Ok(booking_from_row(&row))
    }

    async fn list_for_user(&self, user_id: i32) -> ApiResult<Vec<Booking>> {
        let client = self.pool.get().await?;
        let rows = client.query(&queries::bookings_for_user(), &[&user_id]).await?;
        Ok(rows.iter().map(booking_from_row).collect())
    }
}

#[async_trait]
impl CatalogRepository for PgStore {
    async fn list_hotels(&self, name_contains: Option<&str>) -> ApiResult<Vec<Hotel>> {
        let client = self.pool.get().await?;
        let rows = client.query(&queries::list_hotels(), &[&name_contains]).await?;
        Ok(rows.iter().map(hotel_from_row).collect())
    }

    async fn find_hotel(&self, id: i32) -> ApiResult<Option<Hotel>> {
        let client = self.pool.get().await?;
        let row = client.query_opt(&queries::find_hotel(), &[&id]).await?;
        Ok(row.as_ref().map(hotel_from_row))
    }

    async fn list_restaurants(&self, name_contains: Option<&str>) -> ApiResult<Vec<Restaurant>> {
        let client = self.pool.get().await?;
        let rows = client
            .query(&queries::list_restaurants(), &[&name_contains])
            .await?;
        Ok(rows.iter().map(restaurant_from_row).collect())
    }

    async fn find_restaurant(&self, id: i32) -> ApiResult<Option<Restaurant>> {
        let client = self.pool.get().await?;
        let row = client.query_opt(&queries::find_restaurant(), &[&id]).await?;
        Ok(row.as_ref().map(restaurant_from_row))
    }

    async fn list_vehicles(&self, name_contains: Option<&str>) -> ApiResult<Vec<Vehicle>> {
        let client = self.pool.get().await?;
        let rows = client.query(&queries::list_vehicles(), &[&name_contains]).await?;
        Ok(rows.iter().map(vehicle_from_row).collect())
    }

    async fn find_vehicle(&self, id: i32) -> ApiResult<Option<Vehicle>> {
        let client = self.pool.get().await?;
        let row = client.query_opt(&queries::find_vehicle(), &[&id]).await?;
        Ok(row.as_ref().map(vehicle_from_row))
    }
}
