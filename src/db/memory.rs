//! In-memory repositories for router tests
//!
//! Mirrors the PostgreSQL store closely enough for handler tests: the same
//! search rules, ordering, optimistic version check and key constraints.

use super::{
    BookingRepository, CatalogRepository, FeedbackRepository, TourGuideRepository,
    TourRepository, UserRepository,
};
use crate::auth::Role;
use crate::error::{ApiResult, AppError};
use crate::models::{
    Booking, BookingTarget, Feedback, FeedbackWithAuthor, Hotel, NewBooking, NewFeedback,
    NewTour, NewUser, PageRequest, RegistrationStatus, Restaurant, Tour, TourChanges, TourGuide,
    TourGuideRecord, User, Vehicle,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    next_id: i32,
    tours: BTreeMap<i32, Tour>,
    tour_guides: BTreeMap<i32, TourGuide>,
    feedbacks: BTreeMap<i32, Feedback>,
    users: BTreeMap<i32, User>,
    bookings: BTreeMap<i32, Booking>,
    hotels: BTreeMap<i32, Hotel>,
    restaurants: BTreeMap<i32, Restaurant>,
    vehicles: BTreeMap<i32, Vehicle>,
}

impl Tables {
    fn id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn target_exists(&self, target: BookingTarget) -> bool {
        match target {
            BookingTarget::Hotel(id) => self.hotels.contains_key(&id),
            BookingTarget::Restaurant(id) => self.restaurants.contains_key(&id),
            BookingTarget::Tour(id) => self.tours.contains_key(&id),
            BookingTarget::Vehicle(id) => self.vehicles.contains_key(&id),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn missing_reference() -> AppError {
    AppError::BadRequest("A referenced record does not exist".to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_user(&self, email: &str, role: Role, status: Option<RegistrationStatus>) -> User {
        let mut tables = self.tables.write().await;
        let id = tables.id();
        let user = User {
            user_id: id,
            email: email.to_string(),
            password_hash: String::new(),
            first_name: Some(format!("First{}", id)),
            last_name: Some(format!("Last{}", id)),
            phone_number: None,
            image: Some(format!("avatar{}.png", id)),
            description: None,
            role,
            registration_status: status,
            created_at: Utc::now(),
        };
        tables.users.insert(id, user.clone());
        user
    }

    /// Feedback with an explicit creation time, for ordering tests
    pub async fn seed_feedback(
        &self,
        user_id: i32,
        parent_id: Option<i32>,
        content: &str,
        created_date: DateTime<Utc>,
    ) -> Feedback {
        let mut tables = self.tables.write().await;
        let id = tables.id();
        let feedback = Feedback {
            feedback_id: id,
            user_id,
            parent_id,
            content: content.to_string(),
            created_date,
            modified_date: None,
        };
        tables.feedbacks.insert(id, feedback.clone());
        feedback
    }

    pub async fn seed_hotel(&self, name: &str) -> Hotel {
        let mut tables = self.tables.write().await;
        let id = tables.id();
        let hotel = Hotel {
            hotel_id: id,
            hotel_name: name.to_string(),
            image: None,
            location: Some("Da Nang".to_string()),
            price_per_night: Some(80.0),
            check_in_time: None,
            check_out_time: None,
            contact_number: None,
            description: None,
            rating: Some(4.0),
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        tables.hotels.insert(id, hotel.clone());
        hotel
    }

    pub async fn seed_vehicle(&self, name: &str) -> Vehicle {
        let mut tables = self.tables.write().await;
        let id = tables.id();
        let vehicle = Vehicle {
            vehicle_id: id,
            vehicle_name: name.to_string(),
            vehicle_type: Some("Bus".to_string()),
            image: None,
            location: None,
            price: Some(15.0),
            seats: Some(29),
            departure_time: None,
            contact_number: None,
            description: None,
            rating: None,
            created_at: None,
            updated_at: None,
        };
        tables.vehicles.insert(id, vehicle.clone());
        vehicle
    }

    pub async fn registration_status(&self, user_id: i32) -> Option<RegistrationStatus> {
        self.tables
            .read()
            .await
            .users
            .get(&user_id)
            .and_then(|u| u.registration_status)
    }
}

#[async_trait]
impl TourRepository for MemoryStore {
    async fn list(&self, name_contains: Option<&str>) -> ApiResult<Vec<Tour>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tours
            .values()
            .filter(|t| name_contains.map_or(true, |s| contains_ci(&t.name, s)))
            .cloned()
            .collect())
    }

    async fn find(&self, id: i32) -> ApiResult<Option<Tour>> {
        Ok(self.tables.read().await.tours.get(&id).cloned())
    }

    async fn exists(&self, id: i32) -> ApiResult<bool> {
        Ok(self.tables.read().await.tours.contains_key(&id))
    }

    async fn insert(&self, tour: NewTour) -> ApiResult<Tour> {
        let mut tables = self.tables.write().await;
        let id = tables.id();
        let tour = Tour {
            tour_id: id,
            name: tour.name,
            description: tour.description,
            image: tour.image,
            price: tour.price,
            duration: None,
            air_plane: None,
            rating: None,
            itinerary: None,
            inclusions: None,
            exclusions: None,
            group_size: None,
            guide: None,
            create_date: Some(tour.create_date),
            hotel_id: None,
            restaurant_id: None,
            staff_id: None,
            vehicle_id: None,
            row_version: 1,
        };
        tables.tours.insert(id, tour.clone());
        Ok(tour)
    }

    async fn update(
        &self,
        id: i32,
        expected_version: i32,
        changes: TourChanges,
    ) -> ApiResult<Option<Tour>> {
        let mut tables = self.tables.write().await;
        let Some(tour) = tables
            .tours
            .get_mut(&id)
            .filter(|t| t.row_version == expected_version)
        else {
            return Ok(None);
        };

        tour.name = changes.name;
        tour.description = changes.description;
        tour.image = changes.image;
        tour.price = changes.price;
        tour.duration = changes.duration;
        tour.air_plane = changes.air_plane;
        tour.rating = changes.rating;
        tour.itinerary = changes.itinerary;
        tour.inclusions = changes.inclusions;
        tour.exclusions = changes.exclusions;
        tour.group_size = changes.group_size;
        tour.guide = changes.guide;
        tour.row_version += 1;
        Ok(Some(tour.clone()))
    }

    async fn delete(&self, id: i32) -> ApiResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.bookings.values().any(|b| b.tour_id == Some(id)) {
            return Err(AppError::Conflict(
                "The tour is still referenced by bookings and cannot be deleted".to_string(),
            ));
        }
        Ok(tables.tours.remove(&id).is_some())
    }
}

#[async_trait]
impl TourGuideRepository for MemoryStore {
    async fn list(&self, search: Option<&str>) -> ApiResult<Vec<TourGuide>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tour_guides
            .values()
            .filter(|g| {
                search.map_or(true, |s| {
                    contains_ci(&g.email, s)
                        || contains_ci(&g.first_name, s)
                        || contains_ci(&g.last_name, s)
                        || contains_ci(&format!("{} {}", g.first_name, g.last_name), s)
                        || g.phone_number.contains(s)
                })
            })
            .cloned()
            .collect())
    }

    async fn find(&self, id: i32) -> ApiResult<Option<TourGuide>> {
        Ok(self.tables.read().await.tour_guides.get(&id).cloned())
    }

    async fn insert(&self, guide: TourGuideRecord) -> ApiResult<TourGuide> {
        let mut tables = self.tables.write().await;
        let id = tables.id();
        let guide = TourGuide {
            tour_guide_id: id,
            first_name: guide.first_name,
            last_name: guide.last_name,
            phone_number: guide.phone_number,
            email: guide.email,
            description: guide.description,
            image: guide.image,
            rate: guide.rate,
        };
        tables.tour_guides.insert(id, guide.clone());
        Ok(guide)
    }

    async fn update(&self, id: i32, guide: TourGuideRecord) -> ApiResult<Option<TourGuide>> {
        let mut tables = self.tables.write().await;
        Ok(tables.tour_guides.get_mut(&id).map(|existing| {
            existing.first_name = guide.first_name;
            existing.last_name = guide.last_name;
            existing.phone_number = guide.phone_number;
            existing.email = guide.email;
            existing.description = guide.description;
            existing.image = guide.image;
            existing.rate = guide.rate;
            existing.clone()
        }))
    }
}

#[async_trait]
impl FeedbackRepository for MemoryStore {
    async fn page_top_level(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> ApiResult<(Vec<FeedbackWithAuthor>, i64)> {
        let tables = self.tables.read().await;
        let mut matching: Vec<FeedbackWithAuthor> = tables
            .feedbacks
            .values()
            .filter(|f| f.parent_id.is_none())
            .map(|f| {
                let author = tables.users.get(&f.user_id);
                FeedbackWithAuthor {
                    feedback: f.clone(),
                    author_first_name: author.and_then(|u| u.first_name.clone()),
                    author_last_name: author.and_then(|u| u.last_name.clone()),
                    author_image: author.and_then(|u| u.image.clone()),
                }
            })
            .filter(|f| {
                search.map_or(true, |s| {
                    contains_ci(&f.feedback.content, s)
                        || f.author_first_name.as_deref().is_some_and(|n| contains_ci(n, s))
                        || f.author_last_name.as_deref().is_some_and(|n| contains_ci(n, s))
                })
            })
            .collect();

        matching.sort_by(|a, b| {
            b.feedback
                .created_date
                .cmp(&a.feedback.created_date)
                .then(b.feedback.feedback_id.cmp(&a.feedback.feedback_id))
        });

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.page_size as usize)
            .collect();
        Ok((items, total))
    }

    async fn find(&self, id: i32) -> ApiResult<Option<Feedback>> {
        Ok(self.tables.read().await.feedbacks.get(&id).cloned())
    }

    async fn replies(&self, parent_id: i32) -> ApiResult<Vec<Feedback>> {
        let tables = self.tables.read().await;
        let mut replies: Vec<Feedback> = tables
            .feedbacks
            .values()
            .filter(|f| f.parent_id == Some(parent_id))
            .cloned()
            .collect();
        replies.sort_by(|a, b| {
            a.created_date
                .cmp(&b.created_date)
                .then(a.feedback_id.cmp(&b.feedback_id))
        });
        Ok(replies)
    }

    async fn insert(&self, feedback: NewFeedback) -> ApiResult<Feedback> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&feedback.user_id) {
            return Err(missing_reference());
        }
        if let Some(parent) = feedback.parent_id {
            if !tables.feedbacks.contains_key(&parent) {
                return Err(missing_reference());
            }
        }

        let id = tables.id();
        let feedback = Feedback {
            feedback_id: id,
            user_id: feedback.user_id,
            parent_id: feedback.parent_id,
            content: feedback.content,
            created_date: Utc::now(),
            modified_date: None,
        };
        tables.feedbacks.insert(id, feedback.clone());
        Ok(feedback)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find(&self, id: i32) -> ApiResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> ApiResult<User> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let id = tables.id();
        let user = User {
            user_id: id,
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            phone_number: user.phone_number,
            image: None,
            description: None,
            role: user.role,
            registration_status: user.registration_status,
            created_at: Utc::now(),
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn pending_travel_agents(&self) -> ApiResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .filter(|u| {
                u.role == Role::TravelAgent
                    && u.registration_status == Some(RegistrationStatus::Pending)
            })
            .cloned()
            .collect())
    }

    async fn set_registration_status(
        &self,
        id: i32,
        status: RegistrationStatus,
    ) -> ApiResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(match tables.users.get_mut(&id) {
            Some(user) => {
                user.registration_status = Some(status);
                true
            }
            None => false,
        })
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn insert(&self, booking: NewBooking) -> ApiResult<Booking> {
        let mut tables = self.tables.write().await;
        if !tables.target_exists(booking.target) {
            return Err(missing_reference());
        }
        if let Some(user_id) = booking.user_id {
            if !tables.users.contains_key(&user_id) {
                return Err(missing_reference());
            }
        }

        let id = tables.id();
        let booking = Booking {
            booking_id: id,
            user_id: booking.user_id,
            hotel_id: booking.target.hotel_id(),
            restaurant_id: booking.target.restaurant_id(),
            tour_id: booking.target.tour_id(),
            vehicle_id: booking.target.vehicle_id(),
            start_date: booking.start_date,
            end_date: booking.end_date,
            name: booking.name,
            phone: booking.phone,
            message: booking.message,
            created_at: Utc::now(),
        };
        tables.bookings.insert(id, booking.clone());
        Ok(booking)
    }

    async fn list_for_user(&self, user_id: i32) -> ApiResult<Vec<Booking>> {
        let tables = self.tables.read().await;
        let mut bookings: Vec<Booking> = tables
            .bookings
            .values()
            .filter(|b| b.user_id == Some(user_id))
            .cloned()
            .collect();
        bookings.sort_by(|a, b| {
            b.start_date
                .cmp(&a.start_date)
                .then(b.booking_id.cmp(&a.booking_id))
        });
        Ok(bookings)
    }
}

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn list_hotels(&self, name_contains: Option<&str>) -> ApiResult<Vec<Hotel>> {
        let tables = self.tables.read().await;
        Ok(tables
            .hotels
            .values()
            .filter(|h| name_contains.map_or(true, |s| contains_ci(&h.hotel_name, s)))
            .cloned()
            .collect())
    }

    async fn find_hotel(&self, id: i32) -> ApiResult<Option<Hotel>> {
        Ok(self.tables.read().await.hotels.get(&id).cloned())
    }

    async fn list_restaurants(&self, name_contains: Option<&str>) -> ApiResult<Vec<Restaurant>> {
        let tables = self.tables.read().await;
        Ok(tables
            .restaurants
            .values()
            .filter(|r| name_contains.map_or(true, |s| contains_ci(&r.restaurant_name, s)))
            .cloned()
            .collect())
    }

    async fn find_restaurant(&self, id: i32) -> ApiResult<Option<Restaurant>> {
        Ok(self.tables.read().await.restaurants.get(&id).cloned())
    }

    async fn list_vehicles(&self, name_contains: Option<&str>) -> ApiResult<Vec<Vehicle>> {
        let tables = self.tables.read().await;
        Ok(tables
            .vehicles
            .values()
            .filter(|v| name_contains.map_or(true, |s| contains_ci(&v.vehicle_name, s)))
            .cloned()
            .collect())
    }

    async fn find_vehicle(&self, id: i32) -> ApiResult<Option<Vehicle>> {
        Ok(self.tables.read().await.vehicles.get(&id).cloned())
    }
}
