//! Bookings of a hotel, restaurant, tour or vehicle

use crate::error::FieldErrors;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: i32,
    pub user_id: Option<i32>,
    pub hotel_id: Option<i32>,
    pub restaurant_id: Option<i32>,
    pub tour_id: Option<i32>,
    pub vehicle_id: Option<i32>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub name: String,
    pub phone: String,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The single resource a booking reserves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingTarget {
    Hotel(i32),
    Restaurant(i32),
    Tour(i32),
    Vehicle(i32),
}

impl BookingTarget {
    pub fn hotel_id(&self) -> Option<i32> {
        match self {
            BookingTarget::Hotel(id) => Some(*id),
            _ => None,
        }
    }

    pub fn restaurant_id(&self) -> Option<i32> {
        match self {
            BookingTarget::Restaurant(id) => Some(*id),
            _ => None,
        }
    }

    pub fn tour_id(&self) -> Option<i32> {
        match self {
            BookingTarget::Tour(id) => Some(*id),
            _ => None,
        }
    }

    pub fn vehicle_id(&self) -> Option<i32> {
        match self {
            BookingTarget::Vehicle(id) => Some(*id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: Option<i32>,
    pub target: BookingTarget,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub name: String,
    pub phone: String,
    pub message: Option<String>,
}

/// Body of `POST /Booking/Create`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct BookingForm {
    pub hotel_id: Option<i32>,
    pub restaurant_id: Option<i32>,
    pub tour_id: Option<i32>,
    pub vehicle_id: Option<i32>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(min = 1, max = 50, message = "Name is required (at most 50 characters)."))]
    pub name: String,
    #[validate(regex(path = *crate::models::PHONE_RE, message = "Phone number must be 9 or 10 digits."))]
    pub phone: String,
    #[validate(length(max = 200, message = "Message must be at most 200 characters."))]
    pub message: Option<String>,
}

impl BookingForm {
    pub const VIEW: &'static str = "CreateBooking";

    /// Exactly one of the four target ids must be set
    pub fn target(&self, errors: &mut FieldErrors) -> Option<BookingTarget> {
        let targets: Vec<BookingTarget> = [
            self.hotel_id.map(BookingTarget::Hotel),
            self.restaurant_id.map(BookingTarget::Restaurant),
            self.tour_id.map(BookingTarget::Tour),
            self.vehicle_id.map(BookingTarget::Vehicle),
        ]
        .into_iter()
        .flatten()
        .collect();

        match targets.as_slice() {
            [target] => Some(*target),
            [] => {
                errors.add("Target", "Choose a hotel, restaurant, tour or vehicle to book.");
                None
            }
            _ => {
                errors.add("Target", "A booking can reserve only one hotel, restaurant, tour or vehicle.");
                None
            }
        }
    }

    /// Validate and split into the record to insert
    pub fn into_new_booking(self, user_id: Option<i32>) -> Result<NewBooking, FieldErrors> {
        let mut errors = FieldErrors::new();
        let target = self.target(&mut errors);
        if let Err(validation) = self.validate() {
            errors.merge_validation(&validation);
        }
        if self.end_date < self.start_date {
            errors.add("EndDate", "End date cannot be before the start date.");
        }

        match target {
            Some(target) if errors.is_empty() => Ok(NewBooking {
                user_id,
                target,
                start_date: self.start_date,
                end_date: self.end_date,
                name: self.name.trim().to_string(),
                phone: self.phone.trim().to_string(),
                message: self.message.filter(|m| !m.trim().is_empty()),
            }),
            _ => Err(errors),
        }
    }
}
