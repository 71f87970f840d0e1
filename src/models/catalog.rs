//! Bookable resources: hotels, restaurants and vehicles

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub hotel_id: i32,
    pub hotel_name: String,
    pub image: Option<String>,
    pub location: Option<String>,
    pub price_per_night: Option<f64>,
    pub check_in_time: Option<NaiveTime>,
    pub check_out_time: Option<NaiveTime>,
    pub contact_number: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub restaurant_id: i32,
    pub restaurant_name: String,
    pub image: Option<String>,
    pub location: Option<String>,
    pub average_price: Option<f64>,
    pub price_list: Option<String>,
    pub opened_time: Option<NaiveTime>,
    pub closed_time: Option<NaiveTime>,
    pub contact_number: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub parking: Option<String>,
    pub rating: Option<f64>,
    pub regulations: Option<String>,
    pub utilities: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Owning travel agent
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub vehicle_id: i32,
    pub vehicle_name: String,
    pub vehicle_type: Option<String>,
    pub image: Option<String>,
    pub location: Option<String>,
    pub price: Option<f64>,
    pub seats: Option<i32>,
    pub departure_time: Option<NaiveTime>,
    pub contact_number: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// `?searchString=` shared by every catalog and tour listing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStringQuery {
    pub search_string: Option<String>,
}

/// `?searchQuery=` used by the admin listings
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub search_query: Option<String>,
}
