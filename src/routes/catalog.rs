//! Public browsing of hotels, restaurants and vehicles

use crate::error::{ApiResult, AppError};
use crate::models::{search_term, Hotel, Restaurant, SearchStringQuery, Vehicle, ViewResponse};
use crate::state::SharedState;
use axum::{
    extract::{Path, Query, State},
    Json,
};

/// GET /Hotels/ListHotel?searchString=
pub async fn list_hotel(
    State(state): State<SharedState>,
    Query(query): Query<SearchStringQuery>,
) -> ApiResult<Json<ViewResponse<Vec<Hotel>>>> {
    let hotels = state
        .catalog
        .list_hotels(search_term(&query.search_string))
        .await?;
    Ok(Json(
        ViewResponse::new("ListHotel", hotels).with_search(query.search_string),
    ))
}

/// GET /Hotels/HotelDetails/{id}
pub async fn hotel_details(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ViewResponse<Hotel>>> {
    let hotel = state
        .catalog
        .find_hotel(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Hotel {} not found", id)))?;
    Ok(Json(ViewResponse::new("HotelDetails", hotel)))
}

/// GET /Restaurants/ListRestaurant?searchString=
pub async fn list_restaurant(
    State(state): State<SharedState>,
    Query(query): Query<SearchStringQuery>,
) -> ApiResult<Json<ViewResponse<Vec<Restaurant>>>> {
    let restaurants = state
        .catalog
        .list_restaurants(search_term(&query.search_string))
        .await?;
    Ok(Json(
        ViewResponse::new("ListRestaurant", restaurants).with_search(query.search_string),
    ))
}

/// GET /Restaurants/RestaurantDetails/{id}
pub async fn restaurant_details(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ViewResponse<Restaurant>>> {
    let restaurant = state
        .catalog
        .find_restaurant(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Restaurant {} not found", id)))?;
    Ok(Json(ViewResponse::new("RestaurantDetails", restaurant)))
}

/// GET /Vehicles/ListVehicle?searchString=
pub async fn list_vehicle(
    State(state): State<SharedState>,
    Query(query): Query<SearchStringQuery>,
) -> ApiResult<Json<ViewResponse<Vec<Vehicle>>>> {
    let vehicles = state
        .catalog
        .list_vehicles(search_term(&query.search_string))
        .await?;
    Ok(Json(
        ViewResponse::new("ListVehicle", vehicles).with_search(query.search_string),
    ))
}

/// GET /Vehicles/VehicleDetails/{id}
pub async fn vehicle_details(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ViewResponse<Vehicle>>> {
    let vehicle = state
        .catalog
        .find_vehicle(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vehicle {} not found", id)))?;
    Ok(Json(ViewResponse::new("VehicleDetails", vehicle)))
}
