//! Booking route handlers

use crate::auth::{CurrentUser, MaybeUser};
use crate::error::ApiResult;
use crate::forms::invalid;
use crate::models::{Booking, BookingForm, ViewResponse};
use crate::state::SharedState;
use axum::{extract::State, response::Redirect, Form, Json};
use tracing::info;

/// POST /Booking/Create
pub async fn create_booking(
    State(state): State<SharedState>,
    MaybeUser(claims): MaybeUser,
    Form(form): Form<BookingForm>,
) -> ApiResult<Redirect> {
    let user_id = claims.map(|c| c.sub);
    let new_booking = form
        .clone()
        .into_new_booking(user_id)
        .map_err(|errors| invalid(BookingForm::VIEW, errors, &form))?;

    let booking = state.bookings.insert(new_booking).await?;
    info!("Booking {} created for user {:?}", booking.booking_id, booking.user_id);

    Ok(match user_id {
        Some(_) => Redirect::to("/Booking/MyBookings"),
        None => Redirect::to("/"),
    })
}

/// GET /Booking/MyBookings
pub async fn my_bookings(
    State(state): State<SharedState>,
    CurrentUser(claims): CurrentUser,
) -> ApiResult<Json<ViewResponse<Vec<Booking>>>> {
    let bookings = state.bookings.list_for_user(claims.sub).await?;
    Ok(Json(ViewResponse::new("MyBookings", bookings)))
}
