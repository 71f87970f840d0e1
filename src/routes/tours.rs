//! Tour route handlers
//!
//! Listing and details are public; creating, editing and deleting need an
//! administrator or travel agent session.

use crate::auth::StaffUser;
use crate::error::{ApiResult, AppError, FieldErrors};
use crate::forms::FormData;
use crate::media::store_optional;
use crate::models::{
    search_term, CreateTourForm, EditTourForm, NewTour, SearchStringQuery, Tour, ViewResponse,
};
use crate::state::SharedState;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::Redirect,
    Json,
};
use chrono::Utc;
use tracing::{debug, info};

const LIST_URL: &str = "/Tours/ListTour";
const IMAGE_FIELD: &str = "image";

async fn load_tour(state: &SharedState, id: i32) -> ApiResult<Tour> {
    state
        .tours
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tour {} not found", id)))
}

/// GET /Tours/ListTour?searchString=
pub async fn list_tour(
    State(state): State<SharedState>,
    Query(query): Query<SearchStringQuery>,
) -> ApiResult<Json<ViewResponse<Vec<Tour>>>> {
    debug!("Listing tours matching {:?}", query.search_string);
    let tours = state.tours.list(search_term(&query.search_string)).await?;
    Ok(Json(
        ViewResponse::new("ListTour", tours).with_search(query.search_string),
    ))
}

/// GET /Tours/TourDetails/{id}
pub async fn tour_details(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ViewResponse<Tour>>> {
    let tour = load_tour(&state, id).await?;
    Ok(Json(ViewResponse::new("TourDetails", tour)))
}

/// GET /Tours/CreateTour
pub async fn create_tour_form(_staff: StaffUser) -> Json<ViewResponse<CreateTourForm>> {
    Json(ViewResponse::new(
        CreateTourForm::VIEW,
        CreateTourForm::default(),
    ))
}

/// POST /Tours/CreateTour
pub async fn create_tour(
    State(state): State<SharedState>,
    StaffUser(claims): StaffUser,
    multipart: Multipart,
) -> ApiResult<Redirect> {
    let mut form = FormData::from_multipart(multipart, IMAGE_FIELD).await?;
    let bound = CreateTourForm::bind(&form)?;

    let mut errors = FieldErrors::new();
    let image = form.take_image(IMAGE_FIELD, &mut errors);
    let bound = form.finish(CreateTourForm::VIEW, bound, errors)?;

    let image = store_optional(state.images.as_ref(), image).await?;

    let tour = state
        .tours
        .insert(NewTour {
            name: bound.name,
            description: bound.description,
            price: bound.price,
            image,
            create_date: Utc::now().date_naive(),
        })
        .await?;

    info!("Tour created: {} (id: {}) by user {}", tour.name, tour.tour_id, claims.sub);
    Ok(Redirect::to(LIST_URL))
}

/// GET /Tours/EditTour/{id}
pub async fn edit_tour_form(
    State(state): State<SharedState>,
    _staff: StaffUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<ViewResponse<Tour>>> {
    let tour = load_tour(&state, id).await?;
    Ok(Json(ViewResponse::new(EditTourForm::VIEW, tour)))
}

/// POST /Tours/EditTour/{id}
pub async fn edit_tour(
    State(state): State<SharedState>,
    StaffUser(claims): StaffUser,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> ApiResult<Redirect> {
    let mut form = FormData::from_multipart(multipart, IMAGE_FIELD).await?;

    // The route id and the posted id must agree; a missing id never does
    let posted_id = form.trimmed("TourId").parse::<i32>().unwrap_or_default();
    if posted_id != id {
        return Err(AppError::NotFound(format!("Tour {} not found", posted_id)));
    }

    let bound = EditTourForm::bind(&form)?;
    let mut errors = FieldErrors::new();
    let image = form.take_image(IMAGE_FIELD, &mut errors);
    let bound = form.finish(EditTourForm::VIEW, bound, errors)?;

    let row_version = bound.row_version;
    let stale = || {
        AppError::Conflict(format!(
            "Tour {} was modified by someone else, reload and try again",
            id
        ))
    };

    // Nothing gets uploaded for an edit that cannot be applied
    if load_tour(&state, id).await?.row_version != row_version {
        return Err(stale());
    }

    let mut changes = bound.into_changes();
    if let Some(uploaded) = store_optional(state.images.as_ref(), image).await? {
        changes.image = Some(uploaded);
    }

    match state.tours.update(id, row_version, changes).await? {
        Some(tour) => {
            info!(
                "Tour updated: {} (id: {}, version {}) by user {}",
                tour.name, tour.tour_id, tour.row_version, claims.sub
            );
            Ok(Redirect::to(LIST_URL))
        }
        None if state.tours.exists(id).await? => Err(stale()),
        None => Err(AppError::NotFound(format!("Tour {} not found", id))),
    }
}

/// GET /Tours/DeleteTour/{id}
pub async fn delete_tour_form(
    State(state): State<SharedState>,
    _staff: StaffUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<ViewResponse<Tour>>> {
    let tour = load_tour(&state, id).await?;
    Ok(Json(ViewResponse::new("DeleteTour", tour)))
}

/// POST /Tours/DeleteTour/{id}
pub async fn delete_tour(
    State(state): State<SharedState>,
    StaffUser(claims): StaffUser,
    Path(id): Path<i32>,
) -> ApiResult<Redirect> {
    if !state.tours.delete(id).await? {
        return Err(AppError::NotFound(format!("Tour {} not found", id)));
    }

    info!("Tour {} deleted by user {}", id, claims.sub);
    Ok(Redirect::to(LIST_URL))
}
