//! Admin route handlers
//!
//! Tour guide management, feedback moderation and travel-agent registration
//! approval. Everything except the dashboard requires an administrator.

use crate::auth::AdminUser;
use crate::error::{ApiResult, AppError, FieldErrors};
use crate::forms::{validate_body, FormData};
use crate::media::store_optional;
use crate::models::{
    search_term, FeedbackForm, FeedbackManagementQuery, FeedbackWithAuthor, NewFeedback,
    PageRequest, PagedResult, RegistrationDecisionQuery, ReplyFeedbackView, SearchQuery,
    TourGuide, TourGuideForm, User, ViewResponse,
};
use crate::registration::{self, Decision};
use crate::state::SharedState;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::Redirect,
    Form, Json,
};
use serde::Serialize;
use tracing::{debug, info};

const IMAGE_FIELD: &str = "imageFile";
const GUIDES_URL: &str = "/Admin/TourGuideManagement";
const REGISTRATIONS_URL: &str = "/Admin/ListRegisterTravelAgent";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub links: Vec<&'static str>,
}

/// GET /Admin/Index
pub async fn index() -> Json<ViewResponse<Dashboard>> {
    Json(ViewResponse::new(
        "Index",
        Dashboard {
            links: vec![
                GUIDES_URL,
                "/Admin/FeedbackManagement",
                REGISTRATIONS_URL,
                "/Tours/ListTour",
            ],
        },
    ))
}

/// GET /Admin/CreateTourGuide
pub async fn create_tour_guide_form(_admin: AdminUser) -> Json<ViewResponse<TourGuideForm>> {
    Json(ViewResponse::new(
        TourGuideForm::CREATE_VIEW,
        TourGuideForm::default(),
    ))
}

/// POST /Admin/CreateTourGuide
pub async fn create_tour_guide(
    State(state): State<SharedState>,
    AdminUser(claims): AdminUser,
    multipart: Multipart,
) -> ApiResult<Redirect> {
    let mut form = FormData::from_multipart(multipart, IMAGE_FIELD).await?;
    let bound = TourGuideForm::bind_create(&form)?;

    let mut errors = FieldErrors::new();
    let image = form.take_image(IMAGE_FIELD, &mut errors);
    let bound = form.finish(TourGuideForm::CREATE_VIEW, bound, errors)?;

    let image = store_optional(state.images.as_ref(), image).await?;
    let guide = state.tour_guides.insert(bound.into_record(image)).await?;

    info!(
        "Tour guide created: {} {} (id: {}) by admin {}",
        guide.first_name, guide.last_name, guide.tour_guide_id, claims.sub
    );
    Ok(Redirect::to(GUIDES_URL))
}

/// GET /Admin/EditTourGuide/{id}
pub async fn edit_tour_guide_form(
    State(state): State<SharedState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<ViewResponse<TourGuide>>> {
    let guide = state
        .tour_guides
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tour guide {} not found", id)))?;
    Ok(Json(ViewResponse::new(TourGuideForm::EDIT_VIEW, guide)))
}

/// POST|PUT /Admin/EditTourGuide/{id}
pub async fn edit_tour_guide(
    State(state): State<SharedState>,
    AdminUser(claims): AdminUser,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> ApiResult<Redirect> {
    let mut form = FormData::from_multipart(multipart, IMAGE_FIELD).await?;
    let bound = TourGuideForm::bind_edit(&form)?;

    let mut errors = FieldErrors::new();
    let image = form.take_image(IMAGE_FIELD, &mut errors);
    let bound = form.finish(TourGuideForm::EDIT_VIEW, bound, errors)?;

    if state.tour_guides.find(id).await?.is_none() {
        return Err(AppError::NotFound(format!("Tour guide {} not found", id)));
    }

    // A new upload replaces the picture, otherwise the posted reference stays
    let image = match store_optional(state.images.as_ref(), image).await? {
        Some(uploaded) => Some(uploaded),
        None => bound.image.clone(),
    };

    let guide = state
        .tour_guides
        .update(id, bound.into_record(image))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tour guide {} not found", id)))?;

    info!(
        "Tour guide updated: {} {} (id: {}) by admin {}",
        guide.first_name, guide.last_name, guide.tour_guide_id, claims.sub
    );
    Ok(Redirect::to(GUIDES_URL))
}

/// GET /Admin/TourGuideManagement?searchQuery=
pub async fn tour_guide_management(
    State(state): State<SharedState>,
    _admin: AdminUser,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<ViewResponse<Vec<TourGuide>>>> {
    debug!("Listing tour guides matching {:?}", query.search_query);
    let guides = state
        .tour_guides
        .list(search_term(&query.search_query))
        .await?;
    Ok(Json(
        ViewResponse::new("TourGuideManagement", guides).with_search(query.search_query),
    ))
}

/// GET /Admin/FeedbackManagement?searchQuery=&page=&pageSize=
pub async fn feedback_management(
    State(state): State<SharedState>,
    _admin: AdminUser,
    Query(query): Query<FeedbackManagementQuery>,
) -> ApiResult<Json<ViewResponse<PagedResult<FeedbackWithAuthor>>>> {
    let page = PageRequest::new(query.page, query.page_size);
    debug!(
        "Listing feedback page {} (size {}) matching {:?}",
        page.page, page.page_size, query.search_query
    );

    let (items, total) = state
        .feedbacks
        .page_top_level(search_term(&query.search_query), page)
        .await?;

    Ok(Json(
        ViewResponse::new(
            "FeedbackManagement",
            PagedResult::new(items, total, page.page, page.page_size),
        )
        .with_search(query.search_query),
    ))
}

/// GET /Admin/ReplyFeedback/{id}
pub async fn reply_feedback_form(
    State(state): State<SharedState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<ViewResponse<ReplyFeedbackView>>> {
    let feedback = state
        .feedbacks
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Feedback {} not found", id)))?;

    let author = state
        .users
        .find(feedback.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author of feedback {} not found", id)))?;

    let replies = state.feedbacks.replies(id).await?;

    Ok(Json(ViewResponse::new(
        "ReplyFeedback",
        ReplyFeedbackView {
            feedback,
            user_avatar: author.image,
            user_first_name: author.first_name,
            user_last_name: author.last_name,
            replies,
        },
    )))
}

/// POST /Admin/ReplyFeedback/{id}
pub async fn reply_feedback(
    State(state): State<SharedState>,
    AdminUser(claims): AdminUser,
    Path(id): Path<i32>,
    Form(form): Form<FeedbackForm>,
) -> ApiResult<Redirect> {
    let form = form.trimmed();
    validate_body("ReplyFeedback", &form)?;

    if state.feedbacks.find(id).await?.is_none() {
        return Err(AppError::NotFound(format!("Feedback {} not found", id)));
    }

    let reply = state
        .feedbacks
        .insert(NewFeedback {
            user_id: claims.sub,
            parent_id: Some(id),
            content: form.content,
        })
        .await?;

    info!("Admin {} replied to feedback {} (reply id: {})", claims.sub, id, reply.feedback_id);
    Ok(Redirect::to(&format!("/Admin/ReplyFeedback/{}", id)))
}

/// GET /Admin/ListRegisterTravelAgent
pub async fn list_register_travel_agent(
    State(state): State<SharedState>,
    _admin: AdminUser,
) -> ApiResult<Json<ViewResponse<Vec<User>>>> {
    let pending = state.users.pending_travel_agents().await?;
    Ok(Json(ViewResponse::new("ListRegisterTravelAgent", pending)))
}

/// POST /Admin/RequestAccept?id=&email=
pub async fn request_accept(
    State(state): State<SharedState>,
    AdminUser(claims): AdminUser,
    Query(query): Query<RegistrationDecisionQuery>,
) -> ApiResult<Redirect> {
    debug!("Admin {} accepting registration of user {}", claims.sub, query.id);
    registration::decide(&state, query.id, query.email.as_deref(), Decision::Accept).await?;
    Ok(Redirect::to(REGISTRATIONS_URL))
}

/// POST /Admin/RequestUnaccept?id=&email=
pub async fn request_unaccept(
    State(state): State<SharedState>,
    AdminUser(claims): AdminUser,
    Query(query): Query<RegistrationDecisionQuery>,
) -> ApiResult<Redirect> {
    debug!("Admin {} rejecting registration of user {}", claims.sub, query.id);
    registration::decide(&state, query.id, query.email.as_deref(), Decision::Unaccept).await?;
    Ok(Redirect::to(REGISTRATIONS_URL))
}
