//! Application state management
//!
//! Contains shared state accessible across all handlers.

use crate::auth::SessionKeys;
use crate::db::{
    BookingRepository, CatalogRepository, FeedbackRepository, TourGuideRepository,
    TourRepository, UserRepository,
};
use crate::mailer::Mailer;
use crate::media::ImageStore;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    pub tours: Arc<dyn TourRepository>,
    pub tour_guides: Arc<dyn TourGuideRepository>,
    pub feedbacks: Arc<dyn FeedbackRepository>,
    pub users: Arc<dyn UserRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub catalog: Arc<dyn CatalogRepository>,

    /// Where uploaded pictures are stored
    pub images: Arc<dyn ImageStore>,

    /// Registration notifications
    pub mailer: Arc<dyn Mailer>,

    /// Session token signing and cookie settings
    pub sessions: SessionKeys,
}

impl AppState {
    /// Wire every repository to the same backing store
    pub fn new<S>(
        store: Arc<S>,
        images: Arc<dyn ImageStore>,
        mailer: Arc<dyn Mailer>,
        sessions: SessionKeys,
    ) -> Self
    where
        S: TourRepository
            + TourGuideRepository
            + FeedbackRepository
            + UserRepository
            + BookingRepository
            + CatalogRepository
            + 'static,
    {
        Self {
            tours: store.clone(),
            tour_guides: store.clone(),
            feedbacks: store.clone(),
            users: store.clone(),
            bookings: store.clone(),
            catalog: store,
            images,
            mailer,
            sessions,
        }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
