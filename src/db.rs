//! Data access layer
//!
//! Repository traits per entity, the PostgreSQL pool and the schema bootstrap.
//! Every mutating call is a single statement, so each controller action
//! commits exactly one unit of work.

#[cfg(test)]
pub mod memory;
pub mod postgres;
pub mod queries;

use crate::config::DatabaseConfig;
use crate::error::ApiResult;
use crate::models::{
    Booking, Feedback, FeedbackWithAuthor, Hotel, NewBooking, NewFeedback, NewTour, NewUser,
    PageRequest, RegistrationStatus, Restaurant, Tour, TourChanges, TourGuide, TourGuideRecord,
    User, Vehicle,
};
use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use tracing::info;

#[async_trait]
pub trait TourRepository: Send + Sync {
    /// Tours whose name contains `name_contains`, all tours when None
    async fn list(&self, name_contains: Option<&str>) -> ApiResult<Vec<Tour>>;
    async fn find(&self, id: i32) -> ApiResult<Option<Tour>>;
    async fn exists(&self, id: i32) -> ApiResult<bool>;
    async fn insert(&self, tour: NewTour) -> ApiResult<Tour>;
    /// None when no row matched both `id` and `expected_version`
    async fn update(
        &self,
        id: i32,
        expected_version: i32,
        changes: TourChanges,
    ) -> ApiResult<Option<Tour>>;
    /// false when there was nothing to delete
    async fn delete(&self, id: i32) -> ApiResult<bool>;
}

#[async_trait]
pub trait TourGuideRepository: Send + Sync {
    /// Case-insensitive match on email, names, full name and phone
    async fn list(&self, search: Option<&str>) -> ApiResult<Vec<TourGuide>>;
    async fn find(&self, id: i32) -> ApiResult<Option<TourGuide>>;
    async fn insert(&self, guide: TourGuideRecord) -> ApiResult<TourGuide>;
    async fn update(&self, id: i32, guide: TourGuideRecord) -> ApiResult<Option<TourGuide>>;
}

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// A window of top-level feedback, newest first, plus the total match count
    async fn page_top_level(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> ApiResult<(Vec<FeedbackWithAuthor>, i64)>;
    async fn find(&self, id: i32) -> ApiResult<Option<Feedback>>;
    async fn replies(&self, parent_id: i32) -> ApiResult<Vec<Feedback>>;
    async fn insert(&self, feedback: NewFeedback) -> ApiResult<Feedback>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find(&self, id: i32) -> ApiResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>>;
    async fn insert(&self, user: NewUser) -> ApiResult<User>;
    /// Travel agents whose registration is still pending
    async fn pending_travel_agents(&self) -> ApiResult<Vec<User>>;
    /// false when the user does not exist
    async fn set_registration_status(&self, id: i32, status: RegistrationStatus)
        -> ApiResult<bool>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: NewBooking) -> ApiResult<Booking>;
    async fn list_for_user(&self, user_id: i32) -> ApiResult<Vec<Booking>>;
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_hotels(&self, name_contains: Option<&str>) -> ApiResult<Vec<Hotel>>;
    async fn find_hotel(&self, id: i32) -> ApiResult<Option<Hotel>>;
    async fn list_restaurants(&self, name_contains: Option<&str>) -> ApiResult<Vec<Restaurant>>;
    async fn find_restaurant(&self, id: i32) -> ApiResult<Option<Restaurant>>;
    async fn list_vehicles(&self, name_contains: Option<&str>) -> ApiResult<Vec<Vehicle>>;
    async fn find_vehicle(&self, id: i32) -> ApiResult<Option<Vehicle>>;
}

/// Create the connection pool, with TLS when the server requires it
pub fn create_pool(config: &DatabaseConfig) -> anyhow::Result<Pool> {
    let mut cfg = Config::new();
    cfg.host = Some(config.host.clone());
    cfg.port = Some(config.port);
    cfg.user = Some(config.user.clone());
    cfg.password = Some(config.password.clone());
    cfg.dbname = Some(config.database.clone());
    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    cfg.pool = Some(deadpool_postgres::PoolConfig::new(config.max_pool_size));

    let pool = if config.require_tls {
        let certs = rustls_native_certs::load_native_certs();
        let mut root_store = rustls::RootCertStore::empty();
        for cert in certs.certs {
            root_store.add(cert).ok();
        }

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);
        cfg.create_pool(Some(Runtime::Tokio1), tls)
            .map_err(|e| anyhow::anyhow!("Failed to create TLS pool: {}", e))?
    } else {
        cfg.create_pool(Some(Runtime::Tokio1), tokio_postgres::NoTls)
            .map_err(|e| anyhow::anyhow!("Failed to create pool: {}", e))?
    };

    Ok(pool)
}

/// Check connectivity and create missing tables
pub async fn init_schema(pool: &Pool) -> anyhow::Result<()> {
    let client = pool.get().await?;
    client.query_one("SELECT 1", &[]).await?;

    for statement in queries::SCHEMA {
        client.batch_execute(statement).await?;
    }

    info!("✅ Database tables initialized");
    Ok(())
}
