//! Shared fixtures for handler and workflow tests

use crate::auth::{Role, SessionKeys};
use crate::config::{SessionConfig, Settings};
use crate::db::memory::MemoryStore;
use crate::mailer::{MailError, Mailer, OutgoingEmail};
use crate::media::{ImageStore, UploadError, UploadedImage};
use crate::models::{RegistrationStatus, User};
use crate::routes::create_router;
use crate::state::{AppState, SharedState};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Records every email and optionally fails the send
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Connect("smtp unreachable".to_string()));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// Returns a predictable URL per stored image, or fails every upload
#[derive(Default)]
pub struct RecordingImageStore {
    stored: Mutex<Vec<UploadedImage>>,
    fail: bool,
}

impl RecordingImageStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            stored: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn stored(&self) -> Vec<UploadedImage> {
        self.stored.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStore for RecordingImageStore {
    async fn store(&self, image: UploadedImage) -> Result<String, UploadError> {
        if self.fail {
            return Err(UploadError::Rejected {
                status: 500,
                body: "upstream down".to_string(),
            });
        }
        let mut stored = self.stored.lock().unwrap();
        let url = format!("https://img.test/{}/{}", stored.len() + 1, image.file_name);
        stored.push(image);
        Ok(url)
    }
}

pub fn session_keys() -> SessionKeys {
    SessionKeys::new(&SessionConfig::default())
}

/// State over a fresh in-memory store and a recording image store
pub fn test_state(mailer: Arc<RecordingMailer>) -> (SharedState, Arc<MemoryStore>) {
    test_state_with(RecordingImageStore::new(), mailer)
}

pub fn test_state_with(
    images: Arc<RecordingImageStore>,
    mailer: Arc<RecordingMailer>,
) -> (SharedState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = Arc::new(AppState::new(store.clone(), images, mailer, session_keys()));
    (state, store)
}

/// Everything a router test needs
pub struct TestApp {
    pub router: Router,
    pub state: SharedState,
    pub store: Arc<MemoryStore>,
    pub images: Arc<RecordingImageStore>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(RecordingImageStore::new(), RecordingMailer::new())
    }

    pub fn with(images: Arc<RecordingImageStore>, mailer: Arc<RecordingMailer>) -> Self {
        let (state, store) = test_state_with(images.clone(), mailer.clone());
        let router = create_router(state.clone(), &Settings::default());
        Self {
            router,
            state,
            store,
            images,
            mailer,
        }
    }

    /// `Cookie` header value for a freshly seeded user with the given role;
    /// travel agents come already accepted
    pub async fn login_as(&self, role: Role) -> (User, String) {
        let email = format!("{}-{}@travel.test", role, Utc::now().timestamp_nanos_opt().unwrap_or_default());
        let status = (role == Role::TravelAgent).then_some(RegistrationStatus::Accept);
        let user = self.store.seed_user(&email, role, status).await;
        let cookie = self.cookie_for(&user);
        (user, cookie)
    }

    pub fn cookie_for(&self, user: &User) -> String {
        let token = self.state.sessions.issue(user).unwrap();
        format!("{}={}", self.state.sessions.cookie_name(), token)
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let set_cookie = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        TestResponse {
            status,
            location,
            set_cookie,
            json,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::get(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_multipart(
        &self,
        uri: &str,
        cookie: Option<&str>,
        form: MultipartBody,
    ) -> TestResponse {
        let (content_type, body) = form.finish();
        let mut builder = Request::post(uri).header(header::CONTENT_TYPE, content_type);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    pub async fn post_form(
        &self,
        uri: &str,
        cookie: Option<&str>,
        pairs: &[(&str, &str)],
    ) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        let mut builder = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub set_cookie: Vec<String>,
    pub json: serde_json::Value,
}

/// Hand-built multipart/form-data body
pub struct MultipartBody {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: "travelbook-test-boundary".to_string(),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                self.boundary, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}
