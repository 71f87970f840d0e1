//! Tour guide entity and admin forms

use crate::error::{ApiResult, FieldErrors};
use crate::forms::FormData;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Phone numbers are stored in a fixed ten-character column
pub static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{9,10}$").expect("valid phone regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourGuide {
    pub tour_guide_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub rate: Option<f64>,
}

/// Values written by create and edit; the image is resolved by the caller
#[derive(Debug, Clone)]
pub struct TourGuideRecord {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub rate: Option<f64>,
}

/// Bound fields of the create / edit tour guide forms, already trimmed
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct TourGuideForm {
    #[validate(length(min = 1, max = 50, message = "First name is required (at most 50 characters)."))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name is required (at most 50 characters)."))]
    pub last_name: String,
    #[validate(regex(path = *PHONE_RE, message = "Phone number must be 9 or 10 digits."))]
    pub phone_number: String,
    #[validate(email(message = "Email is not a valid address."))]
    #[validate(length(max = 50, message = "Email must be at most 50 characters."))]
    pub email: String,
    #[validate(length(max = 50, message = "Description must be at most 50 characters."))]
    pub description: Option<String>,
    /// Existing image reference, only bound on edit
    pub image: Option<String>,
    #[validate(range(min = 0.0, max = 5.0, message = "Rate must be between 0 and 5."))]
    pub rate: Option<f64>,
}

impl TourGuideForm {
    pub const CREATE_VIEW: &'static str = "CreateTourGuide";
    pub const EDIT_VIEW: &'static str = "EditTourGuide";

    /// Bind the create form: FirstName, LastName, PhoneNumber, Email, Description
    pub fn bind_create(form: &FormData) -> ApiResult<Self> {
        let errors = FieldErrors::new();
        let bound = Self {
            first_name: form.trimmed("FirstName"),
            last_name: form.trimmed("LastName"),
            phone_number: form.trimmed("PhoneNumber"),
            email: form.trimmed("Email"),
            description: trimmed_opt(form, "Description"),
            image: None,
            rate: None,
        };
        form.finish(Self::CREATE_VIEW, bound, errors)
    }

    /// Bind the edit form, which additionally carries Image and Rate
    pub fn bind_edit(form: &FormData) -> ApiResult<Self> {
        let mut errors = FieldErrors::new();
        let bound = Self {
            first_name: form.trimmed("FirstName"),
            last_name: form.trimmed("LastName"),
            phone_number: form.trimmed("PhoneNumber"),
            email: form.trimmed("Email"),
            description: trimmed_opt(form, "Description"),
            image: trimmed_opt(form, "Image"),
            rate: form.parse("Rate", &mut errors),
        };
        form.finish(Self::EDIT_VIEW, bound, errors)
    }

    pub fn into_record(self, image: Option<String>) -> TourGuideRecord {
        TourGuideRecord {
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
            email: self.email,
            description: self.description,
            image,
            rate: self.rate,
        }
    }
}

fn trimmed_opt(form: &FormData, name: &str) -> Option<String> {
    form.opt_text(name).map(|v| v.trim().to_string())
}
