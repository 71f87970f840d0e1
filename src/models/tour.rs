//! Tour entity and the forms that create and edit it

use crate::error::{ApiResult, FieldErrors};
use crate::forms::FormData;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A packaged tour, optionally tied to a hotel, restaurant, staff member and vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub tour_id: i32,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub duration: Option<String>,
    pub air_plane: Option<String>,
    pub rating: Option<f64>,
    pub itinerary: Option<String>,
    pub inclusions: Option<String>,
    pub exclusions: Option<String>,
    pub group_size: Option<i32>,
    pub guide: Option<String>,
    pub create_date: Option<NaiveDate>,
    pub hotel_id: Option<i32>,
    pub restaurant_id: Option<i32>,
    pub staff_id: Option<i32>,
    pub vehicle_id: Option<i32>,
    /// Bumped on every update; edits must present the version they loaded
    pub row_version: i32,
}

/// Values inserted by CreateTour
#[derive(Debug, Clone)]
pub struct NewTour {
    pub name: String,
    pub description: String,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub create_date: NaiveDate,
}

/// Columns replaced by EditTour
#[derive(Debug, Clone)]
pub struct TourChanges {
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub duration: Option<String>,
    pub air_plane: Option<String>,
    pub rating: Option<f64>,
    pub itinerary: Option<String>,
    pub inclusions: Option<String>,
    pub exclusions: Option<String>,
    pub group_size: Option<i32>,
    pub guide: Option<String>,
}

/// Bound fields of `POST /Tours/CreateTour`
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTourForm {
    #[validate(length(min = 1, max = 50, message = "Name is required (at most 50 characters)."))]
    pub name: String,
    #[validate(length(min = 1, max = 200, message = "Description is required (at most 200 characters)."))]
    pub description: String,
    #[validate(range(min = 0.0, message = "Price cannot be negative."))]
    pub price: Option<f64>,
}

impl CreateTourForm {
    pub const VIEW: &'static str = "CreateTour";

    pub fn bind(form: &FormData) -> ApiResult<Self> {
        let mut errors = FieldErrors::new();
        let bound = Self {
            name: form.text("Name"),
            description: form.text("Description"),
            price: form.parse("Price", &mut errors),
        };
        form.finish(Self::VIEW, bound, errors)
    }
}

/// Bound fields of `POST /Tours/EditTour/{id}`
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct EditTourForm {
    pub tour_id: i32,
    #[validate(length(min = 1, max = 50, message = "Name is required (at most 50 characters)."))]
    pub name: String,
    pub image: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Description is required (at most 200 characters)."))]
    pub description: String,
    #[validate(range(min = 0.0, message = "Price cannot be negative."))]
    pub price: Option<f64>,
    #[validate(length(max = 50, message = "Duration must be at most 50 characters."))]
    pub duration: Option<String>,
    #[validate(length(max = 100, message = "AirPlane must be at most 100 characters."))]
    pub air_plane: Option<String>,
    #[validate(range(min = 0.0, max = 10.0, message = "Rating must be between 0 and 10."))]
    pub rating: Option<f64>,
    pub itinerary: Option<String>,
    pub inclusions: Option<String>,
    pub exclusions: Option<String>,
    #[validate(range(min = 1, message = "GroupSize must be at least 1."))]
    pub group_size: Option<i32>,
    pub guide: Option<String>,
    pub row_version: i32,
}

impl EditTourForm {
    pub const VIEW: &'static str = "EditTour";

    pub fn bind(form: &FormData) -> ApiResult<Self> {
        let mut errors = FieldErrors::new();
        let bound = Self {
            tour_id: form.require("TourId", &mut errors).unwrap_or_default(),
            name: form.text("Name"),
            image: form.opt_text("Image"),
            description: form.text("Description"),
            price: form.parse("Price", &mut errors),
            duration: form.opt_text("Duration"),
            air_plane: form.opt_text("AirPlane"),
            rating: form.parse("Rating", &mut errors),
            itinerary: form.opt_text("Itinerary"),
            inclusions: form.opt_text("Inclusions"),
            exclusions: form.opt_text("Exclusions"),
            group_size: form.parse("GroupSize", &mut errors),
            guide: form.opt_text("Guide"),
            row_version: form.require("RowVersion", &mut errors).unwrap_or_default(),
        };
        form.finish(Self::VIEW, bound, errors)
    }

    pub fn into_changes(self) -> TourChanges {
        TourChanges {
            name: self.name,
            description: self.description,
            image: self.image,
            price: self.price,
            duration: self.duration,
            air_plane: self.air_plane,
            rating: self.rating,
            itinerary: self.itinerary,
            inclusions: self.inclusions,
            exclusions: self.exclusions,
            group_size: self.group_size,
            guide: self.guide,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_create_form_keeps_values_untrimmed() {
        let form = FormData::from_pairs(&[
            ("Name", " Sapa Trek"),
            ("Description", "Three days in the mountains"),
            ("Price", "199.5"),
        ]);
        let bound = CreateTourForm::bind(&form).unwrap();
        assert_eq!(bound.name, " Sapa Trek");
        assert_eq!(bound.price, Some(199.5));
    }

    #[test]
    fn test_create_form_requires_name_and_description() {
        let form = FormData::from_pairs(&[("Price", "-1")]);
        match CreateTourForm::bind(&form) {
            Err(AppError::InvalidForm { view, errors, .. }) => {
                assert_eq!(view, "CreateTour");
                assert!(errors.contains("Name"));
                assert!(errors.contains("Description"));
                assert!(errors.contains("Price"));
            }
            other => panic!("expected invalid form, got {:?}", other),
        }
    }

    #[test]
    fn test_edit_form_requires_ids() {
        let form = FormData::from_pairs(&[("Name", "Hue"), ("Description", "Imperial city")]);
        match EditTourForm::bind(&form) {
            Err(AppError::InvalidForm { errors, .. }) => {
                assert!(errors.contains("TourId"));
                assert!(errors.contains("RowVersion"));
            }
            other => panic!("expected invalid form, got {:?}", other),
        }
    }
}
