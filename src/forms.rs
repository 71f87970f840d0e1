//! Multipart form binding
//!
//! Collects the text fields and the optional image file of a submitted form,
//! and turns parse/validation failures into a re-rendered form response.

use crate::error::{ApiResult, AppError, FieldErrors};
use crate::media::UploadedImage;
use axum::extract::Multipart;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use validator::Validate;

/// Raw values of one submitted form
#[derive(Debug, Default)]
pub struct FormData {
    fields: BTreeMap<String, String>,
    image: Option<UploadedImage>,
}

impl FormData {
    /// Read every part of the request; `file_field` names the image input
    pub async fn from_multipart(mut multipart: Multipart, file_field: &str) -> ApiResult<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Malformed form data: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == file_field {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| "image".to_string());
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;

                // An empty file input means "no new image"
                if !bytes.is_empty() {
                    form.image = Some(UploadedImage {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid field {}: {}", name, e)))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Raw value, empty when the field was not submitted
    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    /// Value trimmed of surrounding whitespace
    pub fn trimmed(&self, name: &str) -> String {
        self.text(name).trim().to_string()
    }

    /// None for a missing or blank field
    pub fn opt_text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }

    /// Optional typed value; unparseable input is recorded against the field
    pub fn parse<T: FromStr>(&self, name: &str, errors: &mut FieldErrors) -> Option<T> {
        let raw = self.fields.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())?;
        match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                errors.add(name, format!("The value '{}' is not valid for {}.", raw, name));
                None
            }
        }
    }

    /// Typed value that must be present
    pub fn require<T: FromStr>(&self, name: &str, errors: &mut FieldErrors) -> Option<T> {
        if self.opt_text(name).is_none() {
            errors.add(name, format!("The {} field is required.", name));
            return None;
        }
        self.parse(name, errors)
    }

    /// Take the uploaded image, rejecting anything that is not an image
    pub fn take_image(&mut self, field: &str, errors: &mut FieldErrors) -> Option<UploadedImage> {
        let image = self.image.take()?;
        let is_image = image
            .content_type
            .as_deref()
            .map_or(false, |ct| ct.starts_with("image/"));
        if !is_image {
            errors.add(field, "The uploaded file must be an image.");
            return None;
        }
        Some(image)
    }

    /// The values as submitted, for re-rendering an invalid form
    pub fn submitted(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect(),
        )
    }

    /// Run derive validation and fail with the combined field errors
    pub fn finish<T: Validate>(
        &self,
        view: &'static str,
        form: T,
        mut errors: FieldErrors,
    ) -> ApiResult<T> {
        if let Err(validation) = form.validate() {
            errors.merge_validation(&validation);
        }
        if errors.is_empty() {
            Ok(form)
        } else {
            Err(AppError::InvalidForm {
                view,
                errors,
                submitted: self.submitted(),
            })
        }
    }
}

/// Validate a url-encoded body, echoing its serialized fields on failure
pub fn validate_body<T: Validate + Serialize>(view: &'static str, form: &T) -> ApiResult<()> {
    match form.validate() {
        Ok(()) => Ok(()),
        Err(validation) => {
            let mut errors = FieldErrors::new();
            errors.merge_validation(&validation);
            Err(invalid(view, errors, form))
        }
    }
}

/// Re-render `view` with the given errors and the submitted body
pub fn invalid<T: Serialize>(view: &'static str, errors: FieldErrors, form: &T) -> AppError {
    AppError::InvalidForm {
        view,
        errors,
        submitted: serde_json::to_value(form).unwrap_or_default(),
    }
}

#[cfg(test)]
impl FormData {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: UploadedImage) -> Self {
        self.image = Some(image);
        self
    }
}
