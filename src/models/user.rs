//! User accounts and travel-agent registration requests

use crate::auth::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// State of a travel-agent registration request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationStatus {
    Pending,
    Accept,
    Unaccept,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "Pending",
            RegistrationStatus::Accept => "Accept",
            RegistrationStatus::Unaccept => "Unaccept",
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(RegistrationStatus::Pending),
            "Accept" => Ok(RegistrationStatus::Accept),
            "Unaccept" => Ok(RegistrationStatus::Unaccept),
            other => Err(format!("unknown registration status '{}'", other)),
        }
    }
}

/// User represents a registered account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: i32,
    pub email: String,
    #[serde(skip_serializing)] // Never send password hash to client
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub role: Role,
    pub registration_status: Option<RegistrationStatus>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Travel agents may only sign in once their registration is accepted
    pub fn can_sign_in(&self) -> bool {
        self.role != Role::TravelAgent
            || self.registration_status == Some(RegistrationStatus::Accept)
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub role: Role,
    pub registration_status: Option<RegistrationStatus>,
}

/// Request to register a new account
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterForm {
    #[validate(email(message = "Email is not a valid address."))]
    #[validate(length(max = 100, message = "Email must be at most 100 characters."))]
    pub email: String,
    #[serde(skip_serializing)]
    #[validate(length(min = 6, max = 100, message = "Password must be between 6 and 100 characters."))]
    pub password: String,
    #[validate(length(max = 50, message = "First name must be at most 50 characters."))]
    pub first_name: Option<String>,
    #[validate(length(max = 50, message = "Last name must be at most 50 characters."))]
    pub last_name: Option<String>,
    #[validate(regex(path = *crate::models::PHONE_RE, message = "Phone number must be 9 or 10 digits."))]
    pub phone_number: Option<String>,
    /// Ask to become a travel agent instead of a customer
    #[serde(default)]
    pub travel_agent: bool,
}

impl RegisterForm {
    pub const VIEW: &'static str = "Register";

    /// Trim the text inputs; blank optional ones count as not given
    pub fn normalized(self) -> Self {
        let blank_to_none = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            email: self.email.trim().to_string(),
            password: self.password,
            first_name: blank_to_none(self.first_name),
            last_name: blank_to_none(self.last_name),
            phone_number: blank_to_none(self.phone_number),
            travel_agent: self.travel_agent,
        }
    }
}

/// Request to log in
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query string of RequestAccept / RequestUnaccept
#[derive(Debug, Deserialize)]
pub struct RegistrationDecisionQuery {
    pub id: i32,
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_status_round_trips_through_text() {
        for status in [
            RegistrationStatus::Pending,
            RegistrationStatus::Accept,
            RegistrationStatus::Unaccept,
        ] {
            assert_eq!(status.as_str().parse::<RegistrationStatus>(), Ok(status));
        }
        assert!("Maybe".parse::<RegistrationStatus>().is_err());
    }

    #[test]
    fn test_register_form_drops_blank_optionals() {
        let form = RegisterForm {
            email: " new@travel.vn ".to_string(),
            password: "secret123".to_string(),
            first_name: Some("  ".to_string()),
            last_name: Some(" Tran ".to_string()),
            phone_number: Some(String::new()),
            travel_agent: false,
        }
        .normalized();

        assert_eq!(form.email, "new@travel.vn");
        assert_eq!(form.first_name, None);
        assert_eq!(form.last_name.as_deref(), Some("Tran"));
        assert_eq!(form.phone_number, None);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let user = User {
            user_id: 1,
            email: "a@b.vn".to_string(),
            password_hash: "$2b$secret".to_string(),
            first_name: None,
            last_name: None,
            phone_number: None,
            image: None,
            description: None,
            role: Role::Customer,
            registration_status: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "customer");
    }

    #[test]
    fn test_only_accepted_agents_can_sign_in() {
        let user = |role, registration_status| User {
            user_id: 1,
            email: "a@b.vn".to_string(),
            password_hash: String::new(),
            first_name: None,
            last_name: None,
            phone_number: None,
            image: None,
            description: None,
            role,
            registration_status,
            created_at: Utc::now(),
        };

        assert!(user(Role::Customer, None).can_sign_in());
        assert!(user(Role::Admin, None).can_sign_in());
        assert!(user(Role::TravelAgent, Some(RegistrationStatus::Accept)).can_sign_in());
        assert!(!user(Role::TravelAgent, Some(RegistrationStatus::Pending)).can_sign_in());
        assert!(!user(Role::TravelAgent, Some(RegistrationStatus::Unaccept)).can_sign_in());
        assert!(!user(Role::TravelAgent, None).can_sign_in());
    }
}
