use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::errors::DomainError;
use super::validation;

#[derive(Debug, Clone)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub avatar_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileForm {
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub avatar_url: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ProfileForm {
    pub fn validate(&self) -> Result<(), DomainError> {
        validation::require("full_name", &self.full_name)?;
        validation::max_len("full_name", &self.full_name, validation::NAME_MAX)?;
        validation::email(&self.email)?;
        validation::max_len("email", &self.email, validation::EMAIL_MAX)?;
        if let Some(phone) = self.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            validation::phone(phone)?;
            validation::max_len("phone", phone, validation::PHONE_MAX)?;
        }
        if let Some(address) = &self.address {
            validation::max_len("address", address, validation::ADDRESS_MAX)?;
        }
        if let Some(city) = &self.city {
            validation::max_len("city", city, validation::CITY_MAX)?;
        }
        if let Some(url) = self.avatar_url.as_deref().filter(|u| !u.trim().is_empty()) {
            url::Url::parse(url.trim())
                .map_err(|_| DomainError::invalid("avatar_url must be an absolute URL"))?;
        }
        Ok(())
    }

    /// Trims fields and turns blank optionals into `None`.
    pub fn normalized(self) -> Self {
        Self {
            email: self.email.trim().to_ascii_lowercase(),
            full_name: self.full_name.trim().to_string(),
            phone: non_blank(self.phone),
            address: non_blank(self.address),
            city: non_blank(self.city),
            avatar_url: non_blank(self.avatar_url),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseRegistrationForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub message: Option<String>,
}

impl CourseRegistrationForm {
    pub fn validate(&self) -> Result<(), DomainError> {
        validation::require("full_name", &self.full_name)?;
        validation::max_len("full_name", &self.full_name, validation::NAME_MAX)?;
        validation::email(&self.email)?;
        validation::max_len("email", &self.email, validation::EMAIL_MAX)?;
        validation::phone(&self.phone)?;
        validation::max_len("phone", &self.phone, validation::PHONE_MAX)?;
        if self.message.as_deref().is_some_and(|m| m.len() > 2_000) {
            return Err(DomainError::invalid("message is too long"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CourseRegistration {
    pub id: Uuid,
    pub course_slug: String,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
