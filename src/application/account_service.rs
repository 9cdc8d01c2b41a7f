use uuid::Uuid;

use crate::domain::account::{CourseRegistration, CourseRegistrationForm, Profile, ProfileForm};
use crate::domain::errors::DomainError;
use crate::domain::ports::AccountRepository;

pub struct AccountService<R> {
    repo: R,
}

fn check_course_slug(slug: &str) -> Result<(), DomainError> {
    let valid = !slug.is_empty()
        && slug.len() <= 120
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid {
        return Err(DomainError::invalid("course slug is malformed"));
    }
    Ok(())
}

impl<R: AccountRepository> AccountService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get_profile(&self, id: Uuid) -> Result<Profile, DomainError> {
        self.repo
            .find_profile(id)?
            .ok_or_else(|| DomainError::not_found("Profile"))
    }

    pub fn upsert_profile(&self, id: Uuid, form: ProfileForm) -> Result<Profile, DomainError> {
        form.validate()?;
        self.repo.upsert_profile(id, form.normalized())
    }

    pub fn register_for_course(
        &self,
        course_slug: &str,
        form: CourseRegistrationForm,
    ) -> Result<CourseRegistration, DomainError> {
        check_course_slug(course_slug)?;
        form.validate()?;
        let registration = self.repo.create_registration(course_slug, form)?;
        log::info!(
            "Registered {} for course {}",
            registration.email,
            registration.course_slug
        );
        Ok(registration)
    }
}
