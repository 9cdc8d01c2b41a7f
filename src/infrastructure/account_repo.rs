use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::account::{CourseRegistration, CourseRegistrationForm, Profile, ProfileForm};
use crate::domain::errors::DomainError;
use crate::domain::ports::AccountRepository;
use crate::schema::{course_registrations, profiles};

use super::models::{
    CourseRegistrationRow, NewCourseRegistrationRow, NewProfileRow, ProfileChangeset, ProfileRow,
};

#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_profile(row: ProfileRow) -> Profile {
    Profile {
        id: row.id,
        email: row.email,
        full_name: row.full_name,
        phone: row.phone,
        address: row.address,
        city: row.city,
        avatar_url: row.avatar_url,
        updated_at: row.updated_at,
    }
}

impl AccountRepository for DieselAccountRepository {
    fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = profiles::table
            .filter(profiles::id.eq(id))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(to_profile))
    }

    fn upsert_profile(&self, id: Uuid, form: ProfileForm) -> Result<Profile, DomainError> {
        let mut conn = self.pool.get()?;

        let fields = ProfileChangeset {
            email: form.email,
            full_name: form.full_name,
            phone: form.phone,
            address: form.address,
            city: form.city,
            avatar_url: form.avatar_url,
            updated_at: Utc::now(),
        };

        let row = diesel::insert_into(profiles::table)
            .values(&NewProfileRow {
                id,
                fields: fields.clone(),
            })
            .on_conflict(profiles::id)
            .do_update()
            .set(&fields)
            .returning(ProfileRow::as_returning())
            .get_result(&mut conn)?;

        Ok(to_profile(row))
    }

    fn create_registration(
        &self,
        course_slug: &str,
        form: CourseRegistrationForm,
    ) -> Result<CourseRegistration, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(course_registrations::table)
            .values(&NewCourseRegistrationRow {
                id: Uuid::new_v4(),
                course_slug: course_slug.to_string(),
                full_name: form.full_name.trim().to_string(),
                email: form.email.trim().to_ascii_lowercase(),
                phone: form.phone.trim().to_string(),
                message: form.message,
            })
            .returning(CourseRegistrationRow::as_returning())
            .get_result(&mut conn)
            .map_err(|e| match DomainError::from(e) {
                DomainError::Conflict(_) => DomainError::Conflict(format!(
                    "already registered for course '{course_slug}'"
                )),
                other => other,
            })?;

        Ok(CourseRegistration {
            id: row.id,
            course_slug: row.course_slug,
            full_name: row.full_name,
            email: row.email,
            created_at: row.created_at,
        })
    }
}
