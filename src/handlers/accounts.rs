use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::blocking;
use crate::domain::account::{CourseRegistrationForm, Profile, ProfileForm};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProfileRequest {
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    /// Absolute URL of an already uploaded image
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub avatar_url: Option<String>,
    pub updated_at: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CourseRegistrationRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseRegistrationResponse {
    pub id: Uuid,
    pub course_slug: String,
    pub full_name: String,
    pub email: String,
    pub created_at: String,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            email: p.email,
            full_name: p.full_name,
            phone: p.phone,
            address: p.address,
            city: p.city,
            avatar_url: p.avatar_url,
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /profiles/{id}
#[utoipa::path(
    get,
    path = "/profiles/{id}",
    params(("id" = Uuid, Path, description = "Profile UUID")),
    responses(
        (status = 200, description = "Profile found", body = ProfileResponse),
        (status = 404, description = "Profile not found"),
    ),
    tag = "accounts"
)]
pub async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let profile = blocking(move || state.accounts.get_profile(id)).await?;
    Ok(HttpResponse::Ok().json(ProfileResponse::from(profile)))
}

/// PUT /profiles/{id}
///
/// Creates or replaces the profile. Blank optional fields are cleared.
#[utoipa::path(
    put,
    path = "/profiles/{id}",
    params(("id" = Uuid, Path, description = "Profile UUID")),
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile saved", body = ProfileResponse),
        (status = 400, description = "Invalid profile"),
        (status = 409, description = "Email already used by another profile"),
    ),
    tag = "accounts"
)]
pub async fn upsert_profile(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<ProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let form = ProfileForm {
        email: body.email,
        full_name: body.full_name,
        phone: body.phone,
        address: body.address,
        city: body.city,
        avatar_url: body.avatar_url,
    };
    let profile = blocking(move || state.accounts.upsert_profile(id, form)).await?;
    Ok(HttpResponse::Ok().json(ProfileResponse::from(profile)))
}

/// POST /courses/{slug}/registrations
#[utoipa::path(
    post,
    path = "/courses/{slug}/registrations",
    params(("slug" = String, Path, description = "Course slug")),
    request_body = CourseRegistrationRequest,
    responses(
        (status = 201, description = "Registered", body = CourseRegistrationResponse),
        (status = 400, description = "Invalid registration"),
        (status = 409, description = "Email already registered for this course"),
    ),
    tag = "accounts"
)]
pub async fn register_for_course(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CourseRegistrationRequest>,
) -> Result<HttpResponse, AppError> {
    let slug = path.into_inner();
    let body = body.into_inner();
    let form = CourseRegistrationForm {
        full_name: body.full_name,
        email: body.email,
        phone: body.phone,
        message: body.message,
    };
    let registration = blocking(move || state.accounts.register_for_course(&slug, form)).await?;
    Ok(HttpResponse::Created().json(CourseRegistrationResponse {
        id: registration.id,
        course_slug: registration.course_slug,
        full_name: registration.full_name,
        email: registration.email,
        created_at: registration.created_at.to_rfc3339(),
    }))
}
