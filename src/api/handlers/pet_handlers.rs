use actix_web::{web, HttpResponse, Responder, ResponseError};
use serde_json::Value;

use crate::{api::{serializers::PetSerializer, state::AppState}, domain::pet::model::Pet, utils::errors::ApiError};

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("No pet found with id {}", id))
}

// Ids that are not integers can never match a record.
fn parse_pet_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| not_found(raw))
}

fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("JSON parse error - {}", e)))
}

pub async fn list_pets(
    state: web::Data<AppState>
) -> impl Responder {
    match state.pets.get_all_pets().await {
        Ok(pets) => {
            log::debug!("Listing {} pets", pets.len());
            HttpResponse::Ok().json(PetSerializer::to_representation_many(pets))
        },
        Err(e) => {
            log::error!("Failed to list pets: {}", e);
            e.error_response()
        }
    }
}

pub async fn retrieve_pet(
    state: web::Data<AppState>,
    path: web::Path<String>
) -> impl Responder {
    let id = match parse_pet_id(&path) {
        Ok(id) => id,
        Err(e) => return e.error_response()
    };

    match state.pets.get_pet_by_id(id).await {
        Ok(Some(pet)) => HttpResponse::Ok().json(PetSerializer::to_representation(pet)),
        Ok(None) => not_found(&path).error_response(),
        Err(e) => {
            log::error!("Failed to load pet {}: {}", id, e);
            e.error_response()
        }
    }
}

pub async fn partial_update_pet(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Bytes
) -> impl Responder {
    apply_update(&state, &path, &body, true).await
}

pub async fn update_pet(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Bytes
) -> impl Responder {
    apply_update(&state, &path, &body, false).await
}

async fn update_and_fetch(state: &AppState, raw_id: &str, body: &[u8], partial: bool) -> Result<Pet, ApiError> {
    let id = parse_pet_id(raw_id)?;

    // Unknown ids are reported before payload problems.
    if state.pets.get_pet_by_id(id).await?.is_none() {
        return Err(not_found(raw_id));
    }

    let payload = parse_body(body)?;
    let changes = PetSerializer::to_internal_value(&payload, partial)?;

    state.pets
        .update_pet(id, changes)
        .await?
        .ok_or_else(|| not_found(raw_id))
}

async fn apply_update(state: &AppState, raw_id: &str, body: &[u8], partial: bool) -> HttpResponse {
    match update_and_fetch(state, raw_id, body, partial).await {
        Ok(pet) => {
            log::info!("Updated pet {} ({})", pet.id, pet);
            HttpResponse::Ok().json(PetSerializer::to_representation(pet))
        },
        Err(e) => {
            match &e {
                ApiError::Validation(errors) => log::warn!("Rejected update of pet {}: {}", raw_id, errors),
                ApiError::NotFound(_) | ApiError::BadRequest(_) => log::debug!("Update of pet {} failed: {}", raw_id, e),
                _ => log::error!("Update of pet {} failed: {}", raw_id, e),
            }
            e.error_response()
        }
    }
}
