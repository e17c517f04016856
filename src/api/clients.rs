//! Client CRUD. Thin by design: validate, touch the map, wrap in the
//! envelope.

use crate::api::routes::AppState;
use crate::errors::ApiError;
use crate::response::ApiEnvelope;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct ClientRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ClientPayload {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
}

fn validate(payload: &ClientPayload) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if payload.name.trim().is_empty() {
        errors.push("name is required".to_string());
    }
    if !payload.email.contains('@') {
        errors.push("email must be a valid email address".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

pub async fn list_clients(State(state): State<AppState>) -> Json<ApiEnvelope> {
    let mut clients = state.clients.values();
    clients.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    ApiEnvelope::ok("Clients retrieved", json!({ "clients": clients }))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiEnvelope>, ApiError> {
    let id = parse_id(&id)?;
    let client = state
        .clients
        .get(&id)
        .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;
    Ok(ApiEnvelope::ok("Client retrieved", client))
}

pub async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<ClientPayload>,
) -> Result<Json<ApiEnvelope>, ApiError> {
    validate(&payload)?;

    let now = Utc::now().to_rfc3339();
    let client = ClientRecord {
        id: Uuid::new_v4(),
        name: payload.name.trim().to_string(),
        email: payload.email.trim().to_string(),
        phone: payload.phone,
        company: payload.company,
        status: "active".to_string(),
        created_at: now.clone(),
        updated_at: now,
    };
    state.clients.set(client.id, client.clone());

    Ok(ApiEnvelope::ok("Client created", client))
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ClientPayload>,
) -> Result<Json<ApiEnvelope>, ApiError> {
    let id = parse_id(&id)?;
    validate(&payload)?;

    let mut client = state
        .clients
        .get(&id)
        .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;

    client.name = payload.name.trim().to_string();
    client.email = payload.email.trim().to_string();
    client.phone = payload.phone;
    client.company = payload.company;
    client.updated_at = Utc::now().to_rfc3339();
    state.clients.set(id, client.clone());

    Ok(ApiEnvelope::ok("Client updated", client))
}

pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiEnvelope>, ApiError> {
    let id = parse_id(&id)?;
    state
        .clients
        .delete(&id)
        .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;
    Ok(ApiEnvelope::ok_empty("Client deleted"))
}

pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid id format".to_string()))
}
