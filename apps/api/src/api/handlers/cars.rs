use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::errors::{internal, ApiError};
use crate::api::middleware::BearerAuth;
use crate::api::state::AppState;
use crate::auth::Identity;
use crate::domain::car::value_objects::timestamp_now;
use crate::domain::car::{Car, CarDetails, SearchTerm, CARS_COLLECTION};

const FETCH_CARS_FAILED: &str = "Failed to fetch cars";
const FETCH_CAR_FAILED: &str = "Failed to fetch car";
const CREATE_CAR_FAILED: &str = "Failed to create car";
const UPDATE_CAR_FAILED: &str = "Failed to update car";
const DELETE_CAR_FAILED: &str = "Failed to delete car";

/// Query parameters for listing cars
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCarsQuery {
    pub user_id: Option<String>,
    pub search: Option<String>,
}

/// Request body for creating or updating a car
///
/// The body's `userId` is checked against the caller before this is parsed,
/// so it is not part of the typed request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl From<CarRequest> for CarDetails {
    fn from(req: CarRequest) -> Self {
        CarDetails {
            title: req.title,
            description: req.description,
            tags: req.tags,
            images: req.images,
        }
    }
}

/// Response from car creation
#[derive(Debug, Serialize)]
pub struct CreateCarResponse {
    pub id: String,
}

/// Acknowledgement for writes with no payload
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Rejects a write unless the body's `userId` is the caller's own subject
///
/// A missing or non-string `userId` never matches.
fn ensure_same_caller(identity: &Identity, body: &Value) -> Result<(), ApiError> {
    match body.get("userId") {
        Some(Value::String(claimed)) if *claimed == identity.subject => Ok(()),
        claimed => {
            tracing::debug!(
                caller = %identity.subject,
                claimed = ?claimed,
                "Rejected write for a different user"
            );
            Err(ApiError::unauthorized())
        }
    }
}

/// Checks the claimed owner, then parses the editable fields
fn authorize_write(
    identity: &Identity,
    payload: Result<Json<Value>, JsonRejection>,
    failure: &'static str,
) -> Result<CarDetails, ApiError> {
    let Json(body) = payload.map_err(internal(failure))?;
    ensure_same_caller(identity, &body)?;
    let req: CarRequest = serde_json::from_value(body).map_err(internal(failure))?;
    Ok(req.into())
}

/// List cars, optionally scoped to an owner and filtered by a search term
///
/// GET /cars?userId=&search=
pub async fn list_cars(
    BearerAuth(_identity): BearerAuth,
    State(state): State<AppState>,
    query: Result<Query<ListCarsQuery>, QueryRejection>,
) -> Result<Json<Vec<Car>>, ApiError> {
    let Query(params) = query.map_err(internal(FETCH_CARS_FAILED))?;

    let documents = match params.user_id.as_deref().filter(|id| !id.is_empty()) {
        Some(user_id) => state.store.query(CARS_COLLECTION, "userId", user_id).await,
        None => state.store.list(CARS_COLLECTION).await,
    }
    .map_err(internal(FETCH_CARS_FAILED))?;

    let search = params.search.as_deref().and_then(SearchTerm::parse);

    let cars = documents
        .iter()
        .filter_map(|document| match Car::from_document(document) {
            Ok(car) => Some(car),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed car document");
                None
            }
        })
        .filter(|car| search.as_ref().map_or(true, |term| term.matches(car)))
        .collect();

    Ok(Json(cars))
}

/// Create a car owned by the caller
///
/// POST /cars
pub async fn create_car(
    BearerAuth(identity): BearerAuth,
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CreateCarResponse>, ApiError> {
    let details = authorize_write(&identity, payload, CREATE_CAR_FAILED)?;

    let car = Car::create(
        state.store.generate_id(),
        details,
        identity.subject,
        timestamp_now(),
    );

    state
        .store
        .set(CARS_COLLECTION, &car.id, car.to_fields())
        .await
        .map_err(internal(CREATE_CAR_FAILED))?;

    tracing::info!(car_id = %car.id, user_id = %car.user_id, "Car created");

    Ok(Json(CreateCarResponse { id: car.id }))
}

/// Get a car by ID
///
/// GET /cars/:id
pub async fn get_car(
    BearerAuth(_identity): BearerAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Car>, ApiError> {
    let document = state
        .store
        .get(CARS_COLLECTION, &id)
        .await
        .map_err(internal(FETCH_CAR_FAILED))?
        .ok_or_else(|| ApiError::not_found("Car not found"))?;

    let car = Car::from_document(&document).map_err(internal(FETCH_CAR_FAILED))?;

    Ok(Json(car))
}

/// Overwrite a car's editable fields
///
/// PUT /cars/:id
///
/// The caller must match the body's `userId`, but the stored owner is not
/// compared against the caller.
pub async fn update_car(
    BearerAuth(identity): BearerAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let details = authorize_write(&identity, payload, UPDATE_CAR_FAILED)?;

    state
        .store
        .update(CARS_COLLECTION, &id, details.into_update(timestamp_now()))
        .await
        .map_err(internal(UPDATE_CAR_FAILED))?;

    tracing::info!(car_id = %id, user_id = %identity.subject, "Car updated");

    Ok(MessageResponse::new("Car updated successfully"))
}

/// Delete a car
///
/// DELETE /cars/:id
///
/// Any authenticated caller may delete; absent ids succeed.
pub async fn delete_car(
    BearerAuth(identity): BearerAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store
        .delete(CARS_COLLECTION, &id)
        .await
        .map_err(internal(DELETE_CAR_FAILED))?;

    tracing::info!(car_id = %id, user_id = %identity.subject, "Car deleted");

    Ok(MessageResponse::new("Car deleted successfully"))
}
