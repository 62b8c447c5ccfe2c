use crate::api::{context::AppState, error::ApiError, health::health_handler};
use crate::models::{Category, Plant};
use crate::query::PlantQuery;
use crate::schema::{validate_create, validate_update, PlantInput};
use crate::store::PlantStore;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

/// A plant as rendered on the wire, with its display price alongside.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantBody {
    #[serde(flatten)]
    pub plant: Plant,
    pub formatted_price: String,
}

impl From<Plant> for PlantBody {
    fn from(plant: Plant) -> Self {
        PlantBody {
            formatted_price: plant.formatted_price(),
            plant,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<PlantBody>,
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: T,
}

impl<T> DataResponse<T> {
    fn new(data: T) -> Self {
        DataResponse {
            success: true,
            message: None,
            data,
        }
    }

    fn with_message(message: &'static str, data: T) -> Self {
        DataResponse {
            success: true,
            message: Some(message),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

pub fn router<S>() -> Router<AppState<S>>
where
    S: PlantStore,
{
    Router::new()
        .route("/", get(list_plants::<S>).post(create_plant::<S>))
        .route("/health", get(health_handler))
        .route("/categories/all", get(list_categories))
        .route(
            "/:id",
            get(get_plant::<S>)
                .put(update_plant::<S>)
                .delete(delete_plant::<S>),
        )
}

#[tracing::instrument(skip(state))]
async fn list_plants<S>(
    State(state): State<AppState<S>>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<ListResponse>, ApiError>
where
    S: PlantStore,
{
    // Unreadable query strings fall back to the unfiltered listing.
    let pairs = params.map(|Query(pairs)| pairs).unwrap_or_else(|rejection| {
        tracing::debug!(error = %rejection, "ignoring unreadable query string");
        Vec::new()
    });
    let filter = pairs.into_iter().collect::<PlantQuery>().parse();
    let plants = state
        .store
        .find(&filter)
        .await
        .map_err(ApiError::store("Error fetching plants"))?;

    Ok(Json(ListResponse {
        success: true,
        count: plants.len(),
        data: plants.into_iter().map(PlantBody::from).collect(),
    }))
}

#[tracing::instrument(skip(state))]
async fn get_plant<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<PlantBody>>, ApiError>
where
    S: PlantStore,
{
    let plant = state
        .store
        .get(&id)
        .await
        .map_err(ApiError::store("Error fetching plant"))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(DataResponse::new(plant.into())))
}

#[tracing::instrument(skip_all)]
async fn create_plant<S>(
    State(state): State<AppState<S>>,
    payload: Result<Json<PlantInput>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<PlantBody>>), ApiError>
where
    S: PlantStore,
{
    let Json(input) = payload?;
    let plant = validate_create(&input)?;

    let plant = state
        .store
        .insert(plant)
        .await
        .map_err(ApiError::store("Error adding plant"))?;
    tracing::info!(id = %plant.id, name = %plant.name, "plant added");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(
            "Plant added successfully",
            plant.into(),
        )),
    ))
}

#[tracing::instrument(skip(state, payload))]
async fn update_plant<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    payload: Result<Json<PlantInput>, JsonRejection>,
) -> Result<Json<DataResponse<PlantBody>>, ApiError>
where
    S: PlantStore,
{
    let Json(input) = payload?;
    let patch = validate_update(&input)?;

    let plant = state
        .store
        .update(&id, patch)
        .await
        .map_err(ApiError::store("Error updating plant"))?
        .ok_or(ApiError::NotFound)?;
    tracing::info!("plant updated");

    Ok(Json(DataResponse::with_message(
        "Plant updated successfully",
        plant.into(),
    )))
}

#[tracing::instrument(skip(state))]
async fn delete_plant<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError>
where
    S: PlantStore,
{
    let deleted = state
        .store
        .delete(&id)
        .await
        .map_err(ApiError::store("Error deleting plant"))?;
    if !deleted {
        return Err(ApiError::NotFound);
    }
    tracing::info!("plant deleted");

    Ok(Json(MessageResponse {
        success: true,
        message: "Plant deleted successfully",
    }))
}

async fn list_categories() -> Json<DataResponse<Vec<Category>>> {
    Json(DataResponse::new(Category::ALL.to_vec()))
}
