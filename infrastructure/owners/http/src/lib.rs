use axum::{
    Router,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header::LOCATION},
    response::Json,
    routing::{get, post, put},
};
use common_errors::{AppError, PathParam, ValidatedJson};
use monitoring::CallMonitor;
use owner_command_handlers::{CreateOwnerHandler, UpdateOwnerHandler};
use owner_commands::{CreateOwnerCommand, UpdateOwnerCommand};
use owner_dao::OwnerRepository;
use owner_queries::{GetOwnerQuery, ListOwnersQuery};
use owner_query_handlers::{GetOwnerQueryHandler, ListOwnersQueryHandler};
use owner_responses::OwnerResponse;
use tracing::instrument;

#[derive(Clone)]
pub struct OwnerServices {
    pub create_owner: CreateOwnerHandler,
    pub update_owner: UpdateOwnerHandler,

    pub get_owner: GetOwnerQueryHandler,
    pub list_owners: ListOwnersQueryHandler,
}

impl OwnerServices {
    pub fn new(owners: OwnerRepository) -> Self {
        Self {
            create_owner: CreateOwnerHandler::new(owners.clone()),
            update_owner: UpdateOwnerHandler::new(owners.clone()),
            get_owner: GetOwnerQueryHandler::new(owners.clone()),
            list_owners: ListOwnersQueryHandler::new(owners),
        }
    }
}

pub struct OwnerHandlers;

impl OwnerHandlers {
    /// Route table for `/owners`. Create and update are wrapped by the
    /// call monitor; reads are not.
    pub fn routes(monitor: &CallMonitor) -> Router<OwnerServices> {
        Router::new()
            .route(
                "/owners",
                post(create_owner).layer(monitor.layer("createOwner")),
            )
            .route("/owners", get(find_all))
            .route("/owners/{owner_id}", get(find_owner))
            .route(
                "/owners/{owner_id}",
                put(update_owner).layer(monitor.layer("updateOwner")),
            )
    }
}

#[utoipa::path(
    post,
    path = "/owners",
    request_body = CreateOwnerCommand,
    responses(
        (status = 201, description = "Owner created; Location names the new resource"),
        (status = 400, description = "Invalid request data", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "owners"
)]
#[instrument(skip_all)]
pub async fn create_owner(
    State(services): State<OwnerServices>,
    ValidatedJson(command): ValidatedJson<CreateOwnerCommand>,
) -> Result<(StatusCode, HeaderMap), AppError> {
    let owner = services.create_owner.execute(command).await?;

    let mut headers = HeaderMap::new();
    if let Some(id) = owner.id {
        tracing::info!("Owner created: {}", id);
        let location = HeaderValue::try_from(format!("/owners/{id}"))
            .map_err(|e| AppError::internal_server_error(&e.to_string()))?;
        headers.insert(LOCATION, location);
    }

    Ok((StatusCode::CREATED, headers))
}

#[utoipa::path(
    get,
    path = "/owners/{owner_id}",
    params(
        ("owner_id" = i32, Path, description = "Owner ID")
    ),
    responses(
        (status = 200, description = "Owner found", body = OwnerResponse),
        (status = 400, description = "Owner ID is not an integer", body = common_errors::ApiErrorResponse),
        (status = 404, description = "Owner not found", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "owners"
)]
#[instrument(skip_all)]
pub async fn find_owner(
    State(services): State<OwnerServices>, PathParam(owner_id): PathParam<i32>,
) -> Result<Json<OwnerResponse>, AppError> {
    let owner = services.get_owner.execute(GetOwnerQuery { owner_id }).await?;

    Ok(Json(owner))
}

#[utoipa::path(
    get,
    path = "/owners",
    responses(
        (status = 200, description = "All owners", body = Vec<OwnerResponse>),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "owners"
)]
#[instrument(skip_all)]
pub async fn find_all(
    State(services): State<OwnerServices>,
) -> Result<Json<Vec<OwnerResponse>>, AppError> {
    let owners = services.list_owners.execute(ListOwnersQuery).await?;

    Ok(Json(owners))
}

#[utoipa::path(
    put,
    path = "/owners/{owner_id}",
    request_body = UpdateOwnerCommand,
    params(
        ("owner_id" = i32, Path, description = "Owner ID")
    ),
    responses(
        (status = 200, description = "Owner updated", body = OwnerResponse),
        (status = 400, description = "Invalid request data", body = common_errors::ApiErrorResponse),
        (status = 404, description = "Owner not found", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "owners"
)]
#[instrument(skip_all)]
pub async fn update_owner(
    State(services): State<OwnerServices>, PathParam(owner_id): PathParam<i32>,
    ValidatedJson(mut command): ValidatedJson<UpdateOwnerCommand>,
) -> Result<Json<OwnerResponse>, AppError> {
    command.owner_id = owner_id;
    let owner = services.update_owner.execute(command).await?;

    tracing::info!("Owner updated: {}", owner_id);

    Ok(Json(owner))
}
