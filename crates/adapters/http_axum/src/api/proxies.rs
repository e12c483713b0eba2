//! JSON REST handlers for proxies.

use std::str::FromStr;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use assethub_app::ports::{IdentityRepository, ProxyRepository};
use assethub_domain::caller::Caller;
use assethub_domain::error::ValidationError;
use assethub_domain::id::ProxyId;
use assethub_domain::page::Page;
use assethub_domain::proxy::ProxyFilter;

use crate::error::ApiError;
use crate::resource::{IdentityAssignment, ProxyResource};
use crate::state::AppState;

/// Query parameters for the list endpoint.
///
/// Kept as raw strings so malformed values surface as validation errors.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Exact match on `kind`; empty means no filter.
    pub kind: Option<String>,
    pub offset: Option<String>,
    pub limit: Option<String>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<ProxyResource>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<ProxyResource>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<ProxyResource>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Response shared by the update, assign and delete endpoints.
pub enum NoContentResponse {
    NoContent,
}

impl IntoResponse for NoContentResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

fn parse_id(raw: &str) -> Result<ProxyId, ApiError> {
    ProxyId::from_str(raw).map_err(|_| ValidationError::InvalidId(raw.to_owned()).into())
}

fn bind<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()).into())
}

/// `GET /api/proxies?kind=&offset=&limit=`
pub async fn list<P, I>(
    State(state): State<AppState<P, I>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<ListResponse, ApiError>
where
    P: ProxyRepository + Send + Sync + 'static,
    I: IdentityRepository + Send + Sync + 'static,
{
    let Query(query) = query
        .map_err(|rejection| ValidationError::MalformedQuery(rejection.body_text()))?;
    let page = Page::parse(query.offset.as_deref(), query.limit.as_deref())?;
    let filter = ProxyFilter {
        kind: query.kind.filter(|k| !k.is_empty()),
    };

    let proxies = state.proxy_service.list_proxies(filter, page).await?;
    Ok(ListResponse::Ok(Json(
        proxies.into_iter().map(ProxyResource::from).collect(),
    )))
}

/// `GET /api/proxies/:id`
pub async fn get<P, I>(
    State(state): State<AppState<P, I>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    P: ProxyRepository + Send + Sync + 'static,
    I: IdentityRepository + Send + Sync + 'static,
{
    let proxy_id = parse_id(&id)?;
    let proxy = state.proxy_service.get_proxy(proxy_id).await?;
    Ok(GetResponse::Ok(Json(proxy.into())))
}

/// `POST /api/proxies`
pub async fn create<P, I>(
    State(state): State<AppState<P, I>>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<ProxyResource>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    P: ProxyRepository + Send + Sync + 'static,
    I: IdentityRepository + Send + Sync + 'static,
{
    let resource = bind(payload)?;
    let created = state
        .proxy_service
        .create_proxy(&caller, resource.into_record())
        .await?;
    Ok(CreateResponse::Created(Json(created.into())))
}

/// `PUT /api/proxies/:id`
pub async fn update<P, I>(
    State(state): State<AppState<P, I>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    payload: Result<Json<ProxyResource>, JsonRejection>,
) -> Result<NoContentResponse, ApiError>
where
    P: ProxyRepository + Send + Sync + 'static,
    I: IdentityRepository + Send + Sync + 'static,
{
    let proxy_id = parse_id(&id)?;
    let resource = bind(payload)?;
    state
        .proxy_service
        .update_proxy(&caller, proxy_id, resource.into_record())
        .await?;
    Ok(NoContentResponse::NoContent)
}

/// `PUT /api/proxies/:id/identity`
pub async fn assign_identity<P, I>(
    State(state): State<AppState<P, I>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    payload: Result<Json<IdentityAssignment>, JsonRejection>,
) -> Result<NoContentResponse, ApiError>
where
    P: ProxyRepository + Send + Sync + 'static,
    I: IdentityRepository + Send + Sync + 'static,
{
    let proxy_id = parse_id(&id)?;
    let assignment = bind(payload)?;
    state
        .proxy_service
        .assign_identity(&caller, proxy_id, assignment.identity.map(|r| r.id))
        .await?;
    Ok(NoContentResponse::NoContent)
}

/// `DELETE /api/proxies/:id`
pub async fn delete<P, I>(
    State(state): State<AppState<P, I>>,
    Path(id): Path<String>,
) -> Result<NoContentResponse, ApiError>
where
    P: ProxyRepository + Send + Sync + 'static,
    I: IdentityRepository + Send + Sync + 'static,
{
    let proxy_id = parse_id(&id)?;
    state.proxy_service.delete_proxy(proxy_id).await?;
    Ok(NoContentResponse::NoContent)
}
