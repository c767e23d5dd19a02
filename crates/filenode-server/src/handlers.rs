//! HTTP handlers. Each one is a thin adapter: decode the request, call into
//! `FileNode`, encode the response.

use crate::auth::Identity;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use cid::Cid;
use filenode_block::Block;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

fn parse_cid(raw: &str) -> Result<Cid, ApiError> {
    Cid::from_str(raw).map_err(|e| ApiError::BadRequest(format!("invalid CID {raw}: {e}")))
}

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

pub async fn get_block(
    State(state): State<Arc<AppState>>,
    Path(cid): Path<String>,
) -> Result<Response, ApiError> {
    let cid = parse_cid(&cid)?;
    let block = state.node.get(&cid).await?;
    Ok((
        StatusCode::OK,
        [("Content-Type", "application/octet-stream")],
        block.data.to_vec(),
    )
        .into_response())
}

#[derive(Deserialize)]
pub struct WireBlock {
    cid: String,
    #[serde(rename = "data_base64")]
    data_base64: String,
}

#[derive(Deserialize)]
pub struct AddBlocksRequest {
    blocks: Vec<WireBlock>,
}

pub async fn add_blocks(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path((space_id, file_id)): Path<(String, String)>,
    Json(request): Json<AddBlocksRequest>,
) -> Result<StatusCode, ApiError> {
    let blocks = request
        .blocks
        .into_iter()
        .map(|wire| {
            let cid = parse_cid(&wire.cid)?;
            let data = BASE64
                .decode(wire.data_base64)
                .map_err(|e| ApiError::BadRequest(format!("invalid base64: {e}")))?;
            Ok(Block::new(cid, Bytes::from(data)))
        })
        .collect::<Result<Vec<Block>, ApiError>>()?;

    state
        .node
        .add(&space_id, &file_id, identity.as_bytes(), &blocks)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct CidListRequest {
    cids: Vec<String>,
}

pub async fn bind_blocks(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path((space_id, file_id)): Path<(String, String)>,
    Json(request): Json<CidListRequest>,
) -> Result<StatusCode, ApiError> {
    let cids = request
        .cids
        .iter()
        .map(|c| parse_cid(c))
        .collect::<Result<Vec<Cid>, ApiError>>()?;

    state
        .node
        .blocks_bind(&space_id, &file_id, identity.as_bytes(), &cids)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WireAvailability {
    NotExists,
    Exists,
    ExistsInSpace,
}

impl From<filenode_core::Availability> for WireAvailability {
    fn from(value: filenode_core::Availability) -> Self {
        match value {
            filenode_core::Availability::NotExists => WireAvailability::NotExists,
            filenode_core::Availability::Exists => WireAvailability::Exists,
            filenode_core::Availability::ExistsInSpace => WireAvailability::ExistsInSpace,
        }
    }
}

pub async fn check_blocks(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(space_id): Path<String>,
    Json(request): Json<CidListRequest>,
) -> Result<Json<std::collections::HashMap<String, WireAvailability>>, ApiError> {
    let cids = request
        .cids
        .iter()
        .map(|c| parse_cid(c))
        .collect::<Result<Vec<Cid>, ApiError>>()?;

    let availability = state
        .node
        .check(&space_id, identity.as_bytes(), &cids)
        .await?;
    let wire = availability
        .into_iter()
        .map(|(cid, avail)| (cid.to_string(), avail.into()))
        .collect();
    Ok(Json(wire))
}

#[derive(Deserialize)]
pub struct FilesDeleteRequest {
    file_ids: Vec<String>,
}

pub async fn delete_files(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(space_id): Path<String>,
    Json(request): Json<FilesDeleteRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .node
        .files_delete(&space_id, identity.as_bytes(), &request.file_ids)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct SpaceInfoResponse {
    cid_count: u64,
    file_count: u64,
}

pub async fn space_info(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(space_id): Path<String>,
) -> Result<Json<SpaceInfoResponse>, ApiError> {
    let info = state.node.space_info(&space_id, identity.as_bytes()).await?;
    Ok(Json(SpaceInfoResponse {
        cid_count: info.cid_count,
        file_count: info.file_count,
    }))
}

#[derive(Serialize)]
pub struct FileInfoResponse {
    bytes_usage: u64,
    cid_count: u64,
}

pub async fn file_info(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path((space_id, file_id)): Path<(String, String)>,
) -> Result<Json<FileInfoResponse>, ApiError> {
    let info = state
        .node
        .file_info(&space_id, &file_id, identity.as_bytes())
        .await?;
    Ok(Json(FileInfoResponse {
        bytes_usage: info.bytes_usage,
        cid_count: info.cid_count,
    }))
}
