mod client;
mod dto;
mod errors;
mod export;

pub use client::LineageClient;
pub use dto::{
    ColumnLineageDto, ColumnLineageResponse, ColumnRefDto, CreateRelationshipRequest,
    CreateRelationshipResponse, DeleteRelationshipResponse, LineageEdgeDto, LineageNodeDto,
    LineageRequest, LineageResponse,
};
pub use errors::ApiError;
pub use export::{AssetColumnLineage, LineageSnapshot};
