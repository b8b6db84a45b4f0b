use crate::dto::{
    ColumnLineageResponse, CreateRelationshipRequest, CreateRelationshipResponse,
    DeleteRelationshipResponse, LineageRequest, LineageResponse,
};
use crate::errors::ApiError;
use lineascope_core::AssetId;

/// The lineage query collaborator.
///
/// The engine never talks to the network itself; a host implements this
/// trait over its REST transport and drives fetches when the controller
/// emits a fetch command. All methods are synchronous from the trait's
/// point of view -- the host decides where the waiting happens.
pub trait LineageClient {
    /// `GET lineage(asset_id, direction, depth)`
    fn lineage(&self, request: &LineageRequest) -> Result<LineageResponse, ApiError>;

    /// `GET columnLineage(asset_id)`
    fn column_lineage(&self, asset_id: &AssetId) -> Result<ColumnLineageResponse, ApiError>;

    /// `POST createRelationship(...)`
    fn create_relationship(
        &self,
        request: &CreateRelationshipRequest,
    ) -> Result<CreateRelationshipResponse, ApiError>;

    /// `DELETE deleteRelationship(id)`
    fn delete_relationship(&self, id: &str) -> Result<DeleteRelationshipResponse, ApiError>;
}
