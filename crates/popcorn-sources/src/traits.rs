use async_trait::async_trait;
use popcorn_models::{MovieDetail, SearchResult};
use crate::error::CatalogError;

/// Remote source of movie metadata
///
/// Implementations are shared between request tasks, so they must be cheap
/// to call concurrently. Dropping a returned future abandons the request.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    fn source_name(&self) -> &str;

    /// Search by title fragment; an empty match list is `CatalogError::NotFound`
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError>;

    /// Fetch extended metadata for one movie id
    async fn get_detail(&self, id: &str) -> Result<MovieDetail, CatalogError>;
}
