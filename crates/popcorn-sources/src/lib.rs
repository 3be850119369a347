pub mod traits;
pub mod omdb;
pub mod error;

pub use traits::MovieCatalog;
pub use error::CatalogError;
pub use omdb::OmdbClient;
