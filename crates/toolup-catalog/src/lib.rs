mod resolve;
mod store;
mod sync;

pub use resolve::resolve;
pub use store::CatalogStore;
pub use sync::{default_catalog_url, parse_remote_versions, sync_tool};
