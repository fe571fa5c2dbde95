//! HTTP API handlers for orill-il

pub mod analytics;
pub mod analyzers;
pub mod buildinfo;
pub mod health;
pub mod illuminate;

pub use analytics::get_analytics_summary;
pub use analyzers::list_analyzers;
pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use illuminate::illuminate;
