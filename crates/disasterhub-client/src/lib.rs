//! Client-side pipeline of the DisasterHub dashboard: report ingestion,
//! normalization, voting, polling, and emergency submission.

pub mod auth;
pub mod directory;
pub mod error;
pub mod fallback;
pub mod feed;
pub mod geolocation;
pub mod heatmap;
pub mod normalize;
pub mod poller;
pub mod report_form;
pub mod routing;
pub mod source;
pub mod store;
pub mod submit;

pub use error::ClientError;
