//! GitLab REST API access
//!
//! - [`client`] - holds the base URL and access token, builds API v4 URLs
//! - [`http`] - thin `reqwest` wrapper aware of GitLab's pagination headers
//! - [`runners`] - runner models and the list/details/delete calls

pub mod client;
pub mod http;
pub mod runners;
