//! Find and purge stale GitLab CI runners.
//!
//! The pipeline is deliberately small: list every offline runner the token
//! can administer (paginated), fetch the full record for each, drop the ones
//! the location filters reject, then either report them or delete them.

pub mod config;
pub mod filter;
pub mod gitlab;
pub mod sweep;
