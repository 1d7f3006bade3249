pub mod config;
pub mod logging;

pub mod batch;
pub mod classify;
pub mod direct;
pub mod fetch;
pub mod normalize;
pub mod observe;
pub mod plugin_api;
pub mod resolver;
pub mod score;
pub mod search;
pub mod settings;
pub mod types;

pub use normalize::normalize;
pub use resolver::{Resolver, ResolverConfig};
pub use types::{Candidate, LookupResult, StatusTag};
