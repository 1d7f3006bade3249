//! CLI command handlers, one file per command.

mod resolve;
mod serve;
mod settings;
mod slug;
mod validate;

pub use resolve::run_resolve;
pub use serve::run_serve;
pub use settings::{run_settings_get, run_settings_set};
pub use slug::run_slug;
pub use validate::run_validate;

#[cfg(test)]
pub(crate) use settings::parse_value;
#[cfg(test)]
pub(crate) use validate::parse_title_list;
