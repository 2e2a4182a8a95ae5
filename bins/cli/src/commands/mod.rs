//! CLI command handlers.

pub mod check;
pub mod info;
pub mod messages;
pub mod show;

pub use check::{CheckCommandInput, run_check};
pub use info::run_info;
pub use messages::run_messages;
pub use show::{run_json_schema, run_show};
