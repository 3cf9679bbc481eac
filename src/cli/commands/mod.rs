//! CLI command implementations.

mod config;
mod genres;
mod serve;
mod suggest;

pub use config::run_config;
pub use genres::{run_genres, run_moods};
pub use serve::run_serve;
pub use suggest::run_suggest;
