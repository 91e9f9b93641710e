//! CLI command implementations.

mod ask;
mod chunk;
mod config;
mod index;
mod list;
mod prepare;
mod serve;

pub use ask::run_ask;
pub use chunk::run_chunk;
pub use config::run_config;
pub use index::run_index;
pub use list::run_list;
pub use prepare::run_prepare;
pub use serve::run_serve;
