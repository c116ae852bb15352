//! MCP JSON-RPC server surface: tools, resources, and prompts.

pub mod format;
pub mod prompts;
pub mod resources;
pub mod server;
pub mod tools;

pub use server::run_server;
