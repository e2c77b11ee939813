// Library exports for eve-wiki-mcp
// This allows the modules to be imported in tests and by the binary

pub mod config;
pub mod mcp;
pub mod planning;
pub mod server;
pub mod tools;
pub mod validation;
pub mod wiki;
