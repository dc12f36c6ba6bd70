/// Analysis service integration
///
/// This module covers the one external collaborator:
/// - `client.rs` - HTTP client for the analyze endpoint
/// - `schema.rs` - the JSON wire schema of the verdict

pub mod client;
pub mod schema;
