//! Small helpers shared by the HTTP layer and the orchestrators.

pub mod header;
pub mod uuid;
