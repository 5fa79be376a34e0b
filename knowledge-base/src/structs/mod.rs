pub mod retrieval_config;
pub mod retrieval_hit;
