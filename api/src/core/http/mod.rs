pub mod headers;
pub mod response_envelope;
