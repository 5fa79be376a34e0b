/// Backend-neutral retrieval result, before normalisation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievalHit {
    /// Retrieved chunk text; hits without text are discarded.
    pub text: Option<String>,
    /// Location of the originating document (e.g. `s3://bucket/docs/reset_password.txt`).
    pub uri: Option<String>,
    /// Relevance reported by the backend.
    pub score: Option<f32>,
    /// Stable chunk identifier, when the backend provides one.
    pub chunk_id: Option<String>,
}
