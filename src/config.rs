/// Server-wide settings built once in `main` and shared via `web::Data`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Shared secret used to validate auth-service JWTs.
    pub secret: String,
    /// Where anonymous UI requests are redirected to sign in.
    pub auth_service_url: String,
    /// Static bearer token expected by the automation API.
    pub api_token: String,
}

/// Connection settings for the external text-generation service.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Base URL of the OpenAI-compatible endpoint.
    pub api_url: String,
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Model identifier requested for every completion.
    pub model: String,
}
