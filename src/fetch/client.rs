use async_trait::async_trait;
use reqwest::{Request, Response};

/// Sends a prepared request. Implementations may decorate the request or
/// stand in for the network entirely.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
