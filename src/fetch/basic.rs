use super::client::HttpClient;
use async_trait::async_trait;
use std::time::Duration;

const USER_AGENT: &str = concat!("hub_demographics/", env!("CARGO_PKG_VERSION"));

/// Plain `reqwest` client that only sets the user agent and timeouts.
pub struct BasicClient(reqwest::Client);

fn builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(10))
}

impl BasicClient {
    /// Client with no overall request timeout.
    pub fn new() -> reqwest::Result<Self> {
        Ok(Self(builder().build()?))
    }

    /// Client whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self(builder().timeout(timeout).build()?))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_names_crate() {
        assert!(USER_AGENT.starts_with("hub_demographics/"));
    }

    #[test]
    fn test_clients_build() {
        assert!(BasicClient::new().is_ok());
        assert!(BasicClient::with_timeout(Duration::from_secs(5)).is_ok());
    }
}
