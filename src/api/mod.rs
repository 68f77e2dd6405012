pub mod content;

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};

pub use content::{ContentClient, ErrorEnvelope};

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    retries: u32,
}

impl ApiClient {
    pub fn new(retries: u32) -> Self {
        Self {
            client: Client::new(),
            retries,
        }
    }
    /// For idempotent reads; transient failures are retried when enabled.
    fn client(&self) -> ClientWithMiddleware {
        if self.retries == 0 {
            return self.single_shot();
        }

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(self.retries);
        ClientBuilder::new(self.client.clone())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build()
    }
    /// For writes: a create has no idempotency key, so it is sent once.
    fn single_shot(&self) -> ClientWithMiddleware {
        ClientBuilder::new(self.client.clone()).build()
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(0)
    }
}
