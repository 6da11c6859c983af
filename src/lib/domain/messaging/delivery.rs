//! Delivery client

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use super::{errors::DeliveryError, EmailRequest};

/// Hands messages to the remote email API
#[async_trait]
pub trait DeliveryClient: Send + Sync + 'static {
    /// Send a message
    ///
    /// # Arguments
    /// * `request` - The [`EmailRequest`] to send.
    ///
    /// # Returns
    /// - [`Ok`] with `true` if the API accepted the message, `false` if it refused it.
    /// - [`Err`] containing a [`DeliveryError`] if the message never reached the API.
    async fn send_message(&self, request: &EmailRequest) -> Result<bool, DeliveryError>;
}

#[cfg(test)]
mock! {
    pub DeliveryClient {}

    #[async_trait]
    impl DeliveryClient for DeliveryClient {
        async fn send_message(&self, request: &EmailRequest) -> Result<bool, DeliveryError>;
    }
}
