use crate::Client;

/// Configuration for [`Client`].
///
/// # Examples
/// ```
/// # use switchboard::ClientConfig;
/// let client = ClientConfig::new("https://flags.example.com", "api-token").to_client();
/// ```
pub struct ClientConfig {
    pub(crate) base_url: String,
    pub(crate) api_token: String,
}

impl ClientConfig {
    /// Create a configuration for the Switchboard server at `base_url`, authenticating with
    /// `api_token` (sent as a bearer credential).
    ///
    /// ```
    /// # use switchboard::ClientConfig;
    /// ClientConfig::new("https://flags.example.com", "api-token");
    /// ```
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            api_token: api_token.into(),
        }
    }

    /// Create a new [`Client`] using the specified configuration.
    ///
    /// ```
    /// # use switchboard::{ClientConfig, Client};
    /// let client: Client = ClientConfig::new("https://flags.example.com", "api-token").to_client();
    /// ```
    pub fn to_client(self) -> Client {
        Client::new(self)
    }
}
