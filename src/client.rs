use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use switchboard_core::{
    configuration_fetcher::{ConfigurationFetcher, ConfigurationFetcherConfig},
    configuration_store::ConfigurationStore,
    eval::Evaluator,
    flags::{EvaluateRequest, EvaluationResult},
    Configuration, Result,
};

use crate::{
    poller::{PollerThread, PollerThreadConfig},
    ClientConfig,
};

/// A client for the Switchboard API.
///
/// The client keeps a local snapshot of a project's flag configurations and evaluates requests
/// against it synchronously, with no network round-trip per evaluation. The snapshot is filled
/// either by calling [`Client::sync`] explicitly or by starting a background
/// [`PollerThread`](Client::start_poller_thread).
///
/// # Examples
/// ```no_run
/// # use switchboard::{Client, ClientConfig, EvaluateRequest};
/// let client = Client::new(ClientConfig::new("https://flags.example.com", "api-token"));
/// client.sync("my-project")?;
///
/// let results = client.evaluate(&EvaluateRequest {
///     filters: [("tier".to_owned(), "vip".into())].into_iter().collect(),
///     keys: vec!["checkout_v2".to_owned()],
///     identifier: Some("user-42".to_owned()),
/// });
/// # Ok::<(), switchboard::Error>(())
/// ```
pub struct Client {
    configuration_store: Arc<ConfigurationStore>,
    evaluator: Evaluator,
    // sync() needs exclusive access to the fetcher (it caches the connection pool and the
    // unauthorized latch); evaluation never touches this lock.
    fetcher: Mutex<ConfigurationFetcher>,
    config: ClientConfig,
}

impl Client {
    /// Create a new `Client` using the specified configuration.
    ///
    /// ```
    /// # use switchboard::{ClientConfig, Client};
    /// let client = Client::new(ClientConfig::new("https://flags.example.com", "api-token"));
    /// ```
    pub fn new(config: ClientConfig) -> Self {
        let configuration_store = Arc::new(ConfigurationStore::new());
        Client::new_with_configuration_store(config, configuration_store)
    }

    fn new_with_configuration_store(
        config: ClientConfig,
        configuration_store: Arc<ConfigurationStore>,
    ) -> Self {
        let evaluator = Evaluator::new(configuration_store.clone());
        let fetcher = Mutex::new(ConfigurationFetcher::new(ConfigurationFetcherConfig {
            base_url: config.base_url.clone(),
            api_token: config.api_token.clone(),
        }));
        Client {
            configuration_store,
            evaluator,
            fetcher,
            config,
        }
    }

    /// Fetch a fresh configuration snapshot for `project_ref` and publish it, replacing any
    /// previous snapshot wholesale.
    ///
    /// On error the previous snapshot stays live and keeps serving evaluations; it is the
    /// caller's decision whether to retry or keep serving stale data. Concurrent `evaluate` calls
    /// are never blocked by an in-flight sync.
    ///
    /// # Errors
    ///
    /// - [`Error::Unauthorized`](crate::Error::Unauthorized) if the API token is rejected.
    /// - [`Error::InvalidBaseUrl`](crate::Error::InvalidBaseUrl) if the configured base URL
    ///   cannot be parsed.
    /// - [`Error::Network`](crate::Error::Network) for transport-level failures.
    pub fn sync(&self, project_ref: &str) -> Result<()> {
        let configuration = self
            .fetcher
            .lock()
            .expect("thread holding fetcher lock should not panic")
            .fetch_configuration(project_ref)?;

        self.configuration_store
            .set_configuration(Arc::new(configuration));
        Ok(())
    }

    /// Whether at least one snapshot has been successfully synchronized.
    pub fn is_ready(&self) -> bool {
        self.configuration_store.get_configuration().is_some()
    }

    /// Evaluate the requested configuration keys against the current snapshot.
    ///
    /// This is synchronous and suspension-free: it never fetches. Every requested key gets an
    /// entry in the result, including keys missing from the snapshot (`{null, "none", FALLBACK}`)
    /// and inactive configurations (`{null, "none", DISABLED}`). Calling this before the first
    /// [`Client::sync`] behaves as evaluation against an empty snapshot.
    pub fn evaluate(&self, request: &EvaluateRequest) -> HashMap<String, EvaluationResult> {
        self.evaluator.evaluate(request)
    }

    /// The currently published snapshot, if any.
    pub fn configuration(&self) -> Option<Arc<Configuration>> {
        self.configuration_store.get_configuration()
    }

    /// Start a background poller thread that keeps the snapshot for `project_ref` fresh.
    ///
    /// It is recommended to call
    /// [`PollerThread::wait_for_configuration`] before the first evaluation.
    pub fn start_poller_thread(&self, project_ref: impl Into<String>) -> Result<PollerThread> {
        PollerThread::start(PollerThreadConfig {
            store: self.configuration_store.clone(),
            base_url: self.config.base_url.clone(),
            api_token: self.config.api_token.clone(),
            project_ref: project_ref.into(),
        })
    }
}
