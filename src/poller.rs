use std::sync::Arc;

use crate::Result;
use switchboard_core::configuration_fetcher::{ConfigurationFetcher, ConfigurationFetcherConfig};
use switchboard_core::configuration_store::ConfigurationStore;
use switchboard_core::poller_thread::PollerThread as PollerThreadImpl;
#[cfg(doc)]
use switchboard_core::Error;

pub(crate) struct PollerThreadConfig {
    pub(crate) store: Arc<ConfigurationStore>,
    pub(crate) base_url: String,
    pub(crate) api_token: String,
    pub(crate) project_ref: String,
}

/// A configuration poller thread.
///
/// The poller thread polls the server periodically to fetch the latest configuration snapshot
/// for one project.
///
/// Use [`Client::start_poller_thread`][crate::Client::start_poller_thread] to get an instance.
///
/// The Client serves unknown-key fallbacks before the first snapshot is fetched, so it is
/// recommended to call [`PollerThread::wait_for_configuration`] before the first evaluation.
pub struct PollerThread(PollerThreadImpl);

impl PollerThread {
    /// Starts the configuration poller thread.
    ///
    /// # Errors
    ///
    /// This method can return the following errors:
    ///
    /// - [`Error::Io`] if the poller thread failed to start.
    pub(crate) fn start(config: PollerThreadConfig) -> Result<PollerThread> {
        let fetcher = ConfigurationFetcher::new(ConfigurationFetcherConfig {
            base_url: config.base_url,
            api_token: config.api_token,
        });
        let inner = PollerThreadImpl::start(fetcher, config.store, config.project_ref)?;
        Ok(PollerThread(inner))
    }

    /// Waits for the first configuration snapshot to be fetched.
    ///
    /// This method blocks until the poller thread has fetched a snapshot.
    ///
    /// # Errors
    ///
    /// This method can fail with the following errors:
    ///
    /// - [`Error::PollerThreadPanicked`] if the poller thread panicked while waiting for
    ///   configuration.
    /// - [`Error::Unauthorized`] if the API token was rejected.
    /// - [`Error::InvalidBaseUrl`] if the configured base URL cannot be parsed.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # fn test(client: switchboard::Client) {
    /// let poller = client.start_poller_thread("my-project").unwrap();
    /// match poller.wait_for_configuration() {
    ///     Ok(()) => println!("Configuration fetched successfully."),
    ///     Err(err) => eprintln!("Error fetching configuration: {:?}", err),
    /// }
    /// # }
    /// ```
    pub fn wait_for_configuration(&self) -> Result<()> {
        self.0.wait_for_configuration()
    }

    /// Stop the poller thread.
    ///
    /// This function does not wait for the thread to actually stop.
    pub fn stop(&self) {
        self.0.stop()
    }

    /// Stop the poller thread and block waiting for it to exit.
    ///
    /// If you don't need to wait for the thread to exit, use [`PollerThread::stop`] instead.
    ///
    /// # Errors
    ///
    /// - [`Error::PollerThreadPanicked`] if the thread has panicked.
    pub fn shutdown(self) -> Result<()> {
        self.0.shutdown()
    }
}
