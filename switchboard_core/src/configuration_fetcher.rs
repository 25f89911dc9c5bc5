//! An HTTP client that fetches the full configuration manifest for a project from the server.
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use crate::{flags::Config, Configuration, Error, Result};

pub struct ConfigurationFetcherConfig {
    pub base_url: String,
    /// API token sent as a bearer credential.
    pub api_token: String,
}

/// Standard response envelope of the Switchboard API.
#[derive(Debug, Deserialize)]
struct ApiDataResponse<T> {
    data: T,
}

/// A client that fetches Switchboard configuration manifests from the server.
pub struct ConfigurationFetcher {
    // Client holds a connection pool internally, so we're reusing the client between requests.
    client: reqwest::blocking::Client,
    config: ConfigurationFetcherConfig,
    /// If we receive a 401 Unauthorized error during a request, it means the API token is not
    /// valid. We cache this error so we don't issue additional requests to the server.
    unauthorized: bool,
}

impl ConfigurationFetcher {
    pub fn new(config: ConfigurationFetcherConfig) -> ConfigurationFetcher {
        let client = reqwest::blocking::Client::new();

        ConfigurationFetcher {
            client,
            config,
            unauthorized: false,
        }
    }

    /// Fetch a fresh configuration snapshot for the given project.
    ///
    /// Errors propagate to the caller unmodified; this never substitutes a stale snapshot for a
    /// failed fetch.
    pub fn fetch_configuration(&mut self, project_ref: &str) -> Result<Configuration> {
        if self.unauthorized {
            return Err(Error::Unauthorized);
        }

        let configs = self.fetch_project_configs(project_ref)?;

        Ok(Configuration::from_server_response(configs))
    }

    fn fetch_project_configs(&mut self, project_ref: &str) -> Result<Vec<Config>> {
        let mut url =
            Url::parse(&self.config.base_url).map_err(|err| Error::InvalidBaseUrl(err))?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(["v1", "admin", "projects", project_ref, "configs"]);

        log::debug!(target: "switchboard", project_ref; "fetching configuration manifest");
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.config.api_token)
            .send()?;

        let response = response.error_for_status().map_err(|err| {
            if err.status() == Some(StatusCode::UNAUTHORIZED) {
                log::warn!(target: "switchboard", "client is not authorized. Check your API token");
                self.unauthorized = true;
                return Error::Unauthorized;
            } else {
                log::warn!(target: "switchboard", "received non-200 response while fetching new configuration: {:?}", err);
                return Error::from(err);
            }
        })?;

        let body: ApiDataResponse<Vec<Config>> = response.json()?;

        log::debug!(target: "switchboard", project_ref; "successfully fetched configuration manifest");

        Ok(body.data)
    }
}
