use anyhow::{bail, Context, Result};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::RemoteStore;
use crate::config::WizardConfig;
use crate::models::constants::http::{CONNECT_TIMEOUT_SECS, USER_AGENT};
use crate::models::overview::OverviewDocument;
use crate::models::{CompetitionId, PanelKind};
use crate::panel::PanelDocument;

/// JSON-over-HTTP [`RemoteStore`].
///
/// Routes, relative to the base URL:
/// - `POST   /competitions` creates a competition from an overview document
/// - `GET    /competitions/{id}/overview` and `PUT` to replace it
/// - `GET    /competitions/{id}/panels/{panel}` and `PUT` to replace it
#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: CompetitionId,
}

impl HttpRemoteStore {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            bail!("Remote base URL is empty");
        }
        Ok(Self {
            client: create_http_client(request_timeout)?,
            base_url,
        })
    }

    pub fn from_config(config: &WizardConfig) -> Result<Self> {
        Self::new(&config.api_base_url, config.http_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn overview_url(&self, competition_id: &CompetitionId) -> String {
        format!("{}/competitions/{competition_id}/overview", self.base_url)
    }

    fn panel_url(&self, panel: PanelKind, competition_id: &CompetitionId) -> String {
        format!(
            "{}/competitions/{competition_id}/panels/{}",
            self.base_url,
            panel.slug()
        )
    }
}

fn create_http_client(request_timeout: Duration) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(request_timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to create HTTP client")
}

fn validate_response_status(response: &Response, context: &str) -> Result<()> {
    if !response.status().is_success() {
        let status = response.status();
        bail!(
            "{}: HTTP {} - {}",
            context,
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown error")
        );
    }
    Ok(())
}

impl RemoteStore for HttpRemoteStore {
    fn fetch_overview(&self, competition_id: &CompetitionId) -> Result<OverviewDocument> {
        let url = self.overview_url(competition_id);
        debug!(%url, "Fetching overview");
        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to fetch overview from {url}"))?;
        validate_response_status(&response, "Failed to fetch overview")?;
        response.json().context("Failed to parse overview document")
    }

    fn create_overview(&self, document: &OverviewDocument) -> Result<CompetitionId> {
        let url = format!("{}/competitions", self.base_url);
        debug!(%url, "Creating competition");
        let response = self
            .client
            .post(&url)
            .json(document)
            .send()
            .with_context(|| format!("Failed to create competition at {url}"))?;
        validate_response_status(&response, "Failed to create competition")?;
        let created: Created = response
            .json()
            .context("Failed to parse created competition id")?;
        Ok(created.id)
    }

    fn save_overview(&self, competition_id: &CompetitionId, document: &OverviewDocument) -> Result<()> {
        let url = self.overview_url(competition_id);
        debug!(%url, stages = document.stages.len(), "Saving overview");
        let response = self
            .client
            .put(&url)
            .json(document)
            .send()
            .with_context(|| format!("Failed to save overview to {url}"))?;
        validate_response_status(&response, "Failed to save overview")
    }

    fn fetch_panel(&self, panel: PanelKind, competition_id: &CompetitionId) -> Result<PanelDocument> {
        let url = self.panel_url(panel, competition_id);
        debug!(%url, %panel, "Fetching panel");
        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to fetch {panel} from {url}"))?;
        validate_response_status(&response, &format!("Failed to fetch {panel}"))?;
        response
            .json()
            .with_context(|| format!("Failed to parse {panel} document"))
    }

    fn save_panel(
        &self,
        panel: PanelKind,
        competition_id: &CompetitionId,
        document: &PanelDocument,
    ) -> Result<()> {
        let url = self.panel_url(panel, competition_id);
        debug!(%url, %panel, records = document.records.len(), "Saving panel");
        let response = self
            .client
            .put(&url)
            .json(document)
            .send()
            .with_context(|| format!("Failed to save {panel} to {url}"))?;
        validate_response_status(&response, &format!("Failed to save {panel}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_are_built_from_trimmed_base() {
        let store = HttpRemoteStore::new("https://api.example.com/v1/", Duration::from_secs(5)).unwrap();
        let id = CompetitionId::parse("c-42").unwrap();

        assert_eq!(store.base_url(), "https://api.example.com/v1");
        assert_eq!(
            store.overview_url(&id),
            "https://api.example.com/v1/competitions/c-42/overview"
        );
        assert_eq!(
            store.panel_url(PanelKind::Awards, &id),
            "https://api.example.com/v1/competitions/c-42/panels/awards"
        );
    }

    #[test]
    fn test_empty_base_url_is_rejected() {
        assert!(HttpRemoteStore::new("/", Duration::from_secs(5)).is_err());
    }
}
