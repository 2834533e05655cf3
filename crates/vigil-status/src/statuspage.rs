//! statuspage.io backend.
//!
//! Talks to the statuspage.io v1 REST API: lists the components of one
//! page and issues partial updates to a single component's status field.
//! Every call carries an `Authorization: OAuth <token>` header.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use vigil_config::StatusPageIoConfig;
use vigil_core::{RemoteComponent, Severity};

use crate::error::{BackendError, BackendResult};
use crate::registry::ComponentRegistry;

/// One statuspage.io page, addressed through a shared HTTP transport.
pub struct StatusPageIo {
    client: reqwest::Client,
    base_url: String,
    page_id: String,
    token: String,
}

impl StatusPageIo {
    pub fn new(client: reqwest::Client, config: &StatusPageIoConfig) -> Self {
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            page_id: config.page_id.clone(),
            token: config.token.clone(),
        }
    }

    fn components_url(&self) -> String {
        format!("{}/pages/{}/components", self.base_url, self.page_id)
    }

    fn component_url(&self, component_id: &str) -> String {
        format!(
            "{}/pages/{}/components/{}",
            self.base_url, self.page_id, component_id
        )
    }

    fn auth_header(&self) -> String {
        format!("OAuth {}", self.token)
    }
}

#[async_trait]
impl ComponentRegistry for StatusPageIo {
    fn name(&self) -> String {
        format!("statuspage.io/{}", self.page_id)
    }

    async fn list_components(&self) -> BackendResult<Vec<RemoteComponent>> {
        let response = self
            .client
            .get(self.components_url())
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let components: Vec<SpioComponent> = response.json().await?;
        debug!(
            page_id = %self.page_id,
            count = components.len(),
            "components fetched from statuspage.io"
        );
        Ok(components.into_iter().map(RemoteComponent::from).collect())
    }

    async fn update_status(
        &self,
        component: &RemoteComponent,
        severity: Severity,
    ) -> BackendResult<()> {
        let patch = SpioComponentPatch::for_status(component, severity)?;
        let response = self
            .client
            .patch(self.component_url(&component.id))
            .header("Authorization", self.auth_header())
            .json(&patch)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Component object as returned by the statuspage.io API.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SpioComponent {
    #[serde(default)]
    id: String,
    #[serde(default)]
    group_id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<Severity>,
    #[serde(default)]
    showcase: bool,
    #[serde(default)]
    only_show_if_degraded: bool,
}

impl From<SpioComponent> for RemoteComponent {
    fn from(c: SpioComponent) -> Self {
        RemoteComponent {
            id: c.id,
            name: c.name,
            group_id: c.group_id,
            description: c.description,
            status: c.status.unwrap_or(Severity::Unknown),
            showcase: c.showcase,
            only_show_if_degraded: c.only_show_if_degraded,
        }
    }
}

/// Partial-update body: descriptive fields are carried through from the
/// cached component, only the status changes.
#[derive(Debug, Serialize)]
struct SpioComponentPatch {
    component: SpioPatchBody,
}

#[derive(Debug, Serialize)]
struct SpioPatchBody {
    group_id: Option<String>,
    name: String,
    description: Option<String>,
    status: &'static str,
    showcase: bool,
    only_show_if_degraded: bool,
}

impl SpioComponentPatch {
    fn for_status(component: &RemoteComponent, severity: Severity) -> BackendResult<Self> {
        Ok(Self {
            component: SpioPatchBody {
                group_id: component.group_id.clone(),
                name: component.name.clone(),
                description: component.description.clone(),
                status: severity.as_wire()?,
                showcase: component.showcase,
                only_show_if_degraded: component.only_show_if_degraded,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_component() -> RemoteComponent {
        RemoteComponent {
            id: "comp-1".to_string(),
            name: "API".to_string(),
            group_id: Some("grp-1".to_string()),
            description: Some("public API".to_string()),
            status: Severity::Operational,
            showcase: true,
            only_show_if_degraded: false,
        }
    }

    #[test]
    fn deserializes_component_listing() {
        let body = r#"[
            {
                "id": "comp-1", "page_id": "p1", "group_id": null,
                "created_at": "2020-01-01T00:00:00Z",
                "updated_at": "2020-06-01T00:00:00Z",
                "group": false, "name": "API", "description": "public API",
                "position": 1, "status": "degraded_performance",
                "showcase": true, "only_show_if_degraded": false,
                "automation_email": "comp@example.org"
            },
            {
                "id": "comp-2", "name": "Website", "status": "some_future_status",
                "showcase": false, "only_show_if_degraded": true
            }
        ]"#;

        let components: Vec<SpioComponent> = serde_json::from_str(body).unwrap();
        let components: Vec<RemoteComponent> =
            components.into_iter().map(RemoteComponent::from).collect();

        assert_eq!(components[0].id, "comp-1");
        assert_eq!(components[0].status, Severity::DegradedPerformance);
        // Unrecognized statuses degrade to Unknown instead of failing.
        assert_eq!(components[1].status, Severity::Unknown);
        assert!(components[1].only_show_if_degraded);
    }

    #[test]
    fn patch_body_carries_descriptive_fields() {
        let patch =
            SpioComponentPatch::for_status(&sample_component(), Severity::MajorOutage).unwrap();
        let json = serde_json::to_value(&patch).unwrap();

        assert_eq!(json["component"]["status"], "major_outage");
        assert_eq!(json["component"]["name"], "API");
        assert_eq!(json["component"]["group_id"], "grp-1");
        assert_eq!(json["component"]["showcase"], true);
    }

    #[test]
    fn unknown_severity_is_rejected_before_the_wire() {
        let err = SpioComponentPatch::for_status(&sample_component(), Severity::Unknown)
            .unwrap_err();
        assert!(matches!(err, BackendError::Severity(_)));
    }

    #[test]
    fn urls_are_built_from_page_id() {
        let backend = StatusPageIo::new(
            reqwest::Client::new(),
            &StatusPageIoConfig {
                url: "https://api.statuspage.io/v1/".to_string(),
                page_id: "p1".to_string(),
                token: "secret".to_string(),
                fetch_rate: std::time::Duration::from_secs(300),
            },
        );

        assert_eq!(
            backend.components_url(),
            "https://api.statuspage.io/v1/pages/p1/components"
        );
        assert_eq!(
            backend.component_url("comp-1"),
            "https://api.statuspage.io/v1/pages/p1/components/comp-1"
        );
        assert_eq!(backend.name(), "statuspage.io/p1");
    }
}
