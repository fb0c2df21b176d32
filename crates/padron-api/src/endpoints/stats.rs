//! Turnout rollups and the pending-voters worklist.

use padron_core::access::Access;
use padron_core::enums::{ResponseStatus, ZoneSelector};
use padron_core::responses::{ClientStatsResponse, PendingVotersResponse, ZoneStatsResponse};

use crate::context::PadronApi;
use crate::endpoints::denial_message;

/// Request parameters for the pending-voters listing.
///
/// `zone` carries the raw request value: absent or `"all"` means every zone,
/// `"unassigned"` means voters without one, anything else is a zone ID.
/// Unset `page`/`page_size` fall back to 1 and the configured default.
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingParams<'a> {
    pub zone: Option<&'a str>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

fn stats_error(message: impl Into<String>) -> ClientStatsResponse {
    ClientStatsResponse {
        status: ResponseStatus::Error,
        message: Some(message.into()),
        stats: None,
    }
}

fn zones_error(message: impl Into<String>) -> ZoneStatsResponse {
    ZoneStatsResponse {
        status: ResponseStatus::Error,
        message: Some(message.into()),
        zones: None,
    }
}

fn pending_error(message: impl Into<String>) -> PendingVotersResponse {
    PendingVotersResponse {
        status: ResponseStatus::Error,
        message: Some(message.into()),
        page: None,
    }
}

impl PadronApi {
    /// Client-wide turnout counters.
    ///
    /// Served from the denormalized columns; a stale read heals itself
    /// before answering (see `padron-db`'s counter engine).
    pub async fn client_stats(&self, access: &Access) -> ClientStatsResponse {
        let client = match access.require_client() {
            Ok(client) => client,
            Err(err) => return stats_error(denial_message(&err)),
        };

        match self.service.client_stats(&client.id).await {
            Ok(stats) => ClientStatsResponse {
                status: ResponseStatus::Success,
                message: None,
                stats: Some(stats),
            },
            Err(err) => {
                tracing::error!(client_id = %client.id, error = %err, "client stats failed");
                stats_error(err.to_string())
            }
        }
    }

    /// Per-zone turnout, ordered by zone name.
    pub async fn zone_stats(&self, access: &Access) -> ZoneStatsResponse {
        let client = match access.require_client() {
            Ok(client) => client,
            Err(err) => return zones_error(denial_message(&err)),
        };

        match self.service.zone_stats(&client.id).await {
            Ok(zones) => ZoneStatsResponse {
                status: ResponseStatus::Success,
                message: None,
                zones: Some(zones),
            },
            Err(err) => {
                tracing::error!(client_id = %client.id, error = %err, "zone stats failed");
                zones_error(err.to_string())
            }
        }
    }

    /// One page of not-yet-voted voters, optionally narrowed to a zone.
    pub async fn pending_voters(
        &self,
        access: &Access,
        params: &PendingParams<'_>,
    ) -> PendingVotersResponse {
        let client = match access.require_client() {
            Ok(client) => client,
            Err(err) => return pending_error(denial_message(&err)),
        };

        let selector = ZoneSelector::from_param(params.zone);
        let page = params.page.unwrap_or(1);
        let page_size = params
            .page_size
            .unwrap_or(self.config.general.default_page_size);

        match self
            .service
            .list_pending(&client.id, &selector, page, page_size)
            .await
        {
            Ok(page) => PendingVotersResponse {
                status: ResponseStatus::Success,
                message: None,
                page: Some(page),
            },
            Err(err) => {
                tracing::error!(client_id = %client.id, error = %err, "pending listing failed");
                pending_error(err.to_string())
            }
        }
    }
}
