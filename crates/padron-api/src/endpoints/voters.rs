//! Election-day voter operations: search by DNI, toggle, one-way mark.

use padron_core::access::Access;
use padron_core::entities::Voter;
use padron_core::enums::ResponseStatus;
use padron_core::errors::CoreError;
use padron_core::responses::{
    MarkVotedResponse, SearchVoterResponse, ToggleVotedResponse, VoterPayload,
};
use padron_db::error::DatabaseError;

use crate::context::PadronApi;
use crate::endpoints::denial_message;

fn search_error(message: impl Into<String>) -> SearchVoterResponse {
    SearchVoterResponse {
        status: ResponseStatus::Error,
        message: Some(message.into()),
        voter: None,
    }
}

fn toggle_error(message: impl Into<String>) -> ToggleVotedResponse {
    ToggleVotedResponse {
        status: ResponseStatus::Error,
        message: Some(message.into()),
        voted: None,
    }
}

fn mark_error(message: impl Into<String>) -> MarkVotedResponse {
    MarkVotedResponse {
        status: ResponseStatus::Error,
        message: Some(message.into()),
        voted: None,
    }
}

impl PadronApi {
    /// Look up one voter of the caller's roll by national ID.
    ///
    /// A miss distinguishes `not_found` (roll has voters, none match) from
    /// `no_data` (nothing imported yet), so the UI can prompt for an upload
    /// instead of blaming the DNI.
    pub async fn search_voter(&self, access: &Access, dni: &str) -> SearchVoterResponse {
        let client = match access.require_client() {
            Ok(client) => client,
            Err(err) => return search_error(denial_message(&err)),
        };
        let dni = dni.trim();
        if dni.is_empty() {
            return search_error("DNI is required");
        }

        match self.service.find_voter_by_dni(&client.id, dni).await {
            Ok(Some(voter)) => match self.voter_payload(voter).await {
                Ok(payload) => SearchVoterResponse {
                    status: ResponseStatus::Success,
                    message: None,
                    voter: Some(payload),
                },
                Err(err) => {
                    tracing::error!(client_id = %client.id, error = %err, "voter search failed");
                    search_error(err.to_string())
                }
            },
            Ok(None) => match self.service.has_voters(&client.id).await {
                Ok(true) => SearchVoterResponse {
                    status: ResponseStatus::NotFound,
                    message: Some("No voter found with that DNI.".to_string()),
                    voter: None,
                },
                Ok(false) => SearchVoterResponse {
                    status: ResponseStatus::NoData,
                    message: Some("No voters have been uploaded yet".to_string()),
                    voter: None,
                },
                Err(err) => {
                    tracing::error!(client_id = %client.id, error = %err, "voter search failed");
                    search_error(err.to_string())
                }
            },
            Err(err) => {
                tracing::error!(client_id = %client.id, error = %err, "voter search failed");
                search_error(err.to_string())
            }
        }
    }

    /// Flip a voter's voted flag by internal ID and report the new state.
    pub async fn toggle_voted(&self, access: &Access, voter_id: &str) -> ToggleVotedResponse {
        let client = match access.require_client() {
            Ok(client) => client,
            Err(err) => return toggle_error(denial_message(&err)),
        };

        match self.service.toggle_voted(&client.id, voter_id).await {
            Ok(voted) => ToggleVotedResponse {
                status: ResponseStatus::Success,
                message: None,
                voted: Some(voted),
            },
            Err(DatabaseError::Core(CoreError::NotFound { .. })) => toggle_error("Voter not found"),
            Err(DatabaseError::Core(CoreError::AccessDenied(reason))) => toggle_error(reason),
            Err(err) => {
                tracing::error!(client_id = %client.id, voter_id, error = %err, "toggle failed");
                toggle_error(err.to_string())
            }
        }
    }

    /// Mark a voter as voted by national ID. One-way: marking an
    /// already-voted voter succeeds without flipping anything back.
    pub async fn mark_voted_by_dni(&self, access: &Access, dni: &str) -> MarkVotedResponse {
        let client = match access.require_client() {
            Ok(client) => client,
            Err(err) => return mark_error(denial_message(&err)),
        };
        let dni = dni.trim();
        if dni.is_empty() {
            return mark_error("DNI is required");
        }

        match self.service.set_voted_by_dni(&client.id, dni).await {
            Ok(Some(_)) => MarkVotedResponse {
                status: ResponseStatus::Success,
                message: None,
                voted: Some(true),
            },
            Ok(None) => MarkVotedResponse {
                status: ResponseStatus::NotFound,
                message: Some("No voter found with that DNI.".to_string()),
                voted: None,
            },
            Err(err) => {
                tracing::error!(client_id = %client.id, dni, error = %err, "mark voted failed");
                mark_error(err.to_string())
            }
        }
    }

    /// Resolve the zone name and shape a voter for the wire.
    async fn voter_payload(&self, voter: Voter) -> Result<VoterPayload, DatabaseError> {
        let zone = match voter.zone_id.as_deref() {
            Some(zone_id) => self.service.get_zone(zone_id).await?.map(|zone| zone.name),
            None => None,
        };
        Ok(VoterPayload {
            id: voter.id,
            dni: voter.dni,
            last_name: voter.last_name,
            first_name: voter.first_name,
            sex: voter.sex,
            address: voter.address,
            mesa: voter.mesa,
            orden: voter.orden,
            establishment: voter.establishment,
            voted: voter.voted,
            zone,
        })
    }
}
