//! Roll management: spreadsheet imports and the secret-gated clear-all.

use padron_core::access::Access;
use padron_core::enums::ResponseStatus;
use padron_core::responses::{ClearVotersResponse, ImportResponse};
use padron_import::{ImportError, ImportRequest, Importer};

use crate::context::PadronApi;
use crate::endpoints::denial_message;

fn import_error(message: impl Into<String>) -> ImportResponse {
    ImportResponse {
        status: ResponseStatus::Error,
        message: Some(message.into()),
        summary: None,
    }
}

fn clear_error(message: impl Into<String>) -> ClearVotersResponse {
    ClearVotersResponse {
        status: ResponseStatus::Error,
        message: Some(message.into()),
        outcome: None,
    }
}

impl PadronApi {
    /// Import a spreadsheet into the caller's roll.
    ///
    /// Only client owners may reshape the roll; visitors hold election-day
    /// rights and are rejected before the file is touched. Everything else
    /// (validation order, replace gating, per-row outcomes) lives in
    /// `padron-import`.
    pub async fn import_spreadsheet(
        &self,
        access: &Access,
        request: &ImportRequest<'_>,
    ) -> ImportResponse {
        let client = match access.require_import_rights() {
            Ok(client) => client,
            Err(err) => return import_error(denial_message(&err)),
        };

        let importer = Importer::new(&self.service, &self.config.security, &self.config.import);
        match importer.run(&client.id, request).await {
            Ok(summary) => ImportResponse {
                status: ResponseStatus::Success,
                message: None,
                summary: Some(summary),
            },
            Err(err) => {
                match &err {
                    ImportError::Validation(_) | ImportError::AccessDenied(_) => {
                        tracing::debug!(client_id = %client.id, error = %err, "import rejected");
                    }
                    _ => {
                        tracing::error!(client_id = %client.id, error = %err, "import failed");
                    }
                }
                import_error(err.to_string())
            }
        }
    }

    /// Delete every voter and zone of the caller's roll.
    ///
    /// Refused unless the supplied secret matches the configured one; with
    /// no secret configured, always refused.
    pub async fn clear_voters(
        &self,
        access: &Access,
        secret: Option<&str>,
    ) -> ClearVotersResponse {
        let client = match access.require_import_rights() {
            Ok(client) => client,
            Err(err) => return clear_error(denial_message(&err)),
        };
        if !self.config.security.verify_delete_secret(secret) {
            return clear_error("Invalid destructive-action secret");
        }

        match self.service.clear_all_voters(&client.id).await {
            Ok(outcome) => ClearVotersResponse {
                status: ResponseStatus::Success,
                message: None,
                outcome: Some(outcome),
            },
            Err(err) => {
                tracing::error!(client_id = %client.id, error = %err, "clear all failed");
                clear_error(err.to_string())
            }
        }
    }
}
