//! The import pipeline: validate the upload, optionally replace the roll,
//! stream rows through the registry upsert, then recount.

use padron_config::{ImportConfig, SecurityConfig};
use padron_core::entities::DEFAULT_ZONE_NAME;
use padron_core::enums::RowOutcome;
use padron_core::responses::ImportSummary;
use padron_db::error::{DatabaseError, is_unique_violation};
use padron_db::service::PadronService;

use crate::columns::{ColumnMap, file_row};
use crate::error::ImportError;

/// One upload, as handed over by the embedding surface.
#[derive(Debug, Clone)]
pub struct ImportRequest<'a> {
    pub file_name: &'a str,
    pub bytes: &'a [u8],
    /// Zone every imported row is assigned to; the default zone when absent.
    pub target_zone: Option<&'a str>,
    /// Delete the client's existing voters and zones first (secret-gated).
    pub replace: bool,
    /// Destructive-action secret; only consulted when `replace` would
    /// actually delete something.
    pub secret: Option<&'a str>,
}

/// Spreadsheet importer bound to one service and configuration.
pub struct Importer<'a> {
    service: &'a PadronService,
    security: &'a SecurityConfig,
    limits: &'a ImportConfig,
}

impl<'a> Importer<'a> {
    #[must_use]
    pub const fn new(
        service: &'a PadronService,
        security: &'a SecurityConfig,
        limits: &'a ImportConfig,
    ) -> Self {
        Self {
            service,
            security,
            limits,
        }
    }

    /// Run one import for `client_id`.
    ///
    /// Upload-level validation (size, extension, empty file, required
    /// columns) happens before anything is deleted or written. Row-level
    /// problems become skips and warnings in the summary; a storage error
    /// aborts, leaving already-committed rows in place. On completion the
    /// client's counters are recomputed from the voter table.
    pub async fn run(
        &self,
        client_id: &str,
        request: &ImportRequest<'_>,
    ) -> Result<ImportSummary, ImportError> {
        if !self.limits.accepts_size(request.bytes.len() as u64) {
            return Err(ImportError::Validation(format!(
                "File exceeds the upload limit of {} bytes",
                self.limits.max_upload_bytes
            )));
        }
        if !request.file_name.ends_with(".csv") {
            return Err(ImportError::Validation(
                "Please upload a CSV (.csv) file".to_string(),
            ));
        }
        if request.bytes.is_empty() {
            return Err(ImportError::Validation(
                "The uploaded file is empty".to_string(),
            ));
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(request.bytes);
        let columns = ColumnMap::from_headers(reader.headers()?)?;

        if request.replace && self.service.has_voters(client_id).await? {
            if !self.security.verify_delete_secret(request.secret) {
                return Err(ImportError::AccessDenied(
                    "invalid destructive-action secret".to_string(),
                ));
            }
            let outcome = self.service.clear_all_voters(client_id).await?;
            tracing::info!(
                client_id,
                deleted = outcome.deleted_count,
                "existing roll replaced"
            );
        }

        let zone_name = request
            .target_zone
            .map(str::trim)
            .filter(|z| !z.is_empty())
            .unwrap_or(DEFAULT_ZONE_NAME);
        let zone = self.service.get_or_create_zone(client_id, zone_name).await?;

        let mut summary = ImportSummary::default();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let (draft, mut warnings) = columns.parse_row(&record, index);
            summary.warnings.append(&mut warnings);

            let outcome = if let Some(draft) = draft {
                match self
                    .service
                    .upsert_voter(client_id, Some(&zone.id), &draft)
                    .await
                {
                    Ok((outcome, _)) => outcome,
                    Err(DatabaseError::LibSql(err)) if is_unique_violation(&err) => {
                        summary.warnings.push(format!(
                            "Row {}: duplicate DNI '{}'; skipped",
                            file_row(index),
                            draft.dni
                        ));
                        RowOutcome::Skipped
                    }
                    Err(err) => return Err(err.into()),
                }
            } else {
                RowOutcome::Skipped
            };

            match outcome {
                RowOutcome::Created => summary.created += 1,
                RowOutcome::Updated => summary.updated += 1,
                RowOutcome::Unchanged => {}
                RowOutcome::Skipped => summary.skipped += 1,
            }
        }

        self.service.recompute_counters(client_id).await?;
        tracing::info!(
            client_id,
            created = summary.created,
            updated = summary.updated,
            skipped = summary.skipped,
            "import finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use padron_core::enums::ZoneSelector;
    use padron_db::PadronDb;
    use padron_db::repos::identity::NewPrincipal;
    use pretty_assertions::assert_eq;

    async fn seeded_service() -> (PadronService, String) {
        let db = PadronDb::open_local(":memory:").await.unwrap();
        let svc = PadronService::from_db(db);
        let principal = svc
            .create_principal(&NewPrincipal {
                username: "maria".to_string(),
                password_hash: "pbkdf2$test".to_string(),
                ..NewPrincipal::default()
            })
            .await
            .unwrap();
        let client = svc
            .provision_principal(&principal.id)
            .await
            .unwrap()
            .expect("client profile");
        (svc, client.id)
    }

    fn request(bytes: &str) -> ImportRequest<'_> {
        ImportRequest {
            file_name: "padron.csv",
            bytes: bytes.as_bytes(),
            target_zone: None,
            replace: false,
            secret: None,
        }
    }

    fn secret_config() -> SecurityConfig {
        SecurityConfig {
            delete_secret: "BORRAR TODO".to_string(),
        }
    }

    fn roll_file(start_dni: usize, rows: usize) -> String {
        let mut file = String::from("dni,last_name,first_name\n");
        for i in 0..rows {
            file.push_str(&format!("{},GOMEZ,ANA\n", start_dni + i));
        }
        file
    }

    const BASIC_FILE: &str = "\
dni,last_name,first_name\n\
30000000,GOMEZ,ANA\n\
30000001,PEREZ,LUIS\n\
30000002,RUIZ,EVA\n";

    #[tokio::test]
    async fn import_creates_voters_in_the_default_zone() {
        let (svc, client_id) = seeded_service().await;
        let security = secret_config();
        let limits = ImportConfig::default();
        let importer = Importer::new(&svc, &security, &limits);

        let summary = importer.run(&client_id, &request(BASIC_FILE)).await.unwrap();
        assert_eq!(summary.created, 3);
        assert_eq!(summary.updated, 0);
        assert_eq!(summary.skipped, 0);
        assert!(summary.warnings.is_empty());

        let client = svc.get_client(&client_id).await.unwrap();
        assert_eq!(client.total_voters, 3);

        let zones = svc.list_zones(&client_id).await.unwrap();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].name, DEFAULT_ZONE_NAME);
        assert_eq!(zones[0].total_voters, 3);
    }

    #[tokio::test]
    async fn rerun_of_identical_file_changes_nothing() {
        let (svc, client_id) = seeded_service().await;
        let security = secret_config();
        let limits = ImportConfig::default();
        let importer = Importer::new(&svc, &security, &limits);

        importer.run(&client_id, &request(BASIC_FILE)).await.unwrap();
        let summary = importer.run(&client_id, &request(BASIC_FILE)).await.unwrap();
        assert_eq!(summary.created, 0);
        assert_eq!(summary.updated, 0);
        assert_eq!(summary.skipped, 0);
        assert_eq!(svc.get_client(&client_id).await.unwrap().total_voters, 3);
    }

    #[tokio::test]
    async fn changed_rows_count_as_updated() {
        let (svc, client_id) = seeded_service().await;
        let security = secret_config();
        let limits = ImportConfig::default();
        let importer = Importer::new(&svc, &security, &limits);

        importer.run(&client_id, &request(BASIC_FILE)).await.unwrap();
        let revised = "\
dni,last_name,first_name\n\
30000000,GOMEZ,ANA MARIA\n\
30000001,PEREZ,LUIS\n\
30000002,RUIZ,EVA\n";
        let summary = importer.run(&client_id, &request(revised)).await.unwrap();
        assert_eq!(summary.created, 0);
        assert_eq!(summary.updated, 1);

        let voter = svc
            .find_voter_by_dni(&client_id, "30000000")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(voter.first_name, "ANA MARIA");
    }

    #[tokio::test]
    async fn rows_missing_dni_are_skipped_with_file_coordinates() {
        let (svc, client_id) = seeded_service().await;
        let security = secret_config();
        let limits = ImportConfig::default();
        let importer = Importer::new(&svc, &security, &limits);

        let file = "\
dni,last_name,first_name\n\
30000000,GOMEZ,ANA\n\
,PEREZ,LUIS\n\
30000002,RUIZ,EVA\n";
        let summary = importer.run(&client_id, &request(file)).await.unwrap();
        assert_eq!(summary.created, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.warnings, vec!["Row 3: missing DNI or name; skipped"]);
        assert_eq!(svc.get_client(&client_id).await.unwrap().total_voters, 2);
    }

    #[tokio::test]
    async fn unparsable_mesa_warns_but_keeps_the_row() {
        let (svc, client_id) = seeded_service().await;
        let security = secret_config();
        let limits = ImportConfig::default();
        let importer = Importer::new(&svc, &security, &limits);

        let file = "\
dni,last_name,mesa\n\
30000000,GOMEZ,Escuela 7\n";
        let summary = importer.run(&client_id, &request(file)).await.unwrap();
        assert_eq!(summary.created, 1);
        assert_eq!(summary.skipped, 0);
        assert_eq!(
            summary.warnings,
            vec!["Row 2: invalid mesa value 'Escuela 7'; ignored"]
        );

        let voter = svc
            .find_voter_by_dni(&client_id, "30000000")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(voter.mesa, None);
    }

    #[tokio::test]
    async fn wrong_extension_is_rejected_before_anything_happens() {
        let (svc, client_id) = seeded_service().await;
        let security = secret_config();
        let limits = ImportConfig::default();
        let importer = Importer::new(&svc, &security, &limits);
        importer.run(&client_id, &request(BASIC_FILE)).await.unwrap();

        let mut bad = request(BASIC_FILE);
        bad.file_name = "padron.xlsx";
        bad.replace = true;
        bad.secret = Some("BORRAR TODO");
        let err = importer.run(&client_id, &bad).await.unwrap_err();
        assert!(matches!(err, ImportError::Validation(_)));
        // Nothing was deleted
        assert_eq!(svc.get_client(&client_id).await.unwrap().total_voters, 3);
    }

    #[tokio::test]
    async fn empty_file_is_a_validation_error() {
        let (svc, client_id) = seeded_service().await;
        let security = secret_config();
        let limits = ImportConfig::default();
        let importer = Importer::new(&svc, &security, &limits);

        let err = importer.run(&client_id, &request("")).await.unwrap_err();
        assert!(matches!(err, ImportError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_required_columns_are_rejected_before_replace() {
        let (svc, client_id) = seeded_service().await;
        let security = secret_config();
        let limits = ImportConfig::default();
        let importer = Importer::new(&svc, &security, &limits);
        importer.run(&client_id, &request(BASIC_FILE)).await.unwrap();

        let mut bad = request("mesa,orden\n1,2\n");
        bad.replace = true;
        bad.secret = Some("BORRAR TODO");
        let err = importer.run(&client_id, &bad).await.unwrap_err();
        assert!(matches!(err, ImportError::Validation(_)));
        assert_eq!(svc.get_client(&client_id).await.unwrap().total_voters, 3);
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let (svc, client_id) = seeded_service().await;
        let security = secret_config();
        let limits = ImportConfig {
            max_upload_bytes: 16,
        };
        let importer = Importer::new(&svc, &security, &limits);

        let err = importer.run(&client_id, &request(BASIC_FILE)).await.unwrap_err();
        assert!(matches!(err, ImportError::Validation(_)));
    }

    #[tokio::test]
    async fn replace_needs_the_secret_when_voters_exist() {
        let (svc, client_id) = seeded_service().await;
        let security = secret_config();
        let limits = ImportConfig::default();
        let importer = Importer::new(&svc, &security, &limits);
        importer.run(&client_id, &request(BASIC_FILE)).await.unwrap();

        let mut replace = request(BASIC_FILE);
        replace.replace = true;
        replace.secret = Some("wrong");
        let err = importer.run(&client_id, &replace).await.unwrap_err();
        assert!(matches!(err, ImportError::AccessDenied(_)));
        assert_eq!(svc.get_client(&client_id).await.unwrap().total_voters, 3);
    }

    #[tokio::test]
    async fn replace_with_secret_rebuilds_the_roll() {
        let (svc, client_id) = seeded_service().await;
        let security = secret_config();
        let limits = ImportConfig::default();
        let importer = Importer::new(&svc, &security, &limits);

        let original = roll_file(30_000_000, 100);
        let mut first = request(&original);
        first.target_zone = Some("Norte");
        importer.run(&client_id, &first).await.unwrap();
        svc.set_voted_by_dni(&client_id, "30000000").await.unwrap();

        let smaller = roll_file(40_000_000, 50);
        let mut replace = request(&smaller);
        replace.replace = true;
        replace.secret = Some("BORRAR TODO");
        let summary = importer.run(&client_id, &replace).await.unwrap();
        assert_eq!(summary.created, 50);

        let client = svc.get_client(&client_id).await.unwrap();
        assert_eq!((client.total_voters, client.voted_count), (50, 0));
        assert!(
            svc.find_voter_by_dni(&client_id, "30000000")
                .await
                .unwrap()
                .is_none()
        );
        // The old "Norte" zone is gone; one fresh default zone remains
        let zones = svc.list_zones(&client_id).await.unwrap();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].name, DEFAULT_ZONE_NAME);
        assert_eq!(zones[0].total_voters, 50);
    }

    #[tokio::test]
    async fn replace_without_existing_voters_skips_the_secret_check() {
        let (svc, client_id) = seeded_service().await;
        let security = secret_config();
        let limits = ImportConfig::default();
        let importer = Importer::new(&svc, &security, &limits);

        let mut replace = request(BASIC_FILE);
        replace.replace = true;
        replace.secret = None;
        let summary = importer.run(&client_id, &replace).await.unwrap();
        assert_eq!(summary.created, 3);
    }

    #[tokio::test]
    async fn target_zone_receives_every_row() {
        let (svc, client_id) = seeded_service().await;
        let security = secret_config();
        let limits = ImportConfig::default();
        let importer = Importer::new(&svc, &security, &limits);

        let mut zoned = request(BASIC_FILE);
        zoned.target_zone = Some("Norte");
        importer.run(&client_id, &zoned).await.unwrap();

        let zones = svc.list_zones(&client_id).await.unwrap();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].name, "Norte");
        assert_eq!(zones[0].total_voters, 3);

        let page = svc
            .list_pending(&client_id, &ZoneSelector::Zone(zones[0].id.clone()), 1, 100)
            .await
            .unwrap();
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn duplicate_dni_within_a_file_last_row_wins() {
        let (svc, client_id) = seeded_service().await;
        let security = secret_config();
        let limits = ImportConfig::default();
        let importer = Importer::new(&svc, &security, &limits);

        let file = "\
dni,last_name,mesa\n\
30000000,GOMEZ,1\n\
30000000,GOMEZ,2\n";
        let summary = importer.run(&client_id, &request(file)).await.unwrap();
        assert_eq!(summary.created, 1);
        assert_eq!(summary.updated, 1);

        let voter = svc
            .find_voter_by_dni(&client_id, "30000000")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(voter.mesa, Some(2));
        assert_eq!(svc.get_client(&client_id).await.unwrap().total_voters, 1);
    }

    #[tokio::test]
    async fn reimport_preserves_voted_flags() {
        let (svc, client_id) = seeded_service().await;
        let security = secret_config();
        let limits = ImportConfig::default();
        let importer = Importer::new(&svc, &security, &limits);

        importer.run(&client_id, &request(BASIC_FILE)).await.unwrap();
        svc.set_voted_by_dni(&client_id, "30000001").await.unwrap();

        importer.run(&client_id, &request(BASIC_FILE)).await.unwrap();
        let voter = svc
            .find_voter_by_dni(&client_id, "30000001")
            .await
            .unwrap()
            .unwrap();
        assert!(voter.voted);
        assert_eq!(svc.get_client(&client_id).await.unwrap().voted_count, 1);
    }
}
