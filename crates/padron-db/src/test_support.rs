//! Shared test utilities for padron-db tests.

pub(crate) mod helpers {
    use padron_core::entities::{Client, Principal, VoterDraft};

    use crate::PadronDb;
    use crate::repos::identity::NewPrincipal;
    use crate::service::PadronService;

    /// Create an in-memory `PadronService` (for pure DB tests).
    pub async fn test_service() -> PadronService {
        let db = PadronDb::open_local(":memory:").await.unwrap();
        PadronService::from_db(db)
    }

    /// Create a principal and provision its client profile (visitor included).
    pub async fn seed_client(svc: &PadronService, username: &str) -> (Principal, Client) {
        let principal = svc
            .create_principal(&NewPrincipal {
                username: username.to_string(),
                password_hash: "pbkdf2$test".to_string(),
                ..NewPrincipal::default()
            })
            .await
            .unwrap();
        let client = svc
            .provision_principal(&principal.id)
            .await
            .unwrap()
            .expect("principal should be eligible for a client");
        (principal, client)
    }

    /// Minimal voter draft with the given identity fields.
    pub fn draft(dni: &str, last_name: &str, first_name: &str) -> VoterDraft {
        VoterDraft {
            dni: dni.to_string(),
            last_name: last_name.to_string(),
            first_name: first_name.to_string(),
            sex: None,
            address: None,
            mesa: None,
            orden: None,
            establishment: None,
        }
    }

    /// Insert `n` voters with sequential DNIs starting at 30000000.
    pub async fn seed_voters(svc: &PadronService, client_id: &str, n: usize) -> Vec<String> {
        let mut ids = Vec::with_capacity(n);
        for i in 0..n {
            let dni = (30_000_000 + i).to_string();
            let (_, voter) = svc
                .upsert_voter(client_id, None, &draft(&dni, "GOMEZ", "ANA"))
                .await
                .unwrap();
            ids.push(voter.id);
        }
        ids
    }
}
