//! Shared test utilities for padron-api endpoint tests.

pub(crate) mod helpers {
    use padron_config::PadronConfig;
    use padron_core::access::Access;
    use padron_core::entities::VoterDraft;
    use padron_db::PadronDb;
    use padron_db::repos::identity::NewPrincipal;
    use padron_db::service::PadronService;

    use crate::PadronApi;

    /// Api over a fresh in-memory database, with the delete secret set.
    pub async fn test_api() -> PadronApi {
        let db = PadronDb::open_local(":memory:").await.unwrap();
        let mut config = PadronConfig::default();
        config.security.delete_secret = "BORRAR TODO".to_string();
        PadronApi {
            service: PadronService::from_db(db),
            config,
        }
    }

    /// Create a principal, provision its client profile, resolve owner access.
    pub async fn owner_access(api: &PadronApi, username: &str) -> Access {
        let principal = api
            .service
            .create_principal(&NewPrincipal {
                username: username.to_string(),
                password_hash: "pbkdf2$test".to_string(),
                ..NewPrincipal::default()
            })
            .await
            .unwrap();
        api.service.provision_principal(&principal.id).await.unwrap();
        api.service.resolve_access(&principal.id).await.unwrap()
    }

    /// Access resolved for the auto-provisioned visitor of `owner`.
    pub async fn visitor_access(api: &PadronApi, owner: &Access) -> Access {
        let client = owner.client().unwrap();
        let visitor_id = api
            .service
            .get_client(&client.id)
            .await
            .unwrap()
            .visitor_principal_id
            .unwrap();
        api.service.resolve_access(&visitor_id).await.unwrap()
    }

    /// Admin access: valid principal, no bound client.
    pub async fn admin_access(api: &PadronApi) -> Access {
        let principal = api
            .service
            .create_principal(&NewPrincipal {
                username: "root".to_string(),
                password_hash: "pbkdf2$test".to_string(),
                is_admin: true,
                ..NewPrincipal::default()
            })
            .await
            .unwrap();
        api.service.resolve_access(&principal.id).await.unwrap()
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
    pub async fn seed_voters(api: &PadronApi, client_id: &str, n: usize) -> Vec<String> {
        let mut ids = Vec::with_capacity(n);
        for i in 0..n {
            let dni = (30_000_000 + i).to_string();
            let (_, voter) = api
                .service
                .upsert_voter(client_id, None, &draft(&dni, "GOMEZ", "ANA"))
                .await
                .unwrap();
            ids.push(voter.id);
        }
        ids
    }
}
