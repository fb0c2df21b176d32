//! Principal repository: account rows, client provisioning, visitor
//! mirroring, and access resolution.
//!
//! The auth collaborator owns authentication; this repo owns the mirrored
//! account rows and the pairing rules: every eligible principal gets exactly
//! one client profile and one shadow visitor account whose credentials track
//! the owner's.

use padron_core::access::{Access, Role};
use padron_core::entities::{Client, DEFAULT_ORGANIZATION, Principal};
use padron_core::errors::CoreError;
use padron_core::ids;

use crate::error::{DatabaseError, is_unique_violation};
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::PadronService;

const PRINCIPAL_COLUMNS: &str =
    "id, username, password_hash, email, first_name, last_name, is_admin, is_active, created_at";

fn row_to_principal(row: &libsql::Row) -> Result<Principal, DatabaseError> {
    Ok(Principal {
        id: row.get::<String>(0)?,
        username: row.get::<String>(1)?,
        password_hash: row.get::<String>(2)?,
        email: get_opt_string(row, 3)?,
        first_name: get_opt_string(row, 4)?,
        last_name: get_opt_string(row, 5)?,
        is_admin: row.get::<i64>(6)? != 0,
        is_active: row.get::<i64>(7)? != 0,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

fn opt_text(v: Option<&str>) -> libsql::Value {
    match v {
        Some(s) => libsql::Value::Text(s.to_string()),
        None => libsql::Value::Null,
    }
}

/// Fields for creating a principal row.
#[derive(Debug, Clone, Default)]
pub struct NewPrincipal {
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_admin: bool,
}

/// Partial update applied on a credential or profile change.
///
/// Outer `Option` = "was this field supplied", inner `Option` = nullable
/// column value.
#[derive(Debug, Clone, Default)]
pub struct PrincipalUpdate {
    pub password_hash: Option<String>,
    pub email: Option<Option<String>>,
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl PadronService {
    /// Insert a principal row.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Conflict` (wrapped) when the username is taken.
    pub async fn create_principal(
        &self,
        new: &NewPrincipal,
    ) -> Result<Principal, DatabaseError> {
        let id = self.db().generate_id(ids::PREFIX_PRINCIPAL).await?;
        let result = self
            .db()
            .conn()
            .execute(
                "INSERT INTO principals
                     (id, username, password_hash, email, first_name, last_name, is_admin)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    id.as_str(),
                    new.username.as_str(),
                    new.password_hash.as_str(),
                    new.email.as_deref(),
                    new.first_name.as_deref(),
                    new.last_name.as_deref(),
                    new.is_admin
                ],
            )
            .await;
        if let Err(err) = result {
            if is_unique_violation(&err) {
                return Err(CoreError::Conflict(format!(
                    "username '{}' is already taken",
                    new.username
                ))
                .into());
            }
            return Err(err.into());
        }
        self.get_principal(&id).await
    }

    /// Fetch a principal by ID.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` (wrapped) if no row matches.
    pub async fn get_principal(&self, principal_id: &str) -> Result<Principal, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {PRINCIPAL_COLUMNS} FROM principals WHERE id = ?1"),
                [principal_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => row_to_principal(&row),
            None => Err(CoreError::not_found("principal", principal_id).into()),
        }
    }

    pub async fn get_principal_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Principal>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {PRINCIPAL_COLUMNS} FROM principals WHERE username = ?1"),
                [username],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_principal(&row)?)),
            None => Ok(None),
        }
    }

    /// Apply a partial update, then mirror the result onto any paired visitor.
    ///
    /// This is the hook the auth collaborator calls after a password or
    /// profile change; the visitor account stays in lockstep with its owner.
    pub async fn update_principal(
        &self,
        principal_id: &str,
        update: &PrincipalUpdate,
    ) -> Result<Principal, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref v) = update.password_hash {
            params.push(libsql::Value::Text(v.clone()));
            sets.push(format!("password_hash = ?{}", params.len()));
        }
        if let Some(ref v) = update.email {
            params.push(opt_text(v.as_deref()));
            sets.push(format!("email = ?{}", params.len()));
        }
        if let Some(ref v) = update.first_name {
            params.push(opt_text(v.as_deref()));
            sets.push(format!("first_name = ?{}", params.len()));
        }
        if let Some(ref v) = update.last_name {
            params.push(opt_text(v.as_deref()));
            sets.push(format!("last_name = ?{}", params.len()));
        }
        if let Some(v) = update.is_active {
            params.push(libsql::Value::Integer(i64::from(v)));
            sets.push(format!("is_active = ?{}", params.len()));
        }

        if !sets.is_empty() {
            params.push(libsql::Value::Text(principal_id.to_string()));
            let sql = format!(
                "UPDATE principals SET {} WHERE id = ?{}",
                sets.join(", "),
                params.len()
            );
            self.db()
                .conn()
                .execute(&sql, libsql::params_from_iter(params))
                .await?;
        }

        let principal = self.get_principal(principal_id).await?;
        if !principal.is_admin && !Principal::is_visitor_username(&principal.username) {
            self.sync_visitor_for(&principal).await?;
        }
        Ok(principal)
    }

    /// Ensure an eligible principal has a client profile and a synced visitor.
    ///
    /// Idempotent: safe to call on every principal save. Returns `None` for
    /// principals that never get a profile (admins and visitor-named
    /// accounts), `Some(client)` otherwise.
    pub async fn provision_principal(
        &self,
        principal_id: &str,
    ) -> Result<Option<Client>, DatabaseError> {
        let principal = self.get_principal(principal_id).await?;
        if principal.is_admin || Principal::is_visitor_username(&principal.username) {
            return Ok(None);
        }

        if self.get_client_by_principal(&principal.id).await?.is_none() {
            let id = self.db().generate_id(ids::PREFIX_CLIENT).await?;
            self.db()
                .conn()
                .execute(
                    "INSERT INTO clients (id, principal_id, organization_name) VALUES (?1, ?2, ?3)",
                    libsql::params![id.as_str(), principal.id.as_str(), DEFAULT_ORGANIZATION],
                )
                .await?;
            tracing::debug!(principal_id = %principal.id, client_id = %id, "client profile provisioned");
        }

        self.sync_visitor_for(&principal).await?;
        let client = self
            .get_client_by_principal(&principal.id)
            .await?
            .ok_or(DatabaseError::NoResult)?;
        Ok(Some(client))
    }

    /// Bring the paired visitor account in line with its owner.
    ///
    /// Creates the visitor on first call (adopting a pre-existing account
    /// with the derived username if one exists), then mirrors username,
    /// credentials, profile fields, and active flag. The visitor can never
    /// become an admin.
    async fn sync_visitor_for(&self, owner: &Principal) -> Result<(), DatabaseError> {
        let Some(client) = self.get_client_by_principal(&owner.id).await? else {
            return Ok(());
        };
        let visitor_username = Principal::visitor_username(&owner.username);

        let visitor_id = match client.visitor_principal_id {
            Some(id) => id,
            None => match self.get_principal_by_username(&visitor_username).await? {
                Some(existing) => existing.id,
                None => {
                    let id = self.db().generate_id(ids::PREFIX_PRINCIPAL).await?;
                    self.db()
                        .conn()
                        .execute(
                            "INSERT INTO principals
                                 (id, username, password_hash, email, first_name, last_name,
                                  is_admin, is_active)
                             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
                            libsql::params![
                                id.as_str(),
                                visitor_username.as_str(),
                                owner.password_hash.as_str(),
                                owner.email.as_deref(),
                                owner.first_name.as_deref(),
                                owner.last_name.as_deref(),
                                owner.is_active
                            ],
                        )
                        .await?;
                    tracing::debug!(owner = %owner.id, visitor = %id, "visitor account created");
                    id
                }
            },
        };

        self.db()
            .conn()
            .execute(
                "UPDATE principals SET
                     username = ?1, password_hash = ?2, email = ?3,
                     first_name = ?4, last_name = ?5, is_active = ?6, is_admin = 0
                 WHERE id = ?7",
                libsql::params![
                    visitor_username.as_str(),
                    owner.password_hash.as_str(),
                    owner.email.as_deref(),
                    owner.first_name.as_deref(),
                    owner.last_name.as_deref(),
                    owner.is_active,
                    visitor_id.as_str()
                ],
            )
            .await?;
        self.db()
            .conn()
            .execute(
                "UPDATE clients SET visitor_principal_id = ?1 WHERE id = ?2",
                libsql::params![visitor_id.as_str(), client.id.as_str()],
            )
            .await?;
        Ok(())
    }

    /// Resolve who is calling and which roll they see.
    ///
    /// Precedence: admin flag, then client ownership, then visitor pairing.
    /// Unknown, inactive, and unbound principals are all denied.
    pub async fn resolve_access(&self, principal_id: &str) -> Result<Access, DatabaseError> {
        let principal = match self.get_principal(principal_id).await {
            Ok(p) => p,
            Err(DatabaseError::Core(CoreError::NotFound { .. })) => {
                return Err(CoreError::AccessDenied("Unknown principal".to_string()).into());
            }
            Err(e) => return Err(e),
        };
        if !principal.is_active {
            return Err(CoreError::AccessDenied("Account is disabled".to_string()).into());
        }
        if principal.is_admin {
            return Ok(Access {
                principal_id: principal.id,
                role: Role::Admin,
            });
        }
        if let Some(client) = self.get_client_by_principal(&principal.id).await? {
            return Ok(Access {
                principal_id: principal.id,
                role: Role::Client(client),
            });
        }
        if let Some(client) = self.get_client_by_visitor(&principal.id).await? {
            return Ok(Access {
                principal_id: principal.id,
                role: Role::Visitor(client),
            });
        }
        Err(CoreError::AccessDenied("No roll is bound to this account".to_string()).into())
    }

    /// Tear down a client: its voters, zones, and shadow visitor account.
    /// The owning principal survives.
    pub async fn delete_client(&self, client_id: &str) -> Result<(), DatabaseError> {
        let client = self.get_client(client_id).await?;

        let tx = self.db().conn().transaction().await?;
        // Cascades to voters and zones
        tx.execute("DELETE FROM clients WHERE id = ?1", [client.id.as_str()])
            .await?;
        if let Some(visitor_id) = &client.visitor_principal_id {
            tx.execute("DELETE FROM principals WHERE id = ?1", [visitor_id.as_str()])
                .await?;
        }
        tx.commit().await?;
        tracing::info!(client_id = %client.id, "client deleted");
        Ok(())
    }

    /// Remove a principal entirely. An owner takes its client profile, roll,
    /// and visitor account down with it.
    pub async fn delete_principal(&self, principal_id: &str) -> Result<(), DatabaseError> {
        let principal = self.get_principal(principal_id).await?;
        let owned = self.get_client_by_principal(&principal.id).await?;

        let tx = self.db().conn().transaction().await?;
        if let Some(client) = &owned {
            tx.execute("DELETE FROM clients WHERE id = ?1", [client.id.as_str()])
                .await?;
            if let Some(visitor_id) = &client.visitor_principal_id {
                tx.execute("DELETE FROM principals WHERE id = ?1", [visitor_id.as_str()])
                    .await?;
            }
        }
        tx.execute("DELETE FROM principals WHERE id = ?1", [principal.id.as_str()])
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{draft, seed_client, test_service};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_and_get_principal() {
        let svc = test_service().await;
        let created = svc
            .create_principal(&NewPrincipal {
                username: "maria".into(),
                password_hash: "pbkdf2$x".into(),
                email: Some("maria@example.com".into()),
                ..NewPrincipal::default()
            })
            .await
            .unwrap();
        let fetched = svc.get_principal(&created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert!(fetched.is_active);
        assert!(!fetched.is_admin);
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let svc = test_service().await;
        let new = NewPrincipal {
            username: "maria".into(),
            ..NewPrincipal::default()
        };
        svc.create_principal(&new).await.unwrap();
        let err = svc.create_principal(&new).await.unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Core(CoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn provision_creates_client_and_mirrored_visitor() {
        let svc = test_service().await;
        let (owner, client) = seed_client(&svc, "maria").await;

        assert_eq!(client.organization_name, DEFAULT_ORGANIZATION);
        assert_eq!(client.principal_id, owner.id);

        let visitor_id = svc
            .get_client(&client.id)
            .await
            .unwrap()
            .visitor_principal_id
            .expect("visitor should be provisioned");
        let visitor = svc.get_principal(&visitor_id).await.unwrap();
        assert_eq!(visitor.username, "asistemaria");
        assert_eq!(visitor.password_hash, owner.password_hash);
        assert!(!visitor.is_admin);
        assert!(visitor.is_active);
    }

    #[tokio::test]
    async fn provision_is_idempotent() {
        let svc = test_service().await;
        let (owner, client) = seed_client(&svc, "maria").await;

        let again = svc
            .provision_principal(&owner.id)
            .await
            .unwrap()
            .expect("still eligible");
        assert_eq!(again.id, client.id);

        let mut rows = svc
            .db()
            .conn()
            .query(
                "SELECT COUNT(*) FROM principals WHERE username LIKE 'asiste%'",
                (),
            )
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1, "exactly one visitor");
    }

    #[tokio::test]
    async fn provision_skips_admins_and_visitor_named_accounts() {
        let svc = test_service().await;
        let admin = svc
            .create_principal(&NewPrincipal {
                username: "root".into(),
                is_admin: true,
                ..NewPrincipal::default()
            })
            .await
            .unwrap();
        assert!(svc.provision_principal(&admin.id).await.unwrap().is_none());

        let named = svc
            .create_principal(&NewPrincipal {
                username: "asistemaria".into(),
                ..NewPrincipal::default()
            })
            .await
            .unwrap();
        assert!(svc.provision_principal(&named.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn credential_updates_propagate_to_visitor() {
        let svc = test_service().await;
        let (owner, client) = seed_client(&svc, "maria").await;

        svc.update_principal(
            &owner.id,
            &PrincipalUpdate {
                password_hash: Some("pbkdf2$rotated".into()),
                is_active: Some(false),
                ..PrincipalUpdate::default()
            },
        )
        .await
        .unwrap();

        let visitor_id = svc
            .get_client(&client.id)
            .await
            .unwrap()
            .visitor_principal_id
            .unwrap();
        let visitor = svc.get_principal(&visitor_id).await.unwrap();
        assert_eq!(visitor.password_hash, "pbkdf2$rotated");
        assert!(!visitor.is_active);
    }

    #[tokio::test]
    async fn resolve_access_precedence() {
        let svc = test_service().await;

        let admin = svc
            .create_principal(&NewPrincipal {
                username: "root".into(),
                is_admin: true,
                ..NewPrincipal::default()
            })
            .await
            .unwrap();
        let access = svc.resolve_access(&admin.id).await.unwrap();
        assert!(access.is_admin());

        let (owner, client) = seed_client(&svc, "maria").await;
        let access = svc.resolve_access(&owner.id).await.unwrap();
        assert!(matches!(&access.role, Role::Client(c) if c.id == client.id));

        let visitor_id = svc
            .get_client(&client.id)
            .await
            .unwrap()
            .visitor_principal_id
            .unwrap();
        let access = svc.resolve_access(&visitor_id).await.unwrap();
        assert!(matches!(&access.role, Role::Visitor(c) if c.id == client.id));
    }

    #[tokio::test]
    async fn resolve_access_denies_unknown_inactive_and_unbound() {
        let svc = test_service().await;

        let err = svc.resolve_access("usr-missing").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Core(CoreError::AccessDenied(_))));

        let (owner, _) = seed_client(&svc, "maria").await;
        svc.update_principal(
            &owner.id,
            &PrincipalUpdate {
                is_active: Some(false),
                ..PrincipalUpdate::default()
            },
        )
        .await
        .unwrap();
        let err = svc.resolve_access(&owner.id).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Core(CoreError::AccessDenied(_))));

        // Active but no client bound: a visitor-named account nobody paired
        let unbound = svc
            .create_principal(&NewPrincipal {
                username: "asistenobody".into(),
                ..NewPrincipal::default()
            })
            .await
            .unwrap();
        let err = svc.resolve_access(&unbound.id).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Core(CoreError::AccessDenied(_))));
    }

    #[tokio::test]
    async fn delete_client_removes_roll_and_visitor() {
        let svc = test_service().await;
        let (owner, client) = seed_client(&svc, "maria").await;
        let zone = svc.get_or_create_zone(&client.id, "Centro").await.unwrap();
        svc.upsert_voter(&client.id, Some(&zone.id), &draft("30000000", "GOMEZ", "ANA"))
            .await
            .unwrap();
        let visitor_id = svc
            .get_client(&client.id)
            .await
            .unwrap()
            .visitor_principal_id
            .unwrap();

        svc.delete_client(&client.id).await.unwrap();

        assert!(matches!(
            svc.get_client(&client.id).await.unwrap_err(),
            DatabaseError::Core(CoreError::NotFound { .. })
        ));
        assert!(matches!(
            svc.get_principal(&visitor_id).await.unwrap_err(),
            DatabaseError::Core(CoreError::NotFound { .. })
        ));
        // Owner survives
        assert!(svc.get_principal(&owner.id).await.is_ok());

        let mut rows = svc
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM voters", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 0, "voters cascade away");
    }

    #[tokio::test]
    async fn delete_principal_takes_profile_down() {
        let svc = test_service().await;
        let (owner, client) = seed_client(&svc, "maria").await;
        let visitor_id = svc
            .get_client(&client.id)
            .await
            .unwrap()
            .visitor_principal_id
            .unwrap();

        svc.delete_principal(&owner.id).await.unwrap();

        assert!(svc.get_principal(&owner.id).await.is_err());
        assert!(svc.get_principal(&visitor_id).await.is_err());
        assert!(svc.get_client(&client.id).await.is_err());
    }
}
