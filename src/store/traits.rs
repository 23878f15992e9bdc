//! `PersistenceClient` trait — the authentication and profile-storage
//! boundary consumed by the screens.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::PersistError;
use crate::model::{AccountFields, AccountId, ProfileFields, Session};

/// Backend-agnostic persistence boundary.
///
/// The authenticated session is ambient: it lives inside the client and is
/// read-only to the rest of the flow. Profile updates resolve the session
/// internally; callers never pass an account id.
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Verify credentials and establish the ambient session.
    async fn authenticate(
        &self,
        identifier: &str,
        password: &SecretString,
    ) -> Result<Session, PersistError>;

    /// Create a new account record. Does not sign the account in.
    async fn create_account(&self, fields: &AccountFields) -> Result<AccountId, PersistError>;

    /// Write all profile fields to the signed-in account in one update.
    /// Fails with `NotSignedIn` when no session is established.
    async fn update_profile(&self, fields: &ProfileFields) -> Result<(), PersistError>;

    /// The ambient authenticated session, if any.
    fn current_session(&self) -> Option<Session>;

    /// Clear the ambient session.
    fn sign_out(&self);
}
