//! Presentation boundary — the one place typed errors become user-facing
//! text. Screens hand alerts to a `Presenter`; they never format error
//! strings themselves.

use crate::error::{Error, ErrorKind};

/// A user-facing message. `kind` is present for failures and absent for
/// acknowledgments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAlert {
    pub kind: Option<ErrorKind>,
    pub title: String,
    pub body: String,
}

/// Inline warning shown under the password field while it is weak.
pub const WEAK_PASSWORD_WARNING: &str = "Password must be at least 8 characters long and \
     include uppercase, lowercase, numbers, and special characters.";

impl UserAlert {
    /// Map an error to its user-facing alert. Persistence failures surface
    /// their message verbatim; the title comes from the kind alone.
    pub fn from_error(error: &Error) -> Self {
        let kind = error.kind();
        let title = match kind {
            ErrorKind::Validation => "Check your input",
            ErrorKind::Network => "Connection problem",
            ErrorKind::Auth => "Sign-in required",
            ErrorKind::Storage => "Something went wrong",
            ErrorKind::Cancelled => "Cancelled",
        };
        Self {
            kind: Some(kind),
            title: title.to_string(),
            body: error.to_string(),
        }
    }

    pub fn weak_password() -> Self {
        Self {
            kind: Some(ErrorKind::Validation),
            title: "Password is not strong enough.".to_string(),
            body: WEAK_PASSWORD_WARNING.to_string(),
        }
    }

    /// Acknowledgment shown after a successful account creation, before
    /// navigating back to Login.
    pub fn account_created() -> Self {
        Self {
            kind: None,
            title: "Account created successfully!".to_string(),
            body: String::new(),
        }
    }

    /// Acknowledgment shown after a successful profile submission, before
    /// navigating to the map.
    pub fn profile_created() -> Self {
        Self {
            kind: None,
            title: "Profile Created Successfully!".to_string(),
            body: "You may now use the app.".to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersistError;

    #[test]
    fn persistence_failures_surface_their_message_verbatim() {
        let err: Error = PersistError::Storage("disk full".into()).into();
        let alert = UserAlert::from_error(&err);
        assert_eq!(alert.kind, Some(ErrorKind::Storage));
        assert!(alert.body.contains("disk full"));
    }

    #[test]
    fn auth_errors_get_the_auth_title() {
        let err: Error = PersistError::NotSignedIn.into();
        let alert = UserAlert::from_error(&err);
        assert_eq!(alert.kind, Some(ErrorKind::Auth));
        assert_eq!(alert.title, "Sign-in required");
    }

    #[test]
    fn acknowledgments_are_not_errors() {
        assert!(!UserAlert::account_created().is_error());
        assert!(!UserAlert::profile_created().is_error());
        assert!(UserAlert::weak_password().is_error());
    }
}
