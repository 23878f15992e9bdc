//! Login screen state machine.

use secrecy::{ExposeSecret, SecretString};

use crate::alert::UserAlert;
use crate::error::Error;
use crate::keyboard::KeyboardSubscription;
use crate::model::Credentials;
use crate::nav::{Route, ScreenToken};

use super::ScreenDeps;

/// Phases of the login screen.
///
/// `Editing → Authenticating → {Authenticated, Rejected}`. Rejection keeps
/// the screen on Login with the error indicator up; editing either field
/// returns it to Editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginPhase {
    Editing,
    Authenticating,
    Authenticated,
    Rejected,
}

pub struct LoginScreen {
    deps: ScreenDeps,
    token: ScreenToken,
    _keyboard: KeyboardSubscription,
    phase: LoginPhase,
    credentials: Credentials,
    last_error: Option<UserAlert>,
}

impl LoginScreen {
    pub fn mount(deps: ScreenDeps, token: ScreenToken) -> Self {
        let keyboard = deps.keyboard.subscribe();
        Self {
            deps,
            token,
            _keyboard: keyboard,
            phase: LoginPhase::Editing,
            credentials: Credentials {
                identifier: String::new(),
                password: SecretString::from(""),
            },
            last_error: None,
        }
    }

    pub fn phase(&self) -> LoginPhase {
        self.phase
    }

    pub fn identifier(&self) -> &str {
        &self.credentials.identifier
    }

    pub fn error(&self) -> Option<&UserAlert> {
        self.last_error.as_ref()
    }

    pub fn set_identifier(&mut self, value: &str) {
        self.credentials.identifier = value.to_string();
        self.return_to_editing();
    }

    pub fn set_password(&mut self, value: &str) {
        self.credentials.password = SecretString::from(value);
        self.return_to_editing();
    }

    fn return_to_editing(&mut self) {
        if self.phase == LoginPhase::Rejected {
            self.phase = LoginPhase::Editing;
            self.last_error = None;
        }
    }

    /// The always-available path to account creation.
    pub fn go_to_create_account(&self) {
        if let Err(e) = self.deps.nav.navigate(Route::create_account()) {
            tracing::warn!("Could not open CreateAccount: {e}");
        }
    }

    /// Submit the credentials. Input is not accepted while a submission is
    /// already in flight.
    pub async fn submit(&mut self) -> LoginPhase {
        if matches!(
            self.phase,
            LoginPhase::Authenticating | LoginPhase::Authenticated
        ) {
            tracing::debug!("Duplicate login submission ignored");
            return self.phase;
        }

        self.phase = LoginPhase::Authenticating;
        self.last_error = None;
        self.deps.presenter.set_busy(true);

        let result = self
            .deps
            .client
            .authenticate(&self.credentials.identifier, &self.credentials.password)
            .await;

        self.deps.presenter.set_busy(false);

        if !self.token.is_active() {
            tracing::debug!("Authentication settled after Login unmounted; dropping result");
            return self.phase;
        }

        match result {
            Ok(session) => {
                self.phase = LoginPhase::Authenticated;
                tracing::info!(account = %session.account_id, "Signed in");
                if let Err(e) = self.deps.nav.navigate(Route::map_page()) {
                    tracing::warn!("Could not open MapPage: {e}");
                }
            }
            Err(e) => {
                // Fields are retained for another attempt.
                self.phase = LoginPhase::Rejected;
                let alert = UserAlert::from_error(&Error::from(e));
                self.deps.presenter.notice(&alert);
                self.last_error = Some(alert);
            }
        }
        self.phase
    }

    /// Length of the password text, for hosts re-rendering the masked field.
    pub fn password_len(&self) -> usize {
        self.credentials.password.expose_secret().chars().count()
    }
}
