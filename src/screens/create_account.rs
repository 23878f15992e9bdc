//! Account creation screen state machine.

use secrecy::{ExposeSecret, SecretString};

use crate::alert::UserAlert;
use crate::error::Error;
use crate::keyboard::KeyboardSubscription;
use crate::model::AccountFields;
use crate::nav::{Route, ScreenToken};
use crate::password::{self, PasswordStrength};

use super::ScreenDeps;

/// Phases of the account creation screen.
///
/// `Editing → Submitting → {Succeeded, Rejected}`. A backend rejection is
/// surfaced and the screen returns to Editing; there is no automatic retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateAccountPhase {
    Editing,
    Submitting,
    Succeeded,
    Rejected,
}

pub struct CreateAccountScreen {
    deps: ScreenDeps,
    token: ScreenToken,
    _keyboard: KeyboardSubscription,
    phase: CreateAccountPhase,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    password: SecretString,
    /// None until the password has been edited once, matching the UI rule
    /// that the warning only appears after typing begins.
    strength: Option<PasswordStrength>,
    last_error: Option<UserAlert>,
}

impl CreateAccountScreen {
    pub fn mount(deps: ScreenDeps, token: ScreenToken) -> Self {
        let keyboard = deps.keyboard.subscribe();
        Self {
            deps,
            token,
            _keyboard: keyboard,
            phase: CreateAccountPhase::Editing,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            password: SecretString::from(""),
            strength: None,
            last_error: None,
        }
    }

    pub fn phase(&self) -> CreateAccountPhase {
        self.phase
    }

    pub fn strength(&self) -> Option<PasswordStrength> {
        self.strength
    }

    pub fn error(&self) -> Option<&UserAlert> {
        self.last_error.as_ref()
    }

    /// Inline warning, visible whenever the latest password classifies weak.
    pub fn password_warning(&self) -> Option<&'static str> {
        match self.strength {
            Some(PasswordStrength::Weak) => Some(crate::alert::WEAK_PASSWORD_WARNING),
            _ => None,
        }
    }

    pub fn set_first_name(&mut self, value: &str) {
        self.first_name = value.to_string();
    }

    pub fn set_last_name(&mut self, value: &str) {
        self.last_name = value.to_string();
    }

    pub fn set_email(&mut self, value: &str) {
        self.email = value.to_string();
    }

    pub fn set_phone(&mut self, value: &str) {
        self.phone = value.to_string();
    }

    /// Every edit reclassifies strength so the warning shows before any
    /// submission is attempted.
    pub fn set_password(&mut self, value: &str) {
        self.password = SecretString::from(value);
        self.strength = Some(password::classify(value));
    }

    /// Back to Login without creating an account.
    pub fn go_to_login(&self) {
        if let Err(e) = self.deps.nav.navigate(Route::login()) {
            tracing::warn!("Could not return to Login: {e}");
        }
    }

    /// Submit the account. A weak password is rejected locally with no
    /// backend call; success acknowledges before navigating to Login.
    pub async fn submit(&mut self) -> CreateAccountPhase {
        if matches!(
            self.phase,
            CreateAccountPhase::Submitting | CreateAccountPhase::Succeeded
        ) {
            tracing::debug!("Duplicate account submission ignored");
            return self.phase;
        }

        // Always classify the latest password value, whatever the cached
        // strength says.
        let strength = password::classify(self.password.expose_secret());
        self.strength = Some(strength);
        if !strength.is_strong() {
            let alert = UserAlert::weak_password();
            self.deps.presenter.notice(&alert);
            self.last_error = Some(alert);
            self.phase = CreateAccountPhase::Editing;
            return self.phase;
        }

        self.phase = CreateAccountPhase::Submitting;
        self.last_error = None;
        self.deps.presenter.set_busy(true);

        let fields = AccountFields {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            password: self.password.clone(),
        };
        let result = self.deps.client.create_account(&fields).await;

        self.deps.presenter.set_busy(false);

        if !self.token.is_active() {
            tracing::debug!("Account creation settled after unmount; dropping result");
            return self.phase;
        }

        match result {
            Ok(id) => {
                self.phase = CreateAccountPhase::Succeeded;
                tracing::info!(account = %id, "Account created");
                // Confirmation first, navigation second.
                self.deps
                    .presenter
                    .acknowledge(&UserAlert::account_created())
                    .await;
                if self.token.is_active() {
                    if let Err(e) = self.deps.nav.navigate(Route::login()) {
                        tracing::warn!("Could not return to Login: {e}");
                    }
                }
            }
            Err(e) => {
                self.phase = CreateAccountPhase::Rejected;
                let alert = UserAlert::from_error(&Error::from(e));
                self.deps.presenter.notice(&alert);
                self.last_error = Some(alert);
                // No automatic retry; the user edits and resubmits.
                self.phase = CreateAccountPhase::Editing;
            }
        }
        self.phase
    }
}
