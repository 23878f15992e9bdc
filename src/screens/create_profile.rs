//! Profile creation screen state machine.

use crate::alert::UserAlert;
use crate::error::{Error, PersistError};
use crate::keyboard::KeyboardSubscription;
use crate::model::ProfileFields;
use crate::nav::{Route, ScreenToken};
use crate::picker::{ImageOptions, Pick};

use super::ScreenDeps;

/// Phases of the profile creation screen.
///
/// `Editing → Submitting → {Succeeded, Failed}`. Failure keeps the selected
/// resource handles so a second attempt reuses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateProfilePhase {
    Editing,
    Submitting,
    Succeeded,
    Failed,
}

pub struct CreateProfileScreen {
    deps: ScreenDeps,
    token: ScreenToken,
    _keyboard: KeyboardSubscription,
    phase: CreateProfilePhase,
    fields: ProfileFields,
    last_error: Option<UserAlert>,
}

impl CreateProfileScreen {
    pub fn mount(deps: ScreenDeps, token: ScreenToken) -> Self {
        let keyboard = deps.keyboard.subscribe();
        Self {
            deps,
            token,
            _keyboard: keyboard,
            phase: CreateProfilePhase::Editing,
            fields: ProfileFields::default(),
            last_error: None,
        }
    }

    pub fn phase(&self) -> CreateProfilePhase {
        self.phase
    }

    pub fn fields(&self) -> &ProfileFields {
        &self.fields
    }

    pub fn error(&self) -> Option<&UserAlert> {
        self.last_error.as_ref()
    }

    /// Caption shown once a resume is attached.
    pub fn resume_caption(&self) -> Option<String> {
        self.fields
            .resume
            .as_ref()
            .map(|doc| format!("Resume uploaded! ({})", doc.display_name))
    }

    pub fn set_bio(&mut self, value: &str) {
        self.fields.bio = value.to_string();
        self.return_to_editing();
    }

    pub fn set_work_experience(&mut self, value: &str) {
        self.fields.work_experience = value.to_string();
        self.return_to_editing();
    }

    fn return_to_editing(&mut self) {
        if self.phase == CreateProfilePhase::Failed {
            self.phase = CreateProfilePhase::Editing;
            self.last_error = None;
        }
    }

    /// Open the image picker. Cancellation leaves the prior handle (or its
    /// absence) untouched.
    pub async fn pick_image(&mut self) {
        let result = self.deps.picker.pick_image(ImageOptions::default()).await;
        if !self.token.is_active() {
            tracing::debug!("Image pick settled after unmount; dropping result");
            return;
        }
        match result {
            Ok(Pick::Picked(image)) => {
                self.fields.profile_image = Some(image);
                self.return_to_editing();
            }
            Ok(Pick::Cancelled) => {}
            Err(e) => {
                let alert = UserAlert::from_error(&Error::from(e));
                self.deps.presenter.notice(&alert);
            }
        }
    }

    /// Open the document picker, filtered to resumes (PDF).
    pub async fn pick_resume(&mut self) {
        let result = self.deps.picker.pick_document("application/pdf").await;
        if !self.token.is_active() {
            tracing::debug!("Document pick settled after unmount; dropping result");
            return;
        }
        match result {
            Ok(Pick::Picked(doc)) => {
                self.fields.resume = Some(doc);
                self.return_to_editing();
            }
            Ok(Pick::Cancelled) => {}
            Err(e) => {
                let alert = UserAlert::from_error(&Error::from(e));
                self.deps.presenter.notice(&alert);
            }
        }
    }

    /// Submit the profile. Requires an ambient session; all four fields go
    /// to the account record in a single update.
    pub async fn submit(&mut self) -> CreateProfilePhase {
        if matches!(
            self.phase,
            CreateProfilePhase::Submitting | CreateProfilePhase::Succeeded
        ) {
            tracing::debug!("Duplicate profile submission ignored");
            return self.phase;
        }

        let Some(session) = self.deps.client.current_session() else {
            // Nobody is signed in: surface it, write nothing.
            self.phase = CreateProfilePhase::Failed;
            let alert = UserAlert::from_error(&Error::from(PersistError::NotSignedIn));
            self.deps.presenter.notice(&alert);
            self.last_error = Some(alert);
            return self.phase;
        };

        self.phase = CreateProfilePhase::Submitting;
        self.last_error = None;
        self.deps.presenter.set_busy(true);

        let result = self.deps.client.update_profile(&self.fields).await;

        self.deps.presenter.set_busy(false);

        if !self.token.is_active() {
            tracing::debug!("Profile update settled after unmount; dropping result");
            return self.phase;
        }

        match result {
            Ok(()) => {
                self.phase = CreateProfilePhase::Succeeded;
                tracing::info!(account = %session.account_id, "Profile submitted");
                self.deps
                    .presenter
                    .acknowledge(&UserAlert::profile_created())
                    .await;
                if self.token.is_active() {
                    if let Err(e) = self.deps.nav.navigate(Route::map_page()) {
                        tracing::warn!("Could not open MapPage: {e}");
                    }
                }
            }
            Err(e) => {
                // Handles are retained; a second attempt reuses them.
                self.phase = CreateProfilePhase::Failed;
                let alert = UserAlert::from_error(&Error::from(e));
                self.deps.presenter.notice(&alert);
                self.last_error = Some(alert);
            }
        }
        self.phase
    }
}
