//! Screen state machines for the onboarding flow.
//!
//! Each screen is a finite state machine owning its form state exclusively.
//! Screens talk to the outside world through `ScreenDeps`: the persistence
//! client, the resource picker, the navigation controller, the presenter,
//! and the keyboard monitor, all injected at mount. MapPage carries no
//! decision logic and has no state machine here.

pub mod create_account;
pub mod create_profile;
pub mod login;

pub use create_account::{CreateAccountPhase, CreateAccountScreen};
pub use create_profile::{CreateProfilePhase, CreateProfileScreen};
pub use login::{LoginPhase, LoginScreen};

use std::sync::Arc;

use async_trait::async_trait;

use crate::alert::UserAlert;
use crate::keyboard::KeyboardMonitor;
use crate::nav::NavigationController;
use crate::picker::ResourcePicker;
use crate::store::PersistenceClient;

/// Presentation surface a screen talks to. Pure output; implementations
/// render however they like.
#[async_trait]
pub trait Presenter: Send + Sync {
    /// Blocking confirmation. Returns once the user has dismissed it, so a
    /// screen can guarantee acknowledgment-then-navigate ordering.
    async fn acknowledge(&self, alert: &UserAlert);

    /// Non-blocking inline notice (error indicator, password warning).
    fn notice(&self, alert: &UserAlert);

    /// Show or hide the indeterminate progress indicator.
    fn set_busy(&self, busy: bool);
}

/// Collaborators handed to every screen on mount. Constructed once at
/// startup and cloned per screen; there is no ambient global state.
#[derive(Clone)]
pub struct ScreenDeps {
    pub client: Arc<dyn PersistenceClient>,
    pub picker: Arc<dyn ResourcePicker>,
    pub nav: Arc<NavigationController>,
    pub presenter: Arc<dyn Presenter>,
    pub keyboard: Arc<KeyboardMonitor>,
}
