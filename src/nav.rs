//! Navigation — typed screen graph and active-screen control.
//!
//! The flow is a fixed directed graph, not a free-form stack: Login and
//! CreateAccount link both ways, CreateAccount returns to Login on success,
//! Login and CreateProfile each lead one-way to MapPage, and MapPage has no
//! outgoing edge. CreateProfile has no in-flow edge; hosts reach it through
//! `set_root`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::NavError;
use crate::gate::GateStatus;

/// Screens of the onboarding flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenName {
    Login,
    CreateAccount,
    CreateProfile,
    MapPage,
}

impl std::fmt::Display for ScreenName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Login => "Login",
            Self::CreateAccount => "CreateAccount",
            Self::CreateProfile => "CreateProfile",
            Self::MapPage => "MapPage",
        };
        write!(f, "{s}")
    }
}

/// Per-screen route parameters. All empty today; the types keep each edge's
/// payload explicit so adding one later is not a signature change hunt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoginParams;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateAccountParams;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateProfileParams;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapPageParams;

/// A screen plus its typed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login(LoginParams),
    CreateAccount(CreateAccountParams),
    CreateProfile(CreateProfileParams),
    MapPage(MapPageParams),
}

impl Route {
    pub fn login() -> Self {
        Self::Login(LoginParams)
    }

    pub fn create_account() -> Self {
        Self::CreateAccount(CreateAccountParams)
    }

    pub fn create_profile() -> Self {
        Self::CreateProfile(CreateProfileParams)
    }

    pub fn map_page() -> Self {
        Self::MapPage(MapPageParams)
    }

    pub fn name(&self) -> ScreenName {
        match self {
            Self::Login(_) => ScreenName::Login,
            Self::CreateAccount(_) => ScreenName::CreateAccount,
            Self::CreateProfile(_) => ScreenName::CreateProfile,
            Self::MapPage(_) => ScreenName::MapPage,
        }
    }
}

/// The fixed edges of the flow. MapPage is absorbing.
const EDGES: &[(ScreenName, ScreenName)] = &[
    (ScreenName::Login, ScreenName::CreateAccount),
    (ScreenName::CreateAccount, ScreenName::Login),
    (ScreenName::Login, ScreenName::MapPage),
    (ScreenName::CreateProfile, ScreenName::MapPage),
];

/// Check whether the graph has an edge from `from` to `to`.
pub fn allows(from: ScreenName, to: ScreenName) -> bool {
    EDGES.iter().any(|&(f, t)| f == from && t == to)
}

/// Lifetime token for a mounted screen.
///
/// Async completions must check `is_active` before touching screen state or
/// navigating: an operation that resolves after its screen was unmounted
/// gets dropped on the floor.
#[derive(Debug, Clone)]
pub struct ScreenToken {
    active: Arc<AtomicBool>,
}

impl ScreenToken {
    fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn revoke(&self) {
        self.active.store(false, Ordering::Release);
    }
}

struct Mounted {
    route: Route,
    token: ScreenToken,
}

/// Owns the active screen and enforces the edge table.
pub struct NavigationController {
    current: Mutex<Option<Mounted>>,
}

impl NavigationController {
    /// Construct the controller. Refuses to exist before the resource gate
    /// settles: no screen may render ahead of `GateStatus::Ready`.
    pub fn new(gate: GateStatus) -> Result<Self, NavError> {
        if gate != GateStatus::Ready {
            return Err(NavError::GateNotReady);
        }
        Ok(Self {
            current: Mutex::new(None),
        })
    }

    /// Mount a screen directly, outside the flow's own edges. Used for the
    /// initial Login mount and for host-directed entry to CreateProfile.
    pub fn set_root(&self, route: Route) -> ScreenToken {
        let mut current = self.lock();
        if let Some(old) = current.take() {
            old.token.revoke();
        }
        let token = ScreenToken::new();
        tracing::info!(screen = %route.name(), "Screen mounted");
        *current = Some(Mounted {
            route,
            token: token.clone(),
        });
        token
    }

    /// Follow an edge of the graph. Illegal transitions are refused and the
    /// active screen is left untouched.
    pub fn navigate(&self, to: Route) -> Result<ScreenToken, NavError> {
        let mut current = self.lock();
        let mounted = current.as_ref().ok_or(NavError::NothingMounted)?;
        let from = mounted.route.name();
        if !allows(from, to.name()) {
            let err = NavError::IllegalTransition {
                from: from.to_string(),
                to: to.name().to_string(),
            };
            tracing::warn!("Navigation refused: {err}");
            return Err(err);
        }

        if let Some(old) = current.take() {
            old.token.revoke();
        }
        let token = ScreenToken::new();
        tracing::info!(from = %from, to = %to.name(), "Navigated");
        *current = Some(Mounted {
            route: to,
            token: token.clone(),
        });
        Ok(token)
    }

    /// The active route, if a screen is mounted.
    pub fn current(&self) -> Option<Route> {
        self.lock().as_ref().map(|m| m.route)
    }

    /// The active screen's lifecycle token.
    pub fn active_token(&self) -> Option<ScreenToken> {
        self.lock().as_ref().map(|m| m.token.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Mounted>> {
        self.current.lock().unwrap_or_else(|p| p.into_inner())
    }
}
