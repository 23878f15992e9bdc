//! Integration tests for the onboarding flow.
//!
//! Each test wires real components (the in-memory libSQL client, the
//! filesystem picker, the navigation controller) around a recording
//! presenter, and drives the screens the way a host front-end would.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::time::timeout;

use staffing_onboard::alert::UserAlert;
use staffing_onboard::error::{ErrorKind, GateError, PersistError};
use staffing_onboard::gate::{GateStatus, ResourceGate, ResourceLoader, SplashHandle};
use staffing_onboard::keyboard::KeyboardMonitor;
use staffing_onboard::model::{AccountFields, AccountId, ProfileFields, Session};
use staffing_onboard::nav::{NavigationController, Route};
use staffing_onboard::picker::DirectoryPicker;
use staffing_onboard::screens::{
    CreateAccountPhase, CreateAccountScreen, CreateProfilePhase, CreateProfileScreen, LoginPhase,
    LoginScreen, Presenter, ScreenDeps,
};
use staffing_onboard::store::{LibSqlClient, PersistenceClient};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Records every presenter call, tagging acknowledgments with the route
/// that was active when they fired so ordering is checkable.
struct RecordingPresenter {
    nav: Arc<NavigationController>,
    log: Mutex<Vec<String>>,
}

impl RecordingPresenter {
    fn new(nav: Arc<NavigationController>) -> Self {
        Self {
            nav,
            log: Mutex::new(Vec::new()),
        }
    }

    fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl Presenter for RecordingPresenter {
    async fn acknowledge(&self, alert: &UserAlert) {
        let at = self
            .nav
            .current()
            .map(|r| r.name().to_string())
            .unwrap_or_else(|| "none".to_string());
        self.log
            .lock()
            .unwrap()
            .push(format!("ack:{}@{at}", alert.title));
    }

    fn notice(&self, alert: &UserAlert) {
        let kind = alert
            .kind
            .map(|k| k.to_string())
            .unwrap_or_else(|| "info".to_string());
        self.log.lock().unwrap().push(format!("notice:{kind}"));
    }

    fn set_busy(&self, busy: bool) {
        self.log.lock().unwrap().push(format!("busy:{busy}"));
    }
}

struct FailingFont;

#[async_trait]
impl ResourceLoader for FailingFont {
    fn name(&self) -> &str {
        "font"
    }
    async fn load(&self) -> Result<(), GateError> {
        Err(GateError::LoadFailed {
            name: "font".to_string(),
            reason: "missing file".to_string(),
        })
    }
}

struct CountingSplash(std::sync::atomic::AtomicUsize);

impl SplashHandle for CountingSplash {
    fn dismiss(&self) {
        self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

async fn wired_deps() -> (
    ScreenDeps,
    Arc<LibSqlClient>,
    Arc<RecordingPresenter>,
    tempfile::TempDir,
) {
    let client = Arc::new(LibSqlClient::open_memory().await.unwrap());
    let nav = Arc::new(NavigationController::new(GateStatus::Ready).unwrap());
    let presenter = Arc::new(RecordingPresenter::new(nav.clone()));
    let pick_dir = tempfile::tempdir().unwrap();
    std::fs::write(pick_dir.path().join("me.png"), b"png").unwrap();
    std::fs::write(pick_dir.path().join("resume.pdf"), b"pdf").unwrap();

    let deps = ScreenDeps {
        client: client.clone(),
        picker: Arc::new(DirectoryPicker::new(pick_dir.path())),
        nav,
        presenter: presenter.clone(),
        keyboard: Arc::new(KeyboardMonitor::new()),
    };
    (deps, client, presenter, pick_dir)
}

#[tokio::test]
async fn gate_settles_once_even_when_loading_fails() {
    let splash = Arc::new(CountingSplash(std::sync::atomic::AtomicUsize::new(0)));
    let gate = ResourceGate::new(splash.clone())
        .with_loader(Arc::new(FailingFont))
        .with_timeout(Duration::from_millis(100));

    assert_eq!(gate.status(), GateStatus::Pending);
    assert!(NavigationController::new(gate.status()).is_err());

    assert_eq!(gate.load().await, GateStatus::Ready);
    assert_eq!(gate.load().await, GateStatus::Ready);
    assert_eq!(splash.0.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert!(NavigationController::new(gate.status()).is_ok());
}

#[tokio::test]
async fn full_flow_from_login_to_map_page() {
    let (deps, client, presenter, _pick_dir) = wired_deps().await;
    let nav = deps.nav.clone();

    // ── Login rejects an unknown account ─────────────────────────────
    let token = nav.set_root(Route::login());
    let mut login = LoginScreen::mount(deps.clone(), token);
    login.set_identifier("dana@coastal.example");
    login.set_password("Abcdef1!");
    let phase = timeout(TEST_TIMEOUT, login.submit()).await.unwrap();
    assert_eq!(phase, LoginPhase::Rejected);
    assert_eq!(nav.current(), Some(Route::login()));

    // ── Over to CreateAccount; weak password is blocked locally ──────
    login.go_to_create_account();
    drop(login);
    let token = nav.active_token().unwrap();
    let mut create = CreateAccountScreen::mount(deps.clone(), token);
    create.set_first_name("Dana");
    create.set_last_name("Reyes");
    create.set_email("dana@coastal.example");
    create.set_phone("555-0100");
    create.set_password("abcdefgh");
    assert!(create.password_warning().is_some());
    assert_eq!(create.submit().await, CreateAccountPhase::Editing);
    // The weak submit never reached the backend: the account still
    // cannot authenticate.
    assert!(
        client
            .authenticate("dana@coastal.example", &SecretString::from("abcdefgh"))
            .await
            .is_err()
    );

    // ── Strong password: acknowledgment fires before navigation ──────
    create.set_password("Abcdef1!");
    assert_eq!(create.submit().await, CreateAccountPhase::Succeeded);
    assert_eq!(nav.current(), Some(Route::login()));
    assert!(
        presenter
            .log()
            .contains(&"ack:Account created successfully!@CreateAccount".to_string()),
        "acknowledgment must fire while CreateAccount is still mounted: {:?}",
        presenter.log()
    );
    drop(create);

    // ── Login with the new credentials reaches MapPage ───────────────
    let token = nav.active_token().unwrap();
    let mut login = LoginScreen::mount(deps.clone(), token);
    login.set_identifier("dana@coastal.example");
    login.set_password("Abcdef1!");
    let phase = timeout(TEST_TIMEOUT, login.submit()).await.unwrap();
    assert_eq!(phase, LoginPhase::Authenticated);
    assert_eq!(nav.current(), Some(Route::map_page()));
    drop(login);

    // ── Host routes to CreateProfile; submission lands on MapPage ────
    let session = client.current_session().unwrap();
    let token = nav.set_root(Route::create_profile());
    let mut profile = CreateProfileScreen::mount(deps.clone(), token);
    profile.set_bio("RDH, perio focus");
    profile.set_work_experience("Coastal Smiles 2019-2024");
    profile.pick_image().await;
    profile.pick_resume().await;
    assert_eq!(
        profile.resume_caption().as_deref(),
        Some("Resume uploaded! (resume.pdf)")
    );
    let phase = timeout(TEST_TIMEOUT, profile.submit()).await.unwrap();
    assert_eq!(phase, CreateProfilePhase::Succeeded);
    assert_eq!(nav.current(), Some(Route::map_page()));
    assert!(
        presenter
            .log()
            .contains(&"ack:Profile Created Successfully!@CreateProfile".to_string())
    );

    // All four fields landed in one write.
    let stored = client.load_profile(session.account_id).await.unwrap().unwrap();
    assert_eq!(stored.bio, "RDH, perio focus");
    assert_eq!(stored.work_experience, "Coastal Smiles 2019-2024");
    assert!(stored.profile_image.unwrap().uri.ends_with("me.png"));
    assert_eq!(stored.resume.unwrap().display_name, "resume.pdf");

    // Keyboard subscriptions all released.
    drop(profile);
    assert_eq!(deps.keyboard.subscriber_count(), 0);
}

#[tokio::test]
async fn profile_submit_without_session_is_auth_error_and_no_write() {
    let (deps, client, _, _pick_dir) = wired_deps().await;
    let nav = deps.nav.clone();

    let fields = AccountFields {
        first_name: "Dana".to_string(),
        last_name: "Reyes".to_string(),
        email: "dana@coastal.example".to_string(),
        phone: "555-0100".to_string(),
        password: SecretString::from("Abcdef1!"),
    };
    let id = client.create_account(&fields).await.unwrap();
    assert!(client.current_session().is_none());

    let token = nav.set_root(Route::create_profile());
    let mut profile = CreateProfileScreen::mount(deps.clone(), token);
    profile.set_bio("bio");
    assert_eq!(profile.submit().await, CreateProfilePhase::Failed);
    assert_eq!(profile.error().unwrap().kind, Some(ErrorKind::Auth));
    assert_eq!(nav.current(), Some(Route::create_profile()));
    assert!(client.load_profile(id).await.unwrap().is_none());
}

/// Backend that simulates the user navigating away while the
/// authentication round-trip is still in flight.
struct NavigatingAwayBackend {
    nav: Arc<NavigationController>,
    calls: std::sync::atomic::AtomicUsize,
}

#[async_trait]
impl PersistenceClient for NavigatingAwayBackend {
    async fn authenticate(
        &self,
        _identifier: &str,
        _password: &SecretString,
    ) -> Result<Session, PersistError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        // The host remounts Login mid-call; the in-flight screen's token
        // is revoked.
        self.nav.set_root(Route::login());
        Ok(Session {
            account_id: AccountId::new(),
            started_at: chrono::Utc::now(),
        })
    }
    async fn create_account(&self, _fields: &AccountFields) -> Result<AccountId, PersistError> {
        unimplemented!("not used")
    }
    async fn update_profile(&self, _fields: &ProfileFields) -> Result<(), PersistError> {
        unimplemented!("not used")
    }
    fn current_session(&self) -> Option<Session> {
        None
    }
    fn sign_out(&self) {}
}

#[tokio::test]
async fn authentication_resolving_after_unmount_is_dropped() {
    let nav = Arc::new(NavigationController::new(GateStatus::Ready).unwrap());
    let presenter = Arc::new(RecordingPresenter::new(nav.clone()));
    let backend = Arc::new(NavigatingAwayBackend {
        nav: nav.clone(),
        calls: std::sync::atomic::AtomicUsize::new(0),
    });
    let deps = ScreenDeps {
        client: backend.clone(),
        picker: Arc::new(DirectoryPicker::new("/nonexistent")),
        nav: nav.clone(),
        presenter,
        keyboard: Arc::new(KeyboardMonitor::new()),
    };

    let token = nav.set_root(Route::login());
    let mut login = LoginScreen::mount(deps.clone(), token);
    login.set_identifier("dana@coastal.example");
    login.set_password("Abcdef1!");

    let phase = timeout(TEST_TIMEOUT, login.submit()).await.unwrap();
    // The successful result arrived for a dead screen: no Authenticated
    // transition, no navigation to MapPage.
    assert_ne!(phase, LoginPhase::Authenticated);
    assert_eq!(nav.current(), Some(Route::login()));

    // A repeat submit on the stuck screen is ignored, with no second
    // backend call.
    assert_eq!(login.submit().await, phase);
    assert_eq!(backend.calls.load(std::sync::atomic::Ordering::SeqCst), 1);

    // The replacement mount is the active one, not the stale screen.
    assert!(nav.active_token().unwrap().is_active());
    drop(login);
    assert_eq!(deps.keyboard.subscriber_count(), 0);
}

#[tokio::test]
async fn repeated_mount_unmount_cycles_leak_no_keyboard_listeners() {
    let (deps, _, _, _pick_dir) = wired_deps().await;
    let nav = deps.nav.clone();

    for _ in 0..20 {
        let token = nav.set_root(Route::login());
        let login = LoginScreen::mount(deps.clone(), token);
        let token = nav.navigate(Route::create_account()).unwrap();
        let create = CreateAccountScreen::mount(deps.clone(), token);
        let token = nav.set_root(Route::create_profile());
        let profile = CreateProfileScreen::mount(deps.clone(), token);
        assert_eq!(deps.keyboard.subscriber_count(), 3);
        drop(login);
        drop(create);
        drop(profile);
        assert_eq!(deps.keyboard.subscriber_count(), 0);
    }
}

#[tokio::test]
async fn login_fields_are_retained_after_rejection() {
    let (deps, _, presenter, _pick_dir) = wired_deps().await;
    let nav = deps.nav.clone();

    let token = nav.set_root(Route::login());
    let mut login = LoginScreen::mount(deps.clone(), token);
    login.set_identifier("dana@coastal.example");
    login.set_password("WrongPass1!");

    assert_eq!(login.submit().await, LoginPhase::Rejected);
    assert_eq!(login.identifier(), "dana@coastal.example");
    assert!(login.error().is_some());
    assert!(presenter.log().iter().any(|e| e == "notice:auth"));

    // The busy indicator came down after the attempt.
    let log = presenter.log();
    let last_busy = log.iter().rfind(|e| e.starts_with("busy:")).unwrap();
    assert_eq!(last_busy, "busy:false");
}
