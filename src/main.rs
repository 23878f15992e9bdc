use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use staffing_onboard::alert::UserAlert;
use staffing_onboard::config::AppConfig;
use staffing_onboard::error::GateError;
use staffing_onboard::gate::{ResourceGate, ResourceLoader, SplashHandle};
use staffing_onboard::keyboard::KeyboardMonitor;
use staffing_onboard::nav::{NavigationController, Route};
use staffing_onboard::picker::DirectoryPicker;
use staffing_onboard::screens::{
    CreateAccountPhase, CreateAccountScreen, CreateProfilePhase, CreateProfileScreen, LoginPhase,
    LoginScreen, Presenter, ScreenDeps,
};
use staffing_onboard::store::{LibSqlClient, PersistenceClient};

/// Prompt for one field, or exit on EOF.
macro_rules! set_or_exit {
    ($reader:expr, $screen:expr, $setter:ident, $label:expr) => {
        match $reader.prompt($label).await {
            Some(value) => $screen.$setter(&value),
            None => std::process::exit(0),
        }
    };
}

/// Shared line-oriented stdin. The flow is sequential, so one reader is
/// enough for both prompts and acknowledgment waits.
struct LineReader {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl LineReader {
    fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    async fn prompt(&self, label: &str) -> Option<String> {
        eprint!("{label}");
        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(line)) => Some(line.trim().to_string()),
            Ok(None) => None, // EOF
            Err(e) => {
                tracing::error!("Error reading stdin: {e}");
                None
            }
        }
    }
}

/// Terminal splash: a banner while resources load.
struct TerminalSplash;

impl SplashHandle for TerminalSplash {
    fn dismiss(&self) {
        eprintln!("   Ready.\n");
    }
}

/// Loads the display font the screens use; failure is logged by the gate
/// and the flow continues.
struct FontLoader {
    path: PathBuf,
}

#[async_trait]
impl ResourceLoader for FontLoader {
    fn name(&self) -> &str {
        "font"
    }

    async fn load(&self) -> Result<(), GateError> {
        tokio::fs::read(&self.path)
            .await
            .map(|_| ())
            .map_err(|e| GateError::LoadFailed {
                name: "font".to_string(),
                reason: format!("{}: {e}", self.path.display()),
            })
    }
}

/// Prints alerts to the terminal; acknowledgments wait for Enter.
struct TerminalPresenter {
    reader: Arc<LineReader>,
}

#[async_trait]
impl Presenter for TerminalPresenter {
    async fn acknowledge(&self, alert: &UserAlert) {
        eprintln!("\n✅ {}", alert.title);
        if !alert.body.is_empty() {
            eprintln!("   {}", alert.body);
        }
        self.reader.prompt("   Press Enter to continue... ").await;
    }

    fn notice(&self, alert: &UserAlert) {
        eprintln!("⚠️  {}", alert.title);
        if !alert.body.is_empty() {
            eprintln!("   {}", alert.body);
        }
    }

    fn set_busy(&self, busy: bool) {
        if busy {
            eprintln!("⏳ Working...");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env();

    eprintln!(
        "🦷 Coastal Dental Health Staffing v{}",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("   Database: {}", config.db_path.display());
    eprintln!("   Uploads from: {}", config.pick_dir.display());
    eprintln!("   Loading resources...");

    // Resource gate: nothing renders until it settles.
    let mut gate = ResourceGate::new(Arc::new(TerminalSplash)).with_loader(Arc::new(FontLoader {
        path: config.asset_dir.join("AvenirLTStd-Black.otf"),
    }));
    if let Some(timeout) = config.gate_timeout {
        gate = gate.with_timeout(timeout);
    }
    gate.load().await;

    // One explicitly constructed client, injected into every screen.
    let client = Arc::new(
        LibSqlClient::open(&config.db_path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to open account database: {e}"))?
            .with_auth_delay(config.auth_delay),
    );

    let reader = Arc::new(LineReader::new());
    let nav = Arc::new(NavigationController::new(gate.status())?);
    let deps = ScreenDeps {
        client: client.clone(),
        picker: Arc::new(DirectoryPicker::new(config.pick_dir.clone())),
        nav: nav.clone(),
        presenter: Arc::new(TerminalPresenter {
            reader: reader.clone(),
        }),
        keyboard: Arc::new(KeyboardMonitor::new()),
    };

    nav.set_root(Route::login());

    loop {
        let Some(route) = nav.current() else { break };
        match route {
            Route::Login(_) => run_login(&deps, &nav, &reader).await,
            Route::CreateAccount(_) => run_create_account(&deps, &nav, &reader).await,
            Route::CreateProfile(_) => run_create_profile(&deps, &nav, &reader).await,
            Route::MapPage(_) => {
                // Host decision: a signed-in user with no profile fills one
                // in before landing on the map.
                if let Some(session) = client.current_session()
                    && client.load_profile(session.account_id).await?.is_none()
                {
                    let confirm = reader
                        .prompt("Set up your profile now? [Y/n] ")
                        .await
                        .unwrap_or_default();
                    if !confirm.eq_ignore_ascii_case("n") {
                        nav.set_root(Route::create_profile());
                        continue;
                    }
                }
                eprintln!("\n🗺  Welcome! You're on the map.");
                break;
            }
        }
    }

    Ok(())
}

async fn run_login(deps: &ScreenDeps, nav: &Arc<NavigationController>, reader: &Arc<LineReader>) {
    let Some(token) = nav.active_token() else {
        return;
    };
    let mut screen = LoginScreen::mount(deps.clone(), token);

    eprintln!("\n── Login ──  (type 'new' to create an account, 'quit' to exit)");
    loop {
        let Some(identifier) = reader.prompt("Email: ").await else {
            std::process::exit(0);
        };
        match identifier.as_str() {
            "quit" => std::process::exit(0),
            "new" => {
                screen.go_to_create_account();
                return;
            }
            _ => {}
        }
        let Some(password) = reader.prompt("Password: ").await else {
            std::process::exit(0);
        };
        screen.set_identifier(&identifier);
        screen.set_password(&password);
        if screen.submit().await == LoginPhase::Authenticated {
            return;
        }
    }
}

async fn run_create_account(
    deps: &ScreenDeps,
    nav: &Arc<NavigationController>,
    reader: &Arc<LineReader>,
) {
    let Some(token) = nav.active_token() else {
        return;
    };
    let mut screen = CreateAccountScreen::mount(deps.clone(), token);

    eprintln!("\n── Create an Account ──  (type 'back' as first name to return)");
    loop {
        let Some(first) = reader.prompt("First name: ").await else {
            std::process::exit(0);
        };
        if first == "back" {
            screen.go_to_login();
            return;
        }
        screen.set_first_name(&first);
        set_or_exit!(reader, screen, set_last_name, "Last name: ");
        set_or_exit!(reader, screen, set_email, "Email: ");
        set_or_exit!(reader, screen, set_phone, "Phone: ");
        set_or_exit!(reader, screen, set_password, "Password: ");
        if let Some(warning) = screen.password_warning() {
            eprintln!("⚠️  {warning}");
        }
        if screen.submit().await == CreateAccountPhase::Succeeded {
            return;
        }
    }
}

async fn run_create_profile(
    deps: &ScreenDeps,
    nav: &Arc<NavigationController>,
    reader: &Arc<LineReader>,
) {
    let Some(token) = nav.active_token() else {
        return;
    };
    let mut screen = CreateProfileScreen::mount(deps.clone(), token);

    eprintln!("\n── Create Profile ──");
    loop {
        set_or_exit!(reader, screen, set_bio, "Bio: ");
        set_or_exit!(reader, screen, set_work_experience, "Work experience: ");

        let pick = reader
            .prompt("Attach profile picture from uploads? [y/N] ")
            .await
            .unwrap_or_default();
        if pick.eq_ignore_ascii_case("y") {
            screen.pick_image().await;
        }
        let pick = reader
            .prompt("Attach resume (PDF) from uploads? [y/N] ")
            .await
            .unwrap_or_default();
        if pick.eq_ignore_ascii_case("y") {
            screen.pick_resume().await;
            if let Some(caption) = screen.resume_caption() {
                eprintln!("   {caption}");
            }
        }

        if screen.submit().await == CreateProfilePhase::Succeeded {
            return;
        }
        let retry = reader
            .prompt("Submission failed. Try again? [Y/n] ")
            .await
            .unwrap_or_default();
        if retry.eq_ignore_ascii_case("n") {
            std::process::exit(0);
        }
    }
}
