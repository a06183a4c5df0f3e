use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use repaykaro::api::endpoints::{self, Resource};
use repaykaro::auth::{SendOtpOutcome, VerifyOtpOutcome};
use repaykaro::navigation::Screen;
use repaykaro::notify::{ConsoleNotifier, Notifier, TracingNotifier};
use repaykaro::{App, Config};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// RepayKaro customer session client.
#[derive(Parser, Debug)]
#[command(name = "repaykaro", version, about)]
struct Cli {
    /// Use this config file instead of ~/.repaykaro/config.toml.
    #[arg(long, global = true)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Bootstrap the session and print the mounted screen.
    Launch {
        /// Block through the first-launch splash.
        #[arg(long)]
        wait: bool,
    },
    /// Request an OTP for a 10-digit mobile number.
    Login { phone: String },
    /// Submit the OTP received on `phone`.
    Verify { phone: String, otp: String },
    /// Drop the stored credential.
    Logout,
    /// Print bootstrap state and navigation stack as JSON.
    Status,
    /// GET one of the authenticated resources and print the payload.
    Fetch {
        #[arg(value_enum)]
        resource: Resource,
    },
    /// Inspect configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration as TOML.
    Show,
    /// Print the JSON schema of the config file.
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("repaykaro=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Config {
        action: ConfigAction::Schema,
    } = &cli.command
    {
        println!("{}", Config::json_schema()?);
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_or_init_at(path)?,
        None => Config::load_or_init()?,
    };
    // Piped or redirected stderr gets toasts through the log instead.
    let notifier: Arc<dyn Notifier> = if console::user_attended_stderr() {
        Arc::new(ConsoleNotifier)
    } else {
        Arc::new(TracingNotifier)
    };
    let app = App::from_config(config, notifier)?;

    let result = run(&app, cli.command).await;
    app.session.shutdown();
    result
}

async fn run(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Launch { wait } => {
            let mut screen = app.session.bootstrap().await;
            if wait && screen == Some(Screen::Splash) {
                println!("splash");
                screen = app.session.wait_past_splash().await;
            }
            print_mounted(app, screen);
            Ok(())
        }
        Commands::Login { phone } => {
            require_screen(app, Screen::Unauthenticated).await?;
            app.auth.open_login();
            match app.auth.send_otp(phone.trim()).await {
                SendOtpOutcome::Sent => {
                    print_mounted(app, app.session.current_screen());
                    Ok(())
                }
                other => anyhow::bail!("OTP request did not go through: {other:?}"),
            }
        }
        Commands::Verify { phone, otp } => {
            require_screen(app, Screen::Unauthenticated).await?;
            match app.auth.verify_otp(phone.trim(), otp.trim()).await {
                VerifyOtpOutcome::Verified => {
                    print_mounted(app, app.session.current_screen());
                    Ok(())
                }
                other => anyhow::bail!("OTP verification failed: {other:?}"),
            }
        }
        Commands::Logout => {
            if settle(app).await != Some(Screen::Authenticated) {
                println!("not logged in");
                return Ok(());
            }
            app.auth.logout().await.context("Logout failed")?;
            print_mounted(app, app.session.current_screen());
            Ok(())
        }
        Commands::Status => {
            let screen = app.session.bootstrap().await;
            let state = app.session.state();
            let status = serde_json::json!({
                "screen": screen,
                "is_first_launch": state.is_first_launch.known(),
                "is_logged_in": state.is_logged_in.known(),
                "splash_done": state.splash_done,
                "routes": app.session.navigation().routes(),
                "store": app.config.resolved_store_path(),
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
            Ok(())
        }
        Commands::Fetch { resource } => {
            require_screen(app, Screen::Authenticated).await?;
            let resp = endpoints::fetch(app.api.as_ref(), resource)
                .await
                .with_context(|| format!("Failed to fetch {}", resource.endpoint()))?;
            if !resp.success {
                anyhow::bail!("{}", resp.message_or("Request was not successful"));
            }
            println!("{}", serde_json::to_string_pretty(&resp)?);
            Ok(())
        }
        Commands::Config { action } => {
            match action {
                ConfigAction::Show => {
                    println!("# {}", app.config.config_path.display());
                    print!("{}", toml::to_string_pretty(&app.config)?);
                }
                ConfigAction::Schema => println!("{}", Config::json_schema()?),
            }
            Ok(())
        }
    }
}

/// Bootstraps and waits out the splash so commands act on a real screen.
async fn settle(app: &App) -> Option<Screen> {
    match app.session.bootstrap().await {
        Some(Screen::Splash) => app.session.wait_past_splash().await,
        other => other,
    }
}

async fn require_screen(app: &App, expected: Screen) -> Result<()> {
    let screen = settle(app).await;
    if screen != Some(expected) {
        let hint = match expected {
            Screen::Authenticated => "log in first",
            _ => "log out first",
        };
        anyhow::bail!("current screen is {screen:?}; {hint}");
    }
    Ok(())
}

fn print_mounted(app: &App, screen: Option<Screen>) {
    let route = app
        .session
        .navigation()
        .current()
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string());
    match screen {
        Some(screen) => println!("{screen} ({route})"),
        None => println!("unresolved"),
    }
}
