//! CLI front end for the AgriConnect login flow
//!
//! Plays the part of the login / OTP screens: validates input the way the
//! forms do, calls the session manager and prints the outcome as JSON.
//! Each invocation is a fresh process and only the signed-in snapshot carries
//! over between runs, so `login` and `register` ask for the OTP in the same
//! run (or take it from `--code`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Input, Select};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agri_auth::domains::auth::forms::{validate_otp_input, validate_phone};
use agri_auth::domains::auth::{complete_verification, CodePrompt, PromptAction};
use agri_auth::{AuthDeps, AuthOutcome, AuthenticatedUser, Config, SessionManager};

#[derive(Parser)]
#[command(name = "agri-auth")]
#[command(about = "AgriConnect phone + OTP login")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send an OTP to a phone number and ask for it
    Login {
        phone: String,
        /// Verify this code instead of prompting
        #[arg(long)]
        code: Option<String>,
    },

    /// Start a registration for a new farmer and ask for the OTP
    Register {
        phone: String,
        name: String,
        /// Verify this code instead of prompting
        #[arg(long)]
        code: Option<String>,
    },

    /// Sign out and clear the stored session
    Logout,

    /// Show the current session
    Status,
}

// ============================================================================
// JSON Response Types
// ============================================================================

#[derive(Serialize)]
struct Response {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<AuthenticatedUser>,
}

impl Response {
    fn from_outcome(outcome: AuthOutcome, session: &SessionManager) -> Self {
        Self {
            success: outcome.success,
            message: Some(outcome.message),
            state: session.state().name(),
            user: session.user().cloned(),
        }
    }

    fn rejected(message: String, session: &SessionManager) -> Self {
        Self::from_outcome(AuthOutcome::failed(message), session)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the JSON response
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,agri_auth=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    let deps = AuthDeps::from_config(&config)?;
    let mut session = SessionManager::restore(deps, config.otp_policy()).await;

    let response = match cli.command {
        Commands::Login { phone, code } => match validate_phone(&phone) {
            Ok(phone) => {
                let outcome = session.login(phone).await;
                finish(&mut session, outcome, code).await?
            }
            Err(message) => Response::rejected(message, &session),
        },
        Commands::Register { phone, name, code } => match validate_phone(&phone) {
            Ok(phone) => {
                let outcome = session.register(phone, &name).await;
                finish(&mut session, outcome, code).await?
            }
            Err(message) => Response::rejected(message, &session),
        },
        Commands::Logout => {
            session.logout().await;
            Response::from_outcome(AuthOutcome::ok("Logged out"), &session)
        }
        Commands::Status => Response {
            success: true,
            message: None,
            state: session.state().name(),
            user: session.user().cloned(),
        },
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn verify(session: &mut SessionManager, code: &str) -> Response {
    match validate_otp_input(code) {
        Ok(code) => {
            let outcome = session.verify_otp(code).await;
            Response::from_outcome(outcome, session)
        }
        Err(message) => Response::rejected(message, session),
    }
}

/// After a code has been sent: verify `--code` if given, otherwise run the
/// OTP screen in the terminal.
async fn finish(
    session: &mut SessionManager,
    sent: AuthOutcome,
    code: Option<String>,
) -> Result<Response> {
    if !sent.success {
        return Ok(Response::from_outcome(sent, session));
    }

    match code {
        Some(code) => Ok(verify(session, &code).await),
        None => {
            eprintln!("{}", sent.message);
            let outcome = complete_verification(session, &mut TerminalPrompt::new()).await?;
            Ok(Response::from_outcome(outcome, session))
        }
    }
}

// ============================================================================
// Terminal OTP screen
// ============================================================================

struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl TerminalPrompt {
    fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl CodePrompt for TerminalPrompt {
    fn next_action(&mut self, notice: Option<&AuthOutcome>) -> Result<PromptAction> {
        if let Some(notice) = notice {
            eprintln!("{}", notice.message);
        }

        let options = ["Enter code", "Resend code", "Cancel"];
        let selection = Select::with_theme(&self.theme)
            .with_prompt("OTP")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => {
                let code: String = Input::with_theme(&self.theme)
                    .with_prompt("Enter the 4-digit code")
                    .interact_text()?;
                Ok(PromptAction::Code(code))
            }
            1 => Ok(PromptAction::Resend),
            _ => Ok(PromptAction::Cancel),
        }
    }
}
