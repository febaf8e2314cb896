use anyhow::Result;

use crate::{
    api,
    cli::{Cli, Command},
    domain, infra,
    usecases::{
        self,
        bootstrap::bootstrap,
        clock::WallClock,
        context::AppContext,
        logout::logout_and_reset,
        shell::{run_shell, ShellOutcome},
        sign_in::{run_sign_in, RetryPolicy, SignInOutcome, StdTerminal},
        startup::{plan_startup, SignInReason, StartupState},
        sync_engine::ChatSyncEngine,
    },
};

pub fn run(cli: Cli) -> Result<()> {
    match cli.command_or_default() {
        Command::Run => {
            let context = bootstrap(cli.config.as_deref())?;
            log_module_boundaries();
            run_main(&context)
        }
        Command::Logout => {
            // Logout stays local even when bootstrap would fail; the token
            // file is the only state to remove.
            if let Err(error) = bootstrap(cli.config.as_deref()) {
                tracing::warn!(error = ?error, "bootstrap failed, continuing with local logout");
            }
            let outcome = logout_and_reset()?;
            if outcome.token_removed {
                println!("Signed out. The stored session was removed.");
            } else {
                println!("No stored session found. Nothing to remove.");
            }
            Ok(())
        }
    }
}

fn run_main(context: &AppContext) -> Result<()> {
    let stored = context.session_store.load()?;

    let session = match plan_startup(&context.client, stored) {
        StartupState::Resumed(session) => Some(session),
        StartupState::SignInRequired(reason) => {
            if reason == SignInReason::TokenRejected {
                // Only an explicit server rejection invalidates the stored
                // credential.
                context.session_store.clear()?;
            }
            sign_in(context)?
        }
        StartupState::Unavailable(err) => {
            // The token may still be good; keep it and go through sign-in
            // for this run only.
            println!("{}", err.user_message());
            sign_in(context)?
        }
    };

    let Some(mut session) = session else {
        return Ok(());
    };

    let mut terminal = StdTerminal;
    let mut clock = WallClock::new();
    let mut engine = ChatSyncEngine::new(context.config.sync.poll_interval_ticks);

    let outcome = run_shell(
        &mut terminal,
        &context.client,
        &context.client,
        &mut clock,
        &mut engine,
        &mut session,
    )?;

    match outcome {
        ShellOutcome::Quit => {}
        ShellOutcome::LogoutRequested => {
            context.client.clear_token();
            let logout = logout_and_reset()?;
            tracing::info!(token_removed = logout.token_removed, "shell requested logout");
            println!("Signed out.");
        }
        ShellOutcome::SessionExpired => {
            context.client.clear_token();
            context.session_store.clear()?;
            println!("Run drg again to sign in.");
        }
    }

    Ok(())
}

fn sign_in(context: &AppContext) -> Result<Option<crate::domain::identity::Session>> {
    let mut terminal = StdTerminal;
    let mut clock = WallClock::new();

    let outcome = run_sign_in(
        &mut terminal,
        &context.client,
        &mut clock,
        &RetryPolicy::default(),
        context.config.sync.resend_cooldown_ticks,
    )?;

    match outcome {
        SignInOutcome::SignedIn(session) => {
            context.session_store.save(&session.token)?;
            Ok(Some(session))
        }
        SignInOutcome::ExitWithGuidance => Ok(None),
    }
}

fn log_module_boundaries() {
    tracing::debug!(
        domain = domain::module_name(),
        api = api::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );
}
