//! Guided terminal sign-in: the interactive front end of the auth state
//! machine. Network and terminal sit behind traits so the flow is testable
//! without either.

use std::io;

use crate::{
    api::ApiError,
    domain::{
        auth_flow::{normalize_phone, AuthFlow, AuthStage, CodePurpose, CODE_LEN},
        identity::Session,
    },
    usecases::clock::TickClock,
};

/// Code request and verification against the auth endpoint. Implemented by
/// the HTTP client; fakes drive the tests.
pub trait AuthGateway {
    fn send_code(&self, phone: &str) -> Result<CodePurpose, ApiError>;
    fn verify_code(
        &self,
        phone: &str,
        code: &str,
        display_name: Option<&str>,
    ) -> Result<Session, ApiError>;
}

/// Line-oriented terminal surface shared by sign-in and the shell.
pub trait LineTerminal {
    fn print_line(&mut self, line: &str) -> io::Result<()>;
    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

pub struct StdTerminal;

impl LineTerminal for StdTerminal {
    fn print_line(&mut self, line: &str) -> io::Result<()> {
        println!("{line}");
        Ok(())
    }

    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        use std::io::Write;

        print!("{prompt}");
        io::stdout().flush()?;

        let mut line = String::new();
        let bytes = io::stdin().read_line(&mut line)?;
        if bytes == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub phone_attempts: usize,
    pub name_attempts: usize,
    pub code_attempts: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            phone_attempts: 3,
            name_attempts: 3,
            code_attempts: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    SignedIn(Session),
    ExitWithGuidance,
}

/// Runs the sign-in conversation until the machine reaches `Authenticated`
/// or a step exhausts its attempts. The caller persists the token.
pub fn run_sign_in(
    terminal: &mut dyn LineTerminal,
    gateway: &dyn AuthGateway,
    clock: &mut dyn TickClock,
    retry: &RetryPolicy,
    cooldown_ticks: u32,
) -> io::Result<SignInOutcome> {
    let mut flow = AuthFlow::new(cooldown_ticks);
    let mut phone_failures = 0usize;
    let mut name_failures = 0usize;
    let mut code_failures = 0usize;

    terminal.print_line("No valid session found. Starting sign-in.")?;

    loop {
        match flow.stage() {
            AuthStage::PhoneEntry => {
                if phone_failures >= retry.phone_attempts {
                    terminal.print_line(
                        "Phone step failed too many times. Please restart drg and try again later.",
                    )?;
                    return Ok(SignInOutcome::ExitWithGuidance);
                }

                match step_phone(terminal, gateway, &mut flow)? {
                    StepResult::Advanced => {}
                    StepResult::Failed => phone_failures += 1,
                    StepResult::Cancelled => return cancelled(terminal),
                    StepResult::Abort => return Ok(SignInOutcome::ExitWithGuidance),
                }
            }
            AuthStage::NameCollection => {
                if name_failures >= retry.name_attempts {
                    terminal.print_line("Name step failed too many times. Please restart drg.")?;
                    return Ok(SignInOutcome::ExitWithGuidance);
                }

                match step_name(terminal, &mut flow)? {
                    StepResult::Advanced => {}
                    StepResult::Failed => name_failures += 1,
                    StepResult::Cancelled => return cancelled(terminal),
                    StepResult::Abort => return Ok(SignInOutcome::ExitWithGuidance),
                }
            }
            AuthStage::CodeVerification => {
                if code_failures >= retry.code_attempts {
                    terminal.print_line("Code step failed too many times. Please restart drg.")?;
                    return Ok(SignInOutcome::ExitWithGuidance);
                }

                for _ in 0..clock.ticks_elapsed() {
                    flow.tick();
                }

                match step_code(terminal, gateway, &mut flow)? {
                    CodeStep::SignedIn(session) => {
                        terminal.print_line("Signed in. Session is active.")?;
                        return Ok(SignInOutcome::SignedIn(session));
                    }
                    CodeStep::Retry => {}
                    CodeStep::Failed => code_failures += 1,
                    CodeStep::Cancelled => return cancelled(terminal),
                    CodeStep::Abort => return Ok(SignInOutcome::ExitWithGuidance),
                }
            }
            // Unreachable: success returns from the code step.
            AuthStage::Authenticated => return Ok(SignInOutcome::ExitWithGuidance),
        }
    }
}

enum StepResult {
    Advanced,
    Failed,
    Cancelled,
    Abort,
}

enum CodeStep {
    SignedIn(Session),
    Retry,
    Failed,
    Cancelled,
    Abort,
}

fn cancelled(terminal: &mut dyn LineTerminal) -> io::Result<SignInOutcome> {
    terminal.print_line("Input cancelled (EOF). Run drg again to retry.")?;
    Ok(SignInOutcome::ExitWithGuidance)
}

fn step_phone(
    terminal: &mut dyn LineTerminal,
    gateway: &dyn AuthGateway,
    flow: &mut AuthFlow,
) -> io::Result<StepResult> {
    terminal.print_line("Step 1 — Enter your work phone number, e.g. +7 900 123-45-67.")?;
    let Some(raw) = terminal.prompt_line("Phone: ")? else {
        return Ok(StepResult::Cancelled);
    };

    let phone = match normalize_phone(&raw) {
        Ok(phone) => phone,
        Err(err) => {
            // Local validation: the server is never contacted.
            terminal.print_line(err.user_message())?;
            return Ok(StepResult::Failed);
        }
    };

    match gateway.send_code(&phone) {
        Ok(purpose) => {
            flow.code_requested(phone, purpose);
            terminal.print_line("Code has been sent by SMS. Continue to the next step.")?;
            Ok(StepResult::Advanced)
        }
        Err(ApiError::RateLimited { retry_after_secs }) => {
            flow.request_failed();
            terminal.print_line(&format!(
                "AUTH_RATE_LIMITED: Too many attempts. Wait about {retry_after_secs}s before retrying."
            ))?;
            Ok(StepResult::Abort)
        }
        Err(err) => {
            flow.request_failed();
            terminal.print_line(&format!("AUTH_UNAVAILABLE: {}", err.user_message()))?;
            Ok(StepResult::Failed)
        }
    }
}

fn step_name(terminal: &mut dyn LineTerminal, flow: &mut AuthFlow) -> io::Result<StepResult> {
    terminal.print_line("Step 2 — You are new here. Enter your first and last name.")?;
    let Some(name) = terminal.prompt_line("Full name: ")? else {
        return Ok(StepResult::Cancelled);
    };

    match flow.submit_name(&name) {
        Ok(()) => Ok(StepResult::Advanced),
        Err(err) => {
            terminal.print_line(err.user_message())?;
            Ok(StepResult::Failed)
        }
    }
}

fn step_code(
    terminal: &mut dyn LineTerminal,
    gateway: &dyn AuthGateway,
    flow: &mut AuthFlow,
) -> io::Result<CodeStep> {
    let phone = flow.phone().unwrap_or_default().to_owned();
    let pending_name = flow.pending_name().map(str::to_owned);

    terminal.print_line(&format!(
        "Enter the {CODE_LEN}-digit code from SMS ('resend' to request again, 'back' to change data)."
    ))?;
    let Some(line) = terminal.prompt_line("Code: ")? else {
        return Ok(CodeStep::Cancelled);
    };

    match line.as_str() {
        "back" => {
            flow.go_back();
            return Ok(CodeStep::Retry);
        }
        "resend" => {
            if !flow.can_resend() {
                terminal.print_line(&format!(
                    "Resend available in {}s.",
                    flow.cooldown_remaining()
                ))?;
                return Ok(CodeStep::Retry);
            }
            return match gateway.send_code(&phone) {
                Ok(_) => {
                    flow.resend_granted();
                    terminal.print_line("Code has been sent again.")?;
                    Ok(CodeStep::Retry)
                }
                Err(ApiError::RateLimited { retry_after_secs }) => {
                    terminal.print_line(&format!(
                        "AUTH_RATE_LIMITED: Too many attempts. Wait about {retry_after_secs}s."
                    ))?;
                    Ok(CodeStep::Abort)
                }
                Err(err) => {
                    terminal.print_line(&format!("AUTH_UNAVAILABLE: {}", err.user_message()))?;
                    Ok(CodeStep::Retry)
                }
            };
        }
        _ => {}
    }

    if line.len() != CODE_LEN || !line.chars().all(|ch| ch.is_ascii_digit()) {
        terminal.print_line(&format!("The code is exactly {CODE_LEN} digits."))?;
        return Ok(CodeStep::Failed);
    }

    // Digit-by-digit entry; verification auto-fires when the sixth slot
    // fills.
    for digit in line.chars() {
        let Some(code) = flow.push_digit(digit) else {
            continue;
        };

        return match gateway.verify_code(&phone, &code, pending_name.as_deref()) {
            Ok(session) => {
                flow.authenticated();
                Ok(CodeStep::SignedIn(session))
            }
            Err(ApiError::Unauthenticated | ApiError::RequestFailed { .. }) => {
                flow.verification_failed();
                terminal.print_line("AUTH_INVALID_CODE: The code is incorrect or expired.")?;
                Ok(CodeStep::Failed)
            }
            Err(ApiError::RateLimited { retry_after_secs }) => {
                terminal.print_line(&format!(
                    "AUTH_RATE_LIMITED: Too many attempts. Wait about {retry_after_secs}s."
                ))?;
                Ok(CodeStep::Abort)
            }
            Err(err) => {
                flow.verification_failed();
                terminal.print_line(&format!("AUTH_UNAVAILABLE: {}", err.user_message()))?;
                Ok(CodeStep::Failed)
            }
        };
    }

    Ok(CodeStep::Retry)
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::VecDeque};

    use super::*;
    use crate::{
        domain::identity::{make_initials, Identity, SessionToken},
        test_support::FakeTerminal,
        usecases::clock::ManualClock,
    };

    enum Action {
        SendCode(Result<CodePurpose, ApiError>),
        Verify(Result<Session, ApiError>),
    }

    struct FakeGateway {
        actions: RefCell<VecDeque<Action>>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeGateway {
        fn new(actions: Vec<Action>) -> Self {
            Self {
                actions: RefCell::new(actions.into()),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl AuthGateway for FakeGateway {
        fn send_code(&self, phone: &str) -> Result<CodePurpose, ApiError> {
            self.calls.borrow_mut().push(format!("send:{phone}"));
            match self.actions.borrow_mut().pop_front().expect("missing send action") {
                Action::SendCode(result) => result,
                _ => panic!("unexpected action order"),
            }
        }

        fn verify_code(
            &self,
            phone: &str,
            code: &str,
            display_name: Option<&str>,
        ) -> Result<Session, ApiError> {
            self.calls
                .borrow_mut()
                .push(format!("verify:{phone}:{code}:{}", display_name.unwrap_or("-")));
            match self.actions.borrow_mut().pop_front().expect("missing verify action") {
                Action::Verify(result) => result,
                _ => panic!("unexpected action order"),
            }
        }
    }

    fn session_for(name: &str) -> Session {
        Session::new(
            SessionToken::new("a1b2c3"),
            Identity {
                id: 1,
                username: "9001234567".to_owned(),
                display_name: name.to_owned(),
                phone: "+79001234567".to_owned(),
                position: None,
                department: None,
                avatar_initials: make_initials(name),
                avatar_url: None,
                online: true,
            },
        )
    }

    fn run(
        terminal: &mut FakeTerminal,
        gateway: &FakeGateway,
        retry: &RetryPolicy,
    ) -> SignInOutcome {
        let mut clock = ManualClock { pending: 0 };
        run_sign_in(terminal, gateway, &mut clock, retry, 60).expect("sign-in must complete")
    }

    #[test]
    fn login_happy_path_returns_session() {
        let mut terminal = FakeTerminal::new(vec![Some("+7 900 123-45-67"), Some("482913")]);
        let gateway = FakeGateway::new(vec![
            Action::SendCode(Ok(CodePurpose::Login)),
            Action::Verify(Ok(session_for("Иван Петров"))),
        ]);

        let outcome = run(&mut terminal, &gateway, &RetryPolicy::default());

        assert_eq!(outcome, SignInOutcome::SignedIn(session_for("Иван Петров")));
        assert_eq!(
            gateway.calls.borrow().as_slice(),
            ["send:+79001234567", "verify:+79001234567:482913:-"]
        );
    }

    #[test]
    fn register_path_collects_name_before_verification() {
        let mut terminal = FakeTerminal::new(vec![
            Some("+7 900 123-45-67"),
            Some("Иван Петров"),
            Some("482913"),
        ]);
        let gateway = FakeGateway::new(vec![
            Action::SendCode(Ok(CodePurpose::Register)),
            Action::Verify(Ok(session_for("Иван Петров"))),
        ]);

        let outcome = run(&mut terminal, &gateway, &RetryPolicy::default());

        assert!(matches!(outcome, SignInOutcome::SignedIn(_)));
        assert_eq!(
            gateway.calls.borrow()[1],
            "verify:+79001234567:482913:Иван Петров"
        );
    }

    #[test]
    fn short_phone_never_reaches_the_network() {
        let mut terminal =
            FakeTerminal::new(vec![Some("+7 900 123"), Some("+7 900 123-45-67"), Some("482913")]);
        let gateway = FakeGateway::new(vec![
            Action::SendCode(Ok(CodePurpose::Login)),
            Action::Verify(Ok(session_for("Иван Петров"))),
        ]);

        let _ = run(&mut terminal, &gateway, &RetryPolicy::default());

        // One send + one verify: the invalid phone cost no call.
        assert_eq!(gateway.call_count(), 2);
    }

    #[test]
    fn single_token_name_is_rejected_locally() {
        let mut terminal = FakeTerminal::new(vec![
            Some("+7 900 123-45-67"),
            Some("Иван"),
            Some("Иван Петров"),
            Some("482913"),
        ]);
        let gateway = FakeGateway::new(vec![
            Action::SendCode(Ok(CodePurpose::Register)),
            Action::Verify(Ok(session_for("Иван Петров"))),
        ]);

        let outcome = run(&mut terminal, &gateway, &RetryPolicy::default());

        assert!(matches!(outcome, SignInOutcome::SignedIn(_)));
        // Rejected name produced no extra network call.
        assert_eq!(gateway.call_count(), 2);
        assert!(terminal
            .output
            .iter()
            .any(|line| line.contains("first and last name")));
    }

    #[test]
    fn invalid_code_clears_entry_and_retries() {
        let mut terminal =
            FakeTerminal::new(vec![Some("+7 900 123-45-67"), Some("000000"), Some("482913")]);
        let gateway = FakeGateway::new(vec![
            Action::SendCode(Ok(CodePurpose::Login)),
            Action::Verify(Err(ApiError::Unauthenticated)),
            Action::Verify(Ok(session_for("Иван Петров"))),
        ]);

        let outcome = run(&mut terminal, &gateway, &RetryPolicy::default());

        assert!(matches!(outcome, SignInOutcome::SignedIn(_)));
        assert!(terminal
            .output
            .iter()
            .any(|line| line.contains("AUTH_INVALID_CODE")));
    }

    #[test]
    fn rate_limited_code_request_exits_with_guidance() {
        let mut terminal = FakeTerminal::new(vec![Some("+7 900 123-45-67")]);
        let gateway = FakeGateway::new(vec![Action::SendCode(Err(ApiError::RateLimited {
            retry_after_secs: 60,
        }))]);

        let outcome = run(&mut terminal, &gateway, &RetryPolicy::default());

        assert_eq!(outcome, SignInOutcome::ExitWithGuidance);
        assert!(terminal
            .output
            .iter()
            .any(|line| line.contains("AUTH_RATE_LIMITED")));
    }

    #[test]
    fn resend_is_blocked_while_cooldown_is_running() {
        let mut terminal = FakeTerminal::new(vec![
            Some("+7 900 123-45-67"),
            Some("resend"),
            Some("482913"),
        ]);
        let gateway = FakeGateway::new(vec![
            Action::SendCode(Ok(CodePurpose::Login)),
            Action::Verify(Ok(session_for("Иван Петров"))),
        ]);

        let _ = run(&mut terminal, &gateway, &RetryPolicy::default());

        // Blocked resend issued no network call: one send + one verify only.
        assert_eq!(gateway.call_count(), 2);
        assert!(terminal
            .output
            .iter()
            .any(|line| line.contains("Resend available in")));
    }

    #[test]
    fn resend_after_cooldown_requests_again_and_rearms() {
        let mut terminal = FakeTerminal::new(vec![
            Some("+7 900 123-45-67"),
            Some("resend"),
            Some("482913"),
        ]);
        let gateway = FakeGateway::new(vec![
            Action::SendCode(Ok(CodePurpose::Login)),
            Action::SendCode(Ok(CodePurpose::Login)),
            Action::Verify(Ok(session_for("Иван Петров"))),
        ]);
        let mut clock = ManualClock { pending: 60 };

        let outcome =
            run_sign_in(&mut terminal, &gateway, &mut clock, &RetryPolicy::default(), 60)
                .expect("sign-in must complete");

        assert!(matches!(outcome, SignInOutcome::SignedIn(_)));
        assert_eq!(gateway.call_count(), 3);
    }

    #[test]
    fn back_returns_to_phone_entry_for_login() {
        let mut terminal = FakeTerminal::new(vec![
            Some("+7 900 123-45-67"),
            Some("back"),
            Some("+7 900 765-43-21"),
            Some("482913"),
        ]);
        let gateway = FakeGateway::new(vec![
            Action::SendCode(Ok(CodePurpose::Login)),
            Action::SendCode(Ok(CodePurpose::Login)),
            Action::Verify(Ok(session_for("Иван Петров"))),
        ]);

        let outcome = run(&mut terminal, &gateway, &RetryPolicy::default());

        assert!(matches!(outcome, SignInOutcome::SignedIn(_)));
        assert_eq!(gateway.calls.borrow()[1], "send:+79007654321");
    }

    #[test]
    fn eof_cancels_flow_cleanly() {
        let mut terminal = FakeTerminal::new(vec![None]);
        let gateway = FakeGateway::new(vec![]);

        let outcome = run(&mut terminal, &gateway, &RetryPolicy::default());

        assert_eq!(outcome, SignInOutcome::ExitWithGuidance);
        assert_eq!(gateway.call_count(), 0);
    }

    #[test]
    fn exhausted_code_attempts_exit_with_guidance() {
        let mut terminal = FakeTerminal::new(vec![
            Some("+7 900 123-45-67"),
            Some("000000"),
            Some("111111"),
        ]);
        let gateway = FakeGateway::new(vec![
            Action::SendCode(Ok(CodePurpose::Login)),
            Action::Verify(Err(ApiError::Unauthenticated)),
            Action::Verify(Err(ApiError::Unauthenticated)),
        ]);

        let outcome = run(
            &mut terminal,
            &gateway,
            &RetryPolicy {
                phone_attempts: 3,
                name_attempts: 3,
                code_attempts: 2,
            },
        );

        assert_eq!(outcome, SignInOutcome::ExitWithGuidance);
    }
}
