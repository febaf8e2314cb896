//! Cold-start decision: reuse a stored token, or route into sign-in.

use crate::{
    api::ApiError,
    domain::identity::{Session, SessionToken},
};

/// Validates a stored token against the server. `Ok(None)` means the server
/// explicitly rejected it; transport trouble stays an `Err` so the token is
/// not thrown away over a flaky network.
pub trait SessionProbe {
    fn check_session(&self, token: &SessionToken) -> Result<Option<Session>, ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInReason {
    NoStoredToken,
    TokenRejected,
}

#[derive(Debug)]
pub enum StartupState {
    /// Stored token accepted; straight to the main loop.
    Resumed(Session),
    /// No usable token; run the sign-in flow.
    SignInRequired(SignInReason),
    /// Token exists but could not be checked. Keep it and report.
    Unavailable(ApiError),
}

/// Decides where the app goes on launch.
///
/// A missing token and a rejected token both end in sign-in, but only the
/// rejected one should also clear the stored credential; the caller uses
/// the reason for that.
pub fn plan_startup(probe: &dyn SessionProbe, stored: Option<SessionToken>) -> StartupState {
    let Some(token) = stored else {
        return StartupState::SignInRequired(SignInReason::NoStoredToken);
    };

    match probe.check_session(&token) {
        Ok(Some(session)) => {
            tracing::info!(user_id = session.identity.id, "session resumed");
            StartupState::Resumed(session)
        }
        Ok(None) => {
            tracing::info!("stored session rejected by server");
            StartupState::SignInRequired(SignInReason::TokenRejected)
        }
        Err(err) => {
            tracing::warn!(error = %err, "session check failed, keeping stored token");
            StartupState::Unavailable(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::{make_initials, Identity};

    struct FakeProbe {
        response: Result<Option<Session>, ApiError>,
    }

    impl SessionProbe for FakeProbe {
        fn check_session(&self, _token: &SessionToken) -> Result<Option<Session>, ApiError> {
            self.response.clone()
        }
    }

    fn session() -> Session {
        Session::new(
            SessionToken::new("a1b2c3"),
            Identity {
                id: 1,
                username: "9001234567".to_owned(),
                display_name: "Иван Петров".to_owned(),
                phone: "+79001234567".to_owned(),
                position: None,
                department: None,
                avatar_initials: make_initials("Иван Петров"),
                avatar_url: None,
                online: true,
            },
        )
    }

    #[test]
    fn missing_token_requires_sign_in() {
        let probe = FakeProbe {
            response: Ok(Some(session())),
        };

        let state = plan_startup(&probe, None);

        assert!(matches!(
            state,
            StartupState::SignInRequired(SignInReason::NoStoredToken)
        ));
    }

    #[test]
    fn accepted_token_resumes_the_session() {
        let probe = FakeProbe {
            response: Ok(Some(session())),
        };

        let state = plan_startup(&probe, Some(SessionToken::new("a1b2c3")));

        assert!(matches!(state, StartupState::Resumed(_)));
    }

    #[test]
    fn rejected_token_routes_to_sign_in_with_reason() {
        let probe = FakeProbe { response: Ok(None) };

        let state = plan_startup(&probe, Some(SessionToken::new("stale")));

        assert!(matches!(
            state,
            StartupState::SignInRequired(SignInReason::TokenRejected)
        ));
    }

    #[test]
    fn transport_failure_keeps_the_token() {
        let probe = FakeProbe {
            response: Err(ApiError::Transport("timeout".to_owned())),
        };

        let state = plan_startup(&probe, Some(SessionToken::new("a1b2c3")));

        assert!(matches!(state, StartupState::Unavailable(_)));
    }
}
