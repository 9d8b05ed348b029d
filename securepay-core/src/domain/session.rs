//! Session context - the per-session authentication state machine
//!
//! A `SessionContext` is an explicit value owned by the caller (the CLI owns
//! one per interactive run) and passed to every store operation that needs
//! the caller's identity. It is never persisted; a new process always starts
//! anonymous.

use crate::domain::User;

/// Outcome of a login attempt against the session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The session was anonymous and now holds the user
    LoggedIn,
    /// The session already held a user; the call changed nothing
    AlreadyAuthenticated,
}

/// Holds at most one authenticated user snapshot
///
/// States: anonymous, or authenticated with a `User`. Login on an already
/// authenticated session is a no-op reported back to the caller so the
/// presentation layer can show an informational message.
#[derive(Debug, Default)]
pub struct SessionContext {
    user: Option<User>,
}

impl SessionContext {
    /// Create a new anonymous session
    pub fn new() -> Self {
        Self { user: None }
    }

    /// Transition to authenticated, unless a user is already signed in
    pub fn login(&mut self, user: User) -> LoginOutcome {
        if self.user.is_some() {
            return LoginOutcome::AlreadyAuthenticated;
        }
        self.user = Some(user);
        LoginOutcome::LoggedIn
    }

    /// Clear the session, returning the user that was signed in
    pub fn logout(&mut self) -> Option<User> {
        self.user.take()
    }

    /// The currently authenticated user, if any
    pub fn authenticated_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}
