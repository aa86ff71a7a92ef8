//! Two-tier session access state machine
//!
//! A session carries two independent flags. `auth` opens the read tier,
//! `logged_in` opens the mutation tier. Any non-empty username grants
//! `auth`, only the configured credentials grant `logged_in`.

use serde::{Deserialize, Serialize};

/// Access tier a route requires
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tier {
    Public,
    /// Read access: lists, details, search
    Auth,
    /// Mutations: add, update, delete
    Login,
}

/// Coarse view of the flags, exposed to pages
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Anonymous,
    Authorized,
    LoggedIn,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn,
    Authorized,
    Rejected,
}

/// Which flags a logout actually cleared
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LogoutOutcome {
    pub was_logged_in: bool,
    pub was_authorized: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessFlags {
    #[serde(default)]
    pub auth: bool,
    #[serde(default)]
    pub logged_in: bool,
}

impl AccessFlags {
    pub fn level(&self) -> AccessLevel {
        match (self.auth, self.logged_in) {
            (_, true) => AccessLevel::LoggedIn,
            (true, false) => AccessLevel::Authorized,
            (false, false) => AccessLevel::Anonymous,
        }
    }

    /// Each tier checks its own flag only.
    pub fn permits(&self, tier: Tier) -> bool {
        match tier {
            Tier::Public => true,
            Tier::Auth => self.auth,
            Tier::Login => self.logged_in,
        }
    }

    /// Apply a credential submission.
    ///
    /// `credentials_match` is whether username and password both equal the
    /// configured pair. A non-matching but non-empty username still grants
    /// the read tier and leaves `logged_in` untouched.
    pub fn submit_login(&mut self, username: &str, credentials_match: bool) -> LoginOutcome {
        if credentials_match {
            self.logged_in = true;
            self.auth = true;
            LoginOutcome::LoggedIn
        } else if !username.is_empty() {
            self.auth = true;
            LoginOutcome::Authorized
        } else {
            LoginOutcome::Rejected
        }
    }

    pub fn logout(&mut self) -> LogoutOutcome {
        let outcome = LogoutOutcome {
            was_logged_in: self.logged_in,
            was_authorized: self.auth,
        };
        *self = AccessFlags::default();
        outcome
    }
}
