//! Who is looking, at which screen, and at what instant.
//!
//! A [`Session`] is a plain value handed to every query; nothing here is
//! global.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Officer,
    Citizen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Login,
    Dashboard,
    Files,
    Officers,
    Alerts,
    Reports,
    Track,
}

const ADMIN_SCREENS: &[Screen] = &[
    Screen::Dashboard,
    Screen::Files,
    Screen::Officers,
    Screen::Alerts,
    Screen::Reports,
];
const OFFICER_SCREENS: &[Screen] = &[Screen::Files, Screen::Alerts];
const CITIZEN_SCREENS: &[Screen] = &[Screen::Track];

impl Role {
    /// Screens the role may open, landing screen first.
    pub fn screens(&self) -> &'static [Screen] {
        match self {
            Role::Admin => ADMIN_SCREENS,
            Role::Officer => OFFICER_SCREENS,
            Role::Citizen => CITIZEN_SCREENS,
        }
    }

    pub fn landing_screen(&self) -> Screen {
        self.screens()[0]
    }

    pub fn can_view(&self, screen: Screen) -> bool {
        self.screens().contains(&screen)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Officer => "officer",
            Role::Citizen => "citizen",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "officer" => Ok(Role::Officer),
            "citizen" => Ok(Role::Citizen),
            _ => Err(format!(
                "Unknown role '{}': expected admin, officer or citizen",
                s
            )),
        }
    }
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Login => "login",
            Screen::Dashboard => "dashboard",
            Screen::Files => "files",
            Screen::Officers => "officers",
            Screen::Alerts => "alerts",
            Screen::Reports => "reports",
            Screen::Track => "track",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session state: logged-in role, current screen and evaluation instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub role: Option<Role>,
    pub screen: Screen,
    /// Instant all day counts are measured against.
    pub as_of: DateTime<Utc>,
}

impl Session {
    /// A logged-out session sitting on the login screen.
    pub fn anonymous(as_of: DateTime<Utc>) -> Self {
        Self {
            role: None,
            screen: Screen::Login,
            as_of,
        }
    }

    /// Logs in and lands on the role's first screen.
    pub fn login(role: Role, as_of: DateTime<Utc>) -> Self {
        log::debug!("Login as {}, landing on {}", role, role.landing_screen());
        Self {
            role: Some(role),
            screen: role.landing_screen(),
            as_of,
        }
    }

    pub fn logout(&mut self) {
        self.role = None;
        self.screen = Screen::Login;
    }

    pub fn navigate(&mut self, screen: Screen) -> Result<(), SessionError> {
        self.ensure(screen)?;
        self.screen = screen;
        Ok(())
    }

    /// Checks the logged-in role may open `screen` without moving to it.
    pub fn ensure(&self, screen: Screen) -> Result<(), SessionError> {
        let role = self.role.ok_or(SessionError::NotLoggedIn)?;
        if role.can_view(screen) {
            Ok(())
        } else {
            Err(SessionError::Forbidden {
                role: role.to_string(),
                screen: screen.to_string(),
            })
        }
    }

    /// Same session evaluated at a different instant.
    pub fn at(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = as_of;
        self
    }
}
