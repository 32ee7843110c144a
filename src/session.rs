//! Who is using the app: an explicit session context handed to every handler.
//!
//! Access is granted by comparing a plain PIN with the configured ones. This keeps
//! casual visitors out of the admin and scoring screens and nothing more; it is not
//! a security boundary.

use crate::config::Config;
use actix_session::{Session, SessionGetError, SessionInsertError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SESSION_ROLE_KEY: &str = "badminton:role";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Manages tournaments, teams and matches; may also score.
    Admin,
    /// May score live matches only.
    Scorer,
}

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Log in first")]
    NotLoggedIn,
    #[error("Not allowed for this role")]
    Forbidden,
    #[error("Wrong PIN")]
    WrongPin,
    #[error("Session could not be read: {0}")]
    SessionRead(#[from] SessionGetError),
    #[error("Session could not be written: {0}")]
    SessionWrite(#[from] SessionInsertError),
}

/// Role matching `pin`, if any. Admin PIN wins if both PINs were configured equal.
pub fn authenticate(pin: &str, config: &Config) -> Option<Role> {
    let pin = pin.trim();
    if pin.is_empty() {
        return None;
    }
    if pin == config.admin_pin {
        Some(Role::Admin)
    } else if config.scorer_pin.as_deref() == Some(pin) {
        Some(Role::Scorer)
    } else {
        None
    }
}

/// Access rights of the current request.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct SessionContext {
    pub role: Option<Role>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self { role: None }
    }

    pub fn with_role(role: Role) -> Self {
        Self { role: Some(role) }
    }

    /// Read the role stored in the cookie session.
    pub fn from_session(session: &Session) -> Result<Self, AccessError> {
        Ok(Self {
            role: session.get::<Role>(SESSION_ROLE_KEY)?,
        })
    }

    /// Check `pin` and remember the matching role in the cookie session.
    pub fn login(session: &Session, pin: &str, config: &Config) -> Result<Self, AccessError> {
        let role = authenticate(pin, config).ok_or(AccessError::WrongPin)?;
        session.renew();
        session.insert(SESSION_ROLE_KEY, role)?;
        log::info!("Session logged in as {:?}", role);
        Ok(Self::with_role(role))
    }

    pub fn logout(session: &Session) {
        session.purge();
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    pub fn can_score(&self) -> bool {
        matches!(self.role, Some(Role::Admin | Role::Scorer))
    }

    pub fn require_admin(&self) -> Result<(), AccessError> {
        match self.role {
            Some(Role::Admin) => Ok(()),
            Some(Role::Scorer) => Err(AccessError::Forbidden),
            None => Err(AccessError::NotLoggedIn),
        }
    }

    pub fn require_scorer(&self) -> Result<(), AccessError> {
        if self.can_score() {
            Ok(())
        } else {
            Err(AccessError::NotLoggedIn)
        }
    }
}
