// Signed-in session: who is using the app, which league they follow and
// which roster is theirs.
//
// Sign-in is a local mock. Any non-empty username/password pair is
// accepted; nothing is sent anywhere. The session is persisted
// write-through so it survives restarts, and cleared on logout.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::db::Database;

const SESSION_KEY: &str = "session";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("username and password are required")]
    MissingCredentials,

    #[error("league id must not be empty")]
    EmptyLeagueId,

    #[error("not signed in")]
    NotSignedIn,

    #[error("failed to persist session: {0}")]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    #[serde(default)]
    pub league_id: Option<String>,
    #[serde(default)]
    pub my_roster_id: Option<u32>,
}

/// Owns the current session and keeps the database in step with it.
pub struct SessionStore {
    db: Database,
    current: Option<Session>,
}

impl SessionStore {
    /// Load any persisted session from `db`. A stored value that no longer
    /// parses is dropped rather than failing startup.
    pub fn load(db: Database) -> anyhow::Result<Self> {
        let current = match db.load_state(SESSION_KEY)? {
            Some(value) => match serde_json::from_value::<Session>(value) {
                Ok(session) => {
                    info!("Restored session for {}", session.username);
                    Some(session)
                }
                Err(e) => {
                    warn!("Discarding unreadable stored session: {}", e);
                    db.delete_state(SESSION_KEY)?;
                    None
                }
            },
            None => None,
        };
        Ok(Self { db, current })
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Sign in. A returning user keeps their league and roster choice.
    pub fn login(&mut self, username: &str, password: &str) -> Result<&Session, SessionError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(SessionError::MissingCredentials);
        }

        let session = match self.current.as_ref() {
            Some(prev) if prev.username == username => prev.clone(),
            _ => Session {
                username: username.to_string(),
                ..Session::default()
            },
        };
        self.commit(session)
    }

    /// Point the session at a league. Switching leagues forgets the roster
    /// choice, which only makes sense within one league.
    pub fn set_league_id(&mut self, league_id: &str) -> Result<&Session, SessionError> {
        let league_id = league_id.trim();
        if league_id.is_empty() {
            return Err(SessionError::EmptyLeagueId);
        }
        let mut session = self.current.clone().ok_or(SessionError::NotSignedIn)?;
        if session.league_id.as_deref() != Some(league_id) {
            session.league_id = Some(league_id.to_string());
            session.my_roster_id = None;
        }
        self.commit(session)
    }

    pub fn set_my_roster(&mut self, roster_id: Option<u32>) -> Result<&Session, SessionError> {
        let mut session = self.current.clone().ok_or(SessionError::NotSignedIn)?;
        session.my_roster_id = roster_id;
        self.commit(session)
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.db.delete_state(SESSION_KEY)?;
        if let Some(prev) = self.current.take() {
            info!("Signed out {}", prev.username);
        }
        Ok(())
    }

    fn commit(&mut self, session: Session) -> Result<&Session, SessionError> {
        let value = serde_json::to_value(&session).map_err(anyhow::Error::from)?;
        self.db.save_state(SESSION_KEY, &value)?;
        Ok(&*self.current.insert(session))
    }
}
