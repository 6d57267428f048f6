use crate::config::LoginConfig;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    #[error("Enter a username and a password")]
    MissingCredentials,
    #[error("Incorrect username or password")]
    InvalidCredentials,
}

/// File holding the signed-in user between runs. Device state is not kept.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The stored user, if any. An unreadable or empty file counts as signed out.
    pub fn load(&self) -> Option<String> {
        let contents = fs_err::read_to_string(&self.path).ok()?;
        let user = contents.trim();
        (!user.is_empty()).then(|| user.to_string())
    }

    pub fn save(&self, user: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs_err::create_dir_all(parent)?;
        }
        fs_err::write(&self.path, user)
    }

    pub fn clear(&self) -> io::Result<()> {
        match fs_err::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Sign-in gate in front of the panel.
#[derive(Debug, Default)]
pub struct Session {
    user: Option<String>,
    store: Option<SessionStore>,
}

impl Session {
    /// Picks up a sign-in left by an earlier run.
    pub fn restored(store: SessionStore) -> Self {
        let user = store.load();
        if let Some(user) = &user {
            log::info!("restored session for '{}'", user);
        }
        Self {
            user,
            store: Some(store),
        }
    }

    /// Rejects empty fields before anything else runs.
    pub fn precheck(username: &str, password: &str) -> Result<(), LoginError> {
        if username.is_empty() || password.is_empty() {
            return Err(LoginError::MissingCredentials);
        }
        Ok(())
    }

    pub fn login(
        &mut self,
        username: &str,
        password: &str,
        accounts: &LoginConfig,
    ) -> Result<(), LoginError> {
        Self::precheck(username, password)?;
        if username != accounts.username || password != accounts.password {
            log::info!("rejected sign-in for '{}'", username);
            return Err(LoginError::InvalidCredentials);
        }
        log::info!("signed in as '{}'", username);
        self.user = Some(username.to_string());
        if let Some(store) = &self.store
            && let Err(e) = store.save(username)
        {
            log::error!("Failed to remember sign-in: {}", e);
        }
        Ok(())
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            log::info!("signed out '{}'", user);
        }
        if let Some(store) = &self.store
            && let Err(e) = store.clear()
        {
            log::error!("Failed to forget sign-in: {}", e);
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_flow() {
        let accounts = LoginConfig::default();
        let mut session = Session::default();

        assert_eq!(
            session.login("", "password", &accounts),
            Err(LoginError::MissingCredentials)
        );
        assert_eq!(
            session.login("admin", "hunter2", &accounts),
            Err(LoginError::InvalidCredentials)
        );
        assert!(!session.is_logged_in());

        session.login("admin", "password", &accounts).unwrap();
        assert_eq!(session.user(), Some("admin"));

        session.logout();
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_precheck() {
        assert_eq!(Session::precheck("admin", ""), Err(LoginError::MissingCredentials));
        assert_eq!(Session::precheck("a", "b"), Ok(()));
    }

    #[test]
    fn test_sign_in_survives_restart_until_logout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("session");
        let accounts = LoginConfig::default();

        let mut first = Session::restored(SessionStore::new(&path));
        assert!(!first.is_logged_in());
        assert!(first.login("admin", "nope", &accounts).is_err());
        assert!(!path.exists());
        first.login("admin", "password", &accounts).unwrap();

        let mut second = Session::restored(SessionStore::new(&path));
        assert_eq!(second.user(), Some("admin"));

        second.logout();
        assert!(!path.exists());
        assert!(!Session::restored(SessionStore::new(&path)).is_logged_in());
    }

    #[test]
    fn test_store_tolerates_missing_and_blank_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session"));
        assert_eq!(store.load(), None);
        store.clear().unwrap();

        store.save("  \n").unwrap();
        assert_eq!(store.load(), None);
    }
}
