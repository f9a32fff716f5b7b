// Account service
// Known calendar accounts and the one currently signed in. Owned by the
// application and passed to the controllers; mutated on the main thread only.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::events::{ThreadedEvent, ThreadedSender};
use crate::models::user::User;
use crate::services::calendar_sync::CalendarProvider;

pub struct AccountManager {
    provider: Arc<dyn CalendarProvider>,
    accounts: Vec<User>,
    current: Option<User>,
}

impl std::fmt::Debug for AccountManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountManager")
            .field("accounts", &self.accounts)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl AccountManager {
    pub fn new(provider: Arc<dyn CalendarProvider>) -> Self {
        Self {
            provider,
            accounts: Vec::new(),
            current: None,
        }
    }

    pub fn provider(&self) -> Arc<dyn CalendarProvider> {
        Arc::clone(&self.provider)
    }

    pub fn current(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn accounts(&self) -> &[User] {
        &self.accounts
    }

    /// Authenticate on a worker thread; success comes back as
    /// `UserSignIn`, failure is only logged. Concurrent sign-ins race and the
    /// last one to report wins.
    pub fn sign_in_in_background(&self, email: Option<String>, sender: ThreadedSender) -> JoinHandle<()> {
        let provider = Arc::clone(&self.provider);
        thread::spawn(move || match provider.authenticate(email) {
            Ok(user) => {
                log::info!("Signed in as {}", user.email);
                sender.enqueue_threaded_event(ThreadedEvent::UserSignIn(user));
            }
            Err(err) => log::error!("Sign-in failed: {:#}", err),
        })
    }

    /// Record a completed sign-in and make it the current account.
    pub fn on_user_signed_in(&mut self, user: User) {
        match self.accounts.iter_mut().find(|known| known.email == user.email) {
            Some(known) => *known = user.clone(),
            None => self.accounts.push(user.clone()),
        }
        self.current = Some(user);
    }

    /// Forget the current account. Known accounts stay listed.
    pub fn sign_out(&mut self) {
        if let Some(user) = self.current.take() {
            log::info!("Signed out {}", user.email);
        }
    }

    pub fn sign_out_all(&mut self) {
        log::info!("Signing out {} account(s)", self.accounts.len());
        self.current = None;
        self.accounts.clear();
    }

    /// Known accounts other than the current one, for the account switcher.
    pub fn other_accounts(&self) -> impl Iterator<Item = &User> {
        let current = self.current.as_ref().map(|user| user.email.as_str());
        self.accounts
            .iter()
            .filter(move |user| Some(user.email.as_str()) != current)
    }
}
