//! A scripted in-memory backend for testing.

mod preset;

use std::collections::{HashMap, VecDeque};
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chatbot_backend::{
    Account, AuthBackend, AuthGrant, BackendError, ChatBackend, ChatReply,
    ChatRequest, Client, Credentials, ErrorKind, Registration, User,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
    detail: Option<&'static str>,
}

impl Error {
    fn new(message: &'static str, kind: ErrorKind) -> Self {
        Self {
            message,
            kind,
            detail: None,
        }
    }

    fn with_detail(mut self, detail: &'static str) -> Self {
        self.detail = Some(detail);
        self
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl BackendError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    fn detail(&self) -> Option<&str> {
        self.detail
    }
}

#[derive(Default)]
struct Script {
    replies: VecDeque<PresetReply>,
    template: Option<String>,
    template_fails: bool,
    delay: Option<Duration>,
    requests: Vec<ChatRequest>,
    template_fetches: usize,
    accounts: HashMap<String, (String, Account)>,
    tokens: HashMap<String, String>,
    next_token: u64,
}

/// A local fake backend for testing purpose.
///
/// Chat replies are taken from a queue filled with
/// [`TestBackend::push_reply`], one per request. When the queue is empty
/// the request fails. Every request is recorded and can be inspected with
/// [`TestBackend::requests`].
///
/// Clones share the same script.
#[derive(Clone, Default)]
pub struct TestBackend {
    script: Arc<Mutex<Script>>,
}

impl Debug for TestBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestBackend").finish_non_exhaustive()
    }
}

impl TestBackend {
    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues the answer for the next unanswered chat request.
    #[inline]
    pub fn push_reply(&self, preset: PresetReply) {
        self.script().replies.push_back(preset);
    }

    /// Sets the greeting returned by the template endpoint.
    #[inline]
    pub fn set_template<S: Into<String>>(&self, template: Option<S>) {
        self.script().template = template.map(Into::into);
    }

    /// Makes the template endpoint fail.
    #[inline]
    pub fn fail_template(&self) {
        self.script().template_fails = true;
    }

    /// Delays every answer by `duration`.
    #[inline]
    pub fn set_delay(&self, duration: Duration) {
        self.script().delay = Some(duration);
    }

    /// Returns the chat requests received so far.
    #[inline]
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.script().requests.clone()
    }

    /// Returns how many times the template was fetched.
    #[inline]
    pub fn template_fetches(&self) -> usize {
        self.script().template_fetches
    }

    /// Registers an account that can log in with `password`.
    pub fn add_account(&self, password: &str, account: Account) {
        self.script().accounts.insert(
            account.user.email.clone(),
            (password.to_owned(), account),
        );
    }

    /// Issues a token for an existing account, as an OAuth login would.
    pub fn issue_token(&self, email: &str) -> Option<String> {
        let mut script = self.script();
        script.accounts.contains_key(email).then(|| script.issue_token(email))
    }

    fn delay(&self) -> Option<Duration> {
        self.script().delay
    }
}

impl Script {
    fn issue_token(&mut self, email: &str) -> String {
        self.next_token += 1;
        let token = format!("token-{}", self.next_token);
        self.tokens.insert(token.clone(), email.to_owned());
        token
    }
}

async fn delayed<T>(delay: Option<Duration>, result: T) -> T {
    if let Some(delay) = delay {
        sleep(delay).await;
    }
    result
}

impl ChatBackend for TestBackend {
    type Error = crate::Error;

    fn send_message(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, Self::Error>> + Send + 'static
    {
        let delay = self.delay();
        let preset = {
            let mut script = self.script();
            script.requests.push(req.clone());
            script.replies.pop_front()
        };
        async move {
            let result = match preset {
                Some(PresetReply::Reply(reply)) => Ok(ChatReply { reply }),
                Some(PresetReply::Status(code)) => Err(Error::new(
                    "scripted status",
                    ErrorKind::Status(code),
                )),
                Some(PresetReply::Transport) => {
                    Err(Error::new("scripted transport error", ErrorKind::Transport))
                }
                Some(PresetReply::Hang) => {
                    return std::future::pending::<Result<ChatReply, Error>>().await;
                }
                None => Err(Error::new("no scripted reply left", ErrorKind::Other)),
            };
            delayed(delay, result).await
        }
    }

    fn fetch_template(
        &self,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'static
    {
        let delay = self.delay();
        let result = {
            let mut script = self.script();
            script.template_fetches += 1;
            if script.template_fails {
                Err(Error::new("scripted template failure", ErrorKind::Status(500)))
            } else {
                Ok(script.template.clone())
            }
        };
        delayed(delay, result)
    }
}

impl AuthBackend for TestBackend {
    type Error = crate::Error;

    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<AuthGrant, Self::Error>> + Send + 'static
    {
        let delay = self.delay();
        let result = {
            let mut script = self.script();
            let account = match script.accounts.get(&credentials.email) {
                Some((password, account)) if *password == credentials.password => {
                    Some(account.clone())
                }
                _ => None,
            };
            match account {
                Some(account) => Ok(AuthGrant {
                    access_token: script.issue_token(&credentials.email),
                    account,
                }),
                None => Err(Error::new("bad credentials", ErrorKind::Unauthorized)
                    .with_detail("Invalid email or password")),
            }
        };
        delayed(delay, result)
    }

    fn register(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = Result<AuthGrant, Self::Error>> + Send + 'static
    {
        let delay = self.delay();
        let result = {
            let mut script = self.script();
            if script.accounts.contains_key(&registration.email) {
                Err(Error::new("duplicate email", ErrorKind::Status(400))
                    .with_detail("Email already registered"))
            } else {
                let n = script.accounts.len() + 1;
                let account = Account {
                    user: User {
                        id: format!("user-{n}"),
                        email: registration.email.clone(),
                        role: "client".to_owned(),
                    },
                    client: Client {
                        id: format!("client-{n}"),
                        name: registration.name.clone(),
                        plan: registration.plan,
                        status: "active".to_owned(),
                    },
                    api_key: format!("key-{n}"),
                };
                script.accounts.insert(
                    registration.email.clone(),
                    (registration.password.clone(), account.clone()),
                );
                Ok(AuthGrant {
                    access_token: script.issue_token(&registration.email),
                    account,
                })
            }
        };
        delayed(delay, result)
    }

    fn fetch_account(
        &self,
        access_token: &str,
    ) -> impl Future<Output = Result<Account, Self::Error>> + Send + 'static
    {
        let delay = self.delay();
        let result = {
            let script = self.script();
            script
                .tokens
                .get(access_token)
                .and_then(|email| script.accounts.get(email))
                .map(|(_, account)| account.clone())
                .ok_or_else(|| {
                    Error::new("unknown token", ErrorKind::Unauthorized)
                        .with_detail("Could not validate credentials")
                })
        };
        delayed(delay, result)
    }
}
