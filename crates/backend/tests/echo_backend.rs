use std::collections::HashMap;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::future::ready;
use std::sync::Mutex;
use std::time::Duration;

use chatbot_backend::{
    Account, AuthBackend, AuthGrant, BackendError, ChatBackend, ChatReply,
    ChatRequest, Client, Credentials, ErrorKind, Plan, Registration, User,
};

#[derive(Debug)]
struct EchoError(ErrorKind, Option<&'static str>);

impl Display for EchoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for EchoError {}

impl BackendError for EchoError {
    fn kind(&self) -> ErrorKind {
        self.0
    }

    fn detail(&self) -> Option<&str> {
        self.1
    }
}

/// Replies with whatever it was told, after a short delay.
struct EchoBackend;

impl ChatBackend for EchoBackend {
    type Error = EchoError;

    fn send_message(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, Self::Error>> + Send + 'static
    {
        let message = req.message.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(1)).await;
            if message.is_empty() {
                return Err(EchoError(ErrorKind::Status(422), None));
            }
            Ok(ChatReply {
                reply: format!("You said {message}"),
            })
        }
    }

    fn fetch_template(
        &self,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'static
    {
        ready(Ok(None))
    }
}

/// Keeps accounts in memory, keyed by email.
#[derive(Default)]
struct InMemoryAuth {
    passwords: Mutex<HashMap<String, String>>,
}

fn account_for(email: &str, plan: Plan) -> Account {
    Account {
        user: User {
            id: format!("user:{email}"),
            email: email.to_owned(),
            role: "client".to_owned(),
        },
        client: Client {
            id: format!("client:{email}"),
            name: "Echo".to_owned(),
            plan,
            status: "active".to_owned(),
        },
        api_key: format!("key:{email}"),
    }
}

impl AuthBackend for InMemoryAuth {
    type Error = EchoError;

    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<AuthGrant, Self::Error>> + Send + 'static
    {
        let passwords = self.passwords.lock().unwrap();
        let result = match passwords.get(&credentials.email) {
            Some(password) if *password == credentials.password => Ok(AuthGrant {
                access_token: format!("token:{}", credentials.email),
                account: account_for(&credentials.email, Plan::Free),
            }),
            _ => Err(EchoError(
                ErrorKind::Unauthorized,
                Some("Invalid email or password"),
            )),
        };
        ready(result)
    }

    fn register(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = Result<AuthGrant, Self::Error>> + Send + 'static
    {
        let mut passwords = self.passwords.lock().unwrap();
        let result = if passwords.contains_key(&registration.email) {
            Err(EchoError(ErrorKind::Status(400), Some("Email already registered")))
        } else {
            passwords.insert(
                registration.email.clone(),
                registration.password.clone(),
            );
            Ok(AuthGrant {
                access_token: format!("token:{}", registration.email),
                account: account_for(&registration.email, registration.plan),
            })
        };
        ready(result)
    }

    fn fetch_account(
        &self,
        access_token: &str,
    ) -> impl Future<Output = Result<Account, Self::Error>> + Send + 'static
    {
        let result = match access_token.strip_prefix("token:") {
            Some(email) => Ok(account_for(email, Plan::Free)),
            None => Err(EchoError(ErrorKind::Unauthorized, None)),
        };
        ready(result)
    }
}

#[tokio::test]
async fn test_chat_round_trip() {
    let backend = EchoBackend;
    let req = ChatRequest {
        message: "Halo".to_owned(),
        session_id: "session_1".to_owned(),
    };
    let reply = backend.send_message(&req).await.unwrap();
    assert_eq!(reply.reply, "You said Halo");
    assert_eq!(backend.fetch_template().await.unwrap(), None);
}

#[tokio::test]
async fn test_chat_error_kind() {
    let backend = EchoBackend;
    let req = ChatRequest {
        message: String::new(),
        session_id: "session_1".to_owned(),
    };
    let err = backend.send_message(&req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Status(422));
    assert_eq!(err.detail(), None);
}

#[tokio::test]
async fn test_auth_flow() {
    let auth = InMemoryAuth::default();
    let grant = auth
        .register(&Registration {
            name: "Budi".to_owned(),
            email: "budi@example.com".to_owned(),
            password: "rahasia".to_owned(),
            plan: Plan::Pro,
        })
        .await
        .unwrap();
    assert_eq!(grant.account.client.plan, Plan::Pro);

    let err = auth
        .login(&Credentials::new("budi@example.com", "salah"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(err.detail(), Some("Invalid email or password"));

    let grant = auth
        .login(&Credentials::new("budi@example.com", "rahasia"))
        .await
        .unwrap();
    let account = auth.fetch_account(&grant.access_token).await.unwrap();
    assert_eq!(account.user.email, "budi@example.com");
}
