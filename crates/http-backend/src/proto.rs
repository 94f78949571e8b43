use chatbot_backend::{Account, ChatRequest, Credentials, Plan, Registration};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ChatResponseBody {
    pub reply: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TemplateResponseBody {
    #[serde(default)]
    pub template: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TokenResponseBody {
    pub access_token: String,
    #[serde(flatten)]
    pub account: Account,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
struct ErrorResponseBody {
    detail: Option<Value>,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatRequestBody<'a> {
    message: &'a str,
    session_id: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequestBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterRequestBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    plan: Plan,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_chat_request(req: &ChatRequest) -> ChatRequestBody<'_> {
    ChatRequestBody {
        message: &req.message,
        session_id: &req.session_id,
    }
}

#[inline]
pub fn create_login_request(credentials: &Credentials) -> LoginRequestBody<'_> {
    LoginRequestBody {
        email: &credentials.email,
        password: &credentials.password,
    }
}

#[inline]
pub fn create_register_request(
    registration: &Registration,
) -> RegisterRequestBody<'_> {
    RegisterRequestBody {
        name: &registration.name,
        email: &registration.email,
        password: &registration.password,
        plan: registration.plan,
    }
}

/// Extracts a readable reason from an error body.
///
/// The backend sends `{"detail": "..."}` for handled errors and a list of
/// `{"msg": "..."}` objects for validation errors.
pub fn error_detail(body: &[u8]) -> Option<String> {
    let body: ErrorResponseBody = serde_json::from_slice(body).ok()?;
    match body.detail? {
        Value::String(detail) => Some(detail),
        Value::Array(items) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(Value::as_str)
            .map(ToOwned::to_owned),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_chat_request_shape() {
        let req = ChatRequest {
            message: "Halo".to_owned(),
            session_id: "session_1718000000000".to_owned(),
        };
        let value = serde_json::to_value(create_chat_request(&req)).unwrap();
        assert_eq!(
            value,
            json!({ "message": "Halo", "session_id": "session_1718000000000" })
        );
    }

    #[test]
    fn test_register_request_shape() {
        let registration = Registration {
            name: "Budi".to_owned(),
            email: "budi@example.com".to_owned(),
            password: "rahasia".to_owned(),
            plan: Plan::Basic,
        };
        let value =
            serde_json::to_value(create_register_request(&registration)).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Budi",
                "email": "budi@example.com",
                "password": "rahasia",
                "plan": "basic"
            })
        );
    }

    #[test]
    fn test_token_response() {
        let body = json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "user": { "id": "u1", "email": "budi@example.com", "role": "client" },
            "client": { "id": "c1", "name": "Budi", "plan": "pro", "status": "active" },
            "api_key": "key-1"
        });
        let token: TokenResponseBody = serde_json::from_value(body).unwrap();
        assert_eq!(token.access_token, "jwt");
        assert_eq!(token.account.client.plan, Plan::Pro);
        assert_eq!(token.account.api_key, "key-1");
    }

    #[test]
    fn test_template_may_be_missing() {
        let body: TemplateResponseBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.template, None);
        let body: TemplateResponseBody =
            serde_json::from_str(r#"{"template":null}"#).unwrap();
        assert_eq!(body.template, None);
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(
            error_detail(br#"{"detail":"Email already registered"}"#).as_deref(),
            Some("Email already registered")
        );
        assert_eq!(
            error_detail(br#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email address"}]}"#)
                .as_deref(),
            Some("value is not a valid email address")
        );
        assert_eq!(error_detail(b"Internal Server Error"), None);
    }
}
