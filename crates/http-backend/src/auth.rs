use chatbot_backend::{Account, AuthBackend, AuthGrant, Credentials, Registration};

use crate::{Error, HttpBackend, proto, read_json};

impl AuthBackend for HttpBackend {
    type Error = Error;

    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<AuthGrant, Self::Error>> + Send + 'static
    {
        let resp_fut = self
            .request(self.client.post(self.config.endpoint("/auth/login")))
            .json(&proto::create_login_request(credentials))
            .send();
        async move { read_grant(resp_fut.await).await }
    }

    fn register(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = Result<AuthGrant, Self::Error>> + Send + 'static
    {
        let resp_fut = self
            .request(self.client.post(self.config.endpoint("/auth/register")))
            .json(&proto::create_register_request(registration))
            .send();
        async move { read_grant(resp_fut.await).await }
    }

    fn fetch_account(
        &self,
        access_token: &str,
    ) -> impl Future<Output = Result<Account, Self::Error>> + Send + 'static
    {
        let resp_fut = self
            .request(self.client.get(self.config.endpoint("/auth/me")))
            .bearer_auth(access_token)
            .send();
        async move {
            let resp = resp_fut.await.map_err(Error::from_reqwest)?;
            read_json::<Account>(resp).await
        }
    }
}

async fn read_grant(
    resp: Result<reqwest::Response, reqwest::Error>,
) -> Result<AuthGrant, Error> {
    let resp = resp.map_err(Error::from_reqwest)?;
    let body: proto::TokenResponseBody = read_json(resp).await?;
    Ok(AuthGrant {
        access_token: body.access_token,
        account: body.account,
    })
}
