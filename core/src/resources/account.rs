use crate::backend::Backend;
use crate::error::Result;
use crate::response::Response;
use crate::types::CreateAccount;

/// Account management (`/account`).
#[derive(Debug, Clone)]
pub struct Account {
    backend: Backend,
    url: String,
}

impl Account {
    pub(crate) fn new(backend: Backend) -> Self {
        let url = backend.resource_url("account");
        Self { backend, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Creates a new account. The service does not require an API key for
    /// this call.
    pub fn create(&self, account: &CreateAccount) -> Result<Response> {
        self.backend.post(&self.url, &account.to_body())
    }

    pub fn details(&self) -> Result<Response> {
        self.backend.get(&self.url, &[])
    }

    /// Puts the account into integration mode.
    pub fn integration(&self) -> Result<Response> {
        self.backend.put(&format!("{}/integration", self.url), None)
    }

    /// Puts the account into live mode. Answers 402 when no billing
    /// information is on file.
    pub fn live(&self) -> Result<Response> {
        self.backend.put(&format!("{}/live", self.url), None)
    }
}
