/// Default URL of the API.
pub const DEFAULT_API_URL: &str = "https://retdec.com/service/api";

/// Default API key (none).
pub const DEFAULT_API_KEY: &str = "";

/// Returns the default user agent, e.g. `retdec-rust/0.1.0 (linux)`.
#[must_use]
pub fn default_user_agent() -> String {
    format!(
        "retdec-rust/{} ({})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )
}

/// Settings shared by all services.
///
/// Every option has an in-place setter (`set_*`) returning `&mut Self` and a
/// `with_*` variant that returns a modified copy.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    api_url: String,
    api_key: String,
    user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            api_key: DEFAULT_API_KEY.to_owned(),
            user_agent: default_user_agent(),
        }
    }
}

impl Settings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) -> &mut Self {
        self.api_key = api_key.into();
        self
    }

    #[must_use]
    pub fn with_api_key(&self, api_key: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.set_api_key(api_key);
        copy
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn set_api_url(&mut self, api_url: impl Into<String>) -> &mut Self {
        self.api_url = api_url.into();
        self
    }

    #[must_use]
    pub fn with_api_url(&self, api_url: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.set_api_url(api_url);
        copy
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) -> &mut Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn with_user_agent(&self, user_agent: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.set_user_agent(user_agent);
        copy
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
