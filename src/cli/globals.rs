use secrecy::SecretString;

/// Connection details for the external identity provider. The API key is
/// kept secret; `Debug` redacts it.
#[derive(Clone)]
pub struct GlobalArgs {
    pub identity_url: String,
    pub identity_key: SecretString,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(identity_url: String, identity_key: SecretString) -> Self {
        Self {
            identity_url,
            identity_key,
        }
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("identity_url", &self.identity_url)
            .field("identity_key", &"***")
            .finish()
    }
}
