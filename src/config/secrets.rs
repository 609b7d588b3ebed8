//! Server-side secrets
//!
//! Secrets never live in `writer.yml`. They are looked up on every request so a
//! restart is the only thing needed to rotate them.

/// Environment variable holding the GitHub token
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Environment variable holding the shared writer key
pub const WRITER_KEY_VAR: &str = "WRITER_KEY";

/// Source of the two publish secrets
pub trait SecretStore: Send + Sync {
    /// Credential for the remote repository host
    fn github_token(&self) -> Option<String>;

    /// Shared secret callers must present in `x-writer-key`
    fn writer_key(&self) -> Option<String>;
}

/// Reads secrets from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecrets;

impl SecretStore for EnvSecrets {
    fn github_token(&self) -> Option<String> {
        non_empty(std::env::var(GITHUB_TOKEN_VAR).ok())
    }

    fn writer_key(&self) -> Option<String> {
        non_empty(std::env::var(WRITER_KEY_VAR).ok())
    }
}

/// Fixed secrets, mostly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct StaticSecrets {
    pub github_token: Option<String>,
    pub writer_key: Option<String>,
}

impl StaticSecrets {
    pub fn new(github_token: impl Into<String>, writer_key: impl Into<String>) -> Self {
        Self {
            github_token: Some(github_token.into()),
            writer_key: Some(writer_key.into()),
        }
    }
}

impl SecretStore for StaticSecrets {
    fn github_token(&self) -> Option<String> {
        non_empty(self.github_token.clone())
    }

    fn writer_key(&self) -> Option<String> {
        non_empty(self.writer_key.clone())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
