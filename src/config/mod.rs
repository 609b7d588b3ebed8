//! Configuration module

mod secrets;
mod site;

pub use secrets::{EnvSecrets, SecretStore, StaticSecrets, GITHUB_TOKEN_VAR, WRITER_KEY_VAR};
pub use site::RepositoryConfig;
pub use site::WriterConfig;
