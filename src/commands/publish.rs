//! Publish a draft through the publish endpoint

use anyhow::Result;
use std::path::Path;

use crate::config::{EnvSecrets, SecretStore, WRITER_KEY_VAR};
use crate::publish::{PublishClient, PublishReceipt};
use crate::Writer;

/// Publish a draft file, using `endpoint` or the configured one
pub async fn run(writer: &Writer, draft: &Path, endpoint: Option<&str>) -> Result<PublishReceipt> {
    let Some(key) = EnvSecrets.writer_key() else {
        anyhow::bail!("{} is not set", WRITER_KEY_VAR);
    };
    let endpoint = endpoint.unwrap_or(&writer.config.endpoint);
    let client = PublishClient::new(endpoint, key);
    publish_with(&client, writer, draft).await
}

/// Publish a draft file with an existing client
pub async fn publish_with(
    client: &PublishClient,
    writer: &Writer,
    draft: &Path,
) -> Result<PublishReceipt> {
    let mut session = writer.open_draft(draft)?;
    let outcome = client
        .publish_session(&mut session, writer.config.today())
        .await;

    if let Some(notice) = session.notice() {
        println!("{}", notice.message);
        if let Some(url) = &notice.url {
            println!("{}", url);
        }
    }

    Ok(outcome?)
}
