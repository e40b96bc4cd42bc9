use crate::{
    api,
    auth::{gateway::IdentityClient, token::SessionTokenStore},
    cli::{actions::Action, globals::GlobalArgs},
    content::store::ContentStore,
};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Handle the server action
pub async fn handle(action: Action, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Server {
            port,
            content_path,
            session_path,
        } => {
            let gateway = Arc::new(
                IdentityClient::new(&globals.identity_url, globals.identity_key.clone())
                    .context("Failed to build identity provider client")?,
            );
            let tokens = SessionTokenStore::new(session_path);
            let content = ContentStore::new(content_path);

            api::serve(port, gateway, tokens, content).await?;
        }
    }

    Ok(())
}
