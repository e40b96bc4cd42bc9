use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::Result;
use secrecy::SecretString;
use std::path::PathBuf;

pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let identity_url = matches
        .get_one::<String>("identity-url")
        .map(ToString::to_string)
        .ok_or_else(|| anyhow::anyhow!("missing required argument: --identity-url"))?;

    let identity_key = matches
        .get_one::<String>("identity-key")
        .map(|key| SecretString::from(key.to_string()))
        .ok_or_else(|| anyhow::anyhow!("missing required argument: --identity-key"))?;

    let action = Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        content_path: matches
            .get_one::<String>("content-path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data/content.json")),
        session_path: matches
            .get_one::<String>("session-path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data/sessions.json")),
    };

    Ok((action, GlobalArgs::new(identity_url, identity_key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    #[test]
    fn test_handler_builds_action_and_globals() -> Result<()> {
        let matches = commands::new().get_matches_from(vec![
            "vetrina",
            "--identity-url",
            "https://id.elextrio.example",
            "--identity-key",
            "anon-key",
            "--port",
            "9000",
        ]);

        let (action, globals) = handler(&matches)?;
        let Action::Server {
            port,
            content_path,
            session_path,
        } = action;
        assert_eq!(port, 9000);
        assert_eq!(content_path, PathBuf::from("data/content.json"));
        assert_eq!(session_path, PathBuf::from("data/sessions.json"));
        assert_eq!(globals.identity_url, "https://id.elextrio.example");
        assert_eq!(globals.identity_key.expose_secret(), "anon-key");
        Ok(())
    }
}
