use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("vetrina")
        .about("Marketing site with gated admin and JSON content overrides")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("VETRINA_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("content-path")
                .long("content-path")
                .help("Path to the content overrides JSON document")
                .default_value("data/content.json")
                .env("VETRINA_CONTENT_PATH"),
        )
        .arg(
            Arg::new("session-path")
                .long("session-path")
                .help("Path to the local session marker store")
                .default_value("data/sessions.json")
                .env("VETRINA_SESSION_PATH"),
        )
        .arg(
            Arg::new("identity-url")
                .long("identity-url")
                .help("Base URL of the identity provider, example: https://id.elextrio.example")
                .env("VETRINA_IDENTITY_URL")
                .required(true),
        )
        .arg(
            Arg::new("identity-key")
                .long("identity-key")
                .help("API key sent with every identity provider request")
                .env("VETRINA_IDENTITY_KEY")
                .required(true),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("VETRINA_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}
