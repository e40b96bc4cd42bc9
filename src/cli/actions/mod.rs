pub mod server;

use std::path::PathBuf;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        content_path: PathBuf,
        session_path: PathBuf,
    },
}
