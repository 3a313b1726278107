use clap::{CommandFactory, Parser};

#[derive(Debug, Parser)]
#[command(
    name = "wash-registry",
    version,
    about = "WASH Registry Liberia dashboard"
)]
pub struct CliArgs {
    /// Print the WASH summary and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless stats as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Base URL or export directory holding the api/ documents
    #[arg(long, value_name = "URL|DIR")]
    pub data: Option<String>,

    /// Override settings database path
    #[arg(long, value_name = "PATH")]
    pub db: Option<String>,

    /// File or FIFO that receives decoded QR payloads, one per line
    #[arg(long = "scan-feed", value_name = "PATH")]
    pub scan_feed: Option<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(data) = &self.data {
            std::env::set_var("WASH_DATA_URL", data);
        }
        if let Some(db) = &self.db {
            std::env::set_var("DATABASE_NAME", db);
        }
        if let Some(feed) = &self.scan_feed {
            std::env::set_var("WASH_SCAN_FEED", feed);
        }
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}
