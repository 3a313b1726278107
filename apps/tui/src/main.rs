use clap::Parser;
use color_eyre::Result;
use tracing::{info, warn};
use wash_registry::DocumentKind;
use wash_registry_tui::app::App;
use wash_registry_tui::cli::CliArgs;
use wash_registry_tui::config::AppConfig;
use wash_registry_tui::{event, logging, terminal};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = AppConfig::load()?;

    // Piped output gets the summary instead of the dashboard
    if args.headless || args.json || !is_terminal() {
        logging::init_stderr(args.debug)?;
        return event::run_headless(&config, args.json).await;
    }

    logging::init_file(&config.log_file, args.debug)?;
    info!(source = %config.data_source, "starting dashboard");

    let mut app = App::new(&config);
    if let Err(e) = app.initialize_db().await {
        warn!(error = %e, "settings database unavailable, filters will not persist");
    }
    app.start_load(&DocumentKind::ALL);

    let mut terminal = terminal::setup()?;
    let result = event::run(&mut terminal, &mut app).await;
    terminal::cleanup(true, true);

    result
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
