//! moebench: multi-objective optimizer experiments.

use moebench_cli::ui;
use moebench_lib::{app, config, errors};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let config = config::AppConfig::parse();
    let code = match app::run(&config) {
        Ok(code) => code,
        Err(err) => {
            ui::print_error(&format!("{err:#}"));
            errors::handle_error(&err)
        }
    };
    std::process::exit(code);
}
