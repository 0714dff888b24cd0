use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, Command};
use qms_core::{QmsConfig, QmsService};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("qms-server")
        .version(qms_server::VERSION)
        .about("Pharmaceutical QMS intake forms and admin view")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to the TOML configuration file"),
        )
        .arg(
            Arg::new("bind")
                .long("bind")
                .value_parser(value_parser!(SocketAddr))
                .help("Listen address, overrides the configuration"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .get_matches();

    qms_server::telemetry::init(matches.get_flag("log-json"))?;

    let path = matches
        .get_one::<PathBuf>("config")
        .context("--config is required")?;
    let mut config = QmsConfig::load(path)
        .with_context(|| format!("loading configuration from {}", path.display()))?;
    if let Some(bind) = matches.get_one::<SocketAddr>("bind") {
        config.bind = *bind;
    }

    let service = QmsService::from_config(&config).context("building record store")?;
    let written = service
        .ensure_headers()
        .await
        .context("writing table headers")?;
    if !written.is_empty() {
        info!(tables = ?written, "header rows written");
    }

    info!(addr = %config.bind, version = qms_server::VERSION, "serving QMS");
    warp::serve(qms_server::routes(Arc::new(service)))
        .run(config.bind)
        .await;
    Ok(())
}
