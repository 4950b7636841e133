use std::process::exit;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, LogLevel};
use env_logger::Target;
use firefly_core::{
    kubernetes::{operations::create_client, KubeClusterApi},
    reconciler::context::ReconcilerContext,
    templates::TemplateSet,
    watcher::run_watch,
};
use kube::Client;
use log::{error, info, LevelFilter};
use tokio_util::sync::CancellationToken;

mod cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    configure_logger(&cli);

    let templates = load_templates(&cli);
    let client = get_client(&cli).await;

    let context = ReconcilerContext {
        config: cli.get_config(),
        templates,
        cluster: KubeClusterApi::new(client),
    };

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    if let Err(error) = run_watch(&context, shutdown).await {
        error!("{error}");
        exit(error.exit_code())
    }
}

fn load_templates(cli: &Cli) -> TemplateSet {
    match TemplateSet::load(&cli.get_template_paths()) {
        Ok(templates) => templates,
        Err(error) => {
            error!("Couldn't load manifest templates! {error}");
            exit(5)
        }
    }
}

async fn get_client(cli: &Cli) -> Client {
    match create_client(&cli.kube_config, &cli.kube_context)
        .await
        .context("Couldn't initialize k8s API client!")
    {
        Ok(client) => client,
        Err(error) => {
            error!("{error:?}");
            exit(6)
        }
    }
}

async fn cancel_on_signal(shutdown: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("Received shutdown signal, stopping...");
            shutdown.cancel();
        }
        Err(error) => error!("Couldn't listen for shutdown signal! {error}"),
    }
}

fn configure_logger(cli: &Cli) {
    let log_level = cli.get_log_level();
    let mut logger = env_logger::builder();

    logger
        .format_timestamp(None)
        .format_module_path(matches!(log_level, LogLevel::Trace))
        .target(Target::Stderr);

    match log_level {
        LogLevel::Normal => logger.filter(Some("firefly"), LevelFilter::Info),
        LogLevel::Verbose => logger.filter(Some("firefly"), LevelFilter::Debug),
        LogLevel::Trace => logger.filter(None, LevelFilter::Debug),
    };

    logger.parse_default_env().init();
}
