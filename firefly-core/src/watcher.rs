//! Ingress watch loop
//!
//! Opens the ingress subscription, deploys the scaffold once, then drains the
//! event stream one event at a time. Reconciliation runs inline, so events
//! are handled strictly in the order the API server delivers them and never
//! concurrently.

use futures::StreamExt;
use k8s_openapi::api::networking::v1::Ingress;
use kube::{api::WatchEvent, Resource};
use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::{
    error::ReconcilerError,
    kubernetes::{ClusterApi, IngressEventStream},
    reconciler::{context::ReconcilerContext, ingress::reconcile_ingress, scaffold::build_scaffold},
    resources::labels::is_opted_in,
};

const INITIAL_RESOURCE_VERSION: &str = "0";
const GONE_STATUS_CODE: u16 = 410;

/// Runs until `shutdown` is cancelled. Returns only fatal errors; transient
/// stream errors are logged and the watch carries on.
pub async fn run_watch<C: ClusterApi>(
    context: &ReconcilerContext<C>,
    shutdown: CancellationToken,
) -> Result<(), ReconcilerError> {
    let mut resource_version = INITIAL_RESOURCE_VERSION.to_owned();
    let mut events = open_subscription(context, &resource_version).await?;

    build_scaffold(context).await?;

    info!(
        "Watching ingresses in '{}' namespace...",
        context.config.namespace
    );

    loop {
        let event = tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Ingress watch stopped!");
                return Ok(());
            }
            event = events.next() => event,
        };

        match event {
            Some(Ok(event)) => {
                if let Some(version) = next_resource_version(&event) {
                    resource_version = version;
                }

                dispatch_event(context, &event).await?;
            }
            Some(Err(error)) => warn!("Ingress watch stream failed! {error}"),
            None => {
                debug!("Ingress watch ended, resuming from version {resource_version}...");
                events = open_subscription(context, &resource_version).await?;
            }
        }
    }
}

async fn open_subscription<C: ClusterApi>(
    context: &ReconcilerContext<C>,
    resource_version: &str,
) -> Result<IngressEventStream, ReconcilerError> {
    let namespace = &context.config.namespace;

    context
        .cluster
        .watch_ingresses(namespace, resource_version)
        .await
        .map_err(|error| ReconcilerError::SubscriptionOpenError {
            namespace: namespace.to_owned(),
            error,
        })
}

fn next_resource_version(event: &WatchEvent<Ingress>) -> Option<String> {
    match event {
        WatchEvent::Added(object) | WatchEvent::Modified(object) | WatchEvent::Deleted(object) => {
            object.meta().resource_version.clone()
        }
        WatchEvent::Bookmark(bookmark) => Some(bookmark.metadata.resource_version.clone()),
        WatchEvent::Error(response) if response.code == GONE_STATUS_CODE => {
            Some(INITIAL_RESOURCE_VERSION.to_owned())
        }
        WatchEvent::Error(_) => None,
    }
}

/// Reconciles a single event. Objects without the opt-in label are ignored.
pub async fn dispatch_event<C: ClusterApi>(
    context: &ReconcilerContext<C>,
    event: &WatchEvent<Ingress>,
) -> Result<(), ReconcilerError> {
    let (event_type, ingress) = match event {
        WatchEvent::Added(ingress) => ("Added", ingress),
        WatchEvent::Modified(ingress) => ("Modified", ingress),
        WatchEvent::Deleted(ingress) => ("Deleted", ingress),
        WatchEvent::Bookmark(_) => return Ok(()),
        WatchEvent::Error(response) => {
            warn!("Ingress watch reported an error! {response:?}");
            return Ok(());
        }
    };

    let name = ingress.meta().name.as_deref().unwrap_or("---");

    debug!("{event_type} ingress '{name}'");

    if !is_opted_in(ingress, &context.config.opt_in_label) {
        return Ok(());
    }

    info!("Found an opt-in ingress '{name}' to register.");

    match event {
        WatchEvent::Deleted(_) => {
            warn!("Cleanup of deleted ingress '{name}' is not implemented, its resources stay in place!");
            Ok(())
        }
        _ => reconcile_ingress(context, ingress).await,
    }
}
