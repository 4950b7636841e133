use kube::{
    config::{KubeConfigOptions, Kubeconfig},
    Client, Config,
};
use log::{info, warn};

use crate::{error::ReconcilerError, resources::ClusterResource};

use super::ClusterApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Created,
    Updated,
    /// Both create and update failed, but the resource kind tolerates it.
    Tolerated,
}

/// Builds a client from an explicit kubeconfig and/or context, falling back to
/// the in-cluster or default configuration when neither is given.
pub async fn create_client(
    config_path: &Option<String>,
    context_name: &Option<String>,
) -> anyhow::Result<Client> {
    let config_options = KubeConfigOptions {
        context: context_name.to_owned(),
        ..Default::default()
    };

    let config = match (config_path, context_name) {
        (Some(path), _) => {
            let kubeconfig = Kubeconfig::read_from(path)?;
            Config::from_custom_kubeconfig(kubeconfig, &config_options).await?
        }
        (None, Some(_)) => Config::from_kubeconfig(&config_options).await?,
        (None, None) => Config::infer().await?,
    };

    let client = Client::try_from(config)?;

    Ok(client)
}

/// Creates `resource`, falling back to an unconditional update when the
/// create is rejected. There is no retry, diffing or conflict resolution: the
/// last writer wins.
pub async fn apply_resource<C: ClusterApi>(
    cluster: &C,
    namespace: Option<&str>,
    resource: &ClusterResource,
) -> Result<ApplyOutcome, ReconcilerError> {
    let kind = resource.kind();
    let name = resource
        .name()
        .ok_or(ReconcilerError::MissingObjectMetadata)?;

    info!(
        "Creating '{name}' {kind} in '{}' namespace...",
        namespace.unwrap_or("---")
    );

    let create = match cluster.create(namespace, resource).await {
        Ok(()) => return Ok(ApplyOutcome::Created),
        Err(error) => error,
    };

    warn!("Couldn't create '{name}' {kind}, updating instead! Reason: {create}");

    let update = match cluster.replace(namespace, resource).await {
        Ok(()) => return Ok(ApplyOutcome::Updated),
        Err(error) => error,
    };

    if kind.tolerates_update_failure() {
        warn!("Couldn't update '{name}' {kind}, assuming it already exists! Reason: {update}");
        return Ok(ApplyOutcome::Tolerated);
    }

    Err(ReconcilerError::ApplyError {
        kind,
        name: name.to_owned(),
        create,
        update,
    })
}

#[cfg(test)]
mod tests {
    use k8s_openapi::api::{
        apps::v1::Deployment,
        core::v1::{Namespace, Service},
        networking::v1::Ingress,
    };
    use kube::core::ObjectMeta;

    use crate::{
        error::ReconcilerError,
        kubernetes::fake::{FakeCluster, Operation},
        resources::{ClusterResource, ResourceKind},
    };

    use super::{apply_resource, ApplyOutcome};

    fn meta(name: &str) -> ObjectMeta {
        ObjectMeta {
            name: Some(name.to_owned()),
            ..Default::default()
        }
    }

    fn resource_of(kind: ResourceKind, name: &str) -> ClusterResource {
        match kind {
            ResourceKind::Namespace => Namespace {
                metadata: meta(name),
                ..Default::default()
            }
            .into(),
            ResourceKind::Deployment => Deployment {
                metadata: meta(name),
                ..Default::default()
            }
            .into(),
            ResourceKind::Service => Service {
                metadata: meta(name),
                ..Default::default()
            }
            .into(),
            ResourceKind::Ingress => Ingress {
                metadata: meta(name),
                ..Default::default()
            }
            .into(),
        }
    }

    #[tokio::test]
    async fn apply_creates_then_updates() {
        let cluster = FakeCluster::default();
        let deployment = resource_of(ResourceKind::Deployment, "firefly1");

        let first = apply_resource(&cluster, Some("firefly1"), &deployment).await.unwrap();
        let second = apply_resource(&cluster, Some("firefly1"), &deployment).await.unwrap();

        assert_eq!(first, ApplyOutcome::Created);
        assert_eq!(second, ApplyOutcome::Updated);
        assert_eq!(
            cluster.operations(),
            vec![
                (Operation::Create, ResourceKind::Deployment, "firefly1".to_owned()),
                (Operation::Create, ResourceKind::Deployment, "firefly1".to_owned()),
                (Operation::Replace, ResourceKind::Deployment, "firefly1".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn applying_twice_converges_to_applying_once() {
        for kind in [ResourceKind::Namespace, ResourceKind::Deployment, ResourceKind::Ingress] {
            let once = FakeCluster::default();
            let twice = FakeCluster::default();
            let resource = resource_of(kind, "firefly2");
            let namespace = match kind {
                ResourceKind::Namespace => None,
                _ => Some("firefly2"),
            };

            apply_resource(&once, namespace, &resource).await.unwrap();
            apply_resource(&twice, namespace, &resource).await.unwrap();
            apply_resource(&twice, namespace, &resource).await.unwrap();

            assert_eq!(once.objects(), twice.objects());
        }
    }

    #[tokio::test]
    async fn apply_fails_when_create_and_update_fail() {
        for kind in [ResourceKind::Namespace, ResourceKind::Deployment, ResourceKind::Ingress] {
            let cluster = FakeCluster::default().rejecting(kind);
            let resource = resource_of(kind, "firefly3");

            let result = apply_resource(&cluster, Some("firefly3"), &resource).await;

            assert!(matches!(
                result,
                Err(ReconcilerError::ApplyError { kind: failed, .. }) if failed == kind
            ));
            assert_eq!(cluster.operations().len(), 2);
        }
    }

    #[tokio::test]
    async fn apply_tolerates_service_update_failure() {
        let cluster = FakeCluster::default().rejecting(ResourceKind::Service);
        let service = resource_of(ResourceKind::Service, "firefly3");

        let result = apply_resource(&cluster, Some("firefly3"), &service).await.unwrap();

        assert_eq!(result, ApplyOutcome::Tolerated);
        assert_eq!(
            cluster.operations(),
            vec![
                (Operation::Create, ResourceKind::Service, "firefly3".to_owned()),
                (Operation::Replace, ResourceKind::Service, "firefly3".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn apply_requires_a_name() {
        let cluster = FakeCluster::default();
        let nameless = ClusterResource::Namespace(Namespace::default());

        let result = apply_resource(&cluster, None, &nameless).await;

        assert!(matches!(result, Err(ReconcilerError::MissingObjectMetadata)));
        assert!(cluster.operations().is_empty());
    }
}
