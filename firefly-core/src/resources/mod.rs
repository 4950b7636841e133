use std::fmt::Display;

use k8s_openapi::api::{
    apps::v1::Deployment,
    core::v1::{Namespace, Service},
    networking::v1::Ingress,
};
use kube::Resource;

pub mod labels;
pub mod meta;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    Namespace,
    Deployment,
    Service,
    Ingress,
}

impl ResourceKind {
    /// Services can't be updated without the cluster-assigned IP the
    /// templates leave blank, so a failed Service apply is only logged.
    pub fn tolerates_update_failure(&self) -> bool {
        matches!(self, ResourceKind::Service)
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ResourceKind::Namespace => "Namespace",
            ResourceKind::Deployment => "Deployment",
            ResourceKind::Service => "Service",
            ResourceKind::Ingress => "Ingress",
        })
    }
}

/// A rendered object ready to be applied to the cluster.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterResource {
    Namespace(Namespace),
    Deployment(Deployment),
    Service(Service),
    Ingress(Ingress),
}

impl ClusterResource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ClusterResource::Namespace(_) => ResourceKind::Namespace,
            ClusterResource::Deployment(_) => ResourceKind::Deployment,
            ClusterResource::Service(_) => ResourceKind::Service,
            ClusterResource::Ingress(_) => ResourceKind::Ingress,
        }
    }

    pub fn name(&self) -> Option<&str> {
        let meta = match self {
            ClusterResource::Namespace(object) => object.meta(),
            ClusterResource::Deployment(object) => object.meta(),
            ClusterResource::Service(object) => object.meta(),
            ClusterResource::Ingress(object) => object.meta(),
        };

        meta.name.as_deref()
    }
}

impl From<Namespace> for ClusterResource {
    fn from(value: Namespace) -> Self {
        ClusterResource::Namespace(value)
    }
}

impl From<Deployment> for ClusterResource {
    fn from(value: Deployment) -> Self {
        ClusterResource::Deployment(value)
    }
}

impl From<Service> for ClusterResource {
    fn from(value: Service) -> Self {
        ClusterResource::Service(value)
    }
}

impl From<Ingress> for ClusterResource {
    fn from(value: Ingress) -> Self {
        ClusterResource::Ingress(value)
    }
}
