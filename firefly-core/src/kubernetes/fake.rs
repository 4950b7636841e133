use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    sync::Mutex,
};

use futures::{stream, StreamExt};
use k8s_openapi::api::networking::v1::Ingress;
use kube::{api::WatchEvent, error::ErrorResponse};
use tokio_util::sync::CancellationToken;

use crate::resources::{ClusterResource, ResourceKind};

use super::{ClusterApi, IngressEventStream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Replace,
}

type ObjectKey = (ResourceKind, Option<String>, String);

/// In-memory cluster recording every call made against it.
#[derive(Default)]
pub struct FakeCluster {
    rejected: BTreeSet<ResourceKind>,
    objects: Mutex<BTreeMap<ObjectKey, ClusterResource>>,
    operations: Mutex<Vec<(Operation, ResourceKind, String)>>,
    namespaces: Mutex<Vec<Option<String>>>,
    watches: Mutex<Vec<(String, String)>>,
    event_batches: Mutex<VecDeque<Vec<Result<WatchEvent<Ingress>, kube::Error>>>>,
    fail_watch: bool,
    drained: CancellationToken,
}

impl FakeCluster {
    /// Every create and replace of `kind` fails.
    pub fn rejecting(mut self, kind: ResourceKind) -> Self {
        self.rejected.insert(kind);
        self
    }

    pub fn failing_watch(mut self) -> Self {
        self.fail_watch = true;
        self
    }

    /// Queues the events served by the next watch. Once every batch has been
    /// served, further watches stay pending and cancel [`Self::drained`].
    pub fn with_events(self, events: Vec<Result<WatchEvent<Ingress>, kube::Error>>) -> Self {
        self.event_batches
            .lock()
            .unwrap()
            .push_back(events);
        self
    }

    pub fn drained(&self) -> CancellationToken {
        self.drained.clone()
    }

    pub fn operations(&self) -> Vec<(Operation, ResourceKind, String)> {
        self.operations.lock().unwrap().clone()
    }

    /// Target namespace of every call, in call order.
    pub fn namespaces(&self) -> Vec<Option<String>> {
        self.namespaces.lock().unwrap().clone()
    }

    pub fn objects(&self) -> BTreeMap<ObjectKey, ClusterResource> {
        self.objects.lock().unwrap().clone()
    }

    pub fn watches(&self) -> Vec<(String, String)> {
        self.watches.lock().unwrap().clone()
    }

    fn record(&self, operation: Operation, namespace: Option<&str>, resource: &ClusterResource) {
        self.operations.lock().unwrap().push((
            operation,
            resource.kind(),
            resource.name().unwrap_or_default().to_owned(),
        ));
        self.namespaces
            .lock()
            .unwrap()
            .push(namespace.map(str::to_owned));
    }

    fn key(namespace: Option<&str>, resource: &ClusterResource) -> ObjectKey {
        (
            resource.kind(),
            namespace.map(str::to_owned),
            resource.name().unwrap_or_default().to_owned(),
        )
    }
}

pub fn api_error(code: u16, reason: &str) -> kube::Error {
    kube::Error::Api(ErrorResponse {
        status: "Failure".to_owned(),
        message: reason.to_owned(),
        reason: reason.to_owned(),
        code,
    })
}

impl ClusterApi for FakeCluster {
    async fn create(
        &self,
        namespace: Option<&str>,
        resource: &ClusterResource,
    ) -> Result<(), kube::Error> {
        self.record(Operation::Create, namespace, resource);

        if self.rejected.contains(&resource.kind()) {
            return Err(api_error(403, "Forbidden"));
        }

        let mut objects = self.objects.lock().unwrap();
        let key = Self::key(namespace, resource);

        if objects.contains_key(&key) {
            return Err(api_error(409, "AlreadyExists"));
        }

        objects.insert(key, resource.clone());
        Ok(())
    }

    async fn replace(
        &self,
        namespace: Option<&str>,
        resource: &ClusterResource,
    ) -> Result<(), kube::Error> {
        self.record(Operation::Replace, namespace, resource);

        if self.rejected.contains(&resource.kind()) {
            return Err(api_error(422, "Invalid"));
        }

        let mut objects = self.objects.lock().unwrap();
        let key = Self::key(namespace, resource);

        if !objects.contains_key(&key) {
            return Err(api_error(404, "NotFound"));
        }

        objects.insert(key, resource.clone());
        Ok(())
    }

    async fn watch_ingresses(
        &self,
        namespace: &str,
        resource_version: &str,
    ) -> Result<IngressEventStream, kube::Error> {
        self.watches
            .lock()
            .unwrap()
            .push((namespace.to_owned(), resource_version.to_owned()));

        if self.fail_watch {
            return Err(api_error(403, "Forbidden"));
        }

        match self.event_batches.lock().unwrap().pop_front() {
            Some(events) => Ok(stream::iter(events).boxed()),
            None => {
                self.drained.cancel();
                Ok(stream::pending().boxed())
            }
        }
    }
}
