use std::{fmt::Debug, future::Future};

use futures::{stream::BoxStream, StreamExt};
use k8s_openapi::{
    api::{core::v1::Namespace, networking::v1::Ingress},
    serde::{de::DeserializeOwned, Serialize},
    NamespaceResourceScope,
};
use kube::{
    api::{PostParams, WatchEvent, WatchParams},
    Api, Client, Resource,
};

use crate::{resources::ClusterResource, FIELD_MANAGER};

#[cfg(test)]
pub(crate) mod fake;
pub mod operations;

pub type IngressEventStream = BoxStream<'static, Result<WatchEvent<Ingress>, kube::Error>>;

/// The slice of the cluster API the controller consumes.
pub trait ClusterApi {
    /// Creates `resource`. Namespaced kinds go to `namespace`, or to the
    /// client's default namespace when none is given.
    fn create(
        &self,
        namespace: Option<&str>,
        resource: &ClusterResource,
    ) -> impl Future<Output = Result<(), kube::Error>> + Send;

    /// Overwrites the existing object named after `resource`.
    fn replace(
        &self,
        namespace: Option<&str>,
        resource: &ClusterResource,
    ) -> impl Future<Output = Result<(), kube::Error>> + Send;

    fn watch_ingresses(
        &self,
        namespace: &str,
        resource_version: &str,
    ) -> impl Future<Output = Result<IngressEventStream, kube::Error>> + Send;
}

#[derive(Clone)]
pub struct KubeClusterApi {
    client: Client,
}

impl KubeClusterApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn namespaced_api<T>(&self, namespace: Option<&str>) -> Api<T>
    where
        T: Resource<Scope = NamespaceResourceScope, DynamicType = ()>,
    {
        match namespace {
            Some(namespace) => Api::namespaced(self.client.clone(), namespace),
            None => Api::default_namespaced(self.client.clone()),
        }
    }

    fn post_params() -> PostParams {
        PostParams {
            field_manager: Some(FIELD_MANAGER.to_owned()),
            ..Default::default()
        }
    }
}

impl ClusterApi for KubeClusterApi {
    async fn create(
        &self,
        namespace: Option<&str>,
        resource: &ClusterResource,
    ) -> Result<(), kube::Error> {
        let post_params = Self::post_params();

        match resource {
            ClusterResource::Namespace(object) => {
                let api: Api<Namespace> = Api::all(self.client.clone());
                create_with(&api, &post_params, object).await
            }
            ClusterResource::Deployment(object) => {
                create_with(&self.namespaced_api(namespace), &post_params, object).await
            }
            ClusterResource::Service(object) => {
                create_with(&self.namespaced_api(namespace), &post_params, object).await
            }
            ClusterResource::Ingress(object) => {
                create_with(&self.namespaced_api(namespace), &post_params, object).await
            }
        }
    }

    async fn replace(
        &self,
        namespace: Option<&str>,
        resource: &ClusterResource,
    ) -> Result<(), kube::Error> {
        let post_params = Self::post_params();
        let name = resource.name().unwrap_or_default();

        match resource {
            ClusterResource::Namespace(object) => {
                let api: Api<Namespace> = Api::all(self.client.clone());
                replace_with(&api, name, &post_params, object).await
            }
            ClusterResource::Deployment(object) => {
                replace_with(&self.namespaced_api(namespace), name, &post_params, object).await
            }
            ClusterResource::Service(object) => {
                replace_with(&self.namespaced_api(namespace), name, &post_params, object).await
            }
            ClusterResource::Ingress(object) => {
                replace_with(&self.namespaced_api(namespace), name, &post_params, object).await
            }
        }
    }

    async fn watch_ingresses(
        &self,
        namespace: &str,
        resource_version: &str,
    ) -> Result<IngressEventStream, kube::Error> {
        let api: Api<Ingress> = Api::namespaced(self.client.clone(), namespace);
        let stream = api.watch(&WatchParams::default(), resource_version).await?;

        Ok(stream.boxed())
    }
}

async fn create_with<T>(api: &Api<T>, post_params: &PostParams, object: &T) -> Result<(), kube::Error>
where
    T: Clone + DeserializeOwned + Serialize + Debug,
{
    api.create(post_params, object).await.map(|_| ())
}

async fn replace_with<T>(
    api: &Api<T>,
    name: &str,
    post_params: &PostParams,
    object: &T,
) -> Result<(), kube::Error>
where
    T: Clone + DeserializeOwned + Serialize + Debug,
{
    api.replace(name, post_params, object).await.map(|_| ())
}
