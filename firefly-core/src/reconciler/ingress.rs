use k8s_openapi::api::networking::v1::{Ingress, IngressBackend, ServiceBackendPort};
use log::{info, warn};

use crate::{
    error::ReconcilerError,
    kubernetes::{operations::apply_resource, ClusterApi},
    planner::{plan, StepKind},
    resources::meta::{get_default_name, get_default_shadow_name},
    templates::{TemplateKind, TemplateParams, NODE_PORT_TYPE_STRING},
};

use super::context::ReconcilerContext;

/// Service an ingress path originally routes to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendRef {
    pub service_name: String,
    /// Port number or port name, as text.
    pub service_port: String,
}

impl From<&IngressBackend> for BackendRef {
    fn from(backend: &IngressBackend) -> Self {
        let Some(service) = backend.service.as_ref() else {
            return Self::default();
        };

        let service_port = match service.port.as_ref() {
            Some(ServiceBackendPort {
                number: Some(number),
                ..
            }) => number.to_string(),
            Some(ServiceBackendPort {
                name: Some(name), ..
            }) => name.to_owned(),
            _ => String::new(),
        };

        Self {
            service_name: service.name.to_owned(),
            service_port,
        }
    }
}

/// Plans every HTTP path of every rule and reconciles each planned step.
pub async fn reconcile_ingress<C: ClusterApi>(
    context: &ReconcilerContext<C>,
    ingress: &Ingress,
) -> Result<(), ReconcilerError> {
    let rules = ingress
        .spec
        .iter()
        .flat_map(|spec| spec.rules.iter().flatten());

    for rule in rules {
        let Some(http) = rule.http.as_ref() else {
            continue;
        };

        for path in &http.paths {
            let raw_path = path.path.as_deref().unwrap_or_default();
            let backend = BackendRef::from(&path.backend);

            info!("Found an HTTP path ({raw_path})");

            if backend.service_name.is_empty() {
                warn!("HTTP path ({raw_path}) has no service backend, skipping!");
                continue;
            }

            for step in plan(raw_path, context.config.max_depth) {
                info!("Token {}: {}", step.index, step.token);

                match step.kind {
                    StepKind::Intermediate => {
                        reconcile_routing_ingress(
                            context,
                            step.index,
                            &step.token,
                            &get_default_name(step.index + 1),
                        )
                        .await?
                    }
                    StepKind::Terminal => {
                        reconcile_shadow_chain(context, step.index, &step.token, &backend).await?
                    }
                }
            }
        }
    }

    Ok(())
}

/// Routes `/<token>` in level `level`'s namespace to `service_name`.
pub async fn reconcile_routing_ingress<C: ClusterApi>(
    context: &ReconcilerContext<C>,
    level: usize,
    token: &str,
    service_name: &str,
) -> Result<(), ReconcilerError> {
    let name = get_default_name(level);
    let params = TemplateParams {
        name: name.clone(),
        namespace: name.clone(),
        service_name: service_name.to_owned(),
        firefly_path: format!("/{}", token.trim_matches('/')),
        ..Default::default()
    };

    let ingress = context
        .templates
        .render_resource(TemplateKind::Ingress, &params)
        .map_err(ReconcilerError::TemplateError)?;

    apply_resource(&context.cluster, Some(&name), &ingress).await?;

    Ok(())
}

/// Exposes the real backend at level `level`: a shadow deployment and service
/// in `firefly<level>`, the routing ingress for `token`, and the shadow
/// ingress in the watched namespace pointing back at the backend.
pub async fn reconcile_shadow_chain<C: ClusterApi>(
    context: &ReconcilerContext<C>,
    level: usize,
    token: &str,
    backend: &BackendRef,
) -> Result<(), ReconcilerError> {
    let name = get_default_name(level);
    let shadow_name = get_default_shadow_name(level);

    let params = TemplateParams {
        name: backend.service_name.to_owned(),
        namespace: name.clone(),
        selector: shadow_name.clone(),
        ingress_controller_image: context.config.ingress_controller_image.to_owned(),
        container_name: shadow_name.clone(),
        watch_namespace: context.config.namespace.to_owned(),
        service_name: backend.service_name.to_owned(),
        type_string: NODE_PORT_TYPE_STRING.to_owned(),
        ..Default::default()
    };

    for kind in [TemplateKind::Deployment, TemplateKind::Service] {
        let resource = context
            .templates
            .render_resource(kind, &params)
            .map_err(ReconcilerError::TemplateError)?;

        apply_resource(&context.cluster, Some(&name), &resource).await?;
    }

    reconcile_routing_ingress(context, level, token, &backend.service_name).await?;

    let shadow_params = TemplateParams {
        name: shadow_name,
        namespace: context.config.namespace.to_owned(),
        service_name: backend.service_name.to_owned(),
        service_port: backend.service_port.to_owned(),
        ..Default::default()
    };

    let shadow_ingress = context
        .templates
        .render_resource(TemplateKind::IngressShadow, &shadow_params)
        .map_err(ReconcilerError::TemplateError)?;

    apply_resource(
        &context.cluster,
        Some(&context.config.namespace),
        &shadow_ingress,
    )
    .await?;

    Ok(())
}
