use log::info;

use crate::{
    error::ReconcilerError,
    kubernetes::{operations::apply_resource, ClusterApi},
    resources::meta::get_default_name,
    templates::{TemplateKind, TemplateParams, NODE_PORT_TYPE_STRING},
};

use super::context::{FireflyConfig, ReconcilerContext};

/// Provisions the default gateway chain: for every level in `0..=max_depth`
/// a namespace `firefly<i>` holding a deployment and service that watch
/// `firefly<i+1>`.
pub async fn build_scaffold<C: ClusterApi>(
    context: &ReconcilerContext<C>,
) -> Result<(), ReconcilerError> {
    info!(
        "Deploying scaffolding for levels 0 to {}...",
        context.config.max_depth
    );

    for level in 0..=context.config.max_depth {
        let params = scaffold_params(level, &context.config);

        for kind in [
            TemplateKind::Namespace,
            TemplateKind::Deployment,
            TemplateKind::Service,
        ] {
            let resource = context
                .templates
                .render_resource(kind, &params)
                .map_err(ReconcilerError::TemplateError)?;
            let namespace = match kind {
                TemplateKind::Namespace => None,
                _ => Some(params.namespace.as_str()),
            };

            apply_resource(&context.cluster, namespace, &resource).await?;
        }
    }

    info!("Scaffolding deployed!");

    Ok(())
}

fn scaffold_params(level: usize, config: &FireflyConfig) -> TemplateParams {
    let name = get_default_name(level);

    TemplateParams {
        name: name.clone(),
        namespace: name.clone(),
        selector: name.clone(),
        ingress_controller_image: config.ingress_controller_image.to_owned(),
        container_name: name.clone(),
        watch_namespace: get_default_name(level + 1),
        service_name: name,
        type_string: NODE_PORT_TYPE_STRING.to_owned(),
        ..Default::default()
    }
}
