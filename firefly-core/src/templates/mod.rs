//! Manifest templates
//!
//! Each of the five manifest kinds the controller produces is a minijinja
//! template loaded once at start-up. Rendering runs a [`TemplateParams`]
//! record through a template and deserializes the resulting YAML into the
//! typed k8s-openapi object the caller expects.

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use k8s_openapi::api::{
    apps::v1::Deployment,
    core::v1::{Namespace, Service},
    networking::v1::Ingress,
};
use log::debug;
use minijinja::{Environment, UndefinedBehavior};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::resources::ClusterResource;

pub use self::params::{TemplateParams, NODE_PORT_TYPE_STRING};

mod params;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Namespace,
    Deployment,
    Service,
    Ingress,
    IngressShadow,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 5] = [
        TemplateKind::Namespace,
        TemplateKind::Deployment,
        TemplateKind::Service,
        TemplateKind::Ingress,
        TemplateKind::IngressShadow,
    ];

    pub fn template_name(&self) -> &'static str {
        match self {
            TemplateKind::Namespace => "NamespaceTemplate",
            TemplateKind::Deployment => "DeploymentTemplate",
            TemplateKind::Service => "ServiceTemplate",
            TemplateKind::Ingress => "IngressTemplate",
            TemplateKind::IngressShadow => "IngressShadowTemplate",
        }
    }
}

impl Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.template_name())
    }
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Couldn't read {} from '{}'! Reason: {}", .kind, .path.display(), .error)]
    LoadError {
        kind: TemplateKind,
        path: PathBuf,
        error: std::io::Error,
    },
    #[error("Couldn't parse {}! Reason: {}", .kind, .error)]
    ParseError {
        kind: TemplateKind,
        error: minijinja::Error,
    },
    #[error("Couldn't execute {}! Reason: {}", .kind, .error)]
    ExecutionError {
        kind: TemplateKind,
        error: minijinja::Error,
    },
    #[error("{} didn't render a valid manifest! Reason: {}", .kind, .error)]
    DeserializationError {
        kind: TemplateKind,
        error: serde_yaml::Error,
    },
}

/// Locations of the template files, one per [`TemplateKind`].
#[derive(Debug, Clone)]
pub struct TemplatePaths {
    pub namespace: PathBuf,
    pub deployment: PathBuf,
    pub service: PathBuf,
    pub ingress: PathBuf,
    pub ingress_shadow: PathBuf,
}

impl TemplatePaths {
    pub fn get(&self, kind: TemplateKind) -> &Path {
        match kind {
            TemplateKind::Namespace => &self.namespace,
            TemplateKind::Deployment => &self.deployment,
            TemplateKind::Service => &self.service,
            TemplateKind::Ingress => &self.ingress,
            TemplateKind::IngressShadow => &self.ingress_shadow,
        }
    }
}

/// The parsed templates. Rendering only reads the environment, so a single
/// set can serve any number of renders.
pub struct TemplateSet {
    env: Environment<'static>,
}

impl TemplateSet {
    pub fn load(paths: &TemplatePaths) -> Result<Self, TemplateError> {
        let mut sources = Vec::with_capacity(TemplateKind::ALL.len());

        for kind in TemplateKind::ALL {
            let path = paths.get(kind);
            let source =
                std::fs::read_to_string(path).map_err(|error| TemplateError::LoadError {
                    kind,
                    path: path.to_owned(),
                    error,
                })?;

            sources.push((kind, source));
        }

        Self::from_sources(sources)
    }

    pub fn from_sources(
        sources: impl IntoIterator<Item = (TemplateKind, String)>,
    ) -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_test("numeric", is_numeric);

        for (kind, source) in sources {
            env.add_template_owned(kind.template_name(), source)
                .map_err(|error| TemplateError::ParseError { kind, error })?;
        }

        Ok(Self { env })
    }

    /// Renders `params` through the template of `kind` and deserializes the
    /// output as `T`. The rendered text is logged before it is parsed.
    pub fn render<T: DeserializeOwned>(
        &self,
        kind: TemplateKind,
        params: &TemplateParams,
    ) -> Result<T, TemplateError> {
        let rendered = self
            .env
            .get_template(kind.template_name())
            .and_then(|template| template.render(params))
            .map_err(|error| TemplateError::ExecutionError { kind, error })?;

        debug!("Rendered {kind}:\n{rendered}");

        serde_yaml::from_str(&rendered)
            .map_err(|error| TemplateError::DeserializationError { kind, error })
    }

    /// Renders into the resource type each template kind produces.
    pub fn render_resource(
        &self,
        kind: TemplateKind,
        params: &TemplateParams,
    ) -> Result<ClusterResource, TemplateError> {
        Ok(match kind {
            TemplateKind::Namespace => self.render::<Namespace>(kind, params)?.into(),
            TemplateKind::Deployment => self.render::<Deployment>(kind, params)?.into(),
            TemplateKind::Service => self.render::<Service>(kind, params)?.into(),
            TemplateKind::Ingress | TemplateKind::IngressShadow => {
                self.render::<Ingress>(kind, params)?.into()
            }
        })
    }
}

// lets templates pick between a numeric and a named service port
fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|byte| byte.is_ascii_digit())
}
