use std::path::PathBuf;

use clap::{builder::TypedValueParser, value_parser, Parser};
use firefly_core::{
    reconciler::context::FireflyConfig, resources::labels::DEFAULT_OPT_IN_LABEL,
    templates::TemplatePaths,
};

pub const DEFAULT_NAMESPACE: &str = "applications";
pub const DEFAULT_MAX_DEPTH: usize = 5;
pub const DEFAULT_INGRESS_CONTROLLER_IMAGE: &str = "nginxdemos/nginx-ingress:0.6.0";

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// namespace whose ingresses are watched
    #[arg(short = 'n', long, env = "FIREFLY_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,
    /// maximum number of path segments turned into namespace levels
    #[arg(long, env = "FIREFLY_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH, value_parser = value_parser!(u16).range(1..).map(usize::from))]
    pub max_depth: usize,
    /// ingress controller image deployed at every level
    #[arg(long, env = "FIREFLY_INGRESS_CONTROLLER_IMAGE", default_value = DEFAULT_INGRESS_CONTROLLER_IMAGE)]
    pub ingress_controller_image: String,
    /// label an ingress has to carry (with a non-empty value) to be managed
    #[arg(long, env = "FIREFLY_OPT_IN_LABEL", default_value = DEFAULT_OPT_IN_LABEL)]
    pub opt_in_label: String,
    #[command(flatten)]
    pub templates: TemplateArgs,
    /// override default kubeconfig
    #[arg(long, env = "FIREFLY_KUBE_CONFIG")]
    pub kube_config: Option<String>,
    /// override default kubeconfig context
    #[arg(long, env = "FIREFLY_KUBE_CONTEXT")]
    pub kube_context: Option<String>,
    /// enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose_logging: bool,
    /// enable trace output (more detailed than verbose, overrides it if present)
    #[arg(long = "trace")]
    pub trace_logging: bool,
}

#[derive(Debug, clap::Args)]
pub struct TemplateArgs {
    /// Namespace manifest template
    #[arg(long, env = "FIREFLY_NAMESPACE_TEMPLATE", default_value = "templates/Namespace.yaml")]
    pub namespace_template: PathBuf,
    /// Deployment manifest template
    #[arg(long, env = "FIREFLY_DEPLOYMENT_TEMPLATE", default_value = "templates/Deployment.yaml")]
    pub deployment_template: PathBuf,
    /// Service manifest template
    #[arg(long, env = "FIREFLY_SERVICE_TEMPLATE", default_value = "templates/Service.yaml")]
    pub service_template: PathBuf,
    /// routing Ingress manifest template
    #[arg(long, env = "FIREFLY_INGRESS_TEMPLATE", default_value = "templates/Ingress.yaml")]
    pub ingress_template: PathBuf,
    /// shadow Ingress manifest template
    #[arg(long, env = "FIREFLY_INGRESS_SHADOW_TEMPLATE", default_value = "templates/IngressShadow.yaml")]
    pub ingress_shadow_template: PathBuf,
}

pub enum LogLevel {
    Normal,
    Verbose,
    Trace,
}

impl Cli {
    pub fn get_log_level(&self) -> LogLevel {
        if self.trace_logging {
            return LogLevel::Trace;
        }

        if self.verbose_logging {
            return LogLevel::Verbose;
        }

        LogLevel::Normal
    }

    pub fn get_config(&self) -> FireflyConfig {
        FireflyConfig {
            namespace: self.namespace.to_owned(),
            max_depth: self.max_depth,
            ingress_controller_image: self.ingress_controller_image.to_owned(),
            opt_in_label: self.opt_in_label.to_owned(),
        }
    }

    pub fn get_template_paths(&self) -> TemplatePaths {
        TemplatePaths {
            namespace: self.templates.namespace_template.to_owned(),
            deployment: self.templates.deployment_template.to_owned(),
            service: self.templates.service_template.to_owned(),
            ingress: self.templates.ingress_template.to_owned(),
            ingress_shadow: self.templates.ingress_shadow_template.to_owned(),
        }
    }
}
