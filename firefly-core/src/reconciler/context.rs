use crate::templates::TemplateSet;

/// Settings fixed at start-up.
#[derive(Debug, Clone)]
pub struct FireflyConfig {
    /// Namespace whose ingresses are watched and where shadow ingresses live.
    pub namespace: String,
    /// Number of path segments honoured. The scaffold spans levels
    /// `0..=max_depth`.
    pub max_depth: usize,
    pub ingress_controller_image: String,
    pub opt_in_label: String,
}

pub struct ReconcilerContext<C> {
    pub config: FireflyConfig,
    pub templates: TemplateSet,
    pub cluster: C,
}
