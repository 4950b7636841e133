use serde::Serialize;

pub const NODE_PORT_TYPE_STRING: &str = "type: NodePort";

/// Flat record every template renders against. Each operation fills in the
/// fields its templates need; the rest render as empty strings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateParams {
    pub name: String,
    pub namespace: String,

    pub selector: String,
    pub ingress_controller_image: String,
    pub container_name: String,
    pub watch_namespace: String,

    pub service_name: String,
    pub service_port: String,
    pub type_string: String,

    pub firefly_path: String,
}
