pub const FIREFLY_PREFIX: &str = "firefly";
pub const FIREFLY_SHADOW_PREFIX: &str = "fireflyshadow";

/// Name shared by the namespace, gateway deployment and service of a level.
pub fn get_default_name(level: usize) -> String {
    format!("{FIREFLY_PREFIX}{level}")
}

pub fn get_default_shadow_name(level: usize) -> String {
    format!("{FIREFLY_SHADOW_PREFIX}{level}")
}
