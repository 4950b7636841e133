use kube::Resource;

pub const DEFAULT_OPT_IN_LABEL: &str = "firefly.optin";

/// An object opts in by carrying the label with any non-empty value.
pub fn is_opted_in<T: Resource>(object: &T, label: &str) -> bool {
    object
        .meta()
        .labels
        .as_ref()
        .and_then(|labels| labels.get(label))
        .is_some_and(|value| !value.is_empty())
}
