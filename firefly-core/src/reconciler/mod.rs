pub mod context;
pub mod ingress;
pub mod scaffold;
