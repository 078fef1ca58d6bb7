// Adapters layer: concrete implementations for external systems (browser, filesystem, http).

pub mod inspector;
pub mod probe;
pub mod source;
