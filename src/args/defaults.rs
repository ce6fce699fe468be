pub(crate) const DEFAULT_USER_AGENT: &str = concat!("crdp-stress/", env!("CARGO_PKG_VERSION"));
