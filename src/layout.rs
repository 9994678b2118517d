pub(crate) mod infer;
pub(crate) mod overlay;
pub(crate) mod registry;
