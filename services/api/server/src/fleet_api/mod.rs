pub(crate) mod core;
pub(crate) mod error_recorder;
pub(crate) mod error_v1;
