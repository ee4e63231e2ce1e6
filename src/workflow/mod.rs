pub mod import_ctx;
pub mod import_flow;

pub use import_ctx::ImportCtx;
pub use import_flow::{ImportFlow, ImportStats};
