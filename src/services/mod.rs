pub mod bulk_parser;
pub mod normalizer;
pub mod renderer;
pub mod report_writer;
pub mod validator;

pub use bulk_parser::{parse_batch, BatchOutcome};
pub use normalizer::normalize;
pub use renderer::{resolve_for_preview, resolve_for_publish};
pub use report_writer::ReportWriter;
pub use validator::{validate, validate_question, ValidationReport};
