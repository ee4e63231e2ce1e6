pub mod json_loader;

pub use json_loader::{load_question_file, scan_question_files};
