pub mod tokens;
pub mod traversal;

pub use tokens::{GapToken, ImageToken, DEFAULT_GAP_WIDTH, PX_PER_UNDERSCORE};
pub use traversal::{extract_image_ids, for_each_text, rewrite_texts};
