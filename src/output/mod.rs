pub mod formatter;

pub use formatter::{format_breakdown, format_rating, should_use_colors};
