use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::rating::{RatingRequest, RatingResult};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a rating with a fixed number of decimals, dropping a trailing
/// fractional part of zeros ("8.50" stays, "8.00" becomes "8").
pub fn format_rating(value: f64, precision: usize) -> String {
    let formatted = format!("{:.*}", precision, value);
    if formatted.contains('.') && formatted.trim_end_matches('0').ends_with('.') {
        formatted.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        formatted
    }
}

/// Format every pipeline stage as a table.
///
/// One row per criterion with its weight, average and normalized average,
/// followed by the aggregate and final rating.
/// Criterion column is left-aligned and sized to the longest name.
pub fn format_breakdown(
    request: &RatingRequest,
    result: &RatingResult,
    use_colors: bool,
) -> String {
    let range = request.value_range();
    let name_width = result
        .averages
        .keys()
        .map(|k| k.chars().count())
        .max()
        .unwrap_or(0)
        .max("criterion".len());

    let mut lines = Vec::new();
    let header = format!(
        "{:<name_width$}  {:>8}  {:>10}  {:>10}",
        "criterion",
        "weight",
        "average",
        "normalized",
        name_width = name_width
    );
    lines.push(if use_colors {
        header.dimmed().to_string()
    } else {
        header
    });

    for (criterion, average) in &result.averages {
        let weight = request.weights().get(criterion).copied().unwrap_or(0.0);
        let normalized = result.normalized.get(criterion).copied().unwrap_or(0.0);
        let name = format!("{:<name_width$}", criterion, name_width = name_width);
        let name = if use_colors {
            name.cyan().to_string()
        } else {
            name
        };
        lines.push(format!(
            "{}  {:>8}  {:>10}  {:>10}",
            name,
            format_rating(weight, 4),
            format_rating(*average, 4),
            format_rating(normalized, 4)
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Entries: {}  Range: {} to {}",
        request.data().len(),
        format_rating(range.min, 4),
        format_rating(range.max, 4)
    ));
    lines.push(format!(
        "Aggregate (normalized): {}",
        format_rating(result.normalized_rating, 6)
    ));
    let final_str = format_rating(result.final_rating, 6);
    if use_colors {
        lines.push(format!("Final rating: {}", final_str.bold().green()));
    } else {
        lines.push(format!("Final rating: {}", final_str));
    }

    lines.join("\n")
}
