//! Interactive area selection read line by line from stdin.

use jma_forecast::client::validate_area_code;
use jma_forecast::AreaChoice;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Quit,
    Area(String),
    Invalid(String),
}

/// Interpret one input line: a 1-based index into `choices`, an area
/// code, or a request to quit (empty line or `q`).
pub fn resolve_selection(input: &str, choices: &[AreaChoice]) -> Selection {
    let input = input.trim();
    if input.is_empty() || input.eq_ignore_ascii_case("q") {
        return Selection::Quit;
    }

    // Area codes are six digits; shorter numbers are list positions.
    if input.len() < 6 {
        if let Ok(index) = input.parse::<usize>() {
            return match index.checked_sub(1).and_then(|i| choices.get(i)) {
                Some(choice) => Selection::Area(choice.child_code.clone()),
                None => Selection::Invalid(input.to_string()),
            };
        }
    }

    match validate_area_code(input) {
        Ok(()) => Selection::Area(input.to_string()),
        Err(_) => Selection::Invalid(input.to_string()),
    }
}
