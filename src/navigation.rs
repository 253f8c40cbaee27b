use std::collections::{HashMap, HashSet};

/// Pick the label of the next case still waiting for review.
///
/// `display_names` is treated as a ring: the scan starts right after
/// `current_display` and wraps around. A label that is not in the list
/// starts the scan at the head. When everything is reviewed the first label
/// is returned; `None` only for an empty list. Labels missing from
/// `display_to_case` are skipped.
pub fn next_unreviewed(
    display_names: &[String],
    reviewed_cases: &HashSet<String>,
    display_to_case: &HashMap<String, String>,
    current_display: &str,
) -> Option<String> {
    let first = display_names.first()?;
    let len = display_names.len();
    let start = display_names
        .iter()
        .position(|name| name == current_display)
        .map_or(0, |i| i + 1);

    let next = (0..len)
        .map(|offset| &display_names[(start + offset) % len])
        .find(|name| {
            display_to_case
                .get(name.as_str())
                .is_some_and(|case_id| !reviewed_cases.contains(case_id))
        })
        .unwrap_or(first);
    Some(next.clone())
}
