use crate::domains::element::ElementExportRow;
use std::collections::HashSet;

/// Keep rows whose category is selected. Uncategorized rows are always kept.
///
/// Input order is preserved.
pub fn filter_by_categories<S: AsRef<str>>(
    rows: &[ElementExportRow],
    selected: &[S],
) -> Vec<ElementExportRow> {
    let selected: HashSet<&str> = selected.iter().map(|s| s.as_ref()).collect();
    rows.iter()
        .filter(|r| r.is_uncategorized() || selected.contains(r.category.as_str()))
        .cloned()
        .collect()
}
