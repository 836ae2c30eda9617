//! Statistics and category summary over a row collection.

use crate::domains::element::{CategoryInfo, ElementExportRow, ExportStats, LocationKind};
use std::collections::{HashMap, HashSet};

/// Count rows by location kind and distinct non-empty categories
pub fn calculate_stats(rows: &[ElementExportRow]) -> ExportStats {
    let mut stats = ExportStats {
        total_elements: rows.len(),
        ..ExportStats::default()
    };
    let mut categories: HashSet<&str> = HashSet::new();

    for row in rows {
        match row.location_kind() {
            LocationKind::Point => stats.point_locations += 1,
            LocationKind::Curve | LocationKind::CurveUnbound => stats.curve_locations += 1,
            LocationKind::None => stats.no_locations += 1,
        }
        if !row.is_uncategorized() {
            categories.insert(row.category.as_str());
        }
    }

    stats.category_count = categories.len();
    stats
}

/// One entry per non-empty category, most populated first.
///
/// Equal counts are ordered by name (ordinal comparison). Every entry starts
/// selected.
pub fn get_category_summary(rows: &[ElementExportRow]) -> Vec<CategoryInfo> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows.iter().filter(|r| !r.is_uncategorized()) {
        *counts.entry(row.category.as_str()).or_insert(0) += 1;
    }

    let mut summary: Vec<CategoryInfo> = counts
        .into_iter()
        .map(|(name, element_count)| CategoryInfo {
            name: name.to_string(),
            element_count,
            is_selected: true,
        })
        .collect();

    summary.sort_by(|a, b| {
        b.element_count
            .cmp(&a.element_count)
            .then_with(|| a.name.cmp(&b.name))
    });
    summary
}

/// Names of the categories currently ticked
pub fn selected_category_names(categories: &[CategoryInfo]) -> Vec<String> {
    categories
        .iter()
        .filter(|c| c.is_selected)
        .map(|c| c.name.clone())
        .collect()
}

/// Select all / select none
pub fn set_all_selected(categories: &mut [CategoryInfo], selected: bool) {
    for category in categories.iter_mut() {
        category.is_selected = selected;
    }
}

/// Stats of what would be exported under the given selection
pub fn stats_for_selection<S: AsRef<str>>(rows: &[ElementExportRow], selected: &[S]) -> ExportStats {
    let subset = super::filter::filter_by_categories(rows, selected);
    calculate_stats(&subset)
}
