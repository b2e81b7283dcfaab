//! Table rendering for the terminal.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use cascade_core::{CascadeSelector, LevelView};
use cascade_model::CellValue;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Comma-separated display of a value list.
pub fn join_values(values: &[CellValue]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// State column text: disabled levels, then the cap notice.
pub fn level_state(view: &LevelView) -> String {
    if !view.enabled {
        "disabled".to_string()
    } else if view.at_cap {
        format!("max {}", view.max_selections)
    } else {
        String::new()
    }
}

/// One row per level: selection, available options and state.
pub fn status_table(views: &[LevelView]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Column"),
        header_cell("Max"),
        header_cell("Selected"),
        header_cell("Options"),
        header_cell("State"),
    ]);
    apply_table_style(&mut table);
    for view in views {
        table.add_row(vec![
            Cell::new(view.index + 1),
            Cell::new(&view.column),
            Cell::new(view.max_selections),
            Cell::new(join_values(&view.selected)),
            Cell::new(join_values(&view.options)),
            Cell::new(level_state(view)),
        ]);
    }
    table
}

/// Overview of the configured chain against the loaded dataset.
pub fn chain_table(selector: &CascadeSelector) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Column"),
        header_cell("Max"),
        header_cell("Distinct"),
        header_cell("In file"),
    ]);
    apply_table_style(&mut table);
    let dataset = selector.dataset();
    for (index, spec) in selector.chain().iter().enumerate() {
        let present = dataset.has_column(&spec.column);
        let distinct = selector.options_for(index, None).len();
        let present_cell = if present {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&spec.column),
            Cell::new(spec.max_selections),
            Cell::new(distinct),
            present_cell,
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_model::{Dataset, LevelChain, Row};

    fn selector() -> CascadeSelector {
        let dataset: Dataset = vec![
            Row::from_pairs([("L_1", "A"), ("L_2", "X")]),
            Row::from_pairs([("L_1", "B"), ("L_2", "Y")]),
        ]
        .into_iter()
        .collect();
        CascadeSelector::with_dataset(LevelChain::default(), dataset)
    }

    #[test]
    fn state_reports_disabled_and_cap() {
        let mut selector = selector();
        selector
            .set_level(0, vec![CellValue::text("A"), CellValue::text("B")])
            .unwrap();
        let views = selector.level_views();
        assert_eq!(level_state(&views[0]), "max 2");
        assert_eq!(level_state(&views[1]), "");
        assert_eq!(level_state(&views[2]), "disabled");
    }

    #[test]
    fn status_table_lists_every_level() {
        let selector = selector();
        let rendered = status_table(&selector.level_views()).to_string();
        for column in selector.chain().columns() {
            assert!(rendered.contains(column), "missing {column}");
        }
        assert!(rendered.contains("A, B"));
        assert!(rendered.contains("disabled"));
    }

    #[test]
    fn chain_table_marks_absent_columns() {
        let rendered = chain_table(&selector()).to_string();
        assert!(rendered.contains("yes"));
        assert!(rendered.contains("no"));
    }
}
