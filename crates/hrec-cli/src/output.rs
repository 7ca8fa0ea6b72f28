//! Rendering of results for the terminal.

use anyhow::Result;
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use hrec_validate::{Category, ValidationResult};

#[derive(Serialize)]
struct Verdict<'a> {
    valid: bool,
    /// Outer `None` omits the key; inner `None` renders `null`.
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Option<&'a [String]>>,
}

/// Serialize as JSON with four-space indentation.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buffer)?)
}

/// The result document: `{"valid", "errors"}`, or `{"valid"}` alone.
pub fn render_result(result: &ValidationResult, just_result: bool) -> Result<String> {
    let errors = if just_result {
        None
    } else if result.valid {
        Some(None)
    } else {
        Some(Some(result.errors.as_slice()))
    };
    to_pretty_json(&Verdict {
        valid: result.valid,
        errors,
    })
}

pub fn issue_table(result: &ValidationResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Subject"),
        header_cell("Message"),
    ]);
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
    for issue in &result.issues {
        table.add_row(vec![
            category_cell(issue.category()),
            Cell::new(issue.subject()),
            Cell::new(issue.to_string()),
        ]);
    }
    table
}

pub fn print_issue_table(result: &ValidationResult) {
    if result.valid {
        println!("Record is valid.");
        return;
    }
    println!("{}", issue_table(result));
    let counts = result
        .counts_by_category()
        .into_iter()
        .map(|(category, count)| format!("{category}: {count}"))
        .collect::<Vec<_>>()
        .join(", ");
    println!("{} issue(s) ({counts})", result.error_count());
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn category_cell(category: Category) -> Cell {
    let color = match category {
        Category::Structure => Color::Magenta,
        Category::Presence | Category::Children => Color::Red,
        Category::Cardinality => Color::Yellow,
        Category::Type | Category::Format => Color::Blue,
    };
    Cell::new(category.label())
        .fg(color)
        .set_alignment(CellAlignment::Left)
}

#[cfg(test)]
mod tests {
    use hrec_validate::Issue;

    use super::*;

    #[test]
    fn table_lists_every_issue() {
        let result = ValidationResult::from_issues(vec![
            Issue::BadKey {
                address: "Extra0".to_string(),
            },
            Issue::MissingRequired {
                field: "Name".to_string(),
            },
        ]);
        let table = issue_table(&result);
        assert_eq!(table.row_count(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("Bad key: Extra0"));
        assert!(rendered.contains("Missing required key: Name"));
    }
}
