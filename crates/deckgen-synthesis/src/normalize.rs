//! Normalization of recovered slide objects into schema records.
//!
//! The parsed model output is untrusted input: fields may be missing,
//! numbers may arrive as strings, and the type tag may be absent or
//! unknown. This step supplies defaults so every record entering the deck
//! is schema-valid; soft invariants (chart length parity, exactly two
//! columns) are left to the renderer's graceful degradation.

use serde_json::Value;

use deckgen_schema::{ChartData, ChartKind, ColumnBlock, SlideBody, SlideRecord};

/// Normalize a recovered array into slide records.
///
/// `index` is forced to array position regardless of what the model
/// supplied; `type` defaults to content; `title` defaults to "Slide {n}".
pub fn normalize_records(values: Vec<Value>) -> Vec<SlideRecord> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| normalize_record(i, &v))
        .collect()
}

/// Normalize one slide object at the given deck position.
pub fn normalize_record(index: usize, value: &Value) -> SlideRecord {
    let title = get_str(value, &["title"]).unwrap_or_else(|| format!("Slide {}", index + 1));
    let notes = get_str(value, &["notes"]);

    let type_tag = get_str(value, &["type"]).unwrap_or_else(|| "content".to_string());
    let body = match type_tag.trim().to_ascii_lowercase().as_str() {
        "title" => SlideBody::Title {
            subtitle: get_str(value, &["subtitle"]),
        },
        "agenda" => SlideBody::Agenda {
            bullets: get_bullets(value),
        },
        "summary" => SlideBody::Summary {
            bullets: get_bullets(value),
        },
        "two-column" | "two_column" | "twocolumn" => SlideBody::TwoColumn {
            columns: get_columns(value),
        },
        "comparison" => SlideBody::Comparison {
            columns: get_columns(value),
        },
        "chart" => SlideBody::Chart {
            chart_type: ChartKind::parse_lenient(
                &get_str(value, &["chartType", "chart_type"]).unwrap_or_default(),
            ),
            chart_data: get_chart_data(value),
            bullets: opt_bullets(value),
        },
        "image-text" | "image_text" | "imagetext" => SlideBody::ImageText {
            key_number: get_str(value, &["keyNumber", "key_number"]),
            key_number_label: get_str(value, &["keyNumberLabel", "key_number_label"]),
            bullets: opt_bullets(value),
            image_data_url: get_str(value, &["imageDataUrl", "image_data_url"]),
        },
        "content" => SlideBody::Content {
            bullets: get_bullets(value),
        },
        other => {
            log::warn!("unknown slide type '{}', degrading to content", other);
            SlideBody::Content {
                bullets: get_bullets(value),
            }
        }
    };

    SlideRecord {
        index,
        title,
        notes,
        body,
    }
}

/// First present key wins; values are stringified leniently.
fn get_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| {
        value.get(k).and_then(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    })
}

fn lenient_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn get_bullets(value: &Value) -> Vec<String> {
    opt_bullets(value).unwrap_or_default()
}

fn opt_bullets(value: &Value) -> Option<Vec<String>> {
    let items = value.get("bullets")?.as_array()?;
    Some(items.iter().filter_map(lenient_string).collect())
}

/// Read columns and force exactly two, truncating extras and padding
/// shortfalls with empty blocks.
fn get_columns(value: &Value) -> Vec<ColumnBlock> {
    let mut columns: Vec<ColumnBlock> = value
        .get("columns")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| ColumnBlock {
                    header: get_str(item, &["header", "title"]).unwrap_or_default(),
                    items: item
                        .get("items")
                        .and_then(Value::as_array)
                        .map(|a| a.iter().filter_map(lenient_string).collect())
                        .unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    columns.truncate(2);
    while columns.len() < 2 {
        columns.push(ColumnBlock::default());
    }
    columns
}

fn get_chart_data(value: &Value) -> ChartData {
    let data = value
        .get("chartData")
        .or_else(|| value.get("chart_data"))
        .cloned()
        .unwrap_or(Value::Null);

    let labels = data
        .get("labels")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(lenient_string).collect())
        .unwrap_or_default();

    let values = data
        .get("values")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(lenient_f64).collect())
        .unwrap_or_default();

    let colors = data.get("colors").and_then(Value::as_array).map(|a| {
        a.iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    });

    ChartData {
        labels,
        values,
        colors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_applied() {
        let records = normalize_records(vec![json!({}), json!({"bullets": ["a"]})]);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Slide 1");
        assert_eq!(records[0].body.type_name(), "content");
        assert_eq!(records[1].body.bullets().unwrap(), &["a".to_string()]);
    }

    #[test]
    fn test_model_supplied_index_ignored() {
        let records = normalize_records(vec![
            json!({"index": 42, "title": "first"}),
            json!({"index": 0, "title": "second"}),
        ]);

        assert_eq!(records[0].index, 0);
        assert_eq!(records[1].index, 1);
    }

    #[test]
    fn test_unknown_type_degrades_to_content() {
        let record = normalize_record(0, &json!({"type": "hologram", "bullets": ["x"]}));
        assert_eq!(record.body.type_name(), "content");
        assert_eq!(record.body.bullets().unwrap().len(), 1);
    }

    #[test]
    fn test_chart_numbers_as_strings() {
        let record = normalize_record(
            0,
            &json!({
                "type": "chart",
                "chartType": "bar",
                "chartData": {"labels": ["a", "b"], "values": ["10", 20]}
            }),
        );

        match &record.body {
            SlideBody::Chart { chart_data, .. } => {
                assert_eq!(chart_data.values, vec![10.0, 20.0]);
            }
            other => panic!("expected chart, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_columns_forced_to_two() {
        let three = normalize_record(
            0,
            &json!({
                "type": "comparison",
                "columns": [
                    {"header": "A", "items": ["1"]},
                    {"header": "B", "items": []},
                    {"header": "C", "items": []}
                ]
            }),
        );
        match &three.body {
            SlideBody::Comparison { columns } => assert_eq!(columns.len(), 2),
            _ => panic!("expected comparison"),
        }

        let one = normalize_record(
            0,
            &json!({"type": "two-column", "columns": [{"header": "A", "items": []}]}),
        );
        match &one.body {
            SlideBody::TwoColumn { columns } => {
                assert_eq!(columns.len(), 2);
                assert_eq!(columns[1].header, "");
            }
            _ => panic!("expected two-column"),
        }
    }

    #[test]
    fn test_snake_case_keys_accepted() {
        let record = normalize_record(
            0,
            &json!({
                "type": "image-text",
                "key_number": "42%",
                "key_number_label": "growth"
            }),
        );
        match &record.body {
            SlideBody::ImageText {
                key_number,
                key_number_label,
                ..
            } => {
                assert_eq!(key_number.as_deref(), Some("42%"));
                assert_eq!(key_number_label.as_deref(), Some("growth"));
            }
            _ => panic!("expected image-text"),
        }
    }

    #[test]
    fn test_non_object_becomes_empty_content() {
        let record = normalize_record(3, &json!("just a string"));
        assert_eq!(record.title, "Slide 4");
        assert_eq!(record.body.type_name(), "content");
    }
}
