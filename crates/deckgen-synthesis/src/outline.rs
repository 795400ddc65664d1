//! Outline synthesis: deterministic split mode and model-assisted expand
//! mode, plus single-slide re-synthesis and free-text modification.

use deckgen_schema::{
    renumber, GenerationConfig, ParsedTable, SlideBody, SlideRecord,
};

use crate::client::{CompletionRequest, ModelClient};
use crate::error::{Result, SynthesisError};
use crate::normalize::{normalize_record, normalize_records};
use crate::prompt;
use crate::recover;

/// Result of a free-text modify call.
#[derive(Debug, Clone)]
pub struct ModifyOutcome {
    /// Complete replacement deck
    pub slides: Vec<SlideRecord>,
    /// Short human-readable change summary
    pub summary: String,
}

/// Deterministic split mode: always exactly N slides, no model call.
///
/// One title slide, N−2 content slides over an even partition of all rows,
/// and a trailing summary slide. Pure function of its arguments.
pub fn split_outline(table: &ParsedTable, config: &GenerationConfig) -> Vec<SlideRecord> {
    let page_count = config.effective_page_count();
    let total_rows = table.total_rows();
    let mut deck = Vec::with_capacity(page_count);

    deck.push(SlideRecord::title_slide(
        0,
        table.label.clone(),
        Some(format!(
            "{} sheets · {} rows",
            table.sheets.len(),
            total_rows
        )),
    ));

    let content_slides = page_count.saturating_sub(2);
    if content_slides > 0 {
        let rows: Vec<String> = table
            .all_rows()
            .map(|(sheet, row)| {
                sheet
                    .headers
                    .iter()
                    .take(3)
                    .map(|h| {
                        let value = row.get(h).map(|v| v.display()).unwrap_or_default();
                        format!("{}: {}", h, value)
                    })
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect();

        let per_slide = rows.len().div_ceil(content_slides).max(1);
        for (i, chunk) in rows.chunks(per_slide).take(content_slides).enumerate() {
            let start = i * per_slide + 1;
            let end = start + chunk.len() - 1;
            deck.push(SlideRecord::content(
                deck.len(),
                format!("Rows {}–{}", start, end),
                chunk.to_vec(),
            ));
        }
        // Fewer row chunks than requested content slides: pad so the
        // slide count contract still holds.
        while deck.len() < 1 + content_slides {
            deck.push(SlideRecord::content(
                deck.len(),
                "Rows (continued)".to_string(),
                Vec::new(),
            ));
        }
    }

    if page_count >= 2 {
        deck.push(SlideRecord::summary(
            deck.len(),
            "Summary",
            vec![
                format!("Source: {}", table.label),
                format!("Sheets: {}", table.sheets.len()),
                format!("Total rows: {}", total_rows),
            ],
        ));
    }

    renumber(&mut deck);
    deck
}

/// Model-assisted expand mode: one prompt, defensive recovery, schema
/// normalization.
pub fn expand_outline(
    client: &dyn ModelClient,
    table: &ParsedTable,
    config: &GenerationConfig,
    assets: &[String],
) -> Result<Vec<SlideRecord>> {
    let request = CompletionRequest {
        model: config.model.clone(),
        prompt: prompt::build_expand_prompt(table, config, assets),
        json_output: true,
    };

    let response = client.complete(&request)?;
    let values = recover::recover_slide_array(&response)?;

    let requested = config.effective_page_count();
    if values.len() != requested {
        log::warn!(
            "model returned {} slides, {} requested; keeping the model's count",
            values.len(),
            requested
        );
    }

    Ok(normalize_records(values))
}

/// Re-synthesize the slide at `index`, leaving every other record intact.
///
/// The replacement keeps the original position and re-attaches any
/// externally supplied image payload the previous record held; the model
/// never sees or regenerates binary assets.
pub fn regenerate_slide(
    client: &dyn ModelClient,
    deck: &[SlideRecord],
    index: usize,
    table: &ParsedTable,
    config: &GenerationConfig,
) -> Result<SlideRecord> {
    let previous = deck
        .get(index)
        .ok_or(SynthesisError::IndexOutOfBounds(index))?;

    let request = CompletionRequest {
        model: config.model.clone(),
        prompt: prompt::build_regen_prompt(deck, index, table, config),
        json_output: true,
    };

    let response = client.complete(&request)?;
    let values = recover::recover_slide_array(&response)?;
    let value = values
        .first()
        .ok_or_else(|| SynthesisError::WrongShape("empty slide array".to_string()))?;

    let mut replacement = normalize_record(index, value);

    if let Some(url) = previous.body.image_data_url() {
        if let SlideBody::ImageText { image_data_url, .. } = &mut replacement.body {
            if image_data_url.is_none() {
                *image_data_url = Some(url.to_string());
            }
        }
    }

    Ok(replacement)
}

/// Apply a free-text instruction to the whole deck. All-or-nothing: on any
/// failure the caller's deck is untouched.
pub fn modify_deck(
    client: &dyn ModelClient,
    deck: &[SlideRecord],
    instruction: &str,
    config: &GenerationConfig,
) -> Result<ModifyOutcome> {
    let request = CompletionRequest {
        model: config.model.clone(),
        prompt: prompt::build_modify_prompt(deck, instruction),
        json_output: true,
    };

    let response = client.complete(&request)?;
    let (values, summary) = recover::recover_modify(&response)?;

    Ok(ModifyOutcome {
        slides: normalize_records(values),
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckgen_schema::{CellValue, ParsedSheet, SynthesisMode};

    /// Model stub returning a fixed response.
    struct CannedClient(String);

    impl ModelClient for CannedClient {
        fn complete(&self, _request: &CompletionRequest) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    /// Model stub that always fails.
    struct FailingClient;

    impl ModelClient for FailingClient {
        fn complete(&self, _request: &CompletionRequest) -> Result<String> {
            Err(SynthesisError::MalformedResponse("no".to_string()))
        }
    }

    fn table_with_rows(rows: usize) -> ParsedTable {
        let mut sheet = ParsedSheet::new(
            "Sheet1",
            vec!["name".to_string(), "value".to_string(), "flag".to_string(), "extra".to_string()],
        );
        for i in 0..rows {
            sheet.push_row(vec![
                CellValue::Text(format!("item {}", i)),
                CellValue::Number(i as f64),
                CellValue::Bool(true),
                CellValue::Text("unused".to_string()),
            ]);
        }
        ParsedTable::new("data.xlsx", vec![sheet])
    }

    fn split_config(page_count: usize) -> GenerationConfig {
        GenerationConfig {
            mode: SynthesisMode::Split,
            page_count,
            ..Default::default()
        }
    }

    #[test]
    fn test_split_exact_count_and_partition() {
        // 24 rows over 6 pages: 1 title + 4 content x 6 rows + 1 summary
        let table = table_with_rows(24);
        let deck = split_outline(&table, &split_config(6));

        assert_eq!(deck.len(), 6);
        assert_eq!(deck[0].body.type_name(), "title");
        for slide in &deck[1..5] {
            assert_eq!(slide.body.type_name(), "content");
            assert_eq!(slide.body.bullets().unwrap().len(), 6);
        }
        assert_eq!(deck[5].body.type_name(), "summary");
    }

    #[test]
    fn test_split_deterministic() {
        let table = table_with_rows(10);
        let config = split_config(5);

        let a = split_outline(&table, &config);
        let b = split_outline(&table, &config);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_split_bullet_uses_first_three_pairs() {
        let table = table_with_rows(2);
        let deck = split_outline(&table, &split_config(3));

        let bullet = &deck[1].body.bullets().unwrap()[0];
        assert!(bullet.contains("name: item 0"));
        assert!(bullet.contains("flag: true"));
        assert!(!bullet.contains("extra"));
    }

    #[test]
    fn test_split_small_counts() {
        let table = table_with_rows(5);

        let two = split_outline(&table, &split_config(2));
        assert_eq!(two.len(), 2);
        assert_eq!(two[1].body.type_name(), "summary");

        let one = split_outline(&table, &split_config(1));
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].body.type_name(), "title");
    }

    #[test]
    fn test_split_more_pages_than_rows() {
        let table = table_with_rows(2);
        let deck = split_outline(&table, &split_config(8));
        assert_eq!(deck.len(), 8);
        assert!(deckgen_schema::is_numbered(&deck));
    }

    #[test]
    fn test_expand_normalizes_response() {
        let client = CannedClient(
            r#"```json
[{"type":"title","title":"Q3"},{"type":"chart","title":"Sales","chartType":"pie","chartData":{"labels":["A"],"values":[1]}}]
```"#
                .to_string(),
        );
        let table = table_with_rows(3);
        let config = GenerationConfig::default();

        let deck = expand_outline(&client, &table, &config, &[]).unwrap();
        assert_eq!(deck.len(), 2);
        assert_eq!(deck[0].index, 0);
        assert_eq!(deck[1].body.type_name(), "chart");
    }

    #[test]
    fn test_regenerate_preserves_position_and_image() {
        let table = table_with_rows(3);
        let config = GenerationConfig::default();
        let deck = vec![
            SlideRecord::content(0, "A", vec![]),
            SlideRecord {
                index: 1,
                title: "Pic".to_string(),
                notes: None,
                body: SlideBody::ImageText {
                    key_number: None,
                    key_number_label: None,
                    bullets: None,
                    image_data_url: Some("data:image/png;base64,AAAA".to_string()),
                },
            },
            SlideRecord::content(2, "C", vec![]),
        ];

        let client = CannedClient(
            r#"{"type":"image-text","title":"Better pic","keyNumber":"9x"}"#.to_string(),
        );
        let replacement = regenerate_slide(&client, &deck, 1, &table, &config).unwrap();

        assert_eq!(replacement.index, 1);
        assert_eq!(replacement.title, "Better pic");
        assert_eq!(
            replacement.body.image_data_url(),
            Some("data:image/png;base64,AAAA")
        );
    }

    #[test]
    fn test_regenerate_out_of_bounds() {
        let table = table_with_rows(1);
        let config = GenerationConfig::default();
        let deck = vec![SlideRecord::content(0, "A", vec![])];
        let client = CannedClient("[]".to_string());

        let result = regenerate_slide(&client, &deck, 5, &table, &config);
        assert!(matches!(result, Err(SynthesisError::IndexOutOfBounds(5))));
    }

    #[test]
    fn test_modify_returns_summary() {
        let client = CannedClient(
            r#"{"slides":[{"type":"content","title":"Only"}],"summary":"Condensed to one slide"}"#
                .to_string(),
        );
        let deck = vec![
            SlideRecord::content(0, "A", vec![]),
            SlideRecord::content(1, "B", vec![]),
        ];

        let outcome = modify_deck(&client, &deck, "merge everything", &GenerationConfig::default())
            .unwrap();
        assert_eq!(outcome.slides.len(), 1);
        assert_eq!(outcome.summary, "Condensed to one slide");
    }

    #[test]
    fn test_model_failure_propagates() {
        let table = table_with_rows(1);
        let result = expand_outline(&FailingClient, &table, &GenerationConfig::default(), &[]);
        assert!(matches!(result, Err(SynthesisError::MalformedResponse(_))));
    }
}
