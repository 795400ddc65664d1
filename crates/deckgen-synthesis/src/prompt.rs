//! Prompt construction for the three model-assisted operations.

use deckgen_schema::{Complexity, GenerationConfig, ParsedTable, SlideRecord};

/// The output contract shared by every slide-producing prompt.
const SLIDE_CONTRACT: &str = r#"Each slide object has these fields:
- "type": one of "title", "agenda", "content", "two-column", "comparison", "chart", "image-text", "summary"
- "title": string (always present)
- "notes": string of speaker notes (always present)
- type "title" adds: "subtitle" (string)
- types "agenda", "content", "summary" add: "bullets" (array of strings)
- types "two-column", "comparison" add: "columns" (array of exactly two {"header": string, "items": [string]})
- type "chart" adds: "chartType" ("bar"|"pie"|"line"), "chartData" ({"labels": [string], "values": [number]}), optional "bullets"
- type "image-text" adds: optional "keyNumber" (string), "keyNumberLabel" (string), "bullets"
Labels and values arrays must have equal length. Do not include an "index" field."#;

fn tier_guidance(complexity: Complexity) -> &'static str {
    match complexity {
        Complexity::Simple => "Keep the deck minimal: short titles, at most three bullets per slide.",
        Complexity::Standard => "Aim for a balanced deck with three to five bullets per slide.",
        Complexity::Rich => {
            "Make the deck vivid: use varied slide types, include at least one chart and one comparison where the data allows."
        }
    }
}

/// Build the full-deck expansion prompt.
pub fn build_expand_prompt(
    table: &ParsedTable,
    config: &GenerationConfig,
    assets: &[String],
) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "You are preparing a presentation outline from tabular source data.\n\
         Produce exactly {} slides as a single JSON array of slide objects.\n\n",
        config.effective_page_count()
    ));
    prompt.push_str(SLIDE_CONTRACT);
    prompt.push_str("\n\n");
    prompt.push_str(tier_guidance(config.complexity));
    prompt.push('\n');

    if let Some(instructions) = &config.instructions {
        prompt.push_str(&format!("\nDesign instructions: {}\n", instructions));
    }
    if !config.templates.is_empty() {
        prompt.push_str(&format!(
            "\nFollow this slide-type sequence where sensible: {}\n",
            config.templates.join(", ")
        ));
    }
    for asset in assets {
        prompt.push_str(&format!("\nReference asset: {}\n", asset));
    }

    prompt.push_str(&format!(
        "\nSource data (\"{}\"):\n{}\n\nRespond with the JSON array only.",
        table.label, table.text_summary
    ));

    prompt
}

/// Build the single-slide re-synthesis prompt: target record plus its
/// immediate neighbors for continuity.
pub fn build_regen_prompt(
    deck: &[SlideRecord],
    index: usize,
    table: &ParsedTable,
    config: &GenerationConfig,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are revising one slide of an existing presentation.\n\
         Produce a single replacement slide as one JSON object.\n\n",
    );
    prompt.push_str(SLIDE_CONTRACT);
    prompt.push_str("\n\n");
    prompt.push_str(tier_guidance(config.complexity));
    prompt.push('\n');

    if index > 0 {
        if let Some(prev) = deck.get(index - 1) {
            prompt.push_str(&format!(
                "\nPrevious slide (context only):\n{}\n",
                serde_json::to_string(prev).unwrap_or_default()
            ));
        }
    }
    if let Some(target) = deck.get(index) {
        prompt.push_str(&format!(
            "\nSlide to replace:\n{}\n",
            serde_json::to_string(target).unwrap_or_default()
        ));
    }
    if let Some(next) = deck.get(index + 1) {
        prompt.push_str(&format!(
            "\nNext slide (context only):\n{}\n",
            serde_json::to_string(next).unwrap_or_default()
        ));
    }

    prompt.push_str(&format!(
        "\nSource data (\"{}\"):\n{}\n\nRespond with the single JSON object only.",
        table.label, table.text_summary
    ));

    prompt
}

/// Build the free-text modify prompt: whole deck plus the instruction.
pub fn build_modify_prompt(deck: &[SlideRecord], instruction: &str) -> String {
    format!(
        "You are editing a presentation according to an instruction.\n\n{}\n\n\
         Current deck:\n{}\n\nInstruction: {}\n\n\
         Respond with a JSON object {{\"slides\": [...], \"summary\": \"one sentence describing the change\"}} \
         containing the complete updated deck.",
        SLIDE_CONTRACT,
        serde_json::to_string(deck).unwrap_or_default(),
        instruction
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckgen_schema::{ParsedSheet, SynthesisMode};

    fn sample_table() -> ParsedTable {
        let mut sheet = ParsedSheet::new("S", vec!["a".to_string()]);
        sheet.push_row(vec![deckgen_schema::CellValue::Text("x".to_string())]);
        ParsedTable::new("report.xlsx", vec![sheet])
    }

    #[test]
    fn test_expand_prompt_embeds_summary_and_count() {
        let table = sample_table();
        let config = GenerationConfig {
            mode: SynthesisMode::Expand,
            page_count: 6,
            instructions: Some("use a dark mood".to_string()),
            templates: vec!["title".to_string(), "chart".to_string()],
            ..Default::default()
        };

        let prompt = build_expand_prompt(&table, &config, &["logo description".to_string()]);
        assert!(prompt.contains("exactly 6 slides"));
        assert!(prompt.contains(&table.text_summary));
        assert!(prompt.contains("use a dark mood"));
        assert!(prompt.contains("title, chart"));
        assert!(prompt.contains("logo description"));
        assert!(prompt.contains("\"chartType\""));
    }

    #[test]
    fn test_regen_prompt_includes_neighbors_only() {
        let table = sample_table();
        let config = GenerationConfig::default();
        let deck = vec![
            SlideRecord::content(0, "Zero", vec![]),
            SlideRecord::content(1, "One", vec![]),
            SlideRecord::content(2, "Two", vec![]),
            SlideRecord::content(3, "Three", vec![]),
        ];

        let prompt = build_regen_prompt(&deck, 1, &table, &config);
        assert!(prompt.contains("Zero"));
        assert!(prompt.contains("One"));
        assert!(prompt.contains("Two"));
        assert!(!prompt.contains("Three"));
    }

    #[test]
    fn test_modify_prompt_carries_deck_and_instruction() {
        let deck = vec![SlideRecord::content(0, "Intro", vec![])];
        let prompt = build_modify_prompt(&deck, "make it shorter");
        assert!(prompt.contains("Intro"));
        assert!(prompt.contains("make it shorter"));
        assert!(prompt.contains("\"summary\""));
    }
}
