//! Analysis prompt builder.
//!
//! The JSON schema requested here is the one `llm::parse` flattens. Changing
//! a key on one side means changing it on the other.

use crate::types::{SearchContext, VisualMatch};

/// Matches included in the prompt, in provider order.
pub const MAX_PROMPT_MATCHES: usize = 10;

const UNKNOWN: &str = "Unknown";
const NOT_AVAILABLE: &str = "N/A";
const NONE: &str = "None";

const INSTRUCTIONS: &str = "You are an expert art historian acting as a JSON API. Your task is to analyze image search results from Google Lens to identify the artist and artwork, then output the results strictly as a valid JSON object.

### INSTRUCTIONS:

1.  **Analyze the Visual Matches:** Carefully review the provided matches (titles, sources, URLs, prices) and additional context below.
2.  **Identify Artist & Artwork:**
    * Look for consistency across sources.
    * Prioritize reputable galleries or museums over generic marketplaces.
    * If you cannot identify the artist with >30% confidence, set the name to null.
3.  **Perform Analysis (for JSON output):**
    * Determine the style, medium, and period.
    * Identify notable characteristics.
    * Summarize why you assigned your specific confidence score (mentioning match consistency or lack thereof).";

const OUTPUT_FORMAT: &str = r#"### OUTPUT FORMAT:

Return ONLY a single valid JSON object. Do not include markdown formatting (like ```json), introduction text, or explanations outside the JSON.

Use this specific schema:
{
  "identification": {
    "artist_name": "Name or null",
    "artist_confidence_score": 0-100,
    "artwork_title": "Title or null",
    "artwork_confidence_score": 0-100
  },
  "analysis": {
    "style_and_medium": "Brief description of style, medium, and period",
    "visual_characteristics": "Notable themes or details visible in the matches"
  }
}"#;

/// Build the identification prompt from search results.
///
/// Deterministic: identical inputs always produce identical output.
pub fn build_prompt(matches: &[VisualMatch], total_count: usize, context: &SearchContext) -> String {
    let matches_text = matches
        .iter()
        .take(MAX_PROMPT_MATCHES)
        .enumerate()
        .map(|(i, m)| render_match(i + 1, m))
        .collect::<Vec<_>>()
        .join("\n\n");

    let or_none = |v: &Option<String>| v.as_deref().unwrap_or(NONE).to_string();

    format!(
        "{INSTRUCTIONS}

### INPUT DATA:

{matches_text}

Additional Context:
- Total matches found: {total_count}
- Text extracted: {text}
- Best guess: {best_guess}
- Categories: {categories}

{OUTPUT_FORMAT}",
        text = or_none(&context.extracted_text),
        best_guess = or_none(&context.best_guess_label),
        categories = or_none(&context.categories),
    )
}

fn render_match(index: usize, m: &VisualMatch) -> String {
    format!(
        "Match {index}:\n  Title: {}\n  Source: {}\n  URL: {}\n  Price: {}",
        non_empty(m.title.as_deref()).unwrap_or(UNKNOWN),
        non_empty(m.source.as_deref()).unwrap_or(UNKNOWN),
        non_empty(m.link.as_deref()).unwrap_or(NOT_AVAILABLE),
        non_empty(m.price_value()).unwrap_or(NOT_AVAILABLE),
    )
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Price;

    fn numbered_matches(n: usize) -> Vec<VisualMatch> {
        (1..=n)
            .map(|i| VisualMatch {
                position: Some(i as u32),
                title: Some(format!("Title {i}")),
                source: Some(format!("Source {i}")),
                link: Some(format!("https://example.com/{i}")),
                thumbnail: None,
                price: None,
            })
            .collect()
    }

    #[test]
    fn test_truncates_to_ten_matches() {
        let matches = numbered_matches(15);
        let prompt = build_prompt(&matches, matches.len(), &SearchContext::default());

        assert!(prompt.contains("Match 10:\n  Title: Title 10"));
        assert!(!prompt.contains("Match 11:"));
        assert!(!prompt.contains("Title 11"));
        assert_eq!(prompt.matches("\n  Title: ").count(), 10);
        assert!(prompt.contains("- Total matches found: 15"));
    }

    #[test]
    fn test_missing_match_fields_use_literal_placeholders() {
        let matches = vec![VisualMatch::default()];
        let prompt = build_prompt(&matches, 1, &SearchContext::default());

        assert!(prompt.contains(
            "Match 1:\n  Title: Unknown\n  Source: Unknown\n  URL: N/A\n  Price: N/A"
        ));
    }

    #[test]
    fn test_price_without_value_is_not_available() {
        let matches = vec![VisualMatch {
            price: Some(Price {
                value: None,
                extracted_value: Some(12.0),
                currency: Some("$".into()),
            }),
            ..VisualMatch::default()
        }];
        let prompt = build_prompt(&matches, 1, &SearchContext::default());
        assert!(prompt.contains("  Price: N/A"));
    }

    #[test]
    fn test_price_value_rendered() {
        let matches = vec![VisualMatch {
            price: Some(Price {
                value: Some("$1,200.00*".into()),
                ..Price::default()
            }),
            ..VisualMatch::default()
        }];
        let prompt = build_prompt(&matches, 1, &SearchContext::default());
        assert!(prompt.contains("  Price: $1,200.00*"));
    }

    #[test]
    fn test_missing_context_defaults_to_none() {
        let prompt = build_prompt(&[], 0, &SearchContext::default());

        assert!(prompt.contains("- Text extracted: None\n"));
        assert!(prompt.contains("- Best guess: None\n"));
        assert!(prompt.contains("- Categories: None\n"));
        assert!(prompt.contains("- Total matches found: 0\n"));
    }

    #[test]
    fn test_context_rendered() {
        let context = SearchContext {
            visual_matches: vec![],
            extracted_text: Some("V. van Gogh 1889".into()),
            best_guess_label: Some("The Starry Night".into()),
            categories: Some("Painting by Vincent van Gogh".into()),
        };
        let prompt = build_prompt(&[], 0, &context);

        assert!(prompt.contains("- Text extracted: V. van Gogh 1889\n"));
        assert!(prompt.contains("- Best guess: The Starry Night\n"));
        assert!(prompt.contains("- Categories: Painting by Vincent van Gogh\n"));
    }

    #[test]
    fn test_template_carries_schema_and_rules() {
        let prompt = build_prompt(&numbered_matches(1), 1, &SearchContext::default());

        assert!(prompt.starts_with("You are an expert art historian acting as a JSON API."));
        assert!(prompt.contains("Look for consistency across sources."));
        assert!(prompt.contains("Prioritize reputable galleries or museums"));
        assert!(prompt.contains(">30% confidence, set the name to null"));
        assert!(prompt.contains("Return ONLY a single valid JSON object."));
        for key in [
            "\"identification\"",
            "\"artist_name\"",
            "\"artist_confidence_score\"",
            "\"artwork_title\"",
            "\"artwork_confidence_score\"",
            "\"analysis\"",
            "\"style_and_medium\"",
            "\"visual_characteristics\"",
        ] {
            assert!(prompt.contains(key), "missing schema key {key}");
        }
    }

    #[test]
    fn test_deterministic() {
        let matches = numbered_matches(12);
        let context = SearchContext {
            best_guess_label: Some("Water Lilies".into()),
            ..SearchContext::default()
        };
        assert_eq!(
            build_prompt(&matches, 12, &context),
            build_prompt(&matches, 12, &context)
        );
    }
}
