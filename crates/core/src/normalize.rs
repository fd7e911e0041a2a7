//! Model-output normalization.
//!
//! The generative model is asked for strict JSON but never trusted to
//! produce it. This module strips Markdown fences, rescues JSON embedded
//! in prose, accepts the known response-shape variants in a fixed
//! priority order, rescales unit-normalized coordinates onto the 0-1000
//! grid, and enforces the three-persona contract. Anything that matches
//! no known shape is rejected rather than guessed at.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::persona::Persona;

/// Coordinate grid upper bound for highlight locations.
pub const COORD_MAX: i64 = 1000;

// ---------------------------------------------------------------------------
// Canonical shapes
// ---------------------------------------------------------------------------

/// Whether a highlight marks something working or something broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightKind {
    Good,
    Bad,
}

/// A single annotated point or region of interest on the outfit image.
///
/// Exactly one of `box_2d` / `point_2d` is expected; coordinates are
/// integers on the 0-1000 grid after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    #[serde(rename = "type")]
    pub kind: HighlightKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_2d: Option<[i64; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_2d: Option<[i64; 2]>,
}

/// One persona's critique of the outfit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaCritique {
    pub persona: Persona,
    pub score: u8,
    pub title: String,
    pub critique: String,
    #[serde(default)]
    pub improvement_tip: String,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
}

/// The restyle flow's parsed result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleResult {
    #[serde(default)]
    pub user_analysis: String,
    #[serde(default)]
    pub outfit_name: String,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub dos: Vec<String>,
    #[serde(default)]
    pub donts: Vec<String>,
    #[serde(default)]
    pub visual_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_image_data_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Strip opening/closing Markdown code fences and trim whitespace.
fn strip_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Locate the first balanced `{...}` or `[...]` span, skipping string
/// literals and escapes. Used as a rescue pass when the model wraps its
/// JSON in prose.
fn balanced_span(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let start = text.find(['{', '['])?;
    let open = bytes[start];
    let close = if open == b'{' { b'}' } else { b']' };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            _ if b == open => depth += 1,
            _ if b == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse model text into a JSON value, fences stripped, with a
/// brace-matching rescue pass on failure.
pub fn parse_model_json(raw: &str) -> Result<Value, CoreError> {
    let cleaned = strip_fences(raw);
    if let Ok(value) = serde_json::from_str(&cleaned) {
        return Ok(value);
    }
    if let Some(span) = balanced_span(&cleaned) {
        if let Ok(value) = serde_json::from_str(span) {
            return Ok(value);
        }
    }
    Err(CoreError::MalformedModelOutput(
        "response text is not parseable JSON".into(),
    ))
}

/// Normalize the known critique-response shapes to a flat array.
///
/// Priority order: bare array, `{ "results": [...] }`, then (defensive)
/// an object whose own values are the persona objects. Anything else is
/// rejected.
fn coerce_result_array(value: Value) -> Result<Vec<Value>, CoreError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            if let Some(Value::Array(items)) = map.remove("results") {
                return Ok(items);
            }
            let mut items = Vec::new();
            for (key, entry) in map {
                if let Value::Object(mut obj) = entry {
                    // Object-of-personas: the key carries the persona id.
                    obj.entry("persona").or_insert(Value::String(key));
                    items.push(Value::Object(obj));
                }
            }
            if items.is_empty() {
                Err(CoreError::MalformedModelOutput(
                    "response object matches no known critique shape".into(),
                ))
            } else {
                Ok(items)
            }
        }
        _ => Err(CoreError::MalformedModelOutput(
            "response is neither an array nor an object".into(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Coordinate rescaling
// ---------------------------------------------------------------------------

/// Rescale coordinate components onto the 0-1000 grid.
///
/// The model sometimes emits unit-normalized reals despite the prompt;
/// when every component is <= 1 the array is scaled by 1000 and rounded
/// to the nearest integer. Already-scaled arrays pass through unchanged
/// (making the operation idempotent), and every output component is
/// clamped into [0, 1000].
pub fn rescale_components(components: &[f64]) -> Vec<i64> {
    let unit_normalized = !components.is_empty() && components.iter().all(|c| *c <= 1.0);
    components
        .iter()
        .map(|c| {
            let scaled = if unit_normalized { c * 1000.0 } else { *c };
            (scaled.round() as i64).clamp(0, COORD_MAX)
        })
        .collect()
}

/// Rewrite `box_2d` / `point_2d` arrays inside a highlight object.
fn normalize_location_fields(highlight: &mut Value) {
    let Some(obj) = highlight.as_object_mut() else {
        return;
    };
    for field in ["box_2d", "point_2d"] {
        if let Some(Value::Array(raw)) = obj.get(field) {
            let components: Vec<f64> = raw.iter().filter_map(Value::as_f64).collect();
            if components.len() != raw.len() {
                continue; // non-numeric junk; let deserialization reject it
            }
            let scaled = rescale_components(&components);
            obj.insert(
                field.to_string(),
                Value::Array(scaled.into_iter().map(Value::from).collect()),
            );
        }
    }
}

/// Round and clamp a critique's score into the 1-10 contract.
fn normalize_score(critique: &mut Value) {
    let Some(obj) = critique.as_object_mut() else {
        return;
    };
    if let Some(score) = obj.get("score").and_then(Value::as_f64) {
        let clamped = (score.round() as i64).clamp(1, 10);
        obj.insert("score".to_string(), Value::from(clamped));
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Normalize raw model text into exactly three persona critiques.
///
/// Wrong persona cardinality, duplicate or unknown identities, and
/// unparseable text are all surfaced as [`CoreError::MalformedModelOutput`]
/// -- never silently coerced into a partial result.
pub fn normalize_critiques(raw: &str) -> Result<Vec<PersonaCritique>, CoreError> {
    let value = parse_model_json(raw)?;
    let mut items = coerce_result_array(value)?;

    for item in &mut items {
        normalize_score(item);
        if let Some(highlights) = item.get_mut("highlights").and_then(Value::as_array_mut) {
            for highlight in highlights {
                normalize_location_fields(highlight);
            }
        }
    }

    let critiques: Vec<PersonaCritique> = items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item)
                .map_err(|e| CoreError::MalformedModelOutput(format!("Invalid critique entry: {e}")))
        })
        .collect::<Result<_, _>>()?;

    let identities: HashSet<Persona> = critiques.iter().map(|c| c.persona).collect();
    if critiques.len() != Persona::ALL.len() || identities.len() != Persona::ALL.len() {
        return Err(CoreError::MalformedModelOutput(format!(
            "Expected exactly {} distinct personas, got {} entries",
            Persona::ALL.len(),
            critiques.len(),
        )));
    }

    Ok(critiques)
}

/// Normalize raw model text into a [`StyleResult`].
pub fn normalize_style(raw: &str) -> Result<StyleResult, CoreError> {
    let value = parse_model_json(raw)?;
    if !value.is_object() {
        return Err(CoreError::MalformedModelOutput(
            "style response is not a JSON object".into(),
        ));
    }
    serde_json::from_value(value)
        .map_err(|e| CoreError::MalformedModelOutput(format!("Invalid style result: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn critique_entry(persona: &str) -> Value {
        json!({
            "persona": persona,
            "score": 7,
            "title": "Solid silhouette",
            "critique": "The proportions work.",
            "improvement_tip": "Swap the belt.",
            "highlights": [
                { "type": "good", "label": "Tailoring", "box_2d": [100, 200, 300, 400] }
            ]
        })
    }

    fn full_array() -> Value {
        json!([
            critique_entry("editor"),
            critique_entry("hypebeast"),
            critique_entry("boho"),
        ])
    }

    #[test]
    fn accepts_bare_array() {
        let raw = full_array().to_string();
        let critiques = normalize_critiques(&raw).unwrap();
        assert_eq!(critiques.len(), 3);
        assert_eq!(critiques[0].persona, Persona::Editor);
    }

    #[test]
    fn accepts_results_wrapper() {
        let raw = json!({ "results": full_array() }).to_string();
        assert_eq!(normalize_critiques(&raw).unwrap().len(), 3);
    }

    #[test]
    fn accepts_object_of_personas() {
        let raw = json!({
            "editor": critique_entry("editor"),
            "hypebeast": critique_entry("hypebeast"),
            "boho": critique_entry("boho"),
        });
        // Drop the embedded persona field so the map key must supply it.
        let raw = {
            let mut v = raw;
            for key in ["editor", "hypebeast", "boho"] {
                v[key].as_object_mut().unwrap().remove("persona");
            }
            v.to_string()
        };
        let critiques = normalize_critiques(&raw).unwrap();
        let ids: HashSet<Persona> = critiques.iter().map(|c| c.persona).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn strips_code_fences() {
        let raw = format!("```json\n{}\n```", full_array());
        assert_eq!(normalize_critiques(&raw).unwrap().len(), 3);
    }

    #[test]
    fn rescues_json_embedded_in_prose() {
        let raw = format!(
            "Here is your critique!\n{}\nHope that helps.",
            json!({ "results": full_array() })
        );
        assert_eq!(normalize_critiques(&raw).unwrap().len(), 3);
    }

    #[test]
    fn rejects_unparseable_text() {
        assert_matches!(
            normalize_critiques("sorry, I cannot help with that"),
            Err(CoreError::MalformedModelOutput(_))
        );
    }

    #[test]
    fn rejects_wrong_persona_count() {
        let raw = json!([critique_entry("editor"), critique_entry("boho")]).to_string();
        assert_matches!(
            normalize_critiques(&raw),
            Err(CoreError::MalformedModelOutput(_))
        );
    }

    #[test]
    fn rejects_duplicate_personas() {
        let raw = json!([
            critique_entry("editor"),
            critique_entry("editor"),
            critique_entry("boho"),
        ])
        .to_string();
        assert_matches!(
            normalize_critiques(&raw),
            Err(CoreError::MalformedModelOutput(_))
        );
    }

    #[test]
    fn rejects_unknown_persona() {
        let raw = json!([
            critique_entry("editor"),
            critique_entry("hypebeast"),
            critique_entry("influencer"),
        ])
        .to_string();
        assert_matches!(
            normalize_critiques(&raw),
            Err(CoreError::MalformedModelOutput(_))
        );
    }

    #[test]
    fn rescales_unit_normalized_box() {
        assert_eq!(
            rescale_components(&[0.1, 0.25, 0.8, 1.0]),
            vec![100, 250, 800, 1000]
        );
    }

    #[test]
    fn leaves_scaled_coordinates_alone() {
        assert_eq!(
            rescale_components(&[100.0, 250.0, 800.0, 1000.0]),
            vec![100, 250, 800, 1000]
        );
        // A single component above 1 disables rescaling for the array.
        assert_eq!(rescale_components(&[0.5, 400.0]), vec![1, 400]);
    }

    #[test]
    fn rescaling_is_idempotent() {
        let once = rescale_components(&[0.1, 0.9]);
        let twice: Vec<i64> =
            rescale_components(&once.iter().map(|c| *c as f64).collect::<Vec<_>>());
        assert_eq!(once, twice);
    }

    #[test]
    fn clamps_out_of_range_coordinates() {
        assert_eq!(rescale_components(&[1200.0, -5.0]), vec![1000, 0]);
    }

    #[test]
    fn rounds_to_nearest_integer() {
        assert_eq!(rescale_components(&[0.1234, 0.9876]), vec![123, 988]);
    }

    #[test]
    fn unit_normalized_point_in_critique_is_rescaled() {
        let mut entry = critique_entry("editor");
        entry["highlights"] = json!([
            { "type": "bad", "label": "Clashing colors", "point_2d": [0.42, 0.77] }
        ]);
        let raw = json!([entry, critique_entry("hypebeast"), critique_entry("boho")]).to_string();
        let critiques = normalize_critiques(&raw).unwrap();
        assert_eq!(critiques[0].highlights[0].point_2d, Some([420, 770]));
    }

    #[test]
    fn normalization_is_idempotent_end_to_end() {
        let raw = json!({ "results": full_array() }).to_string();
        let once = normalize_critiques(&raw).unwrap();
        let reserialized = serde_json::to_string(&once).unwrap();
        let twice = normalize_critiques(&reserialized).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn fractional_scores_round_and_clamp() {
        let mut entry = critique_entry("editor");
        entry["score"] = json!(7.6);
        let mut high = critique_entry("hypebeast");
        high["score"] = json!(14);
        let mut low = critique_entry("boho");
        low["score"] = json!(0);
        let raw = json!([entry, high, low]).to_string();
        let critiques = normalize_critiques(&raw).unwrap();
        assert_eq!(critiques[0].score, 8);
        assert_eq!(critiques[1].score, 10);
        assert_eq!(critiques[2].score, 1);
    }

    #[test]
    fn style_result_parses_with_defaults() {
        let raw = json!({
            "user_analysis": "Warm autumn coloring.",
            "outfit_name": "Desert Rockstar",
            "items": ["leather jacket", "white tee"],
            "reasoning": "Contrast against the coloring.",
            "dos": ["roll the sleeves"],
            "donts": ["no baggy denim"],
            "visual_prompt": "Photoreal fashion shot of a leather jacket outfit"
        })
        .to_string();
        let style = normalize_style(&raw).unwrap();
        assert_eq!(style.outfit_name, "Desert Rockstar");
        assert_eq!(style.items.len(), 2);
        assert!(style.generated_image_data_url.is_none());
    }

    #[test]
    fn style_rejects_non_object() {
        assert_matches!(
            normalize_style("[1, 2, 3]"),
            Err(CoreError::MalformedModelOutput(_))
        );
    }

    #[test]
    fn style_accepts_fenced_output() {
        let raw = "```json\n{\"outfit_name\": \"Old Money\"}\n```";
        assert_eq!(normalize_style(raw).unwrap().outfit_name, "Old Money");
    }
}
