use serde::{Deserialize, Serialize};

/// Upper bound on suggestions attached to one analysis.
pub const MAX_SUGGESTIONS: usize = 5;

/// Supportive analysis attached to a check-in.
///
/// Wire names match the mobile client (`analise`, `sugestoes`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiAnalysis {
    #[serde(rename = "analise")]
    pub text: String,
    #[serde(rename = "sugestoes")]
    pub suggestions: Vec<String>,
}

impl AiAnalysis {
    /// Builds an analysis, dropping repeated suggestions (first occurrence
    /// wins) and keeping at most [`MAX_SUGGESTIONS`].
    pub fn new(text: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self {
            text: text.into(),
            suggestions: dedupe_and_cap(suggestions),
        }
    }
}

fn dedupe_and_cap(suggestions: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(MAX_SUGGESTIONS);
    for suggestion in suggestions {
        if unique.len() == MAX_SUGGESTIONS {
            break;
        }
        if !unique.contains(&suggestion) {
            unique.push(suggestion);
        }
    }
    unique
}

/// Which path produced an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnalysisSource {
    Gemini { model: String },
    Local,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn duplicates_keep_first_position() {
        let analysis = AiAnalysis::new("ok", owned(&["a", "b", "a", "c", "b"]));
        assert_eq!(analysis.suggestions, owned(&["a", "b", "c"]));
    }

    #[test]
    fn caps_after_deduplication() {
        let analysis = AiAnalysis::new("ok", owned(&["a", "a", "b", "c", "d", "e", "f"]));
        assert_eq!(analysis.suggestions, owned(&["a", "b", "c", "d", "e"]));
    }

    #[test]
    fn serializes_with_client_field_names() {
        let analysis = AiAnalysis::new("Tudo certo.", owned(&["Pausa"]));
        let value = serde_json::to_value(&analysis).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "analise": "Tudo certo.", "sugestoes": ["Pausa"] })
        );
    }

    #[test]
    fn source_is_tagged() {
        let value = serde_json::to_value(AnalysisSource::Gemini {
            model: "gemini-pro".into(),
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({ "kind": "gemini", "model": "gemini-pro" }));
    }
}
