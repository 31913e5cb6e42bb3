//! Remote analysis with local fallback.
//!
//! [`AnalysisService::fetch_analysis`] never fails: any provider problem is
//! logged and answered by [`rules::analyze`].

use std::sync::Arc;

use serde::Deserialize;

use crate::config::GeminiConfig;
use crate::models::analysis::{AiAnalysis, AnalysisSource};
use crate::models::check_in::Questionnaire;
use crate::models::mood::FotoStatus;
use crate::services::gemini::{GeminiClient, TextGenerator};
use crate::services::rules;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ResponseError {
    #[error("response is not valid JSON: {0}")]
    Json(String),

    #[error("field 'analise' is missing or empty")]
    MissingText,

    #[error("field 'sugestoes' is missing or not a list of strings")]
    InvalidSuggestions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub analysis: AiAnalysis,
    pub source: AnalysisSource,
}

impl AnalysisOutcome {
    fn local(input: &Questionnaire) -> Self {
        Self {
            analysis: rules::analyze(input),
            source: AnalysisSource::Local,
        }
    }
}

#[derive(Clone)]
pub struct AnalysisService {
    generator: Option<Arc<dyn TextGenerator>>,
    models: Vec<String>,
}

impl AnalysisService {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, models: Vec<String>) -> Self {
        Self { generator, models }
    }

    pub fn from_config(config: &GeminiConfig) -> anyhow::Result<Self> {
        let generator = GeminiClient::from_config(config)?
            .map(|client| Arc::new(client) as Arc<dyn TextGenerator>);
        Ok(Self::new(generator, config.models.clone()))
    }

    /// Always-local service, used when no provider key is present.
    pub fn local_only() -> Self {
        Self::new(None, Vec::new())
    }

    pub fn is_remote_enabled(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn fetch_analysis(&self, input: &Questionnaire, foto: FotoStatus) -> AnalysisOutcome {
        let Some(generator) = self.generator.as_deref() else {
            tracing::info!("Gemini not configured, using local analysis");
            return AnalysisOutcome::local(input);
        };

        let prompt = build_prompt(input, foto);
        let total = self.models.len();

        for (attempt, model) in self.models.iter().enumerate() {
            tracing::debug!(model = %model, attempt = attempt + 1, total, "Requesting Gemini analysis");

            let text = match generator.generate(model, &prompt).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(model = %model, error = %e, "Gemini model failed, trying next");
                    continue;
                }
            };

            return match parse_response(&text) {
                Ok(analysis) => {
                    tracing::info!(model = %model, "Gemini analysis generated");
                    AnalysisOutcome {
                        analysis,
                        source: AnalysisSource::Gemini {
                            model: model.clone(),
                        },
                    }
                }
                Err(e) => {
                    tracing::warn!(model = %model, error = %e, "Unusable Gemini response, using local analysis");
                    AnalysisOutcome::local(input)
                }
            };
        }

        tracing::warn!(attempted = total, "No Gemini model available, using local analysis");
        AnalysisOutcome::local(input)
    }
}

pub fn build_prompt(input: &Questionnaire, foto: FotoStatus) -> String {
    let capture = match foto {
        FotoStatus::Capturada => "Realizada",
        FotoStatus::NaoCapturada => "Não realizada",
    };

    format!(
        r#"Você é um assistente de bem-estar emocional especializado em saúde mental no trabalho.

Analise os seguintes dados de um trabalhador e forneça uma análise empática e construtiva:

**Dados do Check-in:**
- Humor: {humor}
- Nível de Energia: {energia}
- Qualidade do Sono: {sono}
- Contexto adicional: {contexto}
- Status da captura facial: {capture}

**Sua tarefa:**
1. Forneça uma análise empática e profissional sobre o estado atual do trabalhador
2. Identifique possíveis sinais de alerta (cansaço, burnout, estresse)
3. Sugira de 3 a 5 ações práticas e específicas que o trabalhador pode fazer

**IMPORTANTE:**
- Seja empático e encorajador
- Use linguagem clara e acessível
- Foque em ações práticas e realizáveis
- Se detectar sinais graves (exaustão, burnout), recomende buscar ajuda profissional

**Formato de resposta (JSON):**
{{
  "analise": "Sua análise textual aqui (2-4 frases)",
  "sugestoes": [
    "Sugestão 1 específica e prática",
    "Sugestão 2 específica e prática",
    "Sugestão 3 específica e prática",
    "Sugestão 4 específica e prática (opcional)",
    "Sugestão 5 específica e prática (opcional)"
  ]
}}

Responda APENAS com o JSON, sem texto adicional."#,
        humor = input.humor,
        energia = input.energia,
        sono = input.sono,
        contexto = input.note().unwrap_or("Não fornecido"),
    )
}

#[derive(Deserialize)]
struct RawAnalysis {
    analise: Option<serde_json::Value>,
    sugestoes: Option<serde_json::Value>,
}

fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .trim_end()
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Validates a provider reply of shape `{analise: string, sugestoes: string[]}`.
pub fn parse_response(text: &str) -> Result<AiAnalysis, ResponseError> {
    let raw: RawAnalysis = serde_json::from_str(strip_code_fences(text))
        .map_err(|e| ResponseError::Json(e.to_string()))?;

    let analise = raw
        .analise
        .as_ref()
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ResponseError::MissingText)?;

    let sugestoes = raw
        .sugestoes
        .as_ref()
        .and_then(|v| v.as_array())
        .ok_or(ResponseError::InvalidSuggestions)?
        .iter()
        .map(|v| v.as_str().map(String::from))
        .collect::<Option<Vec<_>>>()
        .ok_or(ResponseError::InvalidSuggestions)?;

    Ok(AiAnalysis::new(analise, sugestoes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::mood::{Energia, Humor, Sono};
    use crate::services::gemini::GenerationError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays scripted replies and records which models were asked.
    struct ScriptedGenerator {
        replies: Mutex<Vec<Result<String, GenerationError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(replies: Vec<Result<String, GenerationError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, model: &str, _prompt: &str) -> Result<String, GenerationError> {
            self.calls.lock().unwrap().push(model.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(GenerationError::EmptyResponse))
        }
    }

    fn failure() -> Result<String, GenerationError> {
        Err(GenerationError::Status {
            status: 503,
            body: "unavailable".into(),
        })
    }

    fn models() -> Vec<String> {
        vec!["m1".into(), "m2".into(), "m3".into()]
    }

    fn input() -> Questionnaire {
        Questionnaire {
            humor: Humor::Cansado,
            energia: Energia::Baixa,
            sono: Sono::Ruim,
            justificativa: Some("prazo apertado".into()),
        }
    }

    fn service(generator: &Arc<ScriptedGenerator>) -> AnalysisService {
        AnalysisService::new(Some(generator.clone() as Arc<dyn TextGenerator>), models())
    }

    #[tokio::test]
    async fn unconfigured_matches_local_rules() {
        let outcome = AnalysisService::local_only()
            .fetch_analysis(&input(), FotoStatus::Capturada)
            .await;
        assert_eq!(outcome.analysis, rules::analyze(&input()));
        assert_eq!(outcome.source, AnalysisSource::Local);
    }

    #[tokio::test]
    async fn first_success_stops_the_loop() {
        let generator = ScriptedGenerator::new(vec![Ok(
            r#"{"analise":"Você merece descanso.","sugestoes":["Pausa","Água"]}"#.into(),
        )]);

        let outcome = service(&generator)
            .fetch_analysis(&input(), FotoStatus::NaoCapturada)
            .await;

        assert_eq!(generator.calls(), vec!["m1"]);
        assert_eq!(outcome.analysis.text, "Você merece descanso.");
        assert_eq!(outcome.analysis.suggestions, vec!["Pausa", "Água"]);
        assert_eq!(outcome.source, AnalysisSource::Gemini { model: "m1".into() });
    }

    #[tokio::test]
    async fn failed_models_are_skipped_in_order() {
        let generator = ScriptedGenerator::new(vec![
            failure(),
            Ok("```json\n{\"analise\":\"Ok.\",\"sugestoes\":[]}\n```".into()),
        ]);

        let outcome = service(&generator)
            .fetch_analysis(&input(), FotoStatus::Capturada)
            .await;

        assert_eq!(generator.calls(), vec!["m1", "m2"]);
        assert_eq!(outcome.source, AnalysisSource::Gemini { model: "m2".into() });
        assert!(outcome.analysis.suggestions.is_empty());
    }

    #[tokio::test]
    async fn exhausted_models_fall_back() {
        let generator = ScriptedGenerator::new(vec![failure(), failure(), failure()]);

        let outcome = service(&generator)
            .fetch_analysis(&input(), FotoStatus::Capturada)
            .await;

        assert_eq!(generator.calls(), vec!["m1", "m2", "m3"]);
        assert_eq!(outcome, AnalysisOutcome::local(&input()));
    }

    #[tokio::test]
    async fn malformed_reply_falls_back_without_retrying() {
        let generator = ScriptedGenerator::new(vec![Ok("Claro! Aqui vai.".into())]);

        let outcome = service(&generator)
            .fetch_analysis(&input(), FotoStatus::Capturada)
            .await;

        assert_eq!(generator.calls(), vec!["m1"]);
        assert_eq!(outcome.analysis, rules::analyze(&input()));
        assert_eq!(outcome.source, AnalysisSource::Local);
    }

    #[test]
    fn parse_truncates_and_dedupes() {
        let analysis = parse_response(
            r#"{"analise":"x","sugestoes":["a","b","a","c","d","e","f"]}"#,
        )
        .unwrap();
        assert_eq!(analysis.suggestions, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn parse_rejects_bad_shapes() {
        assert_eq!(
            parse_response(r#"{"sugestoes":[]}"#),
            Err(ResponseError::MissingText)
        );
        assert_eq!(
            parse_response(r#"{"analise":"x","sugestoes":"a"}"#),
            Err(ResponseError::InvalidSuggestions)
        );
        assert_eq!(
            parse_response(r#"{"analise":"x","sugestoes":[1]}"#),
            Err(ResponseError::InvalidSuggestions)
        );
        assert!(matches!(parse_response("not json"), Err(ResponseError::Json(_))));
    }

    #[test]
    fn strips_plain_fences() {
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {}  "), "{}");
    }

    #[test]
    fn prompt_embeds_answers() {
        let prompt = build_prompt(&input(), FotoStatus::NaoCapturada);
        assert!(prompt.contains("- Humor: Cansado"));
        assert!(prompt.contains("- Nível de Energia: Baixa"));
        assert!(prompt.contains("- Qualidade do Sono: Ruim"));
        assert!(prompt.contains("- Contexto adicional: prazo apertado"));
        assert!(prompt.contains("- Status da captura facial: Não realizada"));
        assert!(prompt.ends_with("Responda APENAS com o JSON, sem texto adicional."));
    }
}
