use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use super::analysis::{AiAnalysis, AnalysisSource};
use super::mood::{Energia, FotoStatus, Humor, Sono};

/// One user's daily wellbeing submission. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub humor: Humor,
    pub energia: Energia,
    pub sono: Sono,
    pub justificativa: Option<String>,
    pub foto_status: FotoStatus,
    #[serde(rename = "analise", skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AiAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_source: Option<AnalysisSource>,
}

/// Storage shape. Vocabulary columns are plain text so that rows written by
/// older clients still load.
#[derive(Debug, Clone, FromRow)]
pub struct CheckInRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub checked_in_at: DateTime<Utc>,
    pub humor: String,
    pub energia: String,
    pub sono: String,
    pub justificativa: Option<String>,
    pub foto_status: String,
    pub analise: Option<Json<AiAnalysis>>,
    pub analysis_source: Option<Json<AnalysisSource>>,
}

impl From<CheckInRow> for CheckIn {
    fn from(row: CheckInRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            date: row.checked_in_at,
            humor: Humor::from_label_lossy(&row.humor),
            energia: Energia::from_label_lossy(&row.energia),
            sono: Sono::from_label_lossy(&row.sono),
            justificativa: row.justificativa,
            foto_status: FotoStatus::from_label_lossy(&row.foto_status),
            analysis: row.analise.map(|Json(a)| a),
            analysis_source: row.analysis_source.map(|Json(s)| s),
        }
    }
}

/// Questionnaire answers, the input of both analysis paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Questionnaire {
    pub humor: Humor,
    pub energia: Energia,
    pub sono: Sono,
    #[serde(default)]
    pub justificativa: Option<String>,
}

impl Questionnaire {
    /// Free-text note, ignoring blank input.
    pub fn note(&self) -> Option<&str> {
        self.justificativa
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// A check-in ready to be written; id and timestamp are assigned here.
#[derive(Debug, Clone)]
pub struct NewCheckIn {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub questionnaire: Questionnaire,
    pub foto_status: FotoStatus,
    pub analysis: AiAnalysis,
    pub analysis_source: AnalysisSource,
}

impl NewCheckIn {
    /// The record as stored: the note is the trimmed one written to the row.
    pub fn into_check_in(self) -> CheckIn {
        let justificativa = self.questionnaire.note().map(str::to_owned);
        CheckIn {
            id: self.id,
            user_id: self.user_id,
            date: self.date,
            humor: self.questionnaire.humor,
            energia: self.questionnaire.energia,
            sono: self.questionnaire.sono,
            justificativa,
            foto_status: self.foto_status,
            analysis: Some(self.analysis),
            analysis_source: Some(self.analysis_source),
        }
    }
}

/// Optional filter for history queries. Bounds are inclusive UTC days.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub limit: Option<i64>,
}
