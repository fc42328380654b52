use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use ts_rs::TS;

use crate::errors::{EssayError, Result};
use crate::models::essays::entities::EssayAction;

/// 每份评分必须包含的标准数量
pub const CRITERIA_COUNT: usize = 10;

// 评分标准
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct Criteria {
    pub id: i64,
    pub title: String,
    pub max_score: i32,
}

// 单项评分
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct CriterionScore {
    pub criteria_id: i64,
    pub score: i32,
    #[serde(default)]
    pub explanation: String,
}

// 评分结果
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct GradingResult {
    pub id: i64,
    pub essay_id: i64,
    pub sum_score: i32,
    pub appeal_text: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub criteria: Vec<CriterionScore>,
}

/// 结果来源：首次评分或申诉复评
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Initial,
    Appeal,
}

impl ResultKind {
    pub fn action(&self) -> EssayAction {
        match self {
            ResultKind::Initial => EssayAction::ReceiveResult,
            ResultKind::Appeal => EssayAction::ReceiveAppealResult,
        }
    }
}

/// 经过校验的评分表，总分由服务端计算
#[derive(Debug, Clone)]
pub struct ScoreSheet {
    entries: Vec<CriterionScore>,
    sum_score: i32,
}

impl ScoreSheet {
    pub fn validate(mut entries: Vec<CriterionScore>, criteria: &[Criteria]) -> Result<Self> {
        if entries.len() != CRITERIA_COUNT {
            return Err(EssayError::invalid_input(format!(
                "Expected {CRITERIA_COUNT} criteria scores, got {}",
                entries.len()
            )));
        }

        let max_scores: HashMap<i64, i32> = criteria.iter().map(|c| (c.id, c.max_score)).collect();
        let mut seen = HashSet::with_capacity(CRITERIA_COUNT);

        for entry in &entries {
            let max_score = max_scores.get(&entry.criteria_id).ok_or_else(|| {
                EssayError::invalid_input(format!("Unknown criteria id {}", entry.criteria_id))
            })?;
            if !seen.insert(entry.criteria_id) {
                return Err(EssayError::invalid_input(format!(
                    "Duplicate score for criteria {}",
                    entry.criteria_id
                )));
            }
            if entry.score < 0 || entry.score > *max_score {
                return Err(EssayError::invalid_input(format!(
                    "Score {} for criteria {} is outside [0, {max_score}]",
                    entry.score, entry.criteria_id
                )));
            }
        }

        entries.sort_by_key(|e| e.criteria_id);
        let sum_score = entries.iter().map(|e| e.score).sum();

        Ok(Self { entries, sum_score })
    }

    pub fn sum_score(&self) -> i32 {
        self.sum_score
    }

    pub fn entries(&self) -> &[CriterionScore] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<CriterionScore> {
        self.entries
    }
}
