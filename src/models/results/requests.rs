use serde::Deserialize;

use super::entities::CriterionScore;

/// 评分服务回调请求体
///
/// 既接受 `{"llm_response": ...}` 包装，也接受裸分数。
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ResultSubmission {
    Wrapped { llm_response: ScoresPayload },
    Bare(ScoresPayload),
}

impl ResultSubmission {
    pub fn into_entries(self) -> Vec<CriterionScore> {
        match self {
            ResultSubmission::Wrapped { llm_response } => llm_response.into_entries(),
            ResultSubmission::Bare(payload) => payload.into_entries(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ScoresPayload {
    List(Vec<CriterionScore>),
    Flat(Box<FlatScores>),
}

impl ScoresPayload {
    pub fn into_entries(self) -> Vec<CriterionScore> {
        match self {
            ScoresPayload::List(entries) => entries,
            ScoresPayload::Flat(flat) => flat.into_entries(),
        }
    }
}

/// K1..K10 平铺格式；`score` 由客户端给出的总分会被忽略
#[derive(Debug, Deserialize)]
pub struct FlatScores {
    #[serde(rename = "K1_score")]
    pub k1_score: i32,
    #[serde(rename = "K1_explanation", default)]
    pub k1_explanation: String,
    #[serde(rename = "K2_score")]
    pub k2_score: i32,
    #[serde(rename = "K2_explanation", default)]
    pub k2_explanation: String,
    #[serde(rename = "K3_score")]
    pub k3_score: i32,
    #[serde(rename = "K3_explanation", default)]
    pub k3_explanation: String,
    #[serde(rename = "K4_score")]
    pub k4_score: i32,
    #[serde(rename = "K4_explanation", default)]
    pub k4_explanation: String,
    #[serde(rename = "K5_score")]
    pub k5_score: i32,
    #[serde(rename = "K5_explanation", default)]
    pub k5_explanation: String,
    #[serde(rename = "K6_score")]
    pub k6_score: i32,
    #[serde(rename = "K6_explanation", default)]
    pub k6_explanation: String,
    #[serde(rename = "K7_score")]
    pub k7_score: i32,
    #[serde(rename = "K7_explanation", default)]
    pub k7_explanation: String,
    #[serde(rename = "K8_score")]
    pub k8_score: i32,
    #[serde(rename = "K8_explanation", default)]
    pub k8_explanation: String,
    #[serde(rename = "K9_score")]
    pub k9_score: i32,
    #[serde(rename = "K9_explanation", default)]
    pub k9_explanation: String,
    #[serde(rename = "K10_score")]
    pub k10_score: i32,
    #[serde(rename = "K10_explanation", default)]
    pub k10_explanation: String,
    #[serde(default)]
    pub score: Option<i32>,
}

impl FlatScores {
    pub fn into_entries(self) -> Vec<CriterionScore> {
        [
            (self.k1_score, self.k1_explanation),
            (self.k2_score, self.k2_explanation),
            (self.k3_score, self.k3_explanation),
            (self.k4_score, self.k4_explanation),
            (self.k5_score, self.k5_explanation),
            (self.k6_score, self.k6_explanation),
            (self.k7_score, self.k7_explanation),
            (self.k8_score, self.k8_explanation),
            (self.k9_score, self.k9_explanation),
            (self.k10_score, self.k10_explanation),
        ]
        .into_iter()
        .zip(1..)
        .map(|((score, explanation), criteria_id)| CriterionScore {
            criteria_id,
            score,
            explanation,
        })
        .collect()
    }
}
