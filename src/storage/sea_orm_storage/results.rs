use std::collections::HashMap;

use super::SeaOrmStorage;
use super::essays::{find_essay_on, rejected_transition, transition};
use crate::entity::criteria::{Column as CriteriaColumn, Entity as CriteriaEntity};
use crate::entity::result_criteria::{
    ActiveModel as ScoreActiveModel, Column as ScoreColumn, Entity as ResultCriteria,
    Model as ScoreModel,
};
use crate::entity::results::{ActiveModel, Column, Entity as Results, Model as ResultModel};
use crate::errors::{EssayError, Result};
use crate::models::results::entities::{
    Criteria, CriterionScore, GradingResult, ResultKind, ScoreSheet,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 评分标准
    pub async fn list_criteria_impl(&self) -> Result<Vec<Criteria>> {
        list_criteria_on(&self.db).await
    }

    /// 写入评分结果并推进作文状态
    pub async fn record_result_impl(
        &self,
        essay_id: i64,
        scores: Vec<CriterionScore>,
        kind: ResultKind,
    ) -> Result<GradingResult> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EssayError::storage_failure(format!("开启事务失败: {e}")))?;

        // 先推进状态取得写锁，再读评分标准与申诉内容
        let action = kind.action();
        let now = chrono::Utc::now().timestamp();
        let updated = transition(essay_id, action.source(), action.target(), now)
            .exec(&txn)
            .await
            .map_err(|e| EssayError::storage_failure(format!("更新作文状态失败: {e}")))?;
        if updated.rows_affected == 0 {
            return Err(rejected_transition(&txn, essay_id, None, action).await);
        }

        let criteria = list_criteria_on(&txn).await?;
        let sheet = ScoreSheet::validate(scores, &criteria)?;

        // 申诉复评保留申诉内容
        let appeal_text = match kind {
            ResultKind::Initial => None,
            ResultKind::Appeal => find_essay_on(&txn, essay_id).await?.appeal_text,
        };

        let result = ActiveModel {
            essay_id: Set(essay_id),
            sum_score: Set(sheet.sum_score()),
            appeal_text: Set(appeal_text),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| EssayError::storage_failure(format!("写入评分结果失败: {e}")))?;

        let rows: Vec<ScoreActiveModel> = sheet
            .entries()
            .iter()
            .map(|entry| ScoreActiveModel {
                result_id: Set(result.id),
                criteria_id: Set(entry.criteria_id),
                score: Set(entry.score),
                explanation: Set(entry.explanation.clone()),
            })
            .collect();

        ResultCriteria::insert_many(rows)
            .exec(&txn)
            .await
            .map_err(|e| EssayError::storage_failure(format!("写入分项评分失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EssayError::storage_failure(format!("提交事务失败: {e}")))?;

        Ok(GradingResult {
            id: result.id,
            essay_id,
            sum_score: result.sum_score,
            appeal_text: result.appeal_text,
            created_at: crate::entity::from_timestamp(result.created_at),
            criteria: sheet.into_entries(),
        })
    }

    /// 最新一次评分
    pub async fn get_latest_result_impl(&self, essay_id: i64) -> Result<Option<GradingResult>> {
        let latest = Results::find()
            .filter(Column::EssayId.eq(essay_id))
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("查询评分结果失败: {e}")))?;

        let Some(latest) = latest else {
            return Ok(None);
        };

        let mut assembled = self.attach_scores(vec![latest]).await?;
        Ok(assembled.pop())
    }

    /// 全部评分，按时间先后
    pub async fn list_results_impl(&self, essay_id: i64) -> Result<Vec<GradingResult>> {
        let results = Results::find()
            .filter(Column::EssayId.eq(essay_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("查询评分结果失败: {e}")))?;

        self.attach_scores(results).await
    }

    async fn attach_scores(&self, results: Vec<ResultModel>) -> Result<Vec<GradingResult>> {
        if results.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = results.iter().map(|r| r.id).collect();
        let mut by_result: HashMap<i64, Vec<ScoreModel>> = HashMap::new();
        for score in ResultCriteria::find()
            .filter(ScoreColumn::ResultId.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("查询分项评分失败: {e}")))?
        {
            by_result.entry(score.result_id).or_default().push(score);
        }

        Ok(results
            .into_iter()
            .map(|r| {
                let scores = by_result.remove(&r.id).unwrap_or_default();
                r.into_result(scores)
            })
            .collect())
    }
}

async fn list_criteria_on<C: ConnectionTrait>(conn: &C) -> Result<Vec<Criteria>> {
    let result = CriteriaEntity::find()
        .order_by_asc(CriteriaColumn::Id)
        .all(conn)
        .await
        .map_err(|e| EssayError::storage_failure(format!("查询评分标准失败: {e}")))?;

    Ok(result.into_iter().map(|m| m.into_criteria()).collect())
}
