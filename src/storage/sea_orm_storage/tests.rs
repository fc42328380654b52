use super::SeaOrmStorage;
use futures_util::future::join_all;
use crate::models::essays::entities::EssayStatus;
use crate::models::essays::requests::CreateEssayRequest;
use crate::models::results::entities::{CriterionScore, ResultKind};
use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest};
use crate::models::variants::requests::CreateVariantRequest;

async fn storage() -> SeaOrmStorage {
    SeaOrmStorage::in_memory().await.unwrap()
}

/// 多连接的文件库，用于并发场景
async fn file_storage(dir: &tempfile::TempDir) -> SeaOrmStorage {
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("essays.db").display());
    let db = SeaOrmStorage::connect_sqlite(&url, 8, 5).await.unwrap();
    SeaOrmStorage::from_connection(db).await.unwrap()
}

async fn user(storage: &SeaOrmStorage, mail: &str, count_checks: i32) -> i64 {
    storage
        .create_user_impl(CreateUserRequest {
            mail: mail.to_string(),
            nickname: mail.split('@').next().unwrap_or(mail).to_string(),
            password: "hash".to_string(),
            is_moderator: false,
            count_checks,
        })
        .await
        .unwrap()
        .id
}

async fn variant(storage: &SeaOrmStorage) -> i64 {
    storage
        .create_variant_impl(CreateVariantRequest {
            variant_title: "Проблема памяти".to_string(),
            variant_text: "Текст исходника".to_string(),
            author_position: "Память нужно беречь".to_string(),
        })
        .await
        .unwrap()
        .id
}

async fn draft(storage: &SeaOrmStorage, author_id: i64, variant_id: i64) -> i64 {
    storage
        .create_essay_impl(
            author_id,
            CreateEssayRequest {
                essay_text: "Сочинение".to_string(),
                variant_id,
            },
        )
        .await
        .unwrap()
        .id
}

// 满分 [2,5,2,2,3,2,3,3,3,3]，合计 27
fn scores_27() -> Vec<CriterionScore> {
    [2, 5, 2, 2, 3, 2, 3, 3, 3, 2]
        .into_iter()
        .zip(1..)
        .map(|(score, criteria_id)| CriterionScore {
            criteria_id,
            score,
            explanation: format!("K{criteria_id}"),
        })
        .collect()
}

#[tokio::test]
async fn test_criteria_seeded() {
    let storage = storage().await;
    let criteria = storage.list_criteria_impl().await.unwrap();
    assert_eq!(criteria.len(), 10);
    assert_eq!(criteria.first().map(|c| c.id), Some(1));
}

#[tokio::test]
async fn test_duplicate_mail_rejected() {
    let storage = storage().await;
    user(&storage, "anna@example.com", 1).await;
    let err = storage
        .create_user_impl(CreateUserRequest {
            mail: "anna@example.com".to_string(),
            nickname: "other".to_string(),
            password: "hash".to_string(),
            is_moderator: false,
            count_checks: 0,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E006");
}

#[tokio::test]
async fn test_update_user_mail_conflict() {
    let storage = storage().await;
    user(&storage, "anna@example.com", 1).await;
    let boris = user(&storage, "boris@example.com", 1).await;

    let err = storage
        .update_user_impl(
            boris,
            UpdateUserRequest {
                mail: Some("anna@example.com".to_string()),
                nickname: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E006");

    let updated = storage
        .update_user_impl(
            boris,
            UpdateUserRequest {
                mail: None,
                nickname: Some("Борис".to_string()),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.nickname, "Борис");
    assert!(storage.update_user_impl(999, UpdateUserRequest::default()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_essay_requires_variant() {
    let storage = storage().await;
    let author = user(&storage, "anna@example.com", 1).await;
    let err = storage
        .create_essay_impl(
            author,
            CreateEssayRequest {
                essay_text: "text".to_string(),
                variant_id: 42,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E001");
}

#[tokio::test]
async fn test_save_consumes_one_check() {
    let storage = storage().await;
    let author = user(&storage, "anna@example.com", 2).await;
    let essay_id = draft(&storage, author, variant(&storage).await).await;

    let essay = storage.save_essay_impl(essay_id, author).await.unwrap();
    assert_eq!(essay.status, EssayStatus::Saved);

    let user = storage.get_user_by_id_impl(author).await.unwrap().unwrap();
    assert_eq!(user.count_checks, 1);
}

#[tokio::test]
async fn test_save_non_draft_leaves_quota() {
    let storage = storage().await;
    let author = user(&storage, "anna@example.com", 2).await;
    let essay_id = draft(&storage, author, variant(&storage).await).await;
    storage.save_essay_impl(essay_id, author).await.unwrap();

    let err = storage.save_essay_impl(essay_id, author).await.unwrap_err();
    assert_eq!(err.code(), "E004");

    let user = storage.get_user_by_id_impl(author).await.unwrap().unwrap();
    assert_eq!(user.count_checks, 1);
    let essay = storage.get_essay_by_id_impl(essay_id).await.unwrap().unwrap();
    assert_eq!(essay.status, EssayStatus::Saved);
}

#[tokio::test]
async fn test_save_without_checks_rolls_back() {
    let storage = storage().await;
    let author = user(&storage, "anna@example.com", 0).await;
    let essay_id = draft(&storage, author, variant(&storage).await).await;

    let err = storage.save_essay_impl(essay_id, author).await.unwrap_err();
    assert_eq!(err.code(), "E005");

    let essay = storage.get_essay_by_id_impl(essay_id).await.unwrap().unwrap();
    assert_eq!(essay.status, EssayStatus::Draft);
    let user = storage.get_user_by_id_impl(author).await.unwrap().unwrap();
    assert_eq!(user.count_checks, 0);
}

#[tokio::test]
async fn test_save_by_stranger_rejected() {
    let storage = storage().await;
    let author = user(&storage, "anna@example.com", 1).await;
    let stranger = user(&storage, "boris@example.com", 1).await;
    let essay_id = draft(&storage, author, variant(&storage).await).await;

    let err = storage.save_essay_impl(essay_id, stranger).await.unwrap_err();
    assert_eq!(err.code(), "E003");
    let stranger = storage.get_user_by_id_impl(stranger).await.unwrap().unwrap();
    assert_eq!(stranger.count_checks, 1);
}

#[tokio::test]
async fn test_edit_only_while_draft() {
    let storage = storage().await;
    let author = user(&storage, "anna@example.com", 1).await;
    let essay_id = draft(&storage, author, variant(&storage).await).await;

    let essay = storage
        .update_essay_text_impl(essay_id, author, "Новый текст".to_string())
        .await
        .unwrap();
    assert_eq!(essay.essay_text, "Новый текст");

    storage.save_essay_impl(essay_id, author).await.unwrap();
    let err = storage
        .update_essay_text_impl(essay_id, author, "ещё".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");
}

#[tokio::test]
async fn test_draft_cannot_be_published() {
    let storage = storage().await;
    let author = user(&storage, "anna@example.com", 1).await;
    let essay_id = draft(&storage, author, variant(&storage).await).await;

    let err = storage
        .set_essay_published_impl(essay_id, author, true)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");

    storage.save_essay_impl(essay_id, author).await.unwrap();
    let essay = storage
        .set_essay_published_impl(essay_id, author, true)
        .await
        .unwrap();
    assert!(essay.is_published);
    assert_eq!(storage.list_published_essays_impl().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_sum_score_recomputed() {
    let storage = storage().await;
    let author = user(&storage, "anna@example.com", 1).await;
    let essay_id = draft(&storage, author, variant(&storage).await).await;
    storage.save_essay_impl(essay_id, author).await.unwrap();

    let result = storage
        .record_result_impl(essay_id, scores_27(), ResultKind::Initial)
        .await
        .unwrap();
    assert_eq!(result.sum_score, 27);
    assert_eq!(result.criteria.len(), 10);

    let essay = storage.get_essay_by_id_impl(essay_id).await.unwrap().unwrap();
    assert_eq!(essay.status, EssayStatus::Checked);
    let latest = storage.get_latest_result_impl(essay_id).await.unwrap().unwrap();
    assert_eq!(latest.sum_score, 27);
}

#[tokio::test]
async fn test_invalid_scores_leave_essay_saved() {
    let storage = storage().await;
    let author = user(&storage, "anna@example.com", 1).await;
    let essay_id = draft(&storage, author, variant(&storage).await).await;
    storage.save_essay_impl(essay_id, author).await.unwrap();

    let mut scores = scores_27();
    scores[1].score = 6;
    let err = storage
        .record_result_impl(essay_id, scores, ResultKind::Initial)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E008");

    let essay = storage.get_essay_by_id_impl(essay_id).await.unwrap().unwrap();
    assert_eq!(essay.status, EssayStatus::Saved);
    assert!(storage.list_results_impl(essay_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_result_for_draft_rejected() {
    let storage = storage().await;
    let author = user(&storage, "anna@example.com", 1).await;
    let essay_id = draft(&storage, author, variant(&storage).await).await;

    let err = storage
        .record_result_impl(essay_id, scores_27(), ResultKind::Initial)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");
}

#[tokio::test]
async fn test_like_twice_keeps_one_row() {
    let storage = storage().await;
    let author = user(&storage, "anna@example.com", 1).await;
    let reader = user(&storage, "boris@example.com", 1).await;
    let essay_id = draft(&storage, author, variant(&storage).await).await;

    storage.add_like_impl(reader, essay_id).await.unwrap();
    let err = storage.add_like_impl(reader, essay_id).await.unwrap_err();
    assert_eq!(err.code(), "E007");

    assert_eq!(storage.count_likes_impl(essay_id).await.unwrap(), 1);
    assert!(storage.is_liked_impl(reader, essay_id).await.unwrap());
    assert!(!storage.is_liked_impl(author, essay_id).await.unwrap());
}

#[tokio::test]
async fn test_unlike_without_like() {
    let storage = storage().await;
    let author = user(&storage, "anna@example.com", 1).await;
    let essay_id = draft(&storage, author, variant(&storage).await).await;

    let err = storage.remove_like_impl(author, essay_id).await.unwrap_err();
    assert_eq!(err.code(), "E001");

    storage.add_like_impl(author, essay_id).await.unwrap();
    storage.remove_like_impl(author, essay_id).await.unwrap();
    assert_eq!(storage.count_likes_impl(essay_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_comments_in_order() {
    let storage = storage().await;
    let author = user(&storage, "anna@example.com", 1).await;
    let reader = user(&storage, "boris@example.com", 1).await;
    let essay_id = draft(&storage, author, variant(&storage).await).await;

    storage
        .add_comment_impl(reader, essay_id, "первый".to_string())
        .await
        .unwrap();
    storage
        .add_comment_impl(author, essay_id, "второй".to_string())
        .await
        .unwrap();

    let comments = storage.list_comments_impl(essay_id).await.unwrap();
    let texts: Vec<&str> = comments.iter().map(|c| c.comment_text.as_str()).collect();
    assert_eq!(texts, ["первый", "второй"]);
    assert_eq!(comments[0].author_nickname, "boris");
}

#[tokio::test]
async fn test_full_appeal_scenario() {
    let storage = storage().await;
    let author = user(&storage, "anna@example.com", 1).await;
    let essay_id = draft(&storage, author, variant(&storage).await).await;

    storage.save_essay_impl(essay_id, author).await.unwrap();
    storage
        .record_result_impl(essay_id, scores_27(), ResultKind::Initial)
        .await
        .unwrap();
    storage
        .set_essay_published_impl(essay_id, author, true)
        .await
        .unwrap();

    let essay = storage
        .appeal_essay_impl(essay_id, author, "Не согласна с K2".to_string())
        .await
        .unwrap();
    assert_eq!(essay.status, EssayStatus::Appeal);
    assert!(!essay.is_published);

    let queue = storage.list_appeal_essays_impl().await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].appeal_text.as_deref(), Some("Не согласна с K2"));
    assert_eq!(queue[0].results.len(), 1);

    let mut revised = scores_27();
    revised[1].score = 4;
    let appeal_result = storage
        .record_result_impl(essay_id, revised, ResultKind::Appeal)
        .await
        .unwrap();
    assert_eq!(appeal_result.sum_score, 26);
    assert_eq!(appeal_result.appeal_text.as_deref(), Some("Не согласна с K2"));

    let history = storage.list_results_impl(essay_id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].sum_score, 27);
    assert_eq!(history[1].sum_score, 26);

    let essay = storage.get_essay_by_id_impl(essay_id).await.unwrap().unwrap();
    assert_eq!(essay.status, EssayStatus::Appealed);
    assert!(storage.list_appeal_essays_impl().await.unwrap().is_empty());

    // 申诉只允许一次
    let err = storage
        .appeal_essay_impl(essay_id, author, "ещё раз".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");

    let detailed = storage.get_detailed_essay_impl(essay_id).await.unwrap().unwrap();
    assert_eq!(detailed.results.len(), 2);
    assert_eq!(detailed.author_nickname, "anna");
}

#[tokio::test]
async fn test_reset_restores_all_quotas() {
    let storage = storage().await;
    let anna = user(&storage, "anna@example.com", 0).await;
    let boris = user(&storage, "boris@example.com", 7).await;

    let affected = storage.reset_all_checks_impl(3).await.unwrap();
    assert_eq!(affected, 2);

    for id in [anna, boris] {
        let user = storage.get_user_by_id_impl(id).await.unwrap().unwrap();
        assert_eq!(user.count_checks, 3);
    }
}

#[tokio::test]
async fn test_decrease_stops_at_zero() {
    let storage = storage().await;
    let anna = user(&storage, "anna@example.com", 1).await;

    storage.decrease_check_count_impl(anna).await.unwrap();
    let err = storage.decrease_check_count_impl(anna).await.unwrap_err();
    assert_eq!(err.code(), "E005");
    let err = storage.decrease_check_count_impl(999).await.unwrap_err();
    assert_eq!(err.code(), "E001");
}

#[tokio::test]
async fn test_user_info_statistics() {
    let storage = storage().await;
    let author = user(&storage, "anna@example.com", 2).await;
    let variant_id = variant(&storage).await;
    let graded = draft(&storage, author, variant_id).await;
    draft(&storage, author, variant_id).await;

    storage.save_essay_impl(graded, author).await.unwrap();
    storage
        .record_result_impl(graded, scores_27(), ResultKind::Initial)
        .await
        .unwrap();
    storage
        .set_essay_published_impl(graded, author, true)
        .await
        .unwrap();

    let info = storage.get_user_info_impl(author).await.unwrap().unwrap();
    assert_eq!(info.count_essays, 2);
    assert_eq!(info.count_published_essays, 1);
    assert_eq!(info.count_checks, 1);
    assert!((info.average_result - 27.0).abs() < f64::EPSILON);

    let cards = storage.list_user_essays_impl(author).await.unwrap();
    assert_eq!(cards.len(), 2);
    assert!(cards.iter().any(|c| c.score == 27 && c.author_nickname == "anna"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_saves_linearize() {
    let dir = tempfile::tempdir().unwrap();
    let storage = file_storage(&dir).await;
    let author = user(&storage, "anna@example.com", 20).await;
    let variant_id = variant(&storage).await;

    let mut essays = Vec::new();
    for _ in 0..10 {
        essays.push(draft(&storage, author, variant_id).await);
    }

    let mut calls = Vec::new();
    for &essay_id in &essays {
        for _ in 0..4 {
            let storage = storage.clone();
            calls.push(async move { (essay_id, storage.save_essay_impl(essay_id, author).await) });
        }
    }
    let outcomes = join_all(calls).await;

    for essay_id in &essays {
        let mine: Vec<_> = outcomes.iter().filter(|(id, _)| id == essay_id).collect();
        assert_eq!(mine.iter().filter(|(_, r)| r.is_ok()).count(), 1);
        for (_, outcome) in mine.iter().filter(|(_, r)| r.is_err()) {
            assert_eq!(outcome.as_ref().unwrap_err().code(), "E004");
        }
        let essay = storage.get_essay_by_id_impl(*essay_id).await.unwrap().unwrap();
        assert_eq!(essay.status, EssayStatus::Saved);
    }

    let user = storage.get_user_by_id_impl(author).await.unwrap().unwrap();
    assert_eq!(user.count_checks, 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_results_record_once() {
    let dir = tempfile::tempdir().unwrap();
    let storage = file_storage(&dir).await;
    let author = user(&storage, "anna@example.com", 1).await;
    let essay_id = draft(&storage, author, variant(&storage).await).await;
    storage.save_essay_impl(essay_id, author).await.unwrap();

    let outcomes = join_all((0..6).map(|_| {
        let storage = storage.clone();
        async move {
            storage
                .record_result_impl(essay_id, scores_27(), ResultKind::Initial)
                .await
        }
    }))
    .await;

    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    for err in outcomes.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(err.code(), "E004");
    }
    assert_eq!(storage.list_results_impl(essay_id).await.unwrap().len(), 1);
    let essay = storage.get_essay_by_id_impl(essay_id).await.unwrap().unwrap();
    assert_eq!(essay.status, EssayStatus::Checked);
}

#[tokio::test]
async fn test_cards_count_likes_per_essay() {
    let storage = storage().await;
    let author = user(&storage, "anna@example.com", 2).await;
    let boris = user(&storage, "boris@example.com", 0).await;
    let vera = user(&storage, "vera@example.com", 0).await;
    let variant_id = variant(&storage).await;
    let popular = draft(&storage, author, variant_id).await;
    let quiet = draft(&storage, author, variant_id).await;

    for essay_id in [popular, quiet] {
        storage.save_essay_impl(essay_id, author).await.unwrap();
        storage
            .set_essay_published_impl(essay_id, author, true)
            .await
            .unwrap();
    }
    storage.add_like_impl(boris, popular).await.unwrap();
    storage.add_like_impl(vera, popular).await.unwrap();

    let cards = storage.list_published_essays_impl().await.unwrap();
    let likes = |id: i64| cards.iter().find(|c| c.id == id).map(|c| c.likes);
    assert_eq!(likes(popular), Some(2));
    assert_eq!(likes(quiet), Some(0));
}
