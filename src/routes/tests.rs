use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test, web};
use serde_json::{Value, json};
use std::sync::Arc;

use super::*;
use crate::cache::ObjectCache;
use crate::cache::object_cache::moka::MokaCacheWrapper;
use crate::config::AppConfig;
use crate::middlewares::require_grader::GRADER_TOKEN_HEADER;
use crate::models::essays::requests::CreateEssayRequest;
use crate::models::users::requests::CreateUserRequest;
use crate::models::variants::requests::CreateVariantRequest;
use crate::services::grading::GradingDispatcher;
use crate::services::grading::testing::RecordingDispatcher;
use crate::storage::Storage;
use crate::storage::sea_orm_storage::SeaOrmStorage;
use crate::utils::jwt::JwtUtils;
use crate::utils::{json_error_handler, query_error_handler};

macro_rules! test_app {
    ($storage:expr, $dispatcher:expr) => {
        test::init_service(
            App::new()
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::Data::new($storage.clone()))
                .app_data(web::Data::new(cache()))
                .app_data(web::Data::new(
                    $dispatcher.clone() as Arc<dyn GradingDispatcher>
                ))
                .configure(configure_auth_routes)
                .configure(configure_user_routes)
                .configure(configure_essay_routes)
                .configure(configure_result_routes)
                .configure(configure_social_routes)
                .configure(configure_variant_routes)
                .configure(configure_system_routes),
        )
        .await
    };
}

fn cache() -> Arc<dyn ObjectCache> {
    Arc::new(MokaCacheWrapper::new(1_000, 300))
}

async fn storage() -> Arc<dyn Storage> {
    Arc::new(SeaOrmStorage::in_memory().await.unwrap())
}

// 直接写库创建用户，返回 Bearer 头
async fn user(storage: &Arc<dyn Storage>, mail: &str, is_moderator: bool) -> (i64, String) {
    let user = storage
        .create_user(CreateUserRequest {
            mail: mail.to_string(),
            nickname: mail.split('@').next().unwrap_or_default().to_string(),
            password: "hash".to_string(),
            is_moderator,
            count_checks: 3,
        })
        .await
        .unwrap();
    let token = JwtUtils::generate_session_token(user.id, is_moderator).unwrap();
    (user.id, format!("Bearer {token}"))
}

async fn variant(storage: &Arc<dyn Storage>) -> i64 {
    storage
        .create_variant(CreateVariantRequest {
            variant_title: "Вариант 1".to_string(),
            variant_text: "Исходный текст".to_string(),
            author_position: "Позиция автора".to_string(),
        })
        .await
        .unwrap()
        .id
}

// 合计 27 的平铺评分
fn flat_scores() -> Value {
    json!({
        "K1_score": 2, "K1_explanation": "K1",
        "K2_score": 5, "K2_explanation": "K2",
        "K3_score": 2, "K3_explanation": "K3",
        "K4_score": 2, "K4_explanation": "K4",
        "K5_score": 3, "K5_explanation": "K5",
        "K6_score": 2, "K6_explanation": "K6",
        "K7_score": 3, "K7_explanation": "K7",
        "K8_score": 3, "K8_explanation": "K8",
        "K9_score": 3, "K9_explanation": "K9",
        "K10_score": 2, "K10_explanation": "K10",
        "score": 1
    })
}

fn grader_token() -> (&'static str, String) {
    (
        GRADER_TOKEN_HEADER,
        AppConfig::get().grading.callback_token.clone(),
    )
}

#[actix_web::test]
async fn test_register_login_logout() {
    let storage = storage().await;
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let app = test_app!(storage, dispatcher);

    let body = json!({"mail": "anna@example.com", "nickname": "anna", "password": "Essay2024x"});
    let resp = test::call_service(
        &app,
        test::TestRequest::post().uri("/users").set_json(&body).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let cookie_name = AppConfig::get().session.cookie_name.clone();
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == cookie_name)
        .map(|c| c.into_owned())
        .unwrap();

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/users/me")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let me: Value = test::read_body_json(resp).await;
    assert_eq!(me["data"]["mail"], "anna@example.com");
    assert_eq!(
        me["data"]["count_checks"],
        AppConfig::get().quota.default_checks
    );
    assert_eq!(me["data"]["count_essays"], 0);

    // 重复注册
    let resp = test::call_service(
        &app,
        test::TestRequest::post().uri("/users").set_json(&body).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login")
            .set_json(json!({"mail": "anna@example.com", "password": "wrong-Pass1"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login")
            .set_json(json!({"mail": "anna@example.com", "password": "Essay2024x"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/users/nickname?mail=anna@example.com")
            .to_request(),
    )
    .await;
    let nickname: Value = test::read_body_json(resp).await;
    assert_eq!(nickname["data"]["nickname"], "anna");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_protected_routes_require_session() {
    let storage = storage().await;
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let app = test_app!(storage, dispatcher);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/essays")
            .set_json(json!({"essay_text": "text", "variant_id": 1}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/users/me")
            .insert_header((AUTHORIZATION, "Bearer not-a-token"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // 普通用户不能创建题目
    let (_, author) = user(&storage, "anna@example.com", false).await;
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/variants")
            .insert_header((AUTHORIZATION, author))
            .set_json(json!({"variant_title": "t", "variant_text": "x", "author_position": "p"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // 没有回调密钥不能写入结果
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/result/1")
            .set_json(json!({"llm_response": flat_scores()}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_full_essay_lifecycle() {
    let storage = storage().await;
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let app = test_app!(storage, dispatcher);

    let (_, moderator) = user(&storage, "moderator@example.com", true).await;
    let (author_id, author) = user(&storage, "anna@example.com", false).await;
    let (_, reader) = user(&storage, "boris@example.com", false).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/variants")
            .insert_header((AUTHORIZATION, moderator.clone()))
            .set_json(json!({
                "variant_title": "Вариант 1",
                "variant_text": "Исходный текст",
                "author_position": "Позиция автора"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let variant_id = created["data"]["id"].as_i64().unwrap();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/essays")
            .insert_header((AUTHORIZATION, author.clone()))
            .set_json(json!({"essay_text": "Сочинение", "variant_id": variant_id}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let essay_id = created["data"]["essay_id"].as_i64().unwrap();

    // 草稿对他人不可见
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/essays/{essay_id}"))
            .insert_header((AUTHORIZATION, reader.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // 他人不能提交
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/essays/{essay_id}/save"))
            .insert_header((AUTHORIZATION, reader.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/essays/{essay_id}/save"))
            .insert_header((AUTHORIZATION, author.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let calls = dispatcher.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].essay_id, essay_id);
    assert_eq!(calls[0].variant_text, "Исходный текст");
    let author_user = storage.get_user_by_id(author_id).await.unwrap().unwrap();
    assert_eq!(author_user.count_checks, 2);

    // 重复提交
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/essays/{essay_id}/save"))
            .insert_header((AUTHORIZATION, author.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(dispatcher.calls().len(), 1);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/result/{essay_id}"))
            .insert_header(grader_token())
            .set_json(json!({"llm_response": flat_scores()}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let result: Value = test::read_body_json(resp).await;
    assert_eq!(result["data"]["sum_score"], 27);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/essays/{essay_id}/publish"))
            .insert_header((AUTHORIZATION, author.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/published/essays").to_request(),
    )
    .await;
    let published: Value = test::read_body_json(resp).await;
    assert_eq!(published["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(published["data"][0]["score"], 27);

    // 点赞切换
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/likes/{essay_id}"))
            .insert_header((AUTHORIZATION, reader.clone()))
            .to_request(),
    )
    .await;
    let like: Value = test::read_body_json(resp).await;
    assert_eq!(like["data"]["is_liked"], true);
    assert_eq!(like["data"]["likes"], 1);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/likes/{essay_id}"))
            .insert_header((AUTHORIZATION, reader.clone()))
            .to_request(),
    )
    .await;
    let like: Value = test::read_body_json(resp).await;
    assert_eq!(like["data"]["is_liked"], false);
    assert_eq!(like["data"]["likes"], 0);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/comments/{essay_id}"))
            .insert_header((AUTHORIZATION, reader.clone()))
            .set_json(json!({"comment_text": "Хорошо"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let comment: Value = test::read_body_json(resp).await;
    assert_eq!(comment["data"]["author_nickname"], "boris");

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/essays/{essay_id}/appeal"))
            .insert_header((AUTHORIZATION, author.clone()))
            .set_json(json!({"appeal_text": "К2 занижен"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let appealed: Value = test::read_body_json(resp).await;
    assert_eq!(appealed["data"]["status"], "appeal");
    assert_eq!(appealed["data"]["is_published"], false);

    // 申诉后不可再评论
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/comments/{essay_id}"))
            .insert_header((AUTHORIZATION, reader.clone()))
            .set_json(json!({"comment_text": "Ещё"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/essays/appeal")
            .insert_header((AUTHORIZATION, author.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/essays/appeal")
            .insert_header((AUTHORIZATION, moderator.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let queue: Value = test::read_body_json(resp).await;
    assert_eq!(queue["data"][0]["id"], essay_id);
    assert_eq!(queue["data"][0]["appeal_text"], "К2 занижен");

    let rescored: Vec<Value> = [2, 4, 2, 2, 3, 2, 3, 3, 3, 2]
        .into_iter()
        .zip(1..)
        .map(|(score, id): (i32, i64)| {
            json!({"criteria_id": id, "score": score, "explanation": "пересмотр"})
        })
        .collect();
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/result/appeal/{essay_id}"))
            .insert_header(grader_token())
            .set_json(json!(rescored))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/result/{essay_id}/history"))
            .insert_header((AUTHORIZATION, author.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let history: Value = test::read_body_json(resp).await;
    assert_eq!(history["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(history["data"][0]["sum_score"], 27);
    assert_eq!(history["data"][1]["sum_score"], 26);
    assert_eq!(history["data"][1]["appeal_text"], "К2 занижен");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/result/{essay_id}"))
            .insert_header((AUTHORIZATION, moderator.clone()))
            .to_request(),
    )
    .await;
    let latest: Value = test::read_body_json(resp).await;
    assert_eq!(latest["data"]["sum_score"], 26);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/users/me/essays/{essay_id}"))
            .insert_header((AUTHORIZATION, author.clone()))
            .to_request(),
    )
    .await;
    let mine: Value = test::read_body_json(resp).await;
    assert_eq!(mine["data"]["status"], "appealed");
    assert_eq!(mine["data"]["results"].as_array().map(Vec::len), Some(2));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/users/me/essays/{essay_id}"))
            .insert_header((AUTHORIZATION, reader))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_dispatch_failure_keeps_saved_state() {
    let storage = storage().await;
    let dispatcher = Arc::new(RecordingDispatcher::failing());
    let app = test_app!(storage, dispatcher);

    let variant_id = variant(&storage).await;
    let (author_id, author) = user(&storage, "anna@example.com", false).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/essays")
            .insert_header((AUTHORIZATION, author.clone()))
            .set_json(json!({"essay_text": "Сочинение", "variant_id": variant_id}))
            .to_request(),
    )
    .await;
    let created: Value = test::read_body_json(resp).await;
    let essay_id = created["data"]["essay_id"].as_i64().unwrap();

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/essays/{essay_id}/save"))
            .insert_header((AUTHORIZATION, author))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(dispatcher.calls().len(), 1);

    let essay = storage.get_essay_by_id(essay_id).await.unwrap().unwrap();
    assert_eq!(essay.status.as_str(), "saved");
    let author_user = storage.get_user_by_id(author_id).await.unwrap().unwrap();
    assert_eq!(author_user.count_checks, 2);
}

#[actix_web::test]
async fn test_public_reads() {
    let storage = storage().await;
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let app = test_app!(storage, dispatcher);

    let variant_id = variant(&storage).await;
    user(&storage, "anna@example.com", false).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/counts").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let counts: Value = test::read_body_json(resp).await;
    assert_eq!(counts["data"]["variants_count"], 1);
    assert_eq!(counts["data"]["essays_count"], 0);
    assert_eq!(counts["data"]["users_count"], 1);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/criteria").to_request()).await;
    let criteria: Value = test::read_body_json(resp).await;
    assert_eq!(criteria["data"].as_array().map(Vec::len), Some(10));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/variants/{variant_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/variants/999").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/essays/999").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/essays/0").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/essays").to_request()).await;
    let essays: Value = test::read_body_json(resp).await;
    assert_eq!(essays["data"].as_array().map(Vec::len), Some(0));
}

#[actix_web::test]
async fn test_like_state_requires_visible_essay() {
    let storage = storage().await;
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let app = test_app!(storage, dispatcher);

    let (author_id, author) = user(&storage, "anna@example.com", false).await;
    let (_, reader) = user(&storage, "boris@example.com", false).await;
    let essay_id = storage
        .create_essay(
            author_id,
            CreateEssayRequest {
                essay_text: "Сочинение".to_string(),
                variant_id: variant(&storage).await,
            },
        )
        .await
        .unwrap()
        .id;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/likes/is_liked/999")
            .insert_header((AUTHORIZATION, reader.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/likes/is_liked/{essay_id}"))
            .insert_header((AUTHORIZATION, reader))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/likes/is_liked/{essay_id}"))
            .insert_header((AUTHORIZATION, author))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let liked: Value = test::read_body_json(resp).await;
    assert_eq!(liked["data"], false);
}
