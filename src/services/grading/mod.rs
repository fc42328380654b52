//! 外部评分服务
//!
//! 作文提交后把正文和题目发给评分服务，结果稍后通过
//! `POST /result/{essay_id}` 回调写入。

use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::{EssayError, Result};
use crate::models::essays::requests::GradingRequest;

#[async_trait]
pub trait GradingDispatcher: Send + Sync {
    /// 发送一次评分请求，只有 HTTP 200 视为成功
    async fn dispatch(&self, request: &GradingRequest) -> Result<()>;
}

pub struct HttpGradingDispatcher {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGradingDispatcher {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EssayError::upstream_failure(format!("无法创建 HTTP 客户端: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl GradingDispatcher for HttpGradingDispatcher {
    async fn dispatch(&self, request: &GradingRequest) -> Result<()> {
        debug!(
            "Dispatching essay {} to grader at {}",
            request.essay_id, self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(EssayError::upstream_failure(format!(
                "Grader responded with {}",
                response.status()
            )));
        }

        Ok(())
    }
}

pub fn create_dispatcher() -> Result<Arc<dyn GradingDispatcher>> {
    let config = AppConfig::get();
    let dispatcher = HttpGradingDispatcher::new(
        config.grading.endpoint.clone(),
        Duration::from_secs(config.grading.timeout_secs),
    )?;
    Ok(Arc::new(dispatcher))
}


#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, HttpServer, web};
    use std::sync::Mutex;

    fn request() -> GradingRequest {
        GradingRequest {
            essay_id: 7,
            essay_text: "Сочинение".to_string(),
            variant_text: "Исходный текст".to_string(),
            author_position: "Позиция автора".to_string(),
        }
    }

    async fn grader(
        body: web::Json<GradingRequest>,
        seen: web::Data<Mutex<Vec<GradingRequest>>>,
    ) -> HttpResponse {
        let busy = body.essay_id == 13;
        seen.lock().unwrap().push(body.into_inner());
        if busy {
            HttpResponse::ServiceUnavailable().finish()
        } else {
            HttpResponse::Ok().finish()
        }
    }

    #[actix_web::test]
    async fn test_dispatch_posts_json() {
        let seen = web::Data::new(Mutex::new(Vec::<GradingRequest>::new()));
        let data = seen.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route("/grade", web::post().to(grader))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        let dispatcher =
            HttpGradingDispatcher::new(format!("http://{addr}/grade"), Duration::from_secs(5))
                .unwrap();

        dispatcher.dispatch(&request()).await.unwrap();

        let mut busy = request();
        busy.essay_id = 13;
        let err = dispatcher.dispatch(&busy).await.unwrap_err();
        assert_eq!(err.code(), "E009");

        assert_eq!(seen.lock().unwrap().first(), Some(&request()));
        handle.stop(true).await;
    }

    #[tokio::test]
    async fn test_unreachable_grader_is_upstream_failure() {
        let dispatcher =
            HttpGradingDispatcher::new("http://127.0.0.1:1/grade", Duration::from_secs(2)).unwrap();
        let err = dispatcher.dispatch(&request()).await.unwrap_err();
        assert_eq!(err.code(), "E009");
    }
}
