//! 检查次数定期重置
//!
//! 单个 tokio 任务按固定周期把所有用户的检查次数恢复为默认值，
//! 由 `main` 持有句柄并在关闭时通过 [`CancellationToken`] 停止。

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::storage::Storage;

/// 启动重置任务，第一次重置发生在一个周期之后
pub fn spawn_check_resetter(
    storage: Arc<dyn Storage>,
    period: Duration,
    default_checks: i32,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        // 重置耗时超过周期时顺延，不补发
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Check resetter stopped");
                    break;
                }
                _ = ticker.tick() => {
                    match storage.reset_all_checks(default_checks).await {
                        Ok(rows) => info!(
                            "Reset check count to {} for {} user(s)",
                            default_checks, rows
                        ),
                        Err(e) => warn!("Failed to reset check counts: {}", e),
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn storage_with_user(count_checks: i32) -> (Arc<dyn Storage>, i64) {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
        let user = storage
            .create_user(CreateUserRequest {
                mail: "anna@example.com".to_string(),
                nickname: "anna".to_string(),
                password: "hash".to_string(),
                is_moderator: false,
                count_checks,
            })
            .await
            .unwrap();
        (storage, user.id)
    }

    async fn checks(storage: &Arc<dyn Storage>, user_id: i64) -> i32 {
        storage
            .get_user_by_id(user_id)
            .await
            .unwrap()
            .unwrap()
            .count_checks
    }

    #[tokio::test]
    async fn test_resets_after_period() {
        let (storage, user_id) = storage_with_user(0).await;
        let shutdown = CancellationToken::new();
        let handle = spawn_check_resetter(
            storage.clone(),
            Duration::from_millis(50),
            3,
            shutdown.clone(),
        );

        let deadline = Instant::now() + Duration::from_secs(5);
        while checks(&storage, user_id).await != 3 {
            assert!(Instant::now() < deadline, "checks were never reset");
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_first_tick_skipped_and_cancellable() {
        let (storage, user_id) = storage_with_user(1).await;
        let shutdown = CancellationToken::new();
        let handle = spawn_check_resetter(
            storage.clone(),
            Duration::from_secs(3600),
            3,
            shutdown.clone(),
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(checks(&storage, user_id).await, 1);
    }
}
