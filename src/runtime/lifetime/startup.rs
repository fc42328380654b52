use crate::cache::{ObjectCache, create_cache};
use crate::models::users::requests::CreateUserRequest;
use crate::services::grading::{GradingDispatcher, create_dispatcher};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub dispatcher: Arc<dyn GradingDispatcher>,
}

const SEED_MODERATOR_MAIL: &str = "admin@localhost";

/// 生成随机密码
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// 初始化默认版主账号
/// 如果数据库中没有任何用户，则创建一个版主
async fn seed_moderator(storage: &Arc<dyn Storage>, default_checks: i32) {
    // 检查是否已有用户
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping moderator seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating default moderator account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping moderator seed", e);
            return;
        }
    }

    // 获取密码：优先从环境变量，否则生成随机密码
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated moderator password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash moderator password: {}, skipping seed", e);
            return;
        }
    };

    let moderator = CreateUserRequest {
        mail: SEED_MODERATOR_MAIL.to_string(),
        nickname: "Moderator".to_string(),
        password: password_hash,
        is_moderator: true,
        count_checks: default_checks,
    };

    match storage.create_user(moderator).await {
        Ok(user) => {
            info!(
                "Default moderator account created successfully (ID: {}, mail: {})",
                user.id, user.mail
            );
        }
        Err(e) => {
            warn!("Failed to create moderator account: {}", e);
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储、缓存和评分服务客户端
pub async fn prepare_server_startup() -> StartupContext {
    let config = crate::config::AppConfig::get();

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    // 初始化默认版主账号（如果需要）
    seed_moderator(&storage, config.quota.default_checks).await;

    let cache = create_cache();
    warn!("Cache backend initialized");

    let dispatcher = create_dispatcher().expect("Failed to create grading client");
    warn!("Grading client targets {}", config.grading.endpoint);

    StartupContext {
        storage,
        cache,
        dispatcher,
    }
}
