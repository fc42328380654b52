use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SystemService;
use crate::models::ApiResponse;
use crate::models::system::responses::CountsResponse;

pub async fn get_counts(
    service: &SystemService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let counts = tokio::try_join!(
        storage.count_variants(),
        storage.count_essays(),
        storage.count_users(),
    );

    match counts {
        Ok((variants_count, essays_count, users_count)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                CountsResponse {
                    variants_count,
                    essays_count,
                    users_count,
                },
                "Counts retrieved successfully",
            )))
        }
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}
