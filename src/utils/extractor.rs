use actix_web::{
    FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError, http::StatusCode,
};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

/// 路径中的 `{id}`，必须是正整数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeIDI64(pub i64);

fn bad_path(message: String) -> actix_web::Error {
    let response = HttpResponse::build(StatusCode::BAD_REQUEST)
        .json(ApiResponse::<()>::error_empty(ErrorCode::BadRequest, message.clone()));
    InternalError::from_response(message, response).into()
}

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let parsed = match req.match_info().get("id") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(id) if id > 0 => Ok(SafeIDI64(id)),
                _ => Err(bad_path(format!("Invalid id: {raw}"))),
            },
            None => Err(bad_path("Missing id".to_string())),
        };
        ready(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn extract(id: &str) -> Result<SafeIDI64, actix_web::Error> {
        let (req, mut payload) = TestRequest::default()
            .param("id", id.to_string())
            .to_http_parts();
        SafeIDI64::from_request(&req, &mut payload).into_inner()
    }

    #[test]
    fn test_parses_positive_id() {
        assert_eq!(extract("42").unwrap(), SafeIDI64(42));
    }

    #[test]
    fn test_rejects_garbage() {
        for raw in ["0", "-3", "abc", "1.5", "99999999999999999999"] {
            let err = extract(raw).unwrap_err();
            assert_eq!(
                err.as_response_error().status_code(),
                StatusCode::BAD_REQUEST,
                "{raw}"
            );
        }
    }
}
