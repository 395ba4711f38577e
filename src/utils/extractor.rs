//! 路径参数提取器
//!
//! actix 默认的 `web::Path<i64>` 解析失败时返回纯文本 404，这里统一改为
//! 400 + JSON 响应，并拒绝非正数 ID。

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError,
};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn invalid_path_param(name: &str, raw: &str) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("Invalid path parameter '{name}': {raw}"),
    ));
    InternalError::from_response(format!("invalid path parameter {name}"), response).into()
}

pub(crate) fn parse_positive_id(name: &str, raw: &str) -> Result<i64, actix_web::Error> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(invalid_path_param(name, raw)),
    }
}

macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                let raw = req.match_info().get($param).unwrap_or_default();
                ready(parse_positive_id($param, raw).map($name))
            }
        }
    };
}

define_safe_i64_extractor!(SafeIDI64, "id");
define_safe_i64_extractor!(SafeClassIdI64, "class_id");
define_safe_i64_extractor!(SafeSlotIdI64, "slot_id");
define_safe_i64_extractor!(SafeOccurrenceIdI64, "occurrence_id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id("id", "42").unwrap(), 42);
        assert!(parse_positive_id("id", "0").is_err());
        assert!(parse_positive_id("id", "-3").is_err());
        assert!(parse_positive_id("id", "abc").is_err());
    }

    #[actix_web::test]
    async fn test_extractor_reads_named_segment() {
        let req = actix_web::test::TestRequest::default()
            .param("class_id", "7")
            .to_http_request();
        let extracted = SafeClassIdI64::extract(&req).await.unwrap();
        assert_eq!(extracted, SafeClassIdI64(7));

        let missing = SafeSlotIdI64::extract(&req).await;
        assert!(missing.is_err());
    }
}
