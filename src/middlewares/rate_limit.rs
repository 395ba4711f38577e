/*!
 * 速率限制中间件
 *
 * 固定一分钟窗口计数，已认证请求按用户计数，否则按客户端 IP 计数。
 * 超过限制返回 429，并带 `Retry-After` 头。
 *
 * ```rust,ignore
 * web::scope("/auth")
 *     .service(web::resource("/login").wrap(RateLimit::login()).route(web::post().to(login)))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode, users::entities::User};

const WINDOW_SECS: u64 = 60;

/// 键: 前缀:身份，值: 窗口内请求数
static RATE_LIMIT_CACHE: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(WINDOW_SECS))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    /// 每分钟允许的最大请求数
    max_requests: u32,
    key_prefix: &'static str,
}

impl RateLimit {
    pub fn per_minute(max_requests: u32, key_prefix: &'static str) -> Self {
        Self {
            max_requests,
            key_prefix,
        }
    }

    /// 登录：5 次/分钟/IP
    pub fn login() -> Self {
        Self::per_minute(5, "login")
    }

    /// 刷新令牌：10 次/分钟/IP
    pub fn refresh_token() -> Self {
        Self::per_minute(10, "refresh")
    }

    /// 报名与取消：30 次/分钟/用户
    pub fn enrollment() -> Self {
        Self::per_minute(30, "enroll")
    }

    /// 批量报名与场次生成：10 次/分钟/用户
    pub fn bulk() -> Self {
        Self::per_minute(10, "bulk")
    }
}

// 反向代理场景下回退到 X-Forwarded-For 第一个地址
fn extract_client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ref ip) = connection_ip
        && ip.parse::<IpAddr>().is_ok()
    {
        return ip.clone();
    }

    req.headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| ip.parse::<IpAddr>().is_ok())
        .map(str::to_string)
        .or(connection_ip)
        .unwrap_or_else(|| "unknown".to_string())
}

fn rate_limit_key(prefix: &str, req: &ServiceRequest) -> String {
    let identity = req
        .extensions()
        .get::<User>()
        .map(|user| format!("user:{}", user.id))
        .unwrap_or_else(|| format!("ip:{}", extract_client_ip(req)));
    format!("{prefix}:{identity}")
}

fn create_rate_limit_response() -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", WINDOW_SECS.to_string()))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let cache_key = rate_limit_key(limit.key_prefix, &req);
            let current = RATE_LIMIT_CACHE.get(&cache_key).await.unwrap_or(0);

            if current >= limit.max_requests {
                warn!(
                    "Rate limit exceeded for {} ({}/{})",
                    cache_key, current, limit.max_requests
                );
                return Ok(req.into_response(create_rate_limit_response().map_into_right_body()));
            }

            RATE_LIMIT_CACHE.insert(cache_key, current + 1).await;

            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.key_prefix, "login");

        assert_eq!(RateLimit::enrollment().max_requests, 30);
        assert_eq!(RateLimit::bulk().key_prefix, "bulk");
    }

    #[test]
    fn test_rate_limit_response_status() {
        let resp = create_rate_limit_response();
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(resp.headers().contains_key("Retry-After"));
    }
}
