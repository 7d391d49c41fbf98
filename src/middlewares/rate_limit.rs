/*!
 * 速率限制中间件
 *
 * 固定窗口计数，计数存在进程内的 moka 缓存中。已认证请求按用户计数，
 * 匿名请求按客户端 IP 计数，超限返回 429。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login))
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

use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

/// 最长窗口，计数条目的存活时间
const MAX_WINDOW_SECS: u64 = 3600;

// 键: 前缀:身份:窗口序号，值: 窗口内请求数
static RATE_LIMIT_CACHE: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(MAX_WINDOW_SECS))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.clamp(1, MAX_WINDOW_SECS),
            key_prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录：5 次/分钟/IP
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 注册：3 次/分钟/IP
    pub fn register() -> Self {
        Self::new(3, 60).with_prefix("register")
    }

    /// 刷新令牌：10 次/分钟/IP
    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    /// 题目生成：10 次/分钟/用户
    pub fn generate() -> Self {
        Self::new(10, 60).with_prefix("generate")
    }

    /// 辅导对话：20 次/分钟/用户
    pub fn tutor() -> Self {
        Self::new(20, 60).with_prefix("tutor")
    }

    /// 作文反馈：5 次/分钟/用户
    pub fn essay() -> Self {
        Self::new(5, 60).with_prefix("essay")
    }

    fn window_key(&self, identity: &str, now_secs: u64) -> String {
        let window = now_secs / self.window_secs;
        if self.key_prefix.is_empty() {
            format!("{identity}:{window}")
        } else {
            format!("{}:{identity}:{window}", self.key_prefix)
        }
    }
}

// 优先使用连接信息中的地址，其次是代理头
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

    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
        && ip.trim().parse::<IpAddr>().is_ok()
    {
        return ip.trim().to_string();
    }

    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

fn too_many_requests(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please slow down",
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
            let identity = req
                .extensions()
                .get::<User>()
                .map(|user| format!("user:{}", user.id))
                .unwrap_or_else(|| format!("ip:{}", extract_client_ip(&req)));

            let now_secs = chrono::Utc::now().timestamp().max(0) as u64;
            let key = limit.window_key(&identity, now_secs);
            // 原子自增，并发请求不会读到同一个旧值
            let count = RATE_LIMIT_CACHE
                .entry(key.clone())
                .and_upsert_with(|existing| {
                    ready(existing.map_or(0, |entry| entry.into_value()).saturating_add(1))
                })
                .await
                .into_value();

            if count > limit.max_requests {
                warn!(
                    "Rate limit exceeded for {} ({}/{})",
                    key, count, limit.max_requests
                );
                let retry_after = limit.window_secs - now_secs % limit.window_secs;
                return Ok(req.into_response(too_many_requests(retry_after).map_into_right_body()));
            }

            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test, web};

    #[::core::prelude::v1::test]
    fn test_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window_secs, 60);
        assert_eq!(login.key_prefix, "login");
        assert_eq!(RateLimit::register().max_requests, 3);
        assert_eq!(RateLimit::tutor().max_requests, 20);
    }

    #[::core::prelude::v1::test]
    fn test_window_key_rolls_over() {
        let limit = RateLimit::new(1, 60).with_prefix("t");
        assert_eq!(limit.window_key("ip:1.2.3.4", 119), "t:ip:1.2.3.4:1");
        assert_eq!(limit.window_key("ip:1.2.3.4", 120), "t:ip:1.2.3.4:2");
    }

    #[actix_web::test]
    async fn test_requests_over_limit_get_429() {
        let app = test::init_service(
            App::new().service(
                web::resource("/limited")
                    .wrap(RateLimit::new(2, 3600).with_prefix("test_over_limit"))
                    .route(web::get().to(HttpResponse::Ok)),
            ),
        )
        .await;

        for _ in 0..2 {
            let req = test::TestRequest::get().uri("/limited").to_request();
            assert_eq!(test::call_service(&app, req).await.status(), 200);
        }
        let req = test::TestRequest::get().uri("/limited").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 429);
        assert!(resp.headers().contains_key("Retry-After"));
    }

    #[actix_web::test]
    async fn test_concurrent_requests_respect_limit() {
        let app = test::init_service(
            App::new().service(
                web::resource("/limited")
                    .wrap(RateLimit::new(3, 3600).with_prefix("test_concurrent"))
                    .route(web::get().to(HttpResponse::Ok)),
            ),
        )
        .await;

        let calls = (0..8).map(|_| {
            let req = test::TestRequest::get().uri("/limited").to_request();
            test::call_service(&app, req)
        });
        let responses = futures_util::future::join_all(calls).await;
        let allowed = responses.iter().filter(|r| r.status() == 200).count();
        let limited = responses.iter().filter(|r| r.status() == 429).count();
        assert_eq!(allowed, 3);
        assert_eq!(limited, 5);
    }
}
