//! 时间源
//!
//! 业务判断（场次是否已开始、生成范围是否从今天开始）都通过 [`Clock`] 取当前时间，
//! 测试中可以换成 [`FixedClock`]。

use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 系统时钟
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 固定时钟，可手动拨动
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: Arc<RwLock<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Arc::new(RwLock::new(instant)),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        let mut guard = self.instant.write().unwrap_or_else(|e| e.into_inner());
        *guard = instant;
    }

    pub fn advance(&self, delta: chrono::TimeDelta) {
        let mut guard = self.instant.write().unwrap_or_else(|e| e.into_inner());
        *guard += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.instant.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// 从请求中取时钟，未注册时退回系统时钟
pub fn clock_from_request(request: &actix_web::HttpRequest) -> Arc<dyn Clock> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn Clock>>>()
        .map(|data| data.get_ref().clone())
        .unwrap_or_else(|| Arc::new(SystemClock))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_advance() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let clock = FixedClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(chrono::TimeDelta::hours(2));
        assert_eq!(clock.now(), start + chrono::TimeDelta::hours(2));

        let shared: Arc<dyn Clock> = Arc::new(clock.clone());
        clock.set(start);
        assert_eq!(shared.now(), start);
    }

    #[test]
    fn test_clock_fallback_without_app_data() {
        let req = actix_web::test::TestRequest::default().to_http_request();
        let before = Utc::now();
        let now = clock_from_request(&req).now();
        assert!(now >= before);
    }
}
