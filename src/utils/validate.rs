use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

static START_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("Invalid start time regex"));

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：5 <= x <= 16
    if username.len() < 5 || username.len() > 16 {
        return Err("Username length must be between 5 and 16 characters");
    }
    // 用户名格式校验：只能包含字母、数字、下划线或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 开始时间格式：24 小时制 `HH:MM`
pub fn validate_start_time(value: &str) -> Result<NaiveTime, &'static str> {
    if !START_TIME_RE.is_match(value) {
        return Err("start_time must use the 24-hour HH:MM format");
    }
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| "start_time is not a valid time")
}

/// ISO 星期：1 = 周一 … 7 = 周日
pub fn validate_weekday(weekday: i32) -> Result<(), &'static str> {
    if !(1..=7).contains(&weekday) {
        return Err("weekday must be between 1 (Monday) and 7 (Sunday)");
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name must not be empty");
    }
    if trimmed.chars().count() > 100 {
        return Err("Name must be at most 100 characters");
    }
    Ok(())
}

/// 课程数值字段：时长、容量为正数，价格不为负
pub fn validate_class_numbers(
    duration_minutes: Option<i32>,
    capacity_max: Option<i32>,
    price_cents: Option<i64>,
) -> Result<(), &'static str> {
    if duration_minutes.is_some_and(|d| d <= 0) {
        return Err("duration_minutes must be greater than zero");
    }
    if capacity_max.is_some_and(|c| c <= 0) {
        return Err("capacity_max must be greater than zero");
    }
    if price_cents.is_some_and(|p| p < 0) {
        return Err("price_cents must not be negative");
    }
    Ok(())
}

/// 场次生成区间
///
/// `range_start` 不能晚于场馆本地的今天，`range_end` 必须晚于 `range_start`，
/// 区间跨度不超过 `max_days` 天。
pub fn validate_generation_range(
    range_start: NaiveDate,
    range_end: NaiveDate,
    today: NaiveDate,
    max_days: i64,
) -> Result<(), String> {
    if range_start > today {
        return Err(format!(
            "range_start ({range_start}) must not be after today ({today})"
        ));
    }
    if range_end <= range_start {
        return Err(format!(
            "range_end ({range_end}) must be after range_start ({range_start})"
        ));
    }
    // 首尾两天都计入窗口
    let days = (range_end - range_start).num_days() + 1;
    if days > max_days {
        return Err(format!(
            "Generation window of {days} days exceeds the limit of {max_days} days"
        ));
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合安全策略
///
/// 策略要求：
/// - 最小长度：8 字符
/// - 必须包含：大写字母 + 小写字母 + 数字
/// - 可选：特殊字符（增强安全性）
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    // 1. 长度检查：至少 8 个字符
    if password.len() < 8 {
        errors.push("Password must be at least 8 characters long");
    }

    // 2. 大写字母检查
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }

    // 3. 小写字母检查
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }

    // 4. 数字检查
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    // 5. 常见弱密码检查
    let weak_passwords = [
        "password",
        "12345678",
        "123456789",
        "qwerty123",
        "admin123",
        "password1",
        "Password1",
        "Qwerty123",
        "Abcd1234",
    ];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// 简化的密码验证（返回 Result）
pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecureP@ss1").is_valid);
        assert!(validate_password("MyP@ssw0rd").is_valid);
        assert!(validate_password("SecurePass123").is_valid);
    }

    #[test]
    fn test_short_password() {
        let result = validate_password("Ab1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );
    }

    #[test]
    fn test_no_uppercase() {
        let result = validate_password("abcd1234");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one uppercase letter")
        );
    }

    #[test]
    fn test_no_lowercase() {
        let result = validate_password("ABCD1234");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one lowercase letter")
        );
    }

    #[test]
    fn test_no_digit() {
        let result = validate_password("AbcdEfgh");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one digit")
        );
    }

    #[test]
    fn test_common_password() {
        let result = validate_password("Password1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }

    #[test]
    fn test_start_time_format() {
        assert_eq!(
            validate_start_time("18:00"),
            Ok(NaiveTime::from_hms_opt(18, 0, 0).unwrap())
        );
        assert!(validate_start_time("07:30").is_ok());
        assert!(validate_start_time("7:30").is_err());
        assert!(validate_start_time("24:00").is_err());
        assert!(validate_start_time("18:60").is_err());
        assert!(validate_start_time("18:00:00").is_err());
    }

    #[test]
    fn test_weekday_bounds() {
        assert!(validate_weekday(1).is_ok());
        assert!(validate_weekday(7).is_ok());
        assert!(validate_weekday(0).is_err());
        assert!(validate_weekday(8).is_err());
    }

    #[test]
    fn test_class_numbers() {
        assert!(validate_class_numbers(Some(60), Some(8), Some(5000)).is_ok());
        assert!(validate_class_numbers(None, None, None).is_ok());
        assert!(validate_class_numbers(Some(0), Some(8), None).is_err());
        assert!(validate_class_numbers(Some(60), Some(0), None).is_err());
        assert!(validate_class_numbers(Some(60), Some(8), Some(-1)).is_err());
    }

    #[test]
    fn test_generation_range() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        assert!(validate_generation_range(today, end, today, 366).is_ok());

        // 起始日期在未来
        let tomorrow = today.succ_opt().unwrap();
        assert!(validate_generation_range(tomorrow, end, today, 366).is_err());

        // 结束日期必须严格晚于起始日期
        assert!(validate_generation_range(today, today, today, 366).is_err());

        // 超出最大天数
        assert!(validate_generation_range(today, end, today, 10).is_err());

        // 3 月 1 日到 31 日共 31 天
        assert!(validate_generation_range(today, end, today, 31).is_ok());
        assert!(validate_generation_range(today, end, today, 30).is_err());

        // 默认上限 366 天：2025-03-01 到 2026-03-01 是 366 天，再多一天即越界
        let year_end = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert!(validate_generation_range(today, year_end, today, 366).is_ok());
        let over = year_end.succ_opt().unwrap();
        assert!(validate_generation_range(today, over, today, 366).is_err());
    }

    #[test]
    fn test_username_and_email() {
        assert!(validate_username("coach_ana").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_email("ana@academy.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }
}
