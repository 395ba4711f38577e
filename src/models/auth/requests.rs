use serde::Deserialize;
use ts_rs::TS;

// 登录请求，identifier 可以是用户名或邮箱
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    #[serde(alias = "username", alias = "email")]
    pub identifier: String,
    pub password: String,
    /// 延长刷新令牌有效期
    #[serde(default)]
    pub remember_me: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_aliases() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"username":"ana","password":"x"}"#).unwrap();
        assert_eq!(req.identifier, "ana");
        assert!(!req.remember_me);

        let req: LoginRequest = serde_json::from_str(
            r#"{"email":"ana@academy.local","password":"x","remember_me":true}"#,
        )
        .unwrap();
        assert_eq!(req.identifier, "ana@academy.local");
        assert!(req.remember_me);
    }
}
