use crate::config::AppConfig;
use crate::errors::{AcademyError, Result};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

fn argon2_from_config() -> Result<Argon2<'static>> {
    let config = &AppConfig::get().argon2;
    let params = Params::new(
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        None,
    )
    .map_err(|e| AcademyError::validation(format!("Argon2 参数错误: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Argon2id 哈希，参数来自 `[argon2]` 配置
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2_from_config()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AcademyError::validation(format!("密码哈希失败: {e}")))?;
    Ok(hash.to_string())
}

/// 参数从哈希串本身读取，配置调整后旧密码仍可校验
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("BeachTennis2025").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("BeachTennis2025", &hash));
        assert!(!verify_password("beachtennis2025", &hash));
        assert!(!verify_password("BeachTennis2025", "not-a-hash"));
    }
}
