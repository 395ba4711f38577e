use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 通用的启用/停用状态，场地、课程和排课共用
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/common.ts")]
pub enum ActiveStatus {
    Active,
    Inactive,
}

impl std::fmt::Display for ActiveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActiveStatus::Active => write!(f, "active"),
            ActiveStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for ActiveStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ActiveStatus::Active),
            "inactive" => Ok(ActiveStatus::Inactive),
            _ => Err(format!("Invalid status: {s}")),
        }
    }
}

// 场地（球场、教室等）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/venue.ts")]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub sport: Option<String>,
    pub status: ActiveStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
