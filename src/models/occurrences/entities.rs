use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{AcademyError, Result};

/// 场次状态
///
/// 合法迁移：
/// - scheduled -> confirmed
/// - scheduled -> cancelled
/// - confirmed -> cancelled
///
/// cancelled 为终态。
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/occurrence.ts")]
pub enum OccurrenceStatus {
    Scheduled,
    Confirmed,
    Cancelled,
}

impl OccurrenceStatus {
    pub const SCHEDULED: &'static str = "scheduled";
    pub const CONFIRMED: &'static str = "confirmed";
    pub const CANCELLED: &'static str = "cancelled";

    pub fn can_transition_to(self, next: OccurrenceStatus) -> bool {
        use OccurrenceStatus::*;
        matches!(
            (self, next),
            (Scheduled, Confirmed) | (Scheduled, Cancelled) | (Confirmed, Cancelled)
        )
    }

    /// 执行状态迁移，非法迁移返回 InvalidState
    pub fn transition(self, next: OccurrenceStatus) -> Result<OccurrenceStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AcademyError::invalid_state(format!(
                "Occurrence cannot move from {self} to {next}"
            )))
        }
    }

    pub fn confirm(self) -> Result<OccurrenceStatus> {
        self.transition(OccurrenceStatus::Confirmed)
    }

    pub fn cancel(self) -> Result<OccurrenceStatus> {
        self.transition(OccurrenceStatus::Cancelled)
    }

    /// 能迁移到 `next` 的所有前置状态
    pub fn predecessors_of(next: OccurrenceStatus) -> Vec<OccurrenceStatus> {
        [
            OccurrenceStatus::Scheduled,
            OccurrenceStatus::Confirmed,
            OccurrenceStatus::Cancelled,
        ]
        .into_iter()
        .filter(|s| s.can_transition_to(next))
        .collect()
    }

    pub fn is_cancelled(self) -> bool {
        self == OccurrenceStatus::Cancelled
    }
}

impl<'de> Deserialize<'de> for OccurrenceStatus {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<OccurrenceStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid occurrence status: '{s}'. Supported: scheduled, confirmed, cancelled"
            ))
        })
    }
}

impl std::fmt::Display for OccurrenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OccurrenceStatus::Scheduled => write!(f, "{}", Self::SCHEDULED),
            OccurrenceStatus::Confirmed => write!(f, "{}", Self::CONFIRMED),
            OccurrenceStatus::Cancelled => write!(f, "{}", Self::CANCELLED),
        }
    }
}

impl std::str::FromStr for OccurrenceStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            Self::SCHEDULED => Ok(OccurrenceStatus::Scheduled),
            Self::CONFIRMED => Ok(OccurrenceStatus::Confirmed),
            Self::CANCELLED => Ok(OccurrenceStatus::Cancelled),
            _ => Err(format!("Invalid occurrence status: {s}")),
        }
    }
}

// 课程场次
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/occurrence.ts")]
pub struct Occurrence {
    pub id: i64,
    pub class_id: i64,
    // 生成该场次的排课，排课删除后为空
    pub slot_id: Option<i64>,
    pub instructor_id: i64,
    pub venue_id: i64,
    pub starts_at: chrono::DateTime<chrono::Utc>,
    pub ends_at: chrono::DateTime<chrono::Utc>,
    pub status: OccurrenceStatus,
    pub enrolled_count: i32,
    pub cancelled_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Occurrence {
    pub fn has_started(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.starts_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert_eq!(
            OccurrenceStatus::Scheduled.confirm().unwrap(),
            OccurrenceStatus::Confirmed
        );
        assert_eq!(
            OccurrenceStatus::Scheduled.cancel().unwrap(),
            OccurrenceStatus::Cancelled
        );
        assert_eq!(
            OccurrenceStatus::Confirmed.cancel().unwrap(),
            OccurrenceStatus::Cancelled
        );
    }

    #[test]
    fn test_cancelled_is_terminal() {
        let err = OccurrenceStatus::Cancelled.confirm().unwrap_err();
        assert!(matches!(err, AcademyError::InvalidState(_)));
        assert!(OccurrenceStatus::Cancelled.cancel().is_err());
        assert!(
            !OccurrenceStatus::Cancelled.can_transition_to(OccurrenceStatus::Scheduled)
        );
    }

    #[test]
    fn test_no_backwards_moves() {
        assert!(OccurrenceStatus::Confirmed.confirm().is_err());
        assert!(
            !OccurrenceStatus::Confirmed.can_transition_to(OccurrenceStatus::Scheduled)
        );
    }

    #[test]
    fn test_predecessors() {
        assert_eq!(
            OccurrenceStatus::predecessors_of(OccurrenceStatus::Cancelled),
            vec![OccurrenceStatus::Scheduled, OccurrenceStatus::Confirmed]
        );
        assert_eq!(
            OccurrenceStatus::predecessors_of(OccurrenceStatus::Confirmed),
            vec![OccurrenceStatus::Scheduled]
        );
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(
            "confirmed".parse::<OccurrenceStatus>(),
            Ok(OccurrenceStatus::Confirmed)
        );
        assert_eq!(OccurrenceStatus::Cancelled.to_string(), "cancelled");
    }
}
