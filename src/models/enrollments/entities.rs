use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{AcademyError, Result};
use crate::models::occurrences::entities::{Occurrence, OccurrenceStatus};

// 报名状态：enrolled -> cancelled，cancelled 为终态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub enum EnrollmentStatus {
    Enrolled,
    Cancelled,
}

impl EnrollmentStatus {
    pub const ENROLLED: &'static str = "enrolled";
    pub const CANCELLED: &'static str = "cancelled";

    pub fn cancel(self) -> Result<EnrollmentStatus> {
        match self {
            EnrollmentStatus::Enrolled => Ok(EnrollmentStatus::Cancelled),
            EnrollmentStatus::Cancelled => Err(AcademyError::invalid_state(
                "Enrollment is already cancelled",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for EnrollmentStatus {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<EnrollmentStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid enrollment status: '{s}'. Supported: enrolled, cancelled"
            ))
        })
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrollmentStatus::Enrolled => write!(f, "{}", Self::ENROLLED),
            EnrollmentStatus::Cancelled => write!(f, "{}", Self::CANCELLED),
        }
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            Self::ENROLLED => Ok(EnrollmentStatus::Enrolled),
            Self::CANCELLED => Ok(EnrollmentStatus::Cancelled),
            _ => Err(format!("Invalid enrollment status: {s}")),
        }
    }
}

// 报名记录，取消后保留
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct Enrollment {
    pub id: i64,
    pub occurrence_id: i64,
    pub user_id: i64,
    pub status: EnrollmentStatus,
    pub enrolled_by: i64,
    pub enrolled_at: DateTime<Utc>,
    pub cancelled_by: Option<i64>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Enrollment {
    pub fn is_active(&self) -> bool {
        self.status == EnrollmentStatus::Enrolled
    }
}

/// 报名入口
///
/// 学员自助报名只接受 `scheduled` 且尚未开始的场次；
/// 管理员报名接受 `scheduled` 和 `confirmed`，不检查开始时间。
#[derive(Debug, Clone, Copy)]
pub enum EnrollmentPolicy {
    SelfService { now: DateTime<Utc> },
    Staff,
}

impl EnrollmentPolicy {
    pub fn accepted_statuses(&self) -> &'static [OccurrenceStatus] {
        match self {
            EnrollmentPolicy::SelfService { .. } => &[OccurrenceStatus::Scheduled],
            EnrollmentPolicy::Staff => &[OccurrenceStatus::Scheduled, OccurrenceStatus::Confirmed],
        }
    }

    /// 报名前的状态与时间检查，顺序固定：先状态后时间
    pub fn check(&self, occurrence: &Occurrence) -> Result<()> {
        if !self.accepted_statuses().contains(&occurrence.status) {
            return Err(AcademyError::invalid_state(format!(
                "Occurrence {} is {} and does not accept enrollments",
                occurrence.id, occurrence.status
            )));
        }
        if let EnrollmentPolicy::SelfService { now } = self {
            if occurrence.has_started(*now) {
                return Err(AcademyError::past_occurrence(format!(
                    "Occurrence {} has already started",
                    occurrence.id
                )));
            }
        }
        Ok(())
    }
}

/// 取消报名的操作者
#[derive(Debug, Clone, Copy)]
pub enum CancellationActor {
    /// 学员本人，需要是报名所有者且场次尚未开始
    SelfService { user_id: i64, now: DateTime<Utc> },
    /// 管理员，跳过所有权与时间检查
    Staff { user_id: i64 },
}

impl CancellationActor {
    pub fn user_id(&self) -> i64 {
        match self {
            CancellationActor::SelfService { user_id, .. } | CancellationActor::Staff { user_id } => {
                *user_id
            }
        }
    }

    pub fn check(&self, enrollment: &Enrollment, occurrence: &Occurrence) -> Result<()> {
        if let CancellationActor::SelfService { user_id, now } = self {
            if enrollment.user_id != *user_id {
                return Err(AcademyError::authorization(
                    "Only the enrolled user can cancel this enrollment",
                ));
            }
            if occurrence.has_started(*now) {
                return Err(AcademyError::past_occurrence(format!(
                    "Occurrence {} has already started",
                    occurrence.id
                )));
            }
        }
        if !enrollment.is_active() {
            return Err(AcademyError::invalid_state(
                "Enrollment is already cancelled",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn occurrence(status: OccurrenceStatus, starts_at: DateTime<Utc>) -> Occurrence {
        Occurrence {
            id: 1,
            class_id: 1,
            slot_id: Some(1),
            instructor_id: 2,
            venue_id: 3,
            starts_at,
            ends_at: starts_at + TimeDelta::hours(1),
            status,
            enrolled_count: 0,
            cancelled_at: None,
            created_at: starts_at,
            updated_at: starts_at,
        }
    }

    fn enrollment(user_id: i64, status: EnrollmentStatus) -> Enrollment {
        let now = Utc::now();
        Enrollment {
            id: 9,
            occurrence_id: 1,
            user_id,
            status,
            enrolled_by: user_id,
            enrolled_at: now,
            cancelled_by: None,
            cancelled_at: None,
            updated_at: now,
        }
    }

    #[test]
    fn test_self_service_requires_scheduled() {
        let now = Utc::now();
        let policy = EnrollmentPolicy::SelfService { now };
        let occ = occurrence(OccurrenceStatus::Confirmed, now + TimeDelta::days(1));
        assert!(matches!(
            policy.check(&occ),
            Err(AcademyError::InvalidState(_))
        ));
        assert!(EnrollmentPolicy::Staff.check(&occ).is_ok());
    }

    #[test]
    fn test_self_service_rejects_started() {
        let now = Utc::now();
        let occ = occurrence(OccurrenceStatus::Scheduled, now - TimeDelta::minutes(5));
        assert!(matches!(
            EnrollmentPolicy::SelfService { now }.check(&occ),
            Err(AcademyError::PastOccurrence(_))
        ));
        assert!(EnrollmentPolicy::Staff.check(&occ).is_ok());
    }

    #[test]
    fn test_status_checked_before_time() {
        let now = Utc::now();
        let occ = occurrence(OccurrenceStatus::Cancelled, now - TimeDelta::days(1));
        assert!(matches!(
            EnrollmentPolicy::SelfService { now }.check(&occ),
            Err(AcademyError::InvalidState(_))
        ));
        assert!(matches!(
            EnrollmentPolicy::Staff.check(&occ),
            Err(AcademyError::InvalidState(_))
        ));
    }

    #[test]
    fn test_cancellation_ownership() {
        let now = Utc::now();
        let occ = occurrence(OccurrenceStatus::Scheduled, now + TimeDelta::days(1));
        let row = enrollment(5, EnrollmentStatus::Enrolled);
        let stranger = CancellationActor::SelfService { user_id: 6, now };
        assert!(matches!(
            stranger.check(&row, &occ),
            Err(AcademyError::Authorization(_))
        ));
        assert!(CancellationActor::Staff { user_id: 1 }.check(&row, &occ).is_ok());
    }

    #[test]
    fn test_cancel_twice_is_invalid() {
        assert_eq!(
            EnrollmentStatus::Enrolled.cancel().unwrap(),
            EnrollmentStatus::Cancelled
        );
        assert!(EnrollmentStatus::Cancelled.cancel().is_err());

        let now = Utc::now();
        let occ = occurrence(OccurrenceStatus::Scheduled, now + TimeDelta::days(1));
        let row = enrollment(5, EnrollmentStatus::Cancelled);
        assert!(matches!(
            CancellationActor::Staff { user_id: 1 }.check(&row, &occ),
            Err(AcademyError::InvalidState(_))
        ));
    }
}
