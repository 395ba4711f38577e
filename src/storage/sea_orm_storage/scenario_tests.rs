//! 基于内存 SQLite 的存储层场景测试：场次展开、名额闸门、取消与级联

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta, TimeZone, Utc};

use super::SeaOrmStorage;
use crate::errors::AcademyError;
use crate::models::{
    classes::requests::{CreateClassRequest, UpdateClassRequest},
    enrollments::{
        entities::{CancellationActor, EnrollmentPolicy, EnrollmentStatus},
        requests::BulkEnrollItem,
    },
    occurrences::entities::OccurrenceStatus,
    schedules::requests::CreateScheduleSlotRequest,
    users::{entities::UserRole, requests::CreateUserRequest},
    venues::{entities::ActiveStatus, requests::CreateVenueRequest},
};
use crate::services::enrollments::bulk::enroll_items;
use crate::storage::Storage;

struct Fixture {
    storage: Arc<SeaOrmStorage>,
    admin_id: i64,
    class_id: i64,
    instructor_id: i64,
    venue_id: i64,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 固定的“当前时间”：2024 年 3 月的场次已开始，2040 年的尚未开始
fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap()
}

async fn memory_storage() -> Arc<SeaOrmStorage> {
    // 内存库每个连接独立，连接池只能为 1
    let storage = SeaOrmStorage::connect("sqlite::memory:", 1, 5, FixedOffset::east_opt(0).unwrap())
        .await
        .unwrap();
    Arc::new(storage)
}

async fn create_user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> i64 {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@academy.test"),
            password: "not-a-real-hash".to_string(),
            role,
            display_name: None,
            phone: None,
        })
        .await
        .unwrap()
        .id
}

/// 一个周一 18:00 排课、容量为 `capacity` 的课程
async fn fixture(capacity: i32) -> Fixture {
    let storage = memory_storage().await;
    let admin_id = create_user(&storage, "admin", UserRole::Admin).await;
    let instructor_id = create_user(&storage, "coach", UserRole::Instructor).await;

    let venue_id = storage
        .create_venue(CreateVenueRequest {
            name: "Quadra 1".to_string(),
            sport: Some("beach_tennis".to_string()),
        })
        .await
        .unwrap()
        .id;

    let class_id = storage
        .create_class(CreateClassRequest {
            name: "Beach Tennis Iniciante".to_string(),
            sport: "beach_tennis".to_string(),
            level: "iniciante".to_string(),
            duration_minutes: 60,
            capacity_max: capacity,
            price_cents: None,
        })
        .await
        .unwrap()
        .id;

    storage
        .create_schedule_slot(
            class_id,
            CreateScheduleSlotRequest {
                weekday: 1,
                start_time: "18:00".to_string(),
                instructor_id,
                venue_id,
            },
        )
        .await
        .unwrap();

    Fixture {
        storage,
        admin_id,
        class_id,
        instructor_id,
        venue_id,
    }
}

async fn students(storage: &SeaOrmStorage, count: usize) -> Vec<i64> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        ids.push(create_user(storage, &format!("student{i}"), UserRole::Student).await);
    }
    ids
}

/// 远期的第一个周一场次，自助报名不会碰到时间检查
async fn future_occurrence(fx: &Fixture) -> i64 {
    let generated = fx
        .storage
        .generate_occurrences(fx.class_id, date(2040, 1, 1), date(2040, 1, 7), fixed_now())
        .await
        .unwrap();
    assert_eq!(generated.created, 1);
    generated.occurrences[0].id
}

#[tokio::test]
async fn test_generate_beach_tennis_march() {
    let fx = fixture(8).await;

    let generated = fx
        .storage
        .generate_occurrences(fx.class_id, date(2024, 3, 1), date(2024, 3, 31), fixed_now())
        .await
        .unwrap();

    assert_eq!(generated.created, 4);
    assert_eq!(generated.skipped, 0);
    let days: Vec<u32> = generated
        .occurrences
        .iter()
        .map(|o| chrono::Datelike::day(&o.starts_at))
        .collect();
    assert_eq!(days, vec![4, 11, 18, 25]);

    for occ in &generated.occurrences {
        assert_eq!(occ.status, OccurrenceStatus::Scheduled);
        assert_eq!(occ.enrolled_count, 0);
        assert_eq!(occ.instructor_id, fx.instructor_id);
        assert_eq!(occ.venue_id, fx.venue_id);
        assert_eq!(occ.ends_at - occ.starts_at, TimeDelta::minutes(60));
        assert_eq!(occ.starts_at.format("%H:%M").to_string(), "18:00");
    }
}

#[tokio::test]
async fn test_generate_is_idempotent() {
    let fx = fixture(8).await;

    fx.storage
        .generate_occurrences(fx.class_id, date(2024, 3, 1), date(2024, 3, 15), fixed_now())
        .await
        .unwrap();

    // 重叠区间只补齐缺失的场次
    let second = fx
        .storage
        .generate_occurrences(fx.class_id, date(2024, 3, 1), date(2024, 3, 31), fixed_now())
        .await
        .unwrap();
    assert_eq!(second.created, 2);
    assert_eq!(second.skipped, 2);

    let third = fx
        .storage
        .generate_occurrences(fx.class_id, date(2024, 3, 1), date(2024, 3, 31), fixed_now())
        .await
        .unwrap();
    assert_eq!(third.created, 0);
    assert_eq!(third.skipped, 4);
}

#[tokio::test]
async fn test_generate_rejects_inactive_class() {
    let fx = fixture(8).await;

    fx.storage
        .update_class(
            fx.class_id,
            UpdateClassRequest {
                name: None,
                sport: None,
                level: None,
                duration_minutes: None,
                capacity_max: None,
                price_cents: None,
                status: Some(ActiveStatus::Inactive),
            },
        )
        .await
        .unwrap();

    let result = fx
        .storage
        .generate_occurrences(fx.class_id, date(2024, 3, 1), date(2024, 3, 31), fixed_now())
        .await;
    assert!(matches!(result, Err(AcademyError::InvalidState(_))));

    let missing = fx
        .storage
        .generate_occurrences(9999, date(2024, 3, 1), date(2024, 3, 31), fixed_now())
        .await;
    assert!(matches!(missing, Err(AcademyError::NotFound(_))));
}

#[tokio::test]
async fn test_capacity_gate_and_release() {
    let fx = fixture(8).await;
    let occurrence_id = future_occurrence(&fx).await;
    let users = students(&fx.storage, 9).await;
    let now = fixed_now();

    let mut first = None;
    for &user_id in &users[..8] {
        let enrollment = fx
            .storage
            .enroll(
                occurrence_id,
                user_id,
                EnrollmentPolicy::SelfService { now },
                user_id,
                now,
            )
            .await
            .unwrap();
        first.get_or_insert(enrollment.id);
    }

    let ninth = users[8];
    let full = fx
        .storage
        .enroll(occurrence_id, ninth, EnrollmentPolicy::SelfService { now }, ninth, now)
        .await;
    assert!(matches!(full, Err(AcademyError::CapacityExceeded(_))));

    let first_id = first.unwrap();
    let cancelled = fx
        .storage
        .cancel_enrollment(
            first_id,
            CancellationActor::SelfService {
                user_id: users[0],
                now,
            },
            now,
        )
        .await
        .unwrap();
    assert_eq!(cancelled.status, EnrollmentStatus::Cancelled);
    assert_eq!(cancelled.cancelled_by, Some(users[0]));

    fx.storage
        .enroll(occurrence_id, ninth, EnrollmentPolicy::SelfService { now }, ninth, now)
        .await
        .unwrap();

    let roster = fx
        .storage
        .list_occurrence_enrollments(occurrence_id, false)
        .await
        .unwrap();
    assert_eq!(roster.items.len(), 8);
    assert_eq!(roster.meta.current, 8);
    assert_eq!(roster.meta.available, 0);

    let with_history = fx
        .storage
        .list_occurrence_enrollments(occurrence_id, true)
        .await
        .unwrap();
    assert_eq!(with_history.items.len(), 9);
}

#[tokio::test]
async fn test_duplicate_and_reenroll_after_cancel() {
    let fx = fixture(8).await;
    let occurrence_id = future_occurrence(&fx).await;
    let user_id = students(&fx.storage, 1).await[0];
    let now = fixed_now();

    let enrollment = fx
        .storage
        .enroll(occurrence_id, user_id, EnrollmentPolicy::SelfService { now }, user_id, now)
        .await
        .unwrap();

    let duplicate = fx
        .storage
        .enroll(occurrence_id, user_id, EnrollmentPolicy::Staff, fx.admin_id, fixed_now())
        .await;
    assert!(matches!(duplicate, Err(AcademyError::AlreadyEnrolled(_))));

    fx.storage
        .cancel_enrollment(enrollment.id, CancellationActor::Staff { user_id: fx.admin_id }, now)
        .await
        .unwrap();

    let again = fx
        .storage
        .cancel_enrollment(enrollment.id, CancellationActor::Staff { user_id: fx.admin_id }, now)
        .await;
    assert!(matches!(again, Err(AcademyError::InvalidState(_))));

    // 取消后的历史记录不阻止再次报名
    let renewed = fx
        .storage
        .enroll(occurrence_id, user_id, EnrollmentPolicy::Staff, fx.admin_id, fixed_now())
        .await
        .unwrap();
    assert_ne!(renewed.id, enrollment.id);
    assert_eq!(renewed.enrolled_by, fx.admin_id);

    let occurrence = fx
        .storage
        .get_occurrence_by_id(occurrence_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(occurrence.enrolled_count, 1);
}

#[tokio::test]
async fn test_cancel_occurrence_cascades() {
    let fx = fixture(8).await;
    let occurrence_id = future_occurrence(&fx).await;
    let users = students(&fx.storage, 3).await;
    let now = fixed_now();

    for &user_id in &users {
        fx.storage
            .enroll(occurrence_id, user_id, EnrollmentPolicy::SelfService { now }, user_id, now)
            .await
            .unwrap();
    }

    let cancelled = fx
        .storage
        .cancel_occurrence(occurrence_id, fx.admin_id, now)
        .await
        .unwrap();
    assert_eq!(cancelled.status, OccurrenceStatus::Cancelled);
    assert_eq!(cancelled.enrolled_count, 0);
    assert!(cancelled.cancelled_at.is_some());

    let roster = fx
        .storage
        .list_occurrence_enrollments(occurrence_id, true)
        .await
        .unwrap();
    assert_eq!(roster.items.len(), 3);
    assert!(roster.items.iter().all(|e| {
        e.status == EnrollmentStatus::Cancelled && e.cancelled_by == Some(fx.admin_id)
    }));

    let late = fx
        .storage
        .enroll(occurrence_id, users[0], EnrollmentPolicy::Staff, fx.admin_id, fixed_now())
        .await;
    assert!(matches!(late, Err(AcademyError::InvalidState(_))));

    let twice = fx
        .storage
        .cancel_occurrence(occurrence_id, fx.admin_id, now)
        .await;
    assert!(matches!(twice, Err(AcademyError::InvalidState(_))));
}

#[tokio::test]
async fn test_confirmed_occurrence_is_staff_only() {
    let fx = fixture(8).await;
    let occurrence_id = future_occurrence(&fx).await;
    let user_id = students(&fx.storage, 1).await[0];

    let confirmed = fx.storage.confirm_occurrence(occurrence_id).await.unwrap();
    assert_eq!(confirmed.status, OccurrenceStatus::Confirmed);

    let self_service = fx
        .storage
        .enroll(
            occurrence_id,
            user_id,
            EnrollmentPolicy::SelfService { now: fixed_now() },
            user_id,
            fixed_now(),
        )
        .await;
    assert!(matches!(self_service, Err(AcademyError::InvalidState(_))));

    fx.storage
        .enroll(occurrence_id, user_id, EnrollmentPolicy::Staff, fx.admin_id, fixed_now())
        .await
        .unwrap();

    let reconfirm = fx.storage.confirm_occurrence(occurrence_id).await;
    assert!(matches!(reconfirm, Err(AcademyError::InvalidState(_))));
}

#[tokio::test]
async fn test_started_occurrence_rejects_self_service() {
    let fx = fixture(8).await;
    let generated = fx
        .storage
        .generate_occurrences(fx.class_id, date(2024, 3, 1), date(2024, 3, 7), fixed_now())
        .await
        .unwrap();
    let occurrence_id = generated.occurrences[0].id;
    let user_id = students(&fx.storage, 1).await[0];
    let now = fixed_now();

    let result = fx
        .storage
        .enroll(occurrence_id, user_id, EnrollmentPolicy::SelfService { now }, user_id, now)
        .await;
    assert!(matches!(result, Err(AcademyError::PastOccurrence(_))));

    // 管理员补录不检查开始时间
    let enrollment = fx
        .storage
        .enroll(occurrence_id, user_id, EnrollmentPolicy::Staff, fx.admin_id, fixed_now())
        .await
        .unwrap();

    let own_cancel = fx
        .storage
        .cancel_enrollment(enrollment.id, CancellationActor::SelfService { user_id, now }, now)
        .await;
    assert!(matches!(own_cancel, Err(AcademyError::PastOccurrence(_))));

    let past_cancel = fx
        .storage
        .cancel_occurrence(occurrence_id, fx.admin_id, now)
        .await;
    assert!(matches!(past_cancel, Err(AcademyError::PastOccurrence(_))));
}

#[tokio::test]
async fn test_concurrent_enrollments_respect_capacity() {
    let fx = fixture(3).await;
    let occurrence_id = future_occurrence(&fx).await;
    let users = students(&fx.storage, 10).await;
    let now = fixed_now();

    let handles: Vec<_> = users
        .iter()
        .map(|&user_id| {
            let storage = fx.storage.clone();
            tokio::spawn(async move {
                storage
                    .enroll(occurrence_id, user_id, EnrollmentPolicy::SelfService { now }, user_id, now)
                    .await
            })
        })
        .collect();

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(AcademyError::CapacityExceeded(_)) | Err(AcademyError::Conflict(_)) => {}
            Err(e) => panic!("unexpected enrollment error: {e}"),
        }
    }
    assert_eq!(succeeded, 3);

    let occurrence = fx
        .storage
        .get_occurrence_by_id(occurrence_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(occurrence.enrolled_count, 3);

    let roster = fx
        .storage
        .list_occurrence_enrollments(occurrence_id, false)
        .await
        .unwrap();
    assert_eq!(roster.items.len(), 3);
}

#[tokio::test]
async fn test_duplicate_active_slot_is_conflict() {
    let fx = fixture(8).await;

    let duplicate = fx
        .storage
        .create_schedule_slot(
            fx.class_id,
            CreateScheduleSlotRequest {
                weekday: 1,
                start_time: "18:00".to_string(),
                instructor_id: fx.instructor_id,
                venue_id: fx.venue_id,
            },
        )
        .await;
    assert!(matches!(duplicate, Err(AcademyError::Conflict(_))));

    let slots = fx.storage.list_schedule_slots(fx.class_id, false).await.unwrap();
    assert_eq!(slots.len(), 1);
    assert!(
        fx.storage
            .deactivate_schedule_slot(fx.class_id, slots[0].id)
            .await
            .unwrap()
    );

    // 停用后可以重新占用相同时间
    fx.storage
        .create_schedule_slot(
            fx.class_id,
            CreateScheduleSlotRequest {
                weekday: 1,
                start_time: "18:00".to_string(),
                instructor_id: fx.instructor_id,
                venue_id: fx.venue_id,
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_timestamps_follow_caller_clock() {
    let fx = fixture(8).await;
    let now = fixed_now();
    let generated = fx
        .storage
        .generate_occurrences(fx.class_id, date(2040, 1, 1), date(2040, 1, 7), now)
        .await
        .unwrap();
    let occurrence = &generated.occurrences[0];
    assert_eq!(occurrence.created_at, now);
    assert_eq!(occurrence.updated_at, now);

    let user_id = students(&fx.storage, 1).await[0];
    let enrollment = fx
        .storage
        .enroll(occurrence.id, user_id, EnrollmentPolicy::Staff, fx.admin_id, now)
        .await
        .unwrap();
    assert_eq!(enrollment.enrolled_at, now);

    let later = now + TimeDelta::hours(2);
    let cancelled = fx
        .storage
        .cancel_enrollment(enrollment.id, CancellationActor::Staff { user_id: fx.admin_id }, later)
        .await
        .unwrap();
    assert_eq!(cancelled.cancelled_at, Some(later));
    assert_eq!(cancelled.enrolled_at, now);
}

#[tokio::test]
async fn test_lowering_capacity_keeps_existing_enrollments() {
    let fx = fixture(3).await;
    let occurrence_id = future_occurrence(&fx).await;
    let users = students(&fx.storage, 4).await;
    let now = fixed_now();

    for &user_id in &users[..3] {
        fx.storage
            .enroll(occurrence_id, user_id, EnrollmentPolicy::Staff, fx.admin_id, now)
            .await
            .unwrap();
    }

    fx.storage
        .update_class(
            fx.class_id,
            UpdateClassRequest {
                name: None,
                sport: None,
                level: None,
                duration_minutes: None,
                capacity_max: Some(2),
                price_cents: None,
                status: None,
            },
        )
        .await
        .unwrap();

    // 已有报名保留，计数高于新容量时不再接受报名
    let roster = fx
        .storage
        .list_occurrence_enrollments(occurrence_id, false)
        .await
        .unwrap();
    assert_eq!(roster.items.len(), 3);
    assert_eq!(roster.meta.current, 3);
    assert_eq!(roster.meta.maximum, 2);
    assert_eq!(roster.meta.available, 0);

    let over = fx
        .storage
        .enroll(occurrence_id, users[3], EnrollmentPolicy::Staff, fx.admin_id, now)
        .await;
    assert!(matches!(over, Err(AcademyError::CapacityExceeded(_))));

    // 取消一人后仍是 2/2，依然满员
    let first = &roster.items[0];
    fx.storage
        .cancel_enrollment(first.id, CancellationActor::Staff { user_id: fx.admin_id }, now)
        .await
        .unwrap();
    let still_full = fx
        .storage
        .enroll(occurrence_id, users[3], EnrollmentPolicy::Staff, fx.admin_id, now)
        .await;
    assert!(matches!(still_full, Err(AcademyError::CapacityExceeded(_))));
}

#[tokio::test]
async fn test_bulk_enroll_partial_success() {
    let fx = fixture(1).await;
    let now = fixed_now();
    // 2040-01-02 与 2040-01-09 两个周一
    let generated = fx
        .storage
        .generate_occurrences(fx.class_id, date(2040, 1, 1), date(2040, 1, 14), now)
        .await
        .unwrap();
    assert_eq!(generated.created, 2);
    let open = generated.occurrences[0].id;
    let full = generated.occurrences[1].id;

    let users = students(&fx.storage, 3).await;
    fx.storage
        .enroll(full, users[0], EnrollmentPolicy::Staff, fx.admin_id, now)
        .await
        .unwrap();

    let storage: Arc<dyn Storage> = fx.storage.clone();
    let items = vec![
        BulkEnrollItem {
            occurrence_id: open,
            user_id: users[1],
        },
        BulkEnrollItem {
            occurrence_id: full,
            user_id: users[0],
        },
        BulkEnrollItem {
            occurrence_id: full,
            user_id: users[2],
        },
        BulkEnrollItem {
            occurrence_id: open,
            user_id: 9999,
        },
    ];

    let result = enroll_items(&storage, &items, fx.admin_id, now).await;

    assert_eq!(result.enrolled.len(), 1);
    assert_eq!(result.enrolled[0].occurrence_id, open);
    assert_eq!(result.enrolled[0].user_id, users[1]);
    assert_eq!(result.enrolled[0].enrolled_by, fx.admin_id);

    let reasons: Vec<(i64, i64, &str)> = result
        .failed
        .iter()
        .map(|f| (f.occurrence_id, f.user_id, f.code.as_str()))
        .collect();
    assert_eq!(
        reasons,
        vec![
            (full, users[0], "ALREADY_ENROLLED"),
            (full, users[2], "CAPACITY_EXCEEDED"),
            (open, 9999, "NOT_FOUND"),
        ]
    );

    // 成功的条目已落库，失败的条目没有留下记录
    let open_roster = fx
        .storage
        .list_occurrence_enrollments(open, true)
        .await
        .unwrap();
    assert_eq!(open_roster.items.len(), 1);
    assert_eq!(open_roster.items[0].user_id, users[1]);
    assert_eq!(open_roster.meta.current, 1);

    let full_roster = fx
        .storage
        .list_occurrence_enrollments(full, true)
        .await
        .unwrap();
    assert_eq!(full_roster.items.len(), 1);
    assert_eq!(full_roster.items[0].user_id, users[0]);
}
