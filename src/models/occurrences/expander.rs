//! 场次展开
//!
//! 把每周排课在给定日期区间内展开为具体场次。这里只做纯计算，
//! 去重和持久化由存储层在同一事务内完成。

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};

/// 参与展开的排课
#[derive(Debug, Clone)]
pub struct SlotTemplate {
    pub slot_id: i64,
    /// ISO 星期，1 = 周一
    pub weekday: u32,
    pub start_time: NaiveTime,
    pub instructor_id: i64,
    pub venue_id: i64,
}

/// 展开得到的候选场次
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOccurrence {
    pub slot_id: i64,
    pub instructor_id: i64,
    pub venue_id: i64,
    pub local_start: NaiveDateTime,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// 场馆本地时间转 UTC
pub fn local_to_utc(local: NaiveDateTime, offset: FixedOffset) -> DateTime<Utc> {
    (local - TimeDelta::seconds(i64::from(offset.local_minus_utc()))).and_utc()
}

/// 某个本地日期在 UTC 下的 [当天零点, 次日零点) 时间戳
pub fn local_day_bounds(date: NaiveDate, offset: FixedOffset) -> (i64, i64) {
    let start = local_to_utc(date.and_time(NaiveTime::MIN), offset);
    (start.timestamp(), (start + TimeDelta::days(1)).timestamp())
}

/// 场馆本地的“今天”
pub fn local_today(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

/// 展开排课
///
/// 对 `[range_start, range_end]`（含两端）内的每一天，为星期匹配的每个排课生成一个候选场次，
/// 结束时间 = 开始时间 + `duration_minutes`。结果按开始时间、排课 ID 排序。
pub fn expand(
    slots: &[SlotTemplate],
    duration_minutes: i64,
    range_start: NaiveDate,
    range_end: NaiveDate,
    offset: FixedOffset,
) -> Vec<PlannedOccurrence> {
    let mut planned = Vec::new();
    if slots.is_empty() || range_end < range_start {
        return planned;
    }

    let duration = TimeDelta::minutes(duration_minutes);
    for day in range_start.iter_days().take_while(|d| *d <= range_end) {
        let weekday = day.weekday().number_from_monday();
        for slot in slots.iter().filter(|s| s.weekday == weekday) {
            let local_start = day.and_time(slot.start_time);
            let starts_at = local_to_utc(local_start, offset);
            planned.push(PlannedOccurrence {
                slot_id: slot.slot_id,
                instructor_id: slot.instructor_id,
                venue_id: slot.venue_id,
                local_start,
                starts_at,
                ends_at: starts_at + duration,
            });
        }
    }

    planned.sort_by_key(|p| (p.starts_at, p.slot_id));
    planned
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn slot(id: i64, weekday: u32, hh: u32, mm: u32) -> SlotTemplate {
        SlotTemplate {
            slot_id: id,
            weekday,
            start_time: NaiveTime::from_hms_opt(hh, mm, 0).unwrap(),
            instructor_id: 10,
            venue_id: 20,
        }
    }

    #[test]
    fn test_wednesday_over_two_weeks() {
        // 2024-03-04 是周一，14 天内恰有两个周三
        let planned = expand(
            &[slot(1, 3, 7, 30)],
            45,
            date(2024, 3, 4),
            date(2024, 3, 17),
            utc(),
        );
        assert_eq!(planned.len(), 2);
        for p in &planned {
            assert_eq!(p.local_start.weekday(), Weekday::Wed);
            assert_eq!(p.local_start.time(), NaiveTime::from_hms_opt(7, 30, 0).unwrap());
            assert_eq!(p.ends_at - p.starts_at, TimeDelta::minutes(45));
        }
    }

    #[test]
    fn test_beach_tennis_march() {
        let planned = expand(
            &[slot(1, 1, 18, 0)],
            60,
            date(2024, 3, 1),
            date(2024, 3, 31),
            utc(),
        );
        let days: Vec<u32> = planned.iter().map(|p| p.local_start.day()).collect();
        assert_eq!(days, vec![4, 11, 18, 25]);
        let first = &planned[0];
        assert_eq!(first.starts_at.to_rfc3339(), "2024-03-04T18:00:00+00:00");
        assert_eq!(first.ends_at.to_rfc3339(), "2024-03-04T19:00:00+00:00");
    }

    #[test]
    fn test_range_is_inclusive() {
        // 首尾两天都是周一
        let planned = expand(
            &[slot(1, 1, 9, 0)],
            60,
            date(2024, 3, 4),
            date(2024, 3, 11),
            utc(),
        );
        assert_eq!(planned.len(), 2);
    }

    #[test]
    fn test_no_slots_yields_nothing() {
        assert!(expand(&[], 60, date(2024, 3, 1), date(2024, 3, 31), utc()).is_empty());
    }

    #[test]
    fn test_sorted_by_start_then_slot() {
        let planned = expand(
            &[slot(2, 2, 19, 0), slot(1, 2, 8, 0), slot(3, 1, 8, 0)],
            60,
            date(2024, 3, 4),
            date(2024, 3, 5),
            utc(),
        );
        let ids: Vec<i64> = planned.iter().map(|p| p.slot_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_local_offset_conversion() {
        // UTC-03:00 的 18:00 对应 UTC 21:00
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        let planned = expand(
            &[slot(1, 1, 18, 0)],
            60,
            date(2024, 3, 4),
            date(2024, 3, 4),
            offset,
        );
        assert_eq!(planned[0].starts_at.to_rfc3339(), "2024-03-04T21:00:00+00:00");
        assert_eq!(planned[0].local_start.to_string(), "2024-03-04 18:00:00");
    }

    #[test]
    fn test_local_day_bounds() {
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        let (start, end) = local_day_bounds(date(2024, 3, 4), offset);
        assert_eq!(end - start, 86_400);
        assert_eq!(
            DateTime::<Utc>::from_timestamp(start, 0).unwrap().to_rfc3339(),
            "2024-03-04T03:00:00+00:00"
        );
    }
}
