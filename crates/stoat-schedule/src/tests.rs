//! Unit tests for stoat-schedule.

use chrono::NaiveDate;

use crate::Calendar;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 2021-08-01 .. 2024-02-15, the reference campaign period.
fn reference() -> Calendar {
    Calendar::new(date(2021, 8, 1), date(2024, 2, 15)).unwrap()
}

// ── DayMonth ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod day_month {
    use crate::{DayMonth, ScheduleError};

    #[test]
    fn parses_day_slash_month() {
        let dm: DayMonth = "15/9".parse().unwrap();
        assert_eq!((dm.day(), dm.month()), (15, 9));
        assert_eq!(dm.to_string(), "15/9");
        assert_eq!(" 1 / 12 ".parse::<DayMonth>().unwrap(), DayMonth::new(1, 12).unwrap());
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(matches!(DayMonth::new(31, 2), Err(ScheduleError::InvalidDayMonth { day: 31, month: 2 })));
        assert!(DayMonth::new(1, 13).is_err());
        assert!(DayMonth::new(29, 2).is_ok(), "leap day is a valid recurring date");
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!("15-9".parse::<DayMonth>(), Err(ScheduleError::Parse(_))));
        assert!(matches!("x/9".parse::<DayMonth>(), Err(ScheduleError::Parse(_))));
    }

    #[test]
    fn serde_as_string() {
        let dm = DayMonth::new(20, 7).unwrap();
        let json = serde_json::to_string(&dm).unwrap();
        assert_eq!(json, "\"20/7\"");
        let back: DayMonth = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dm);
        assert!(serde_json::from_str::<DayMonth>("\"30/2\"").is_err());
    }
}

// ── Calendar ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod calendar {
    use stoat_core::SimDay;

    use super::{date, reference};
    use crate::{Calendar, DayMonth, ScheduleError};

    fn days(v: &[u32]) -> Vec<SimDay> {
        v.iter().map(|&d| SimDay(d)).collect()
    }

    #[test]
    fn horizon_is_end_minus_start() {
        assert_eq!(reference().n_days(), 928);
        assert_eq!(Calendar::new(date(2021, 1, 1), date(2021, 1, 1)).unwrap().n_days(), 0);
    }

    #[test]
    fn end_before_start_rejected() {
        assert!(matches!(
            Calendar::new(date(2022, 1, 1), date(2021, 1, 1)),
            Err(ScheduleError::EndBeforeStart { .. })
        ));
    }

    #[test]
    fn recurring_dates_expand_per_year() {
        let cal = reference();
        let release = [DayMonth::new(15, 9).unwrap(), DayMonth::new(15, 11).unwrap()];
        let set = cal.days_for(&release, 1);
        assert_eq!(set.days(), &days(&[45, 106, 410, 471, 775, 836])[..]);
    }

    #[test]
    fn windows_add_consecutive_days() {
        let cal = reference();
        let set = cal.days_for(&[DayMonth::new(20, 1).unwrap()], 14);
        // 2021-01-20 precedes the start; 2022, 2023 and 2024 sessions remain.
        assert_eq!(set.len(), 42);
        assert!(set.contains(SimDay(172)));
        assert!(set.contains(SimDay(185)));
        assert!(!set.contains(SimDay(186)));
        assert!(set.contains(SimDay(537)));
        assert!(set.contains(SimDay(902)));
        assert!(set.contains(SimDay(915)));
    }

    #[test]
    fn leap_day_only_in_leap_years() {
        let cal = Calendar::new(date(2023, 1, 1), date(2024, 12, 31)).unwrap();
        let set = cal.days_for(&[DayMonth::new(29, 2).unwrap()], 1);
        assert_eq!(set.days(), &days(&[424])[..]);
    }

    #[test]
    fn date_of_inverts_offsets() {
        let cal = reference();
        assert_eq!(cal.date_of(SimDay(45)), Some(date(2021, 9, 15)));
        assert_eq!(cal.date_of(SimDay::ZERO), Some(date(2021, 8, 1)));
    }

    #[test]
    fn overlapping_windows_are_deduplicated() {
        let cal = reference();
        let set = cal.days_for(&[DayMonth::new(1, 9).unwrap(), DayMonth::new(5, 9).unwrap()], 7);
        // 2021: 31..38 and 35..42 → 31..42 (11 days); same for 2022 and 2023.
        assert_eq!(set.len(), 33);
    }
}

// ── EventCalendar ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod events {
    use stoat_core::SimDay;

    use super::reference;
    use crate::{DayMonth, EventCalendar, EventDates};

    fn dm(s: &str) -> DayMonth {
        s.parse().unwrap()
    }

    fn dates() -> EventDates {
        EventDates {
            lure_release: vec![dm("15/9"), dm("15/11")],
            estrus_start: dm("15/9"),
            estrus_end: dm("15/1"),
            dispersal: dm("16/1"),
            birth: dm("30/10"),
            trapping: vec![dm("20/1"), dm("20/7"), dm("20/11")],
            trap_session_days: 14,
        }
    }

    #[test]
    fn day_flags() {
        let ec = EventCalendar::new(reference(), &dates());
        assert_eq!(ec.horizon(), 928);

        let e = ec.events_on(SimDay(45));
        assert!(e.lure_release && e.estrus_start);
        assert!(!e.estrus_end && !e.dispersal && !e.birth && !e.trapping);

        // 2021-10-30
        assert!(ec.events_on(SimDay(90)).birth);
        // 2022-01-16
        assert!(ec.events_on(SimDay(168)).dispersal);
        // 2022-01-15
        assert!(ec.events_on(SimDay(167)).estrus_end);
        assert_eq!(ec.events_on(SimDay(1)), Default::default());
    }

    #[test]
    fn no_trapping_dates_means_no_trap_days() {
        let mut d = dates();
        d.trapping.clear();
        let ec = EventCalendar::new(reference(), &d);
        assert!(ec.trapping.is_empty());
    }

    #[test]
    fn dates_roundtrip_through_json() {
        let json = serde_json::to_string(&dates()).unwrap();
        assert!(json.contains("\"20/11\""));
        let back: EventDates = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dates());
    }
}
