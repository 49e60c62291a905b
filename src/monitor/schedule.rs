use std::fmt;
use std::time::Duration;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 86_400_000;
const WEEK_MS: i64 = 7 * DAY_MS;

/// Recurring-trigger granularity derived from a millisecond period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckSchedule {
    EveryMinutes(u64),
    Hourly,
    Daily,
    Weekly,
    Biweekly,
}

impl CheckSchedule {
    /// Map a millisecond period to a schedule. `ms <= 0` means "stop
    /// monitoring" and yields `None`. Periods without a canonical
    /// granularity fall back to a rounded minute count, minimum 1.
    pub fn from_millis(ms: i64) -> Option<Self> {
        if ms <= 0 {
            return None;
        }
        Some(match ms {
            HOUR_MS => CheckSchedule::Hourly,
            DAY_MS => CheckSchedule::Daily,
            WEEK_MS => CheckSchedule::Weekly,
            ms if ms == 2 * WEEK_MS => CheckSchedule::Biweekly,
            ms => {
                let minutes = ((ms + MINUTE_MS / 2) / MINUTE_MS).max(1) as u64;
                CheckSchedule::EveryMinutes(minutes)
            }
        })
    }

    pub fn period(&self) -> Duration {
        match self {
            CheckSchedule::EveryMinutes(n) => Duration::from_secs(n * 60),
            CheckSchedule::Hourly => Duration::from_secs(3600),
            CheckSchedule::Daily => Duration::from_secs(86_400),
            CheckSchedule::Weekly => Duration::from_secs(7 * 86_400),
            CheckSchedule::Biweekly => Duration::from_secs(14 * 86_400),
        }
    }
}

impl fmt::Display for CheckSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckSchedule::EveryMinutes(1) => write!(f, "every minute"),
            CheckSchedule::EveryMinutes(n) => write!(f, "every {n} minutes"),
            CheckSchedule::Hourly => write!(f, "hourly"),
            CheckSchedule::Daily => write!(f, "daily"),
            CheckSchedule::Weekly => write!(f, "weekly"),
            CheckSchedule::Biweekly => write!(f, "every 2 weeks"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_periods_stop_monitoring() {
        assert_eq!(CheckSchedule::from_millis(0), None);
        assert_eq!(CheckSchedule::from_millis(-5), None);
    }

    #[test]
    fn canonical_periods_map_to_named_granularities() {
        assert_eq!(CheckSchedule::from_millis(HOUR_MS), Some(CheckSchedule::Hourly));
        assert_eq!(CheckSchedule::from_millis(DAY_MS), Some(CheckSchedule::Daily));
        assert_eq!(CheckSchedule::from_millis(WEEK_MS), Some(CheckSchedule::Weekly));
        assert_eq!(
            CheckSchedule::from_millis(2 * WEEK_MS),
            Some(CheckSchedule::Biweekly)
        );
    }

    #[test]
    fn uncovered_periods_round_to_minutes_with_a_floor_of_one() {
        assert_eq!(
            CheckSchedule::from_millis(15 * MINUTE_MS),
            Some(CheckSchedule::EveryMinutes(15))
        );
        // 90 seconds rounds to 2 minutes.
        assert_eq!(
            CheckSchedule::from_millis(90_000),
            Some(CheckSchedule::EveryMinutes(2))
        );
        // Sub-minute periods clamp to one minute.
        assert_eq!(
            CheckSchedule::from_millis(5_000),
            Some(CheckSchedule::EveryMinutes(1))
        );
    }

    #[test]
    fn trigger_expressions_read_naturally() {
        assert_eq!(CheckSchedule::EveryMinutes(1).to_string(), "every minute");
        assert_eq!(CheckSchedule::EveryMinutes(15).to_string(), "every 15 minutes");
        assert_eq!(CheckSchedule::Hourly.to_string(), "hourly");
        assert_eq!(CheckSchedule::Biweekly.to_string(), "every 2 weeks");
    }
}
