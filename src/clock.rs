//! Resolution of the reference time given on the command line.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::payload;

/// Where "today" comes from.
#[derive(Debug)]
pub enum Now {
    /// The wall clock, read in the given zone.
    WallClock(Tz),
    /// A timestamp given by the caller, interpreted in the given zone.
    Fixed(String, Tz),
}

impl Now {
    pub fn from_arg(arg: Option<&str>, tz: Tz) -> Self {
        match arg {
            Some(s) => Now::Fixed(s.to_string(), tz),
            None => Now::WallClock(tz),
        }
    }

    /// Returns the reference time, or `None` if a given timestamp cannot be
    /// interpreted.
    pub fn moment(&self) -> Option<DateTime<Tz>> {
        match self {
            Now::WallClock(tz) => Some(Utc::now().with_timezone(tz)),
            Now::Fixed(s, tz) => match payload::parse_timestamp(s, *tz) {
                Ok(dt) => Some(dt),
                Err(e) => {
                    tracing::warn!("reference time: {}", e);
                    None
                }
            },
        }
    }

    /// Calendar day of [`Now::moment`] in its zone.
    pub fn today(&self) -> Option<NaiveDate> {
        self.moment().map(|dt| dt.date_naive())
    }
}

#[cfg(test)]
mod tests {
    use chrono_tz::Tz;

    use super::*;
    use crate::testutil::day;

    #[test]
    fn fixed_time_in_zone() {
        let now = Now::from_arg(Some("2024-03-31T23:15:00Z"), Tz::Africa__Tunis);
        assert_eq!(Some(day("2024-04-01")), now.today());
    }

    #[test]
    fn malformed_fixed_time_is_none() {
        assert_eq!(None, Now::from_arg(Some("31/03/2024"), Tz::UTC).today());
    }

    #[test]
    fn wall_clock_is_read_in_zone() {
        // Fourteen hours ahead of UTC, so never on an earlier date.
        let tz = Tz::Pacific__Kiritimati;
        let utc_before = Utc::now().date_naive();
        let today = Now::from_arg(None, tz).today().expect("wall clock");
        let want = Utc::now().with_timezone(&tz).date_naive();
        // The date may roll over between the clock reads.
        assert!((want - today).num_days().abs() <= 1, "got {}, want {}", today, want);
        assert!(today >= utc_before, "got {}, utc {}", today, utc_before);
    }
}
