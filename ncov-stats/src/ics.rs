use chrono::{DateTime, NaiveDate, Utc};
use ics::{
    components::{Parameter, Property},
    properties::{DtEnd, DtStart, LastModified, Summary},
    Event, ICalendar,
};

use crate::{vtimezone, CanonicalRecord, TimezoneError};

pub const PRODUCT_ID: &str = "n-Cov-ical";
pub const CALENDAR_NAME: &str = "全国新型肺炎疫情实时日历";
/// Floating local time without a TZID.
pub const SERIES_START: &str = "20200120T080000";
pub const DEFAULT_TIMEZONE: &str = "Asia/Shanghai";

/// Creates the empty calendar every run starts from.
pub fn new_calendar(timezone: &str) -> Result<ICalendar<'static>, TimezoneError> {
    let mut icalendar = ICalendar::new("2.0", PRODUCT_ID);
    icalendar.push(Property::new("DTSTART", SERIES_START));
    icalendar.push(Summary::new(CALENDAR_NAME));
    icalendar.push(Property::new("X-WR-CALNAME", CALENDAR_NAME));
    icalendar.add_timezone(vtimezone(timezone)?);

    Ok(icalendar)
}

impl CanonicalRecord {
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "新型肺炎日报 确诊:{}/疑似:{}/死亡:{}/治愈:{}",
            self.confirmed, self.suspected, self.dead, self.cured
        )
    }

    /// UTC instant of the snapshot.
    #[must_use]
    pub fn updated(&self) -> DateTime<Utc> {
        // parsed records stay within 1970..=9999, which chrono always represents
        DateTime::from_timestamp(self.updated_at_unix_timestamp, 0).unwrap_or_default()
    }

    /// The all-day span `[start, end)` covering the snapshot's UTC date.
    #[must_use]
    pub fn day_span(&self) -> (NaiveDate, NaiveDate) {
        let start = self.updated().date_naive();
        // chrono's last date lies far past year 9999
        (start, start.succ_opt().unwrap_or(NaiveDate::MAX))
    }

    #[must_use]
    pub fn to_ics(&self) -> Event<'static> {
        let stamp = self.updated().format("%Y%m%dT%H%M%SZ").to_string();
        let (start, end) = self.day_span();

        let mut dtstart = DtStart::new(start.format("%Y%m%d").to_string());
        dtstart.add(Parameter::new("VALUE", "DATE"));

        let mut dtend = DtEnd::new(end.format("%Y%m%d").to_string());
        dtend.add(Parameter::new("VALUE", "DATE"));

        let mut ics_event = Event::new(self.uid.clone(), stamp.clone());

        ics_event.push(Summary::new(self.summary()));
        ics_event.push(dtstart);
        ics_event.push(dtend);
        ics_event.push(LastModified::new(stamp));

        ics_event
    }
}
