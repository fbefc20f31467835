//! Launch table loading and the year/site filter.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use std::{fs::File, io::Read, path::Path};

use crate::error::{DashboardError, Result};
use crate::types::{LatLon, LaunchRecord};

pub const REQUIRED_COLUMNS: [&str; 10] = [
    "name",
    "date_utc",
    "success",
    "rocket",
    "launchpad",
    "temperature",
    "humidity",
    "wind_speed",
    "lat",
    "lon",
];

// Empty CSV fields come through as `None`.
#[derive(Deserialize, Debug)]
struct RawRecord {
    name: String,
    date_utc: String,
    success: Option<String>,
    rocket: String,
    launchpad: Option<String>,
    temperature: Option<f64>,
    humidity: Option<f64>,
    wind_speed: Option<f64>,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Immutable, ordered launch history. Built once at startup.
#[derive(Debug, Clone, Default)]
pub struct LaunchTable {
    records: Vec<LaunchRecord>,
}

impl LaunchTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DashboardError::io(path.display().to_string(), e))?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(rdr);

        let headers = reader.headers()?.clone();
        for col in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == col) {
                return Err(DashboardError::MissingColumn(col));
            }
        }

        let mut records = Vec::new();
        for (idx, raw) in reader.deserialize::<RawRecord>().enumerate() {
            let row = idx + 1;
            let raw = raw?;
            records.push(to_record(raw).map_err(|reason| DashboardError::InvalidRecord { row, reason })?);
        }

        tracing::debug!("parsed {} launch records", records.len());
        Ok(Self { records })
    }

    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct launch years, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.records.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Distinct non-null launchpads in order of first appearance.
    pub fn sites(&self) -> Vec<&str> {
        let mut sites: Vec<&str> = Vec::new();
        for pad in self.records.iter().filter_map(|r| r.launchpad.as_deref()) {
            if !sites.contains(&pad) {
                sites.push(pad);
            }
        }
        sites
    }

    /// Every record launched in `year` from `site`, in table order.
    pub fn filter(&self, year: i32, site: &str) -> Vec<&LaunchRecord> {
        self.records
            .iter()
            .filter(|r| r.year == year && r.launchpad.as_deref() == Some(site))
            .collect()
    }
}

fn to_record(raw: RawRecord) -> std::result::Result<LaunchRecord, String> {
    let (timestamp, year) = parse_date_utc(&raw.date_utc)?;
    let success = match raw.success.as_deref() {
        Some(s) => parse_outcome(s)?,
        None => None,
    };
    let location = match (raw.lat, raw.lon) {
        (Some(lat), Some(lon)) => Some(LatLon { lat, lon }),
        (None, None) => None,
        // Half a coordinate is no location: the row stays in the table but off the map.
        (lat, lon) => {
            tracing::debug!("launch `{}` has lat={:?} lon={:?}; ignoring location", raw.name, lat, lon);
            None
        }
    };

    Ok(LaunchRecord {
        name: raw.name,
        date_utc: raw.date_utc,
        timestamp,
        year,
        success,
        rocket: raw.rocket,
        launchpad: raw.launchpad.filter(|p| !p.trim().is_empty()),
        temperature: raw.temperature,
        humidity: raw.humidity,
        wind_speed: raw.wind_speed,
        location,
    })
}

/// Parses `date_utc` and returns the UTC instant plus the calendar year as
/// written (an explicit offset keeps its own wall-clock year).
pub fn parse_date_utc(s: &str) -> std::result::Result<(DateTime<Utc>, i32), String> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok((dt.with_timezone(&Utc), dt.year()));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%.f%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok((dt.with_timezone(&Utc), dt.year()));
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok((naive.and_utc(), naive.year()));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let naive = date.and_hms_opt(0, 0, 0).ok_or("invalid midnight")?;
        return Ok((naive.and_utc(), date.year()));
    }

    Err(format!("unparseable date_utc `{s}`"))
}

/// `True`/`False`, `1`/`0` and `1.0`/`0.0` as pandas writes them. Blank is unknown.
pub fn parse_outcome(s: &str) -> std::result::Result<Option<bool>, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "" | "nan" | "none" => Ok(None),
        "true" | "1" | "1.0" => Ok(Some(true)),
        "false" | "0" | "0.0" => Ok(Some(false)),
        other => Err(format!("unrecognised success value `{other}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spacex_api_timestamps() {
        let (ts, year) = parse_date_utc("2020-05-30T19:22:00.000Z").unwrap();
        assert_eq!(year, 2020);
        assert_eq!(ts.to_rfc3339(), "2020-05-30T19:22:00+00:00");
    }

    #[test]
    fn offset_keeps_wall_clock_year() {
        let (ts, year) = parse_date_utc("2021-01-01 01:00:00+05:00").unwrap();
        assert_eq!(year, 2021);
        assert_eq!(ts.year(), 2020);
    }

    #[test]
    fn parses_bare_dates_and_rejects_garbage() {
        assert_eq!(parse_date_utc("2019-07-04").unwrap().1, 2019);
        assert!(parse_date_utc("yesterday").is_err());
    }

    #[test]
    fn outcome_variants() {
        assert_eq!(parse_outcome("True").unwrap(), Some(true));
        assert_eq!(parse_outcome("0.0").unwrap(), Some(false));
        assert_eq!(parse_outcome("  ").unwrap(), None);
        assert!(parse_outcome("maybe").is_err());
    }
}
