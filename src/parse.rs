//! Line parser: one raw record in, zero or one encoded record out.
//!
//! Soft-fail policy throughout: a malformed line or unknown device type drops
//! that record, a bad app-id token drops only that token, a bad coordinate
//! pair drops neither the record nor the rest of the line. No counters are
//! touched here; the writer is the single accounting site.

use log::debug;
use thiserror::Error;

use crate::payload;
use crate::types::{AppsInstalled, DeviceType, EncodedRecord};

/// Tab-separated fields per line: deviceType, deviceId, lat, lon, appsCsv.
const LINE_FIELDS: usize = 5;

/// Record-level parse failure. Dropping the record is the caller's only
/// recovery; the rest of the file proceeds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed line: expected 5 tab-separated fields, got {0}")]
    Malformed(usize),
    #[error("unknown device type: {0:?}")]
    UnknownDeviceType(String),
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

/// Parse one raw line into an event. `Ok(None)` for an empty record.
pub fn parse_apps_installed(raw: &[u8]) -> Result<Option<AppsInstalled>, ParseError> {
    if raw.is_empty() {
        return Ok(None);
    }
    let line = std::str::from_utf8(raw).map_err(|_| ParseError::InvalidUtf8)?;

    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < LINE_FIELDS {
        return Err(ParseError::Malformed(fields.len()));
    }
    let device_type = DeviceType::parse(fields[0])
        .ok_or_else(|| ParseError::UnknownDeviceType(fields[0].to_string()))?;
    let device_id = fields[1].to_string();

    // A coordinate pair is only meaningful whole: if either half fails to
    // parse, store neither rather than a half-set pair or a fake zero.
    let lat = fields[2].parse::<f64>().ok();
    let lon = fields[3].parse::<f64>().ok();
    let (lat, lon) = match (lat, lon) {
        (Some(lat), Some(lon)) => (Some(lat), Some(lon)),
        _ => (None, None),
    };

    let apps = parse_app_ids(fields[4]);

    Ok(Some(AppsInstalled {
        device_type,
        device_id,
        lat,
        lon,
        apps,
    }))
}

/// Parse the comma-separated app-id list, keeping valid `u32` tokens in input
/// order and dropping the rest individually.
fn parse_app_ids(csv: &str) -> Vec<u32> {
    csv.split(',')
        .filter_map(|token| match token.parse::<u32>() {
            Ok(id) => Some(id),
            Err(_) => {
                debug!("App id {:?} is not a u32, dropping token", token);
                None
            }
        })
        .collect()
}

/// Parse and encode one raw line: the full LineParser contract.
/// `Ok(None)` for an empty record, `Ok(Some(_))` with the (cache key,
/// partition, payload) triple otherwise.
pub fn parse_line(raw: &[u8]) -> Result<Option<EncodedRecord>, ParseError> {
    let Some(event) = parse_apps_installed(raw)? else {
        return Ok(None);
    };
    Ok(Some(EncodedRecord {
        cache_key: event.cache_key(),
        partition: event.device_type,
        payload: payload::encode(&event),
    }))
}
