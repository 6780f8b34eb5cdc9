//! Wire payload: the protobuf record stored as the memcached value.
//!
//! Length-delimited, schema'd encoding with optional scalar fields, so a
//! missing coordinate is distinguishable from `0.0`. Field tags are the
//! contract; any consumer decoding the cache must agree on them.

use prost::Message;

use crate::types::AppsInstalled;

/// Installed-apps record as stored in the cache.
#[derive(Clone, PartialEq, Message)]
pub struct UserApps {
    #[prost(uint32, repeated, tag = "1")]
    pub apps: Vec<u32>,
    #[prost(double, optional, tag = "2")]
    pub lat: Option<f64>,
    #[prost(double, optional, tag = "3")]
    pub lon: Option<f64>,
}

impl From<&AppsInstalled> for UserApps {
    fn from(event: &AppsInstalled) -> Self {
        UserApps {
            apps: event.apps.clone(),
            lat: event.lat,
            lon: event.lon,
        }
    }
}

/// Serialize one event to the wire payload. Deterministic: the same event
/// always yields byte-identical output.
pub fn encode(event: &AppsInstalled) -> Vec<u8> {
    UserApps::from(event).encode_to_vec()
}

/// Decode a cache value back into a [`UserApps`] record.
pub fn decode(buf: &[u8]) -> Result<UserApps, prost::DecodeError> {
    UserApps::decode(buf)
}
