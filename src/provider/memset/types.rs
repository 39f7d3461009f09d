use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

pub const RECORD_TYPE_TXT: &str = "TXT";

////////////////////////////////////////////////////////////
// Requests
////////////////////////////////////////////////////////////

/// Every call carries the API key as the last field of its parameters.
#[derive(Debug, Serialize)]
pub(super) struct Authed<'a, T: Serialize> {
    #[serde(flatten)]
    pub params: &'a T,
    pub api_key: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct ZoneQuery<'a> {
    pub domain: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct RecordRef<'a> {
    pub id: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct NoParams {}

/// The fields sent to `dns.zone_record_create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TxtRecordDescriptor {
    pub zone_id: String,

    #[serde(rename = "type")]
    pub record_type: String,

    /// Host label relative to the zone, empty for the apex.
    pub record: String,

    pub address: String,

    // Zero means "zone default" and is left out like the API expects.
    #[serde(skip_serializing_if = "is_zero")]
    pub ttl: u32,
}

fn is_zero(ttl: &u32) -> bool {
    *ttl == 0
}

impl TxtRecordDescriptor {
    pub fn new(zone_id: &str, record: &str, address: &str, ttl: u32) -> Self {
        Self {
            zone_id: zone_id.to_string(),
            record_type: RECORD_TYPE_TXT.to_string(),
            record: record.to_string(),
            address: address.to_string(),
            ttl,
        }
    }
}

////////////////////////////////////////////////////////////
// Responses
////////////////////////////////////////////////////////////
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ZoneReference {
    #[serde(rename = "zone_id")]
    pub id: String,

    #[serde(default)]
    pub domain: String,
}

/// A record as returned by the create and delete calls.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TxtRecord {
    pub id: String,

    #[serde(default)]
    pub zone_id: String,

    #[serde(default, rename = "type")]
    pub record_type: String,

    #[serde(default)]
    pub record: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub ttl: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobStatus {
    pub id: String,

    #[serde(default, rename = "type")]
    pub job_type: String,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub service: String,

    #[serde(default)]
    pub finished: bool,

    #[serde(default)]
    pub error: bool,
}

/// What the API returns instead of the expected object when a call fails.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorEnvelope {
    pub error_type: String,

    #[serde(default, deserialize_with = "string_or_number")]
    pub error_code: String,

    pub error: String,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;

    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "error_code should be a string or a number, got {}",
            other
        ))),
    }
}

/// One response body, decoded against the expected shape first and the
/// error envelope second.
#[derive(Debug)]
pub(super) enum Reply<T> {
    Success(T),
    Failure(ErrorEnvelope),
    Undecodable { reason: String, body: String },
}

impl<T: DeserializeOwned> Reply<T> {
    pub fn decode(status: u16, body: String) -> Self {
        let primary = match serde_json::from_str::<T>(&body) {
            Ok(value) => return Reply::Success(value),
            Err(e) => e,
        };

        match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => Reply::Failure(envelope),
            Err(_) => Reply::Undecodable {
                reason: format!("status {}: {}", status, primary),
                body,
            },
        }
    }

    pub fn into_result(self) -> Result<T> {
        match self {
            Reply::Success(value) => Ok(value),
            Reply::Failure(envelope) => Err(Error::ProviderError(envelope)),
            Reply::Undecodable { reason, body } => Err(Error::DecodeError { reason, body }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_params_serialize() {
        let descriptor = TxtRecordDescriptor::new("123456", "_acme-challenge", "value", 300);
        let params = Authed {
            params: &descriptor,
            api_key: "asdf1234",
        };
        assert_eq!(
            serde_json::to_string(&params).unwrap(),
            r#"{"zone_id":"123456","type":"TXT","record":"_acme-challenge","address":"value","ttl":300,"api_key":"asdf1234"}"#
        );

        let descriptor = TxtRecordDescriptor::new("123456", "_acme-challenge", "value", 0);
        let params = Authed {
            params: &descriptor,
            api_key: "asdf1234",
        };
        assert_eq!(
            serde_json::to_string(&params).unwrap(),
            r#"{"zone_id":"123456","type":"TXT","record":"_acme-challenge","address":"value","api_key":"asdf1234"}"#
        );
    }

    #[test]
    fn test_small_params_serialize() {
        let zone = Authed {
            params: &ZoneQuery {
                domain: "example.com",
            },
            api_key: "k",
        };
        assert_eq!(
            serde_json::to_string(&zone).unwrap(),
            r#"{"domain":"example.com","api_key":"k"}"#
        );

        let reload = Authed {
            params: &NoParams {},
            api_key: "k",
        };
        assert_eq!(serde_json::to_string(&reload).unwrap(), r#"{"api_key":"k"}"#);
    }

    #[test]
    fn test_reply_success() {
        let body = r#"{"zone_id": "123456", "domain": "example.com"}"#.to_string();
        let zone = Reply::<ZoneReference>::decode(200, body).into_result().unwrap();
        assert_eq!(zone.id, "123456");
        assert_eq!(zone.domain, "example.com");
    }

    #[test]
    fn test_reply_falls_back_to_envelope() {
        let body = r#"{"error_type": "NotFound", "error_code": 4, "error": "no such zone"}"#;
        match Reply::<ZoneReference>::decode(404, body.to_string()) {
            Reply::Failure(envelope) => {
                assert_eq!(envelope.error_type, "NotFound");
                assert_eq!(envelope.error_code, "4");
                assert_eq!(envelope.error, "no such zone");
            }
            other => panic!("expected envelope, got {:?}", other),
        }
    }

    #[test]
    fn test_reply_undecodable_keeps_body() {
        let body = "<html>Bad Gateway</html>".to_string();
        let err = Reply::<JobStatus>::decode(502, body)
            .into_result()
            .unwrap_err();
        match err {
            Error::DecodeError { reason, body } => {
                assert!(reason.starts_with("status 502"));
                assert_eq!(body, "<html>Bad Gateway</html>");
            }
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_job_status_deserialize() {
        let body = r#"{
            "id": "zxcvb",
            "type": "reload",
            "status": "pending",
            "service": "dns",
            "finished": false,
            "error": false
        }"#;
        let job: JobStatus = serde_json::from_str(body).unwrap();
        assert_eq!(job.id, "zxcvb");
        assert_eq!(job.job_type, "reload");
        assert!(!job.finished);
    }
}
