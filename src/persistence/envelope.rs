//! Versioned JSON envelope
//!
//! Records are stored as `{"version": N, "data": ...}` so a later schema can
//! recognise and migrate what an older build wrote.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::PersistenceError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub version: u32,
    pub data: T,
}

/// Serialize `data` under `version`
pub fn encode<T: Serialize>(version: u32, data: &T) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(&Envelope { version, data })?)
}

/// Parse an envelope and check its version
pub fn decode<T: DeserializeOwned>(raw: &str, expected: u32) -> Result<T, PersistenceError> {
    let envelope: Envelope<T> = serde_json::from_str(raw)?;
    if envelope.version != expected {
        return Err(PersistenceError::Version {
            found: envelope.version,
            expected,
        });
    }
    Ok(envelope.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let raw = encode(1, &42u64).unwrap();
        assert_eq!(raw, r#"{"version":1,"data":42}"#);
        assert_eq!(decode::<u64>(&raw, 1).unwrap(), 42);
    }

    #[test]
    fn test_decode_rejects_other_versions() {
        let err = decode::<u64>(r#"{"version":2,"data":42}"#, 1).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::Version {
                found: 2,
                expected: 1
            }
        ));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode::<u64>("not json", 1),
            Err(PersistenceError::Malformed(_))
        ));
        assert!(matches!(
            decode::<u64>("450", 1),
            Err(PersistenceError::Malformed(_))
        ));
    }
}
