/// Wire record decoding
use crate::error::RecordError;
use crate::models::RawRecord;

/// Split one datagram into its whitespace separated fields
///
/// The payload is positional text; any run of whitespace separates fields.
/// A record shorter than expected is not an error here: channels mapped past
/// its end are rejected individually at dispatch.
///
/// # Arguments
/// * `payload` - Raw datagram bytes
///
/// # Returns
/// The decoded record, or `RecordError::Malformed` if the bytes are not text
pub fn decode_record(payload: &[u8]) -> Result<RawRecord, RecordError> {
    let text = std::str::from_utf8(payload)?;
    Ok(RawRecord {
        fields: text.split_whitespace().map(str::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_whitespace_runs() {
        let record = decode_record(b"12345  3.4\t5.0 \r\n 180\n").unwrap();
        assert_eq!(record.fields, vec!["12345", "3.4", "5.0", "180"]);
        assert_eq!(record.get(2), Some("5.0"));
        assert_eq!(record.get(4), None);
    }

    #[test]
    fn test_empty_payload_is_an_empty_record() {
        let record = decode_record(b"   ").unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        assert!(matches!(
            decode_record(&[0x31, 0x20, 0xff, 0xfe]),
            Err(RecordError::Malformed(_))
        ));
    }
}
