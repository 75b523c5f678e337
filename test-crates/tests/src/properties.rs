#[cfg(test)]
pub mod tests {
    use crate::nasty_text;
    use crate::random_records;
    use effect_bridge_guest::*;
    use rand::prelude::*;

    #[test]
    fn random_records_round_trip() {
        let mut rng = thread_rng();
        for _ in 0..200 {
            for record in random_records(&mut rng) {
                let bytes = encode(&record);
                let decoded: RequestRecord = decode(&bytes)
                    .unwrap_or_else(|e| panic!("{e} decoding {:?}", String::from_utf8_lossy(&bytes)));
                assert_eq!(record, decoded);
            }
        }
    }

    #[test]
    fn random_records_encode_deterministically() {
        let mut rng = thread_rng();
        for _ in 0..50 {
            for record in random_records(&mut rng) {
                assert_eq!(encode(&record), encode(&record.clone()));
            }
        }
    }

    #[test]
    fn truncated_encodings_never_decode() {
        let mut rng = thread_rng();
        let message = LogMessage {
            level: LogLevel::Info,
            text: nasty_text(&mut rng, 40),
        };
        let bytes = encode(&message);
        // every proper prefix ends inside a field or without its terminator
        for end in 0..bytes.len() {
            assert!(decode::<LogMessage>(&bytes[..end]).is_err(), "prefix of {end} bytes");
        }
        assert_eq!(message, decode::<LogMessage>(&bytes).unwrap());
    }
}
