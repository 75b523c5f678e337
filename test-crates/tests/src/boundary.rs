#[cfg(test)]
pub mod tests {
    use effect_bridge_guest::boundary::ResponseFn;
    use effect_bridge_guest::*;
    use test_common::HostCall;
    use test_common::MockHost;
    use test_common::MockReply;

    fn lookup(destination: RawSlice) -> RequestRecord {
        PlatformCall {
            function: "inventory.lookup".into(),
            payload: "sku=42".into(),
            destination,
        }
        .into()
    }

    #[test]
    fn platform_answer_round_trip() {
        let host = MockHost::new();
        host.platform("inventory.lookup", MockReply::text("7 in stock"));

        let response = Boundary::new(host.clone())
            .call_with_response(
                ResponseFn::PlatformCall,
                ResponsePolicy::fixed(SMALL_RESPONSE_CAPACITY),
                lookup,
            )
            .unwrap();

        assert_eq!("7 in stock", response.text().unwrap());
        match host.calls().as_slice() {
            [HostCall::Platform(call)] => {
                assert_eq!("sku=42", call.payload);
                assert_eq!(SMALL_RESPONSE_CAPACITY, call.destination.len());
            }
            other => panic!("unexpected calls {other:?}"),
        }
    }

    #[test]
    fn unknown_platform_function_fails_with_host_message() {
        let host = MockHost::new();
        let err = Boundary::new(host)
            .call_with_response(
                ResponseFn::PlatformCall,
                ResponsePolicy::fixed(SMALL_RESPONSE_CAPACITY),
                lookup,
            )
            .unwrap_err();
        assert_eq!(
            BridgeErrorInner::HostCallFailure {
                function: "__effects_platform_call".into(),
                message: "unknown platform function inventory.lookup".into(),
            },
            err.error,
        );
        assert!(err.to_string().contains("unknown platform function"));
    }

    #[test]
    fn envelope_less_host_is_rejected() {
        let host = MockHost::new();
        host.platform("inventory.lookup", MockReply::Raw(b"7 in stock".to_vec()));
        let err = Boundary::new(host)
            .call_with_response(
                ResponseFn::PlatformCall,
                ResponsePolicy::fixed(SMALL_RESPONSE_CAPACITY),
                lookup,
            )
            .unwrap_err();
        assert!(matches!(err.error, BridgeErrorInner::MalformedEncoding(_)));
    }

    #[test]
    fn host_overclaiming_its_payload_is_overflow() {
        let host = MockHost::new();
        host.platform("inventory.lookup", MockReply::Raw(b"ok 5000\nabc".to_vec()));
        let err = Boundary::new(host)
            .call_with_response(ResponseFn::PlatformCall, ResponsePolicy::fixed(64), lookup)
            .unwrap_err();
        assert_eq!(
            BridgeErrorInner::BufferOverflow {
                capacity: 64 - "ok 5000\n".len(),
                written: 5000,
            },
            err.error,
        );
    }

    #[test]
    fn oversized_platform_answer_is_too_large() {
        let host = MockHost::new();
        host.platform("inventory.lookup", MockReply::Ok(vec![b'x'; 4096]));
        let err = Boundary::new(host.clone())
            .call_with_response(
                ResponseFn::PlatformCall,
                ResponsePolicy::fixed(SMALL_RESPONSE_CAPACITY),
                lookup,
            )
            .unwrap_err();
        assert_eq!(
            BridgeErrorInner::ResponseTooLarge {
                required: capacity_for(4096).unwrap(),
                limit: SMALL_RESPONSE_CAPACITY,
            },
            err.error,
        );
        assert_eq!(1, host.calls().len());
    }
}
