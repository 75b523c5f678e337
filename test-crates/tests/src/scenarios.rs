#[cfg(test)]
pub mod tests {
    use crate::chat_completion;
    use crate::CHAT_ENDPOINT;
    use crate::EXAMPLE_URL;
    use effect_bridge_guest::*;
    use effect_bridge_scenarios::chat::ChatConfig;
    use effect_bridge_scenarios::chat::relay_chat;
    use effect_bridge_scenarios::mirror::mirror_resource;
    use effect_bridge_scenarios::mirror::MirrorConfig;
    use effect_bridge_scenarios::*;
    use test_common::HostCall;
    use test_common::MockHost;
    use test_common::MockReply;

    fn chat_config() -> ChatConfig {
        ChatConfig {
            endpoint: CHAT_ENDPOINT.into(),
            model: "small-model".into(),
            api_key: "sk-test".into(),
            prompt: "Tell me a joke".into(),
            bridge: BridgeConfig::default(),
        }
    }

    #[test]
    fn scenario_log_message_round_trip() {
        let bytes = encode(&LogMessage {
            level: LogLevel::Info,
            text: "https://google.com".into(),
        });
        let decoded: LogMessage = decode(&bytes).unwrap();
        assert_eq!("https://google.com", decoded.text);
    }

    #[test]
    fn scenario_padding_is_not_text() {
        let host = MockHost::new();
        host.route(Method::Get, EXAMPLE_URL, MockReply::text("<html>hi</html>"));
        let config = BridgeConfig {
            large_capacity: SMALL_RESPONSE_CAPACITY,
            ..Default::default()
        };

        let response = Effects::new(host.clone(), config)
            .perform_http(Method::Get, EXAMPLE_URL, "{}", "{}")
            .unwrap();

        assert_eq!(SMALL_RESPONSE_CAPACITY, response.capacity());
        assert_eq!("<html>hi</html>", response.text().unwrap());
        assert_eq!(SMALL_RESPONSE_CAPACITY, host.http_requests()[0].destination.len());

        // a host that fills the front of a destination and says nothing about the rest
        let mut destination = vec![0_u8; SMALL_RESPONSE_CAPACITY];
        destination[..15].copy_from_slice(b"<html>hi</html>");
        assert_eq!("<html>hi</html>", codec::decode_text(&destination).unwrap());
    }

    #[test]
    fn scenario_write_file_then_read_back() {
        let host = MockHost::new();
        let content: Vec<u8> = (0..=255).cycle().take(3000).collect();

        host.effects()
            .write_file("/tmp/out.bin", GuestSlice::read(&content));

        let on_disk = host.read_file("/tmp/out.bin").unwrap();
        assert_eq!(content.len(), on_disk.len());
        assert_eq!(content, on_disk);
    }

    #[test]
    fn scenario_delimiters_round_trip() {
        let request = HttpRequest {
            verb: Method::Post,
            url: "https://example.com/a=1:b".into(),
            headers: "{\"X-Odd\":\"fx1:log\\nlevel=5:error\"}".into(),
            body: "line one\nurl=3:bad\n\nfx1:http_request\n".into(),
            destination: RawSlice::new(4096, 2048).unwrap(),
        };
        let decoded: HttpRequest = decode(&encode(&request)).unwrap();
        assert_eq!(request, decoded);
    }

    #[test]
    fn log_line_entry() {
        let host = MockHost::new();
        let result = run_entry(host.clone(), "log_line", Ok(BridgeConfig::default()), log_line);
        assert_eq!(Some(()), result);
        assert_eq!(
            vec![LogMessage {
                level: LogLevel::Info,
                text: LOG_LINE.into(),
            }],
            host.logs(),
        );
    }

    #[test]
    fn relay_chat_logs_the_answer() {
        let host = MockHost::new();
        host.route(
            Method::Post,
            CHAT_ENDPOINT,
            MockReply::Ok(chat_completion("Why did the crab never share? Because it's shellfish.")),
        );

        let answer = run_entry(host.clone(), "relay_chat", Ok(chat_config()), relay_chat);

        assert_eq!(
            Some("Why did the crab never share? Because it's shellfish.".to_string()),
            answer,
        );
        let requests = host.http_requests();
        assert_eq!(1, requests.len());
        let headers: serde_json::Value = serde_json::from_str(&requests[0].headers).unwrap();
        assert_eq!("Bearer sk-test", headers["Authorization"]);
        let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!("Tell me a joke", body["messages"][0]["content"]);

        let logs = host.logs();
        assert!(logs
            .iter()
            .any(|m| m.text == "Why did the crab never share? Because it's shellfish."));
    }

    #[test]
    fn relay_chat_without_choices_logs_an_error() {
        let host = MockHost::new();
        host.route(
            Method::Post,
            CHAT_ENDPOINT,
            MockReply::text(r#"{"choices":[]}"#),
        );

        let answer = run_entry(host.clone(), "relay_chat", Ok(chat_config()), relay_chat);

        assert_eq!(None, answer);
        let errors: Vec<_> = host
            .logs()
            .into_iter()
            .filter(|m| m.level == LogLevel::Error)
            .collect();
        assert_eq!(1, errors.len());
        assert!(errors[0].text.contains("relay_chat"));
        assert!(errors[0].text.contains("no choices"));
    }

    #[test]
    fn relay_chat_host_failure_logs_an_error() {
        let host = MockHost::new();
        host.route(
            Method::Post,
            CHAT_ENDPOINT,
            MockReply::Err("connection refused".into()),
        );

        assert_eq!(
            None,
            run_entry(host.clone(), "relay_chat", Ok(chat_config()), relay_chat)
        );
        assert!(host
            .logs()
            .iter()
            .any(|m| m.level == LogLevel::Error && m.text.contains("connection refused")));
    }

    #[test]
    fn bad_entry_argument_logs_instead_of_panicking() {
        let host = MockHost::new();
        let config: Result<ChatConfig, BridgeError> =
            Err(bridge_error!(BridgeErrorInner::Config("missing field `api_key`".into())));

        assert_eq!(None, run_entry(host.clone(), "relay_chat", config, relay_chat));
        assert!(host.http_requests().is_empty());
        let logs = host.logs();
        assert_eq!(1, logs.len());
        assert_eq!(LogLevel::Error, logs[0].level);
        assert!(logs[0].text.contains("api_key"));
    }

    #[test]
    fn invalid_bridge_settings_are_rejected_before_any_call() {
        let host = MockHost::new();
        let mut config = chat_config();
        config.bridge.large_capacity = 1;

        assert_eq!(None, run_entry(host.clone(), "relay_chat", Ok(config), relay_chat));
        assert!(host.http_requests().is_empty());
        assert_eq!(LogLevel::Error, host.logs()[0].level);
    }

    #[test]
    fn mirror_writes_the_body_by_reference() {
        let host = MockHost::new();
        let body: Vec<u8> = (0..5000_u32).map(|n| (n % 251) as u8).collect();
        host.route(Method::Get, EXAMPLE_URL, MockReply::Ok(body.clone()));
        let config = MirrorConfig {
            url: EXAMPLE_URL.into(),
            path: "/mirror/index.html".into(),
            bridge: BridgeConfig::default(),
        };

        let written = run_entry(host.clone(), "mirror_resource", Ok(config), mirror_resource);

        assert_eq!(Some(body.len()), written);
        assert_eq!(body, host.read_file("/mirror/index.html").unwrap());

        let calls = host.calls();
        let destination = match &calls[0] {
            HostCall::Http(request) => request.destination,
            other => panic!("unexpected call {other:?}"),
        };
        match &calls[1] {
            HostCall::WriteFile { path, content } => {
                assert_eq!("/mirror/index.html", path);
                assert_eq!(body.len(), content.len());
                // the content handed over lies inside the destination the body arrived in
                assert!(content.ptr() >= destination.ptr());
                assert!(content.end() <= destination.end());
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[test]
    fn entry_log_level_filters_tracing() {
        let host = MockHost::new();
        let config = BridgeConfig {
            log_level: LogLevel::Trace,
            ..Default::default()
        };
        host.route(Method::Get, EXAMPLE_URL, MockReply::text("x"));
        let mirror = MirrorConfig {
            url: EXAMPLE_URL.into(),
            path: "/x".into(),
            bridge: config,
        };

        run_entry(host.clone(), "mirror_resource", Ok(mirror), mirror_resource);

        // boundary tracing is forwarded when the host asks for trace level
        assert!(host
            .logs()
            .iter()
            .any(|m| m.level == LogLevel::Trace && m.text.contains("__effects_http_request")));
    }
}
