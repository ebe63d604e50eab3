#[cfg(test)]
mod tests {
    use crate::llm::ollama::*;
    use localchat_core::ports::*;
    use localchat_types::ChatError;
    use localchat_types::config::BackendConfig;
    use localchat_types::message::*;

    fn request(messages: Vec<Message>) -> ChatRequest {
        ChatRequest {
            model: "granite3.2-vision".to_string(),
            messages,
            stream: false,
        }
    }

    // ─── URL Tests ───────────────────────────────────────────

    #[test]
    fn test_urls_from_default_config() {
        let provider = OllamaProvider::new(BackendConfig::default());
        assert_eq!(provider.chat_url(), "http://localhost:11434/api/chat");
        assert_eq!(provider.tags_url(), "http://localhost:11434/api/tags");
        assert_eq!(provider.model(), "granite3.2-vision");
    }

    #[test]
    fn test_urls_strip_trailing_slash() {
        let provider = OllamaProvider::new(BackendConfig {
            base_url: "http://gpu-box:11434/".to_string(),
            model: "llava".to_string(),
        });
        assert_eq!(provider.chat_url(), "http://gpu-box:11434/api/chat");
    }

    // ─── Request Body Tests ──────────────────────────────────

    #[test]
    fn test_request_body_shape() {
        let body = build_request_body(&request(vec![
            Message::system("persona"),
            Message::user("Hello"),
        ]));

        assert_eq!(body["model"], "granite3.2-vision");
        assert_eq!(body["stream"], false);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "persona");
        assert_eq!(messages[1]["role"], "user");
        assert!(messages[1].get("images").is_none());
    }

    #[test]
    fn test_request_body_includes_images_verbatim() {
        let body = build_request_body(&request(vec![
            Message::system("persona"),
            Message::user_with_images("What's this?", vec!["aGVsbG8=".to_string()]),
        ]));
        assert_eq!(body["messages"][1]["images"], serde_json::json!(["aGVsbG8="]));
    }

    // ─── Response Parsing Tests ──────────────────────────────

    #[test]
    fn test_parse_chat_body() {
        let text = r#"{
            "model": "granite3.2-vision",
            "created_at": "2025-03-01T10:00:00Z",
            "message": {"role": "assistant", "content": "Hi there"},
            "done": true,
            "total_duration": 5000000,
            "prompt_eval_count": 26,
            "eval_count": 3
        }"#;

        let response = parse_chat_body(text).unwrap();
        assert_eq!(response.message, Message::assistant("Hi there"));
        assert_eq!(
            response.usage,
            Some(TokenUsage {
                prompt_tokens: 26,
                completion_tokens: 3,
                total_duration_ns: 5_000_000,
            })
        );
    }

    #[test]
    fn test_parse_chat_body_without_counters() {
        let response =
            parse_chat_body(r#"{"message": {"role": "assistant", "content": "ok"}, "done": true}"#)
                .unwrap();
        assert_eq!(response.message.content, "ok");
        assert!(response.usage.is_none());
    }

    #[test]
    fn test_parse_chat_body_error_field() {
        let err = parse_chat_body(r#"{"error": "model \"nope\" not found"}"#).unwrap_err();
        assert_eq!(err, ChatError::Inference("model \"nope\" not found".to_string()));
    }

    #[test]
    fn test_parse_chat_body_missing_message() {
        let err = parse_chat_body(r#"{"done": true}"#).unwrap_err();
        assert!(matches!(err, ChatError::Inference(_)));
    }

    #[test]
    fn test_parse_chat_body_malformed() {
        let err = parse_chat_body("<html>502</html>").unwrap_err();
        assert!(err.to_string().contains("Malformed response"));
        assert!(matches!(err, ChatError::Inference(_)));
    }

    #[test]
    fn test_parse_model_list() {
        let text = r#"{"models": [
            {"name": "granite3.2-vision:latest", "size": 2400000000},
            {"name": "llava:7b"}
        ]}"#;
        assert_eq!(
            parse_model_list(text).unwrap(),
            vec!["granite3.2-vision:latest", "llava:7b"]
        );
        assert!(parse_model_list("{}").unwrap().is_empty());
    }

    #[test]
    fn test_http_error_message() {
        assert_eq!(
            http_error_message(404, r#"{"error":"model not found"}"#),
            "HTTP 404: model not found"
        );
        assert_eq!(http_error_message(500, "  boom \n"), "HTTP 500: boom");
        assert_eq!(http_error_message(503, ""), "HTTP 503: unknown error");
    }
}
