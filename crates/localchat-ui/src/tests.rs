#[cfg(test)]
mod tests {
    use crate::panels::chat::{attachment_from_dropped, guess_mime, take_outgoing};
    use crate::state::*;
    use localchat_core::runtime::TurnState;
    use localchat_types::attachment::{Attachment, AttachmentData};
    use localchat_types::event::ChatEvent;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn tokens(text: &str) -> Vec<ChatEvent> {
        text.chars()
            .map(|c| ChatEvent::Token { text: c.to_string() })
            .collect()
    }

    fn user_message(text: &str) -> ChatEvent {
        ChatEvent::UserMessage {
            text: text.to_string(),
            attachment_names: vec![],
        }
    }

    /// Events of one completed turn, as the runtime emits them
    fn turn(turn_id: u64, text: &str, reply: &str) -> Vec<ChatEvent> {
        let mut events = vec![
            ChatEvent::TurnStart { turn_id },
            user_message(text),
            ChatEvent::AwaitingModel,
        ];
        events.extend(tokens(reply));
        events.push(ChatEvent::MessageSent);
        events.push(ChatEvent::TurnEnd { turn_id });
        events
    }

    fn contents(state: &UiState) -> Vec<&str> {
        state.messages.iter().map(|m| m.content.as_str()).collect()
    }

    // ─── UiState Tests ───────────────────────────────────────

    #[test]
    fn test_ui_state_initial() {
        let state = UiState::new();
        assert!(state.messages.is_empty());
        assert_eq!(state.turn_status, TurnState::Idle);
        assert!(state.streaming_text.is_empty());
        assert!(state.pending_attachments.is_empty());
        assert!(!state.show_settings);
        assert_eq!(state.status_text, "Ready");
        assert!(state.session_id.is_none());
        assert!(!state.is_busy());
    }

    #[test]
    fn test_ui_state_session_started_clears_transcript() {
        let mut state = UiState::new();
        state.process_events(vec![user_message("old")]);
        state.streaming_text = "partial".to_string();

        state.process_events(vec![ChatEvent::SessionStarted {
            session_id: "s-1".to_string(),
        }]);

        assert!(state.messages.is_empty());
        assert!(state.streaming_text.is_empty());
        assert_eq!(state.session_id.as_deref(), Some("s-1"));
    }

    #[test]
    fn test_ui_state_tokens_then_send() {
        let mut state = UiState::new();
        state.process_events(tokens("Hi there"));
        assert_eq!(state.streaming_text, "Hi there");
        assert!(state.messages.is_empty());

        state.process_events(vec![ChatEvent::MessageSent]);
        assert!(state.streaming_text.is_empty());
        assert_eq!(
            state.messages,
            vec![ChatEntry {
                role: EntryRole::Assistant,
                content: "Hi there".to_string(),
                attachment_names: vec![],
            }]
        );
    }

    #[test]
    fn test_ui_state_turn_lifecycle() {
        let mut state = UiState::new();

        state.process_events(vec![
            ChatEvent::TurnStart { turn_id: 1 },
            user_message("Hello"),
            ChatEvent::AwaitingModel,
        ]);
        assert!(state.is_busy());
        assert_eq!(state.status_text, "Thinking...");

        let mut events = tokens("Hi");
        events.push(ChatEvent::MessageSent);
        events.push(ChatEvent::TurnEnd { turn_id: 1 });
        state.process_events(events);

        assert!(!state.is_busy());
        assert_eq!(state.status_text, "Ready");
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[1].content, "Hi");
    }

    #[test]
    fn test_ui_state_user_message_with_attachments() {
        let mut state = UiState::new();
        state.process_events(vec![ChatEvent::UserMessage {
            text: "What's this?".to_string(),
            attachment_names: vec!["cat.png".to_string()],
        }]);
        assert_eq!(
            state.messages,
            vec![ChatEntry {
                role: EntryRole::User,
                content: "What's this?".to_string(),
                attachment_names: vec!["cat.png".to_string()],
            }]
        );
    }

    #[test]
    fn test_queued_messages_appear_in_turn_order() {
        let mut state = UiState::new();
        state.input_text = "A".to_string();
        assert!(take_outgoing(&mut state).is_some());
        state.input_text = "B".to_string();
        assert!(take_outgoing(&mut state).is_some());
        assert!(state.messages.is_empty());

        let mut events = turn(1, "A", "reply-A");
        events.extend(turn(2, "B", "reply-B"));
        state.process_events(events);

        assert_eq!(contents(&state), vec!["A", "reply-A", "B", "reply-B"]);
        let roles: Vec<EntryRole> = state.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![EntryRole::User, EntryRole::Assistant, EntryRole::User, EntryRole::Assistant]
        );
    }

    #[test]
    fn test_ui_state_error_survives_turn_end() {
        let mut state = UiState::new();
        state.process_events(vec![
            ChatEvent::TurnStart { turn_id: 1 },
            ChatEvent::Error { message: "Network error: refused".to_string() },
            ChatEvent::TurnEnd { turn_id: 1 },
        ]);

        assert!(matches!(state.turn_status, TurnState::Error(_)));
        assert!(state.status_text.contains("refused"));
        assert!(!state.is_busy());

        state.process_events(vec![ChatEvent::TurnStart { turn_id: 2 }]);
        assert!(state.is_busy());
    }

    #[test]
    fn test_ui_state_default() {
        let state = UiState::default();
        assert!(state.messages.is_empty());
        assert!(!state.is_busy());
    }

    // ─── Chat Panel Helper Tests ─────────────────────────────

    #[test]
    fn test_take_outgoing_moves_text_and_attachments() {
        let mut state = UiState::new();
        state.input_text = "  What's this?  ".to_string();
        state.pending_attachments.push(Attachment::from_bytes("cat.png", "image/png", vec![1, 2]));

        let msg = take_outgoing(&mut state).unwrap();

        assert_eq!(msg.text, "What's this?");
        assert_eq!(msg.attachments.len(), 1);
        assert!(state.input_text.is_empty());
        assert!(state.pending_attachments.is_empty());
        assert_eq!(msg.attachments[0].name, "cat.png");
        // not shown until its turn starts
        assert!(state.messages.is_empty());
    }

    #[test]
    fn test_take_outgoing_ignores_blank_input() {
        let mut state = UiState::new();
        state.input_text = "   ".to_string();
        state.pending_attachments.push(Attachment::from_path("a.png", "image/png", "/a.png"));

        assert!(take_outgoing(&mut state).is_none());
        assert!(state.messages.is_empty());
        assert_eq!(state.pending_attachments.len(), 1);
    }

    #[test]
    fn test_attachment_from_browser_drop() {
        let file = egui::DroppedFile {
            name: "photo.jpg".to_string(),
            mime: "image/jpeg".to_string(),
            bytes: Some(Arc::from(vec![0xffu8, 0xd8])),
            ..Default::default()
        };
        let attachment = attachment_from_dropped(&file).unwrap();
        assert_eq!(attachment.name, "photo.jpg");
        assert!(attachment.is_image());
        assert_eq!(attachment.data, AttachmentData::Bytes(vec![0xff, 0xd8]));
    }

    #[test]
    fn test_attachment_from_native_drop_reads_file() {
        let path = std::env::temp_dir().join(format!("localchat-{}.PNG", std::process::id()));
        std::fs::write(&path, b"hello").unwrap();
        let file = egui::DroppedFile {
            path: Some(path.clone()),
            ..Default::default()
        };

        let attachment = attachment_from_dropped(&file).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(attachment.name.ends_with(".PNG"));
        assert_eq!(attachment.mime, "image/png");
        assert_eq!(attachment.data, AttachmentData::Bytes(b"hello".to_vec()));
        // base64, never the path itself
        assert_eq!(attachment.image_ref(), "aGVsbG8=");
    }

    #[test]
    fn test_attachment_from_unreadable_native_drop() {
        let file = egui::DroppedFile {
            path: Some(PathBuf::from("/nonexistent/localchat/diagram.png")),
            ..Default::default()
        };
        assert!(attachment_from_dropped(&file).is_none());
    }

    #[test]
    fn test_attachment_from_empty_drop() {
        assert!(attachment_from_dropped(&egui::DroppedFile::default()).is_none());
    }

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime("a.jpeg"), "image/jpeg");
        assert_eq!(guess_mime("a.webp"), "image/webp");
        assert_eq!(guess_mime("notes.txt"), "text/plain");
        assert_eq!(guess_mime("README"), "application/octet-stream");
    }
}
