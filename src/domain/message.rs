/// Payload of a message: plain text or an attached file descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MessageKind {
    #[default]
    Text,
    File {
        file_name: String,
        file_size: String,
    },
}

/// A single chat message. Immutable once created; ordering is
/// server-assigned and the client never re-sorts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub sender_name: String,
    pub sender_avatar: String,
    pub text: String,
    pub kind: MessageKind,
    pub time: String,
    /// Authored by the current identity.
    pub own: bool,
}

impl Message {
    /// Display content: file label plus text, or just the text.
    pub fn display_content(&self) -> String {
        match &self.kind {
            MessageKind::Text => self.text.clone(),
            MessageKind::File {
                file_name,
                file_size,
            } => {
                if self.text.is_empty() {
                    format!("[{file_name}, {file_size}]")
                } else {
                    format!("[{file_name}, {file_size}] {}", self.text)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(text: &str, kind: MessageKind) -> Message {
        Message {
            id: 1,
            sender_id: 7,
            sender_name: "Алексей Морозов".to_owned(),
            sender_avatar: "АМ".to_owned(),
            text: text.to_owned(),
            kind,
            time: "10:22".to_owned(),
            own: false,
        }
    }

    #[test]
    fn display_content_returns_text_for_plain_messages() {
        assert_eq!(msg("Добрый день", MessageKind::Text).display_content(), "Добрый день");
    }

    #[test]
    fn display_content_shows_file_descriptor() {
        let message = msg(
            "",
            MessageKind::File {
                file_name: "Отчёт_Q4_2025.xlsx".to_owned(),
                file_size: "2.4 МБ".to_owned(),
            },
        );

        assert_eq!(message.display_content(), "[Отчёт_Q4_2025.xlsx, 2.4 МБ]");
    }

    #[test]
    fn display_content_combines_file_descriptor_and_caption() {
        let message = msg(
            "Сейчас пришлю файл",
            MessageKind::File {
                file_name: "Отчёт_Q4_2025.xlsx".to_owned(),
                file_size: "2.4 МБ".to_owned(),
            },
        );

        assert_eq!(
            message.display_content(),
            "[Отчёт_Q4_2025.xlsx, 2.4 МБ] Сейчас пришлю файл"
        );
    }
}
