//! Message parser - Splits raw text into a command invocation or plain text

/// Parsed message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// `params[0]` is the command name itself, prefix included
    Command { name: String, params: Vec<String> },
    /// Anything else, left for the conversation path
    Text,
}

/// Recognizes prefixed commands
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    pub fn parse(&self, text: &str) -> Content {
        let trimmed = text.trim();
        if self.command_prefix.is_empty() || !trimmed.starts_with(&self.command_prefix) {
            return Content::Text;
        }

        let params: Vec<String> = trimmed.split_whitespace().map(str::to_string).collect();
        let name = params.first().cloned().unwrap_or_default();
        Content::Command { name, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_keeps_name_at_index_zero() {
        let parser = MessageParser::new("/");
        assert_eq!(
            parser.parse("/weather"),
            Content::Command {
                name: "/weather".to_string(),
                params: vec!["/weather".to_string()],
            }
        );
        assert_eq!(
            parser.parse("  /weather   Shanghai "),
            Content::Command {
                name: "/weather".to_string(),
                params: vec!["/weather".to_string(), "Shanghai".to_string()],
            }
        );
    }

    #[test]
    fn test_plain_text_is_untouched() {
        let parser = MessageParser::new("/");
        assert_eq!(parser.parse("hello there"), Content::Text);
        assert_eq!(parser.parse("a/b"), Content::Text);
    }

    #[test]
    fn test_custom_prefix() {
        let parser = MessageParser::new("!");
        assert!(matches!(parser.parse("!group"), Content::Command { .. }));
        assert_eq!(parser.parse("/group"), Content::Text);
    }
}
