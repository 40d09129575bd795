use super::User;

/// Where a text message was posted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Direct,
    Group { mentioned: bool },
}

/// An inbound text message
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Conversation to reply into (the sender for direct chats, the room for groups)
    pub conversation_id: String,
    pub sender: User,
    pub text: String,
    pub chat: ChatKind,
}

impl InboundMessage {
    pub fn direct(sender: User, text: impl Into<String>) -> Self {
        Self {
            conversation_id: sender.id.clone(),
            sender,
            text: text.into(),
            chat: ChatKind::Direct,
        }
    }

    pub fn group(room: impl Into<String>, sender: User, text: impl Into<String>, mentioned: bool) -> Self {
        Self {
            conversation_id: room.into(),
            sender,
            text: text.into(),
            chat: ChatKind::Group { mentioned },
        }
    }

    /// Direct messages always address the bot
    pub fn addresses_bot(&self) -> bool {
        match self.chat {
            ChatKind::Direct => true,
            ChatKind::Group { mentioned } => mentioned,
        }
    }
}

/// A friend/connection request
#[derive(Debug, Clone)]
pub struct FriendRequest {
    pub alias: String,
    pub nickname: String,
    pub greeting: String,
}

/// Everything the gateway can deliver
#[derive(Debug, Clone)]
pub enum InboundEvent {
    FriendRequest(FriendRequest),
    Text(InboundMessage),
}

impl InboundEvent {
    pub fn conversation_id(&self) -> Option<&str> {
        match self {
            InboundEvent::Text(msg) => Some(&msg.conversation_id),
            InboundEvent::FriendRequest(_) => None,
        }
    }
}
