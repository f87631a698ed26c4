use std::fmt;

/// Identifies one chat thread; a chat without forum threads uses thread 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThreadKey {
    pub chat_id: i64,
    pub thread_id: i64,
}

impl ThreadKey {
    pub fn new(chat_id: i64, thread_id: Option<i64>) -> Self {
        Self {
            chat_id,
            thread_id: thread_id.unwrap_or(0),
        }
    }

    pub fn cache_key(&self) -> String {
        format!("summary_checkpoint:{}:{}", self.chat_id, self.thread_id)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut v = Vec::with_capacity(16);
        v.extend_from_slice(&self.chat_id.to_be_bytes());
        v.extend_from_slice(&self.thread_id.to_be_bytes());
        v
    }
}

impl fmt::Display for ThreadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chat_id, self.thread_id)
    }
}
