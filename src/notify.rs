//! Outbound collaborators: the status sink and the label prompt.

use std::collections::VecDeque;

/// Receives user-facing status strings.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Asks the user for a label. `None` means the prompt was cancelled.
pub trait LabelPrompt {
    fn request_label(&mut self, title: &str, default: &str) -> Option<String>;
}

impl<F> LabelPrompt for F
where
    F: FnMut(&str, &str) -> Option<String>,
{
    fn request_label(&mut self, title: &str, default: &str) -> Option<String> {
        self(title, default)
    }
}

/// Bounded history of status messages, newest last.
#[derive(Clone, Debug, Default)]
pub struct StatusLog {
    messages: VecDeque<String>,
}

impl StatusLog {
    const LIMIT: usize = 64;

    pub fn latest(&self) -> Option<&str> {
        self.messages.back().map(String::as_str)
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    pub fn contains(&self, message: &str) -> bool {
        self.messages.iter().any(|m| m == message)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl Notifier for StatusLog {
    fn notify(&mut self, message: &str) {
        tracing::info!(target: "netsim::status", "{message}");
        self.messages.push_back(message.to_string());
        if self.messages.len() > Self::LIMIT {
            let overflow = self.messages.len() - Self::LIMIT;
            self.messages.drain(0..overflow);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_keeps_newest_messages() {
        let mut log = StatusLog::default();
        for i in 0..100 {
            log.notify(&format!("message {i}"));
        }
        assert_eq!(log.len(), 64);
        assert_eq!(log.latest(), Some("message 99"));
        assert_eq!(log.messages().next(), Some("message 36"));
    }

    #[test]
    fn closures_act_as_prompts() {
        let mut prompt = |_: &str, default: &str| Some(format!("{default}!"));
        assert_eq!(prompt.request_label("Edit", "A"), Some("A!".to_string()));
    }
}
