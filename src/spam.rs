use regex::Regex;
use tracing::debug;

use crate::patterns;
use crate::stats::Message;

/// Drops link shares and promotional messages before any counting happens.
///
/// Patterns are expected to be compiled case-insensitively; see
/// [`patterns::load_spam_patterns`].
#[derive(Debug, Clone, Default)]
pub struct SpamFilter {
    patterns: Vec<Regex>,
}

impl SpamFilter {
    pub fn new(patterns: Vec<Regex>) -> Self {
        Self { patterns }
    }

    /// A filter that keeps every message.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_default_patterns() -> Self {
        Self::new(patterns::default_patterns())
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_spam(&self, text: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(text))
    }

    /// Keeps non-spam messages in their original order.
    pub fn apply(&self, messages: Vec<Message>) -> Vec<Message> {
        let before = messages.len();
        let kept: Vec<Message> = messages
            .into_iter()
            .filter(|message| !self.is_spam(&message.text))
            .collect();
        debug!(
            action = "complete",
            component = "spam_filter",
            kept = kept.len(),
            removed = before - kept.len(),
            "Spam filter applied"
        );
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(text: &str) -> Message {
        Message::new("2024. 3. 5. 오후 2:10", "A", text)
    }

    #[test]
    fn flags_urls_and_promotions() {
        let filter = SpamFilter::with_default_patterns();
        assert!(filter.is_spam("이거 봐 https://example.com/x"));
        assert!(filter.is_spam("WWW.example.com"));
        assert!(filter.is_spam("[쿠팡 로켓 선물] 링크: link.coupang.com/abc"));
        assert!(filter.is_spam("민지님이 선물을 보냈습니다"));
        assert!(filter.is_spam("[배달의민족] 주문 공유"));
        assert!(filter.is_spam("toss.me/someone"));
        assert!(filter.is_spam("KakaoPay로 보냈어"));
        assert!(!filter.is_spam("오늘 저녁 뭐 먹을까"));
        assert!(!filter.is_spam("http 얘기하는 중"));
    }

    #[test]
    fn preserves_order_of_kept_messages() {
        let filter = SpamFilter::with_default_patterns();
        let kept = filter.apply(vec![
            msg("one"),
            msg("https://spam.example"),
            msg("two"),
            msg("naverpay 결제"),
            msg("three"),
        ]);
        let texts: Vec<_> = kept.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn disabled_filter_keeps_everything() {
        let filter = SpamFilter::disabled();
        assert_eq!(filter.pattern_count(), 0);
        assert_eq!(filter.apply(vec![msg("https://a.b")]).len(), 1);
    }
}
