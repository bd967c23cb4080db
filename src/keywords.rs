use serde::{Deserialize, Serialize};

use crate::ordered::OrderedMap;
use crate::stats::Message;

/// How a keyword occurrence is recognized inside message text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Occurrence must not touch a Latin letter, digit or Hangul syllable.
    #[default]
    WholeWord,
    /// Any occurrence of the keyword counts.
    Substring,
}

/// Latin letters, decimal digits and precomposed Hangul syllables.
///
/// Compatibility jamo such as `ㅋ` are deliberately outside the class.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

/// Counts occurrences of an already case-folded `needle` in `haystack`.
///
/// After a counted match the scan resumes at the match end, so occurrences
/// never overlap. A rejected candidate advances the scan by one character.
pub fn count_occurrences(haystack: &str, needle: &str, mode: MatchMode) -> usize {
    if needle.is_empty() {
        return 0;
    }
    if mode == MatchMode::Substring {
        return haystack.matches(needle).count();
    }

    let mut count = 0;
    let mut pos = 0;
    while let Some(offset) = haystack[pos..].find(needle) {
        let start = pos + offset;
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !is_word_char(c));
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !is_word_char(c));

        if before_ok && after_ok {
            count += 1;
            pos = end;
        } else {
            let step = haystack[start..].chars().next().map_or(1, char::len_utf8);
            pos = start + step;
        }
    }
    count
}

/// Per-sender keyword counts: sender -> keyword -> occurrences.
pub type KeywordTally = OrderedMap<OrderedMap<usize>>;

/// Case-insensitive keyword counting and message retrieval.
#[derive(Debug, Clone, Default)]
pub struct KeywordSearch {
    keywords: Vec<String>,
    folded: Vec<String>,
    mode: MatchMode,
}

impl KeywordSearch {
    /// Trims each keyword, dropping empty and repeated entries.
    pub fn new<I, S>(keywords: I, mode: MatchMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut search = Self {
            keywords: Vec::new(),
            folded: Vec::new(),
            mode,
        };
        for keyword in keywords {
            let keyword = keyword.as_ref().trim();
            if keyword.is_empty() || search.keywords.iter().any(|k| k == keyword) {
                continue;
            }
            search.keywords.push(keyword.to_string());
            search.folded.push(keyword.to_lowercase());
        }
        search
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Counts every keyword for every sender, in first-seen sender order.
    ///
    /// Keywords a sender never used are reported as 0. With no keywords the
    /// tally is empty.
    pub fn tally(&self, messages: &[Message]) -> KeywordTally {
        let mut tally = KeywordTally::new();
        if self.is_empty() {
            return tally;
        }

        for message in messages {
            let counts = tally.get_or_insert_with(&message.sender, || self.zeroed());
            let text = message.text.to_lowercase();
            for (keyword, folded) in self.keywords.iter().zip(&self.folded) {
                let found = count_occurrences(&text, folded, self.mode);
                if found > 0 {
                    *counts.get_or_insert_with(keyword, || 0) += found;
                }
            }
        }
        tally
    }

    /// Messages containing `keyword`, optionally only those from `sender`.
    pub fn find<'a>(
        &self,
        keyword: &str,
        messages: &'a [Message],
        sender: Option<&str>,
    ) -> Vec<&'a Message> {
        let folded = keyword.trim().to_lowercase();
        if folded.is_empty() {
            return Vec::new();
        }
        messages
            .iter()
            .filter(|m| sender.map_or(true, |s| m.sender == s))
            .filter(|m| count_occurrences(&m.text.to_lowercase(), &folded, self.mode) > 0)
            .collect()
    }

    fn zeroed(&self) -> OrderedMap<usize> {
        let mut counts = OrderedMap::new();
        for keyword in &self.keywords {
            counts.insert(keyword.as_str(), 0);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whole(text: &str, keyword: &str) -> usize {
        count_occurrences(&text.to_lowercase(), &keyword.to_lowercase(), MatchMode::WholeWord)
    }

    #[test]
    fn hangul_stem_does_not_match_inside_longer_word() {
        assert_eq!(whole("사랑해요", "사랑"), 0);
        assert_eq!(whole("사랑해요", "사랑해요"), 1);
        assert_eq!(whole("사랑 사랑해요 사랑!", "사랑"), 2);
    }

    #[test]
    fn latin_whole_word_and_case() {
        assert_eq!(whole("I love you", "love"), 1);
        assert_eq!(whole("lovely", "love"), 0);
        assert_eq!(whole("LOVE, Love, love2", "love"), 2);
    }

    #[test]
    fn digits_are_word_characters() {
        assert_eq!(whole("room 101", "10"), 0);
        assert_eq!(whole("room 10.", "10"), 1);
    }

    #[test]
    fn jamo_and_punctuation_are_boundaries() {
        assert_eq!(whole("보고싶어ㅠㅠ", "보고싶어"), 1);
        assert_eq!(whole("(밥)", "밥"), 1);
    }

    #[test]
    fn rejected_candidate_does_not_hide_later_match() {
        assert_eq!(whole("aab ab", "ab"), 1);
        assert_eq!(whole("ㅋㅋㅋ", "ㅋㅋ"), 1);
    }

    #[test]
    fn substring_mode_counts_naively() {
        assert_eq!(count_occurrences("사랑해요 사랑", "사랑", MatchMode::Substring), 2);
        assert_eq!(count_occurrences("lovely", "love", MatchMode::Substring), 1);
        assert_eq!(count_occurrences("aaaa", "aa", MatchMode::Substring), 2);
        assert_eq!(count_occurrences("abc", "", MatchMode::Substring), 0);
    }

    #[test]
    fn keywords_are_trimmed_and_deduplicated() {
        let search = KeywordSearch::new(["  사랑 ", "", "사랑", "love", "   "], MatchMode::WholeWord);
        assert_eq!(search.keywords(), ["사랑", "love"]);
    }

    fn conversation() -> Vec<Message> {
        vec![
            Message::new("t", "Alice", "I love you"),
            Message::new("t", "Bob", "사랑해요"),
            Message::new("t", "Alice", "Love love lovely"),
            Message::new("t", "Bob", "나도 사랑"),
        ]
    }

    #[test]
    fn tally_reports_zero_counts() {
        let search = KeywordSearch::new(["love", "사랑", "밥"], MatchMode::WholeWord);
        let tally = search.tally(&conversation());

        assert_eq!(tally.keys().collect::<Vec<_>>(), vec!["Alice", "Bob"]);
        let alice = tally.get("Alice").unwrap();
        assert_eq!(
            alice.iter().collect::<Vec<_>>(),
            vec![("love", &3), ("사랑", &0), ("밥", &0)]
        );
        let bob = tally.get("Bob").unwrap();
        assert_eq!(bob.get("love"), Some(&0));
        assert_eq!(bob.get("사랑"), Some(&1));
    }

    #[test]
    fn empty_keyword_set_gives_empty_tally() {
        let search = KeywordSearch::new(Vec::<String>::new(), MatchMode::WholeWord);
        assert!(search.tally(&conversation()).is_empty());
    }

    #[test]
    fn find_filters_by_sender() {
        let messages = conversation();
        let search = KeywordSearch::new(["사랑"], MatchMode::WholeWord);

        let all = search.find("사랑", &messages, None);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].text, "나도 사랑");

        assert!(search.find("사랑", &messages, Some("Alice")).is_empty());

        let substring = KeywordSearch::new(["사랑"], MatchMode::Substring);
        assert_eq!(substring.find("사랑", &messages, Some("Bob")).len(), 2);
    }

    #[test]
    fn find_keeps_original_order() {
        let messages = conversation();
        let search = KeywordSearch::new(["love"], MatchMode::WholeWord);
        let texts: Vec<_> = search
            .find("LOVE", &messages, None)
            .into_iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(texts, vec!["I love you", "Love love lovely"]);
    }
}
