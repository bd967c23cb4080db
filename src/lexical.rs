use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::ordered::OrderedMap;
use crate::stats::Message;

/// Korean particles, pronouns, copula stems, fillers, laughter runs and the
/// export placeholders for photos and emoticons.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    // particles and case markers
    "이", "가", "은", "는", "을", "를", "의", "에", "에서", "에게", "한테", "께", "로", "으로",
    "와", "과", "도", "만", "까지", "부터", "처럼", "보다", "랑", "이랑", "하고",
    // pronouns
    "나", "너", "저", "내", "네", "니", "제", "우리", "너희", "저희", "그", "이거", "그거",
    "저거", "여기", "거기", "저기", "내가", "니가", "너가", "제가", "나는", "너는", "난", "넌",
    // copula and existential stems
    "이다", "있다", "없다", "하다", "있어", "없어", "있어요", "없어요", "했어", "해", "해요",
    "했다", "이야", "야", "예요", "이에요", "거야", "것", "거", "게",
    // fillers, adverbs, interjections
    "그냥", "진짜", "정말", "너무", "완전", "좀", "막", "다", "더", "또", "잘", "안", "못",
    "아", "어", "오", "음", "응", "웅", "넹", "네네", "예", "아니", "근데", "그래서", "그리고",
    "그럼", "그래", "ㅇㅇ", "ㅇㅋ",
    // laughter and crying
    "ㅋ", "ㅋㅋ", "ㅋㅋㅋ", "ㅋㅋㅋㅋ", "ㅎ", "ㅎㅎ", "ㅎㅎㅎ", "ㅠ", "ㅠㅠ", "ㅠㅠㅠ", "ㅜ",
    "ㅜㅜ", "ㅜㅜㅜ",
    // attachment placeholders
    "사진", "이모티콘", "동영상", "photo", "emoticon",
];

/// Jamo whose repetition is onomatopoeia regardless of run length.
pub const DEFAULT_RUN_CHARS: &[char] = &['ㅋ', 'ㅎ', 'ㅠ', 'ㅜ'];

/// Token separators besides whitespace.
pub const TOKEN_PUNCTUATION: &[char] = &[
    ',', '.', '-', '!', '?', '~', '"', '\'', '“', '”', '‘', '’', '…',
];

/// Tokens excluded from frequency ranking.
#[derive(Debug, Clone)]
pub struct Stopwords {
    words: HashSet<String>,
    run_chars: Vec<char>,
}

impl Stopwords {
    pub fn new<I, S>(words: I, run_chars: Vec<char>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
            run_chars,
        }
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, words: I) {
        self.words.extend(words.into_iter().map(|w| w.to_lowercase()));
    }

    /// True for listed words and for runs made only of one onomatopoeia jamo.
    pub fn contains(&self, token: &str) -> bool {
        if self.words.contains(token) {
            return true;
        }
        let mut chars = token.chars();
        match chars.next() {
            Some(first) if self.run_chars.contains(&first) => chars.all(|c| c == first),
            _ => false,
        }
    }
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::new(DEFAULT_STOPWORDS.iter(), DEFAULT_RUN_CHARS.to_vec())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordFrequency {
    pub word: String,
    pub count: usize,
}

/// Settings for the word-frequency ranking.
#[derive(Debug, Clone)]
pub struct LexicalConfig {
    pub top_n: usize,
    /// Also drop tokens that are a single character long.
    pub skip_single_chars: bool,
    pub stopwords: Stopwords,
}

impl Default for LexicalConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            skip_single_chars: false,
            stopwords: Stopwords::default(),
        }
    }
}

/// Splits case-folded text on whitespace and [`TOKEN_PUNCTUATION`].
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() || TOKEN_PUNCTUATION.contains(&c))
        .filter(|token| !token.is_empty())
}

/// Ranks the non-stopword tokens of `texts` by frequency.
///
/// Ties keep the order in which the words were first encountered.
pub fn top_words<'a, I>(texts: I, config: &LexicalConfig) -> Vec<WordFrequency>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: OrderedMap<usize> = OrderedMap::new();
    for text in texts {
        let folded = text.to_lowercase();
        for token in tokenize(&folded) {
            if config.stopwords.contains(token) {
                continue;
            }
            if config.skip_single_chars && token.chars().count() <= 1 {
                continue;
            }
            *counts.get_or_insert_with(token, || 0) += 1;
        }
    }

    let mut ranked: Vec<WordFrequency> = counts
        .iter()
        .map(|(word, &count)| WordFrequency {
            word: word.to_string(),
            count,
        })
        .collect();
    // sort_by is stable, so first-seen order survives among equal counts
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(config.top_n);
    ranked
}

/// [`top_words`] for each sender, in first-seen sender order.
pub fn top_words_by_sender(
    messages: &[Message],
    config: &LexicalConfig,
) -> OrderedMap<Vec<WordFrequency>> {
    let mut texts: OrderedMap<Vec<&str>> = OrderedMap::new();
    for message in messages {
        texts
            .get_or_insert_with(&message.sender, Vec::new)
            .push(message.text.as_str());
    }

    let mut ranked = OrderedMap::new();
    for (sender, sender_texts) in texts.iter() {
        ranked.insert(sender, top_words(sender_texts.iter().copied(), config));
    }
    ranked
}
