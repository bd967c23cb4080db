use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

/// Dotted export format: `2025. 5. 18. 오전 9:26`
pub const DOTTED_PATTERN: &str = r"(?P<year>\d{4})\.\s*(?P<month>\d{1,2})\.\s*(?P<day>\d{1,2})\.\s*(?P<meridiem>오전|오후)\s*(?P<hour>\d{1,2}):(?P<minute>\d{2})";

/// Hangul-unit export format: `2024년 1월 1일 오후 3:30`
pub const HANGUL_UNITS_PATTERN: &str = r"(?P<year>\d{4})년\s*(?P<month>\d{1,2})월\s*(?P<day>\d{1,2})일\s*(?P<meridiem>오전|오후)\s*(?P<hour>\d{1,2}):(?P<minute>\d{2})";

/// Dashed mobile export format: `2025-01-01 오전 9:26`
pub const DASHED_PATTERN: &str = r"(?P<year>\d{4})-(?P<month>\d{1,2})-(?P<day>\d{1,2})\s*(?P<meridiem>오전|오후)\s*(?P<hour>\d{1,2}):(?P<minute>\d{2})";

/// One timestamp format.
///
/// The pattern must define the named groups `year`, `month`, `day`,
/// `meridiem`, `hour` and `minute`. Two regexes are derived from it: one
/// recognizing a whole header line (`<timestamp>, <sender> : <text>`) and one
/// decomposing a bare timestamp string.
#[derive(Debug, Clone)]
pub struct TimestampGrammar {
    name: String,
    header: Regex,
    timestamp: Regex,
}

impl TimestampGrammar {
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        let header = Regex::new(&format!(
            r"^(?P<timestamp>{pattern}),\s*(?P<sender>.+?)\s*:\s*(?P<text>.+)$"
        ))?;
        let timestamp = Regex::new(&format!("^{pattern}$"))?;
        Ok(Self {
            name: name.into(),
            header,
            timestamp,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Raw pieces of a recognized header line, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLine<'a> {
    pub timestamp: &'a str,
    pub sender: &'a str,
    pub text: &'a str,
}

/// Numeric fields of a timestamp, hour already converted to 24-hour form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl TimestampParts {
    /// Zero-padded `YYYY.MM` bucket key.
    pub fn month_key(&self) -> String {
        format!("{:04}.{:02}", self.year, self.month)
    }

    /// `None` for calendar-impossible values such as `2024. 2. 31.`.
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?.and_hms_opt(
            self.hour,
            self.minute,
            0,
        )
    }
}

/// The ordered set of timestamp grammars plus the locale's meridiem markers.
///
/// Grammars are tried in order and the first match wins.
#[derive(Debug, Clone)]
pub struct TranscriptGrammar {
    grammars: Vec<TimestampGrammar>,
    morning: String,
    afternoon: String,
}

impl TranscriptGrammar {
    pub fn new(
        grammars: Vec<TimestampGrammar>,
        morning: impl Into<String>,
        afternoon: impl Into<String>,
    ) -> Self {
        Self {
            grammars,
            morning: morning.into(),
            afternoon: afternoon.into(),
        }
    }

    /// The three KakaoTalk export formats with `오전`/`오후` markers.
    pub fn korean() -> Self {
        let grammars = [
            ("dotted", DOTTED_PATTERN),
            ("hangul_units", HANGUL_UNITS_PATTERN),
            ("dashed", DASHED_PATTERN),
        ]
        .into_iter()
        .map(|(name, pattern)| {
            TimestampGrammar::new(name, pattern).expect("built-in timestamp pattern compiles")
        })
        .collect();
        Self::new(grammars, "오전", "오후")
    }

    pub fn grammars(&self) -> &[TimestampGrammar] {
        &self.grammars
    }

    /// Matches an already-trimmed line against each header grammar in turn.
    pub fn match_header<'a>(&self, line: &'a str) -> Option<HeaderLine<'a>> {
        self.grammars.iter().find_map(|grammar| {
            let caps = grammar.header.captures(line)?;
            Some(HeaderLine {
                timestamp: caps.name("timestamp")?.as_str().trim(),
                sender: caps.name("sender")?.as_str().trim(),
                text: caps.name("text")?.as_str().trim(),
            })
        })
    }

    /// Decomposes a display timestamp into numeric fields.
    ///
    /// Afternoon adds 12 unless the hour is already 12; morning 12 becomes 0.
    /// Returns `None` for anything that does not match a grammar or carries an
    /// out-of-range hour or minute.
    pub fn parse(&self, timestamp: &str) -> Option<TimestampParts> {
        let timestamp = timestamp.trim();
        let caps = self
            .grammars
            .iter()
            .find_map(|grammar| grammar.timestamp.captures(timestamp))?;

        let field = |name: &str| caps.name(name).map(|m| m.as_str());
        let year: i32 = field("year")?.parse().ok()?;
        let month: u32 = field("month")?.parse().ok()?;
        let day: u32 = field("day")?.parse().ok()?;
        let mut hour: u32 = field("hour")?.parse().ok()?;
        let minute: u32 = field("minute")?.parse().ok()?;
        let meridiem = field("meridiem")?;

        if meridiem == self.afternoon {
            if hour != 12 {
                hour += 12;
            }
        } else if meridiem == self.morning {
            if hour == 12 {
                hour = 0;
            }
        } else {
            return None;
        }

        if !(1..=12).contains(&month) || hour > 23 || minute > 59 {
            return None;
        }

        Some(TimestampParts {
            year,
            month,
            day,
            hour,
            minute,
        })
    }

    pub fn parse_datetime(&self, timestamp: &str) -> Option<NaiveDateTime> {
        self.parse(timestamp)?.to_datetime()
    }
}

impl Default for TranscriptGrammar {
    fn default() -> Self {
        Self::korean()
    }
}
