use chrono::NaiveDateTime;
use regex::Regex;
use std::borrow::Cow;

/// `YYYY-MM-DD HH:MM:SS.mmm` at the very start of every relevant line.
pub const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
pub const LINE_TIMESTAMP_WIDTH: usize = 23;

const ANSI_CSI: &str = r"\x1B\[[0-?]*[ -/]*[@-~]";

// <date> <time>.<frac> <zone> [<thread>]
const THREAD_PREFIX: &str = r"^[\d-]+\s[\d:]+\.\d+\s\w+\s+\[\s*(?P<thread>.*?)\s*\]";

/// A log line stripped of color codes and attributed to a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLine<'a> {
    pub thread: String,
    /// `None` when the leading 23 characters are not a valid timestamp.
    pub timestamp: Option<NaiveDateTime>,
    pub text: Cow<'a, str>,
}

#[derive(Debug, Clone)]
pub struct LineNormalizer {
    ansi: Regex,
    prefix: Regex,
}

impl LineNormalizer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            ansi: Regex::new(ANSI_CSI)?,
            prefix: Regex::new(THREAD_PREFIX)?,
        })
    }

    pub fn strip_ansi<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        self.ansi.replace_all(raw, "")
    }

    /// Returns `None` for lines that cannot be attributed to a thread
    /// (continuations, stack traces, banners).
    pub fn normalize<'a>(&self, raw: &'a str) -> Option<NormalizedLine<'a>> {
        let text = self.strip_ansi(raw);

        let thread = self
            .prefix
            .captures(&text)?
            .name("thread")?
            .as_str()
            .trim()
            .to_string();

        let timestamp = parse_line_timestamp(&text);

        Some(NormalizedLine {
            thread,
            timestamp,
            text,
        })
    }
}

pub fn parse_line_timestamp(text: &str) -> Option<NaiveDateTime> {
    let prefix = text.get(..LINE_TIMESTAMP_WIDTH)?;
    NaiveDateTime::parse_from_str(prefix, LINE_TIMESTAMP_FORMAT).ok()
}
