use crate::excerpt::error::ExcerptError;
use chrono::NaiveDateTime;
use regex::Regex;

pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Detects a timestamp at the start of a line.
///
/// The chrono format is turned into an anchored regex to cut the candidate
/// prefix, which is then parsed with chrono. The Python spelling `.%f` is
/// accepted and read as `%.f`.
#[derive(Debug, Clone)]
pub struct TimestampMatcher {
    format: String,
    prefix: Regex,
}

impl TimestampMatcher {
    pub fn new(format: &str) -> Result<Self, ExcerptError> {
        let format = format.replace(".%f", "%.f");
        let pattern = format!("^{}", format_to_regex(&format)?);
        let prefix = Regex::new(&pattern).map_err(|source| ExcerptError::Format {
            format: format.clone(),
            source,
        })?;

        Ok(Self { format, prefix })
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Timestamp at the start of `line`, if there is a valid one.
    pub fn detect(&self, line: &str) -> Option<NaiveDateTime> {
        let m = self.prefix.find(line)?;
        NaiveDateTime::parse_from_str(m.as_str(), &self.format).ok()
    }

    /// Parses a user supplied window bound.
    pub fn parse_bound(&self, value: &str) -> Result<NaiveDateTime, ExcerptError> {
        NaiveDateTime::parse_from_str(value.trim(), &self.format).map_err(|source| {
            ExcerptError::Bound {
                value: value.to_string(),
                format: self.format.clone(),
                source,
            }
        })
    }
}

fn format_to_regex(format: &str) -> Result<String, ExcerptError> {
    let unsupported = |directive: char| ExcerptError::UnsupportedDirective {
        format: format.to_string(),
        directive,
    };

    let mut out = String::new();
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
            continue;
        }

        let mut directive = chars.next().ok_or_else(|| unsupported('%'))?;

        // %-d, %_d, %0d: padding modifiers
        let unpadded = matches!(directive, '-' | '_');
        if matches!(directive, '-' | '_' | '0') {
            directive = chars.next().ok_or_else(|| unsupported(directive))?;
        }

        let piece = match directive {
            'Y' => r"\d{4}".to_string(),
            'y' | 'm' | 'd' | 'H' | 'I' | 'M' | 'S' if unpadded => r"\s?\d{1,2}".to_string(),
            'y' | 'm' | 'd' | 'H' | 'I' | 'M' | 'S' => r"\d{2}".to_string(),
            'e' => r"[ \d]\d".to_string(),
            'j' => r"\d{3}".to_string(),
            'b' | 'h' | 'a' => r"[A-Za-z]{3}".to_string(),
            'B' | 'A' => r"[A-Za-z]+".to_string(),
            'p' => r"[AaPp][Mm]".to_string(),
            'z' => r"[+-]\d{2}:?\d{2}".to_string(),
            'T' => r"\d{2}:\d{2}:\d{2}".to_string(),
            'F' => r"\d{4}-\d{2}-\d{2}".to_string(),
            'f' => r"\d+".to_string(),
            '%' => "%".to_string(),
            '.' => match chars.next() {
                Some('f') => r"\.\d+".to_string(),
                Some(n @ ('3' | '6' | '9')) if chars.next() == Some('f') => format!(r"\.\d{{{n}}}"),
                _ => return Err(unsupported('.')),
            },
            n @ ('3' | '6' | '9') if chars.next() == Some('f') => format!(r"\d{{{n}}}"),
            other => return Err(unsupported(other)),
        };

        out.push_str(&piece);
    }

    Ok(out)
}
