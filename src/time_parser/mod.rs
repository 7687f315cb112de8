//! Timestamp parsing for the date formats podcast feeds actually publish.
//!
//! Layouts are tried in a fixed order and the first one that parses wins, so
//! a string matching two layouts is always read the same way.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc, Weekday};

use crate::errors::{PodcastError, PodcastResult};

/// How a layout carries its timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    /// `-0700` style offset, part of the chrono format.
    Numeric,
    /// Abbreviation such as `GMT` in the last token.
    NamedLast,
    /// Abbreviation just before the trailing year token (Unix `date` output).
    NamedBeforeYear,
    /// No zone at all; read as UTC.
    Absent,
    Rfc3339,
}

/// Whether the layout opens with a weekday name, and how it is punctuated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WeekdayPrefix {
    None,
    Comma,
    Bare,
}

#[derive(Debug, Clone, Copy)]
struct Layout {
    name: &'static str,
    weekday: WeekdayPrefix,
    /// chrono format for what remains once the weekday and named zone are removed.
    format: &'static str,
    zone: Zone,
}

const LAYOUTS: &[Layout] = &[
    Layout { name: "rss-named-zone", weekday: WeekdayPrefix::Comma, format: "%e %b %Y %H:%M:%S", zone: Zone::NamedLast },
    Layout { name: "rss-numeric-zone", weekday: WeekdayPrefix::Comma, format: "%e %b %Y %H:%M:%S %z", zone: Zone::Numeric },
    Layout { name: "ansic", weekday: WeekdayPrefix::Bare, format: "%b %e %H:%M:%S %Y", zone: Zone::Absent },
    Layout { name: "unix-date", weekday: WeekdayPrefix::Bare, format: "%b %e %H:%M:%S %Y", zone: Zone::NamedBeforeYear },
    Layout { name: "ruby-date", weekday: WeekdayPrefix::Bare, format: "%b %d %H:%M:%S %z %Y", zone: Zone::Numeric },
    Layout { name: "rfc822", weekday: WeekdayPrefix::None, format: "%d %b %y %H:%M", zone: Zone::NamedLast },
    Layout { name: "rfc822z", weekday: WeekdayPrefix::None, format: "%d %b %y %H:%M %z", zone: Zone::Numeric },
    Layout { name: "rfc850", weekday: WeekdayPrefix::Comma, format: "%d-%b-%y %H:%M:%S", zone: Zone::NamedLast },
    Layout { name: "rfc1123", weekday: WeekdayPrefix::Comma, format: "%d %b %Y %H:%M:%S", zone: Zone::NamedLast },
    Layout { name: "rfc1123z", weekday: WeekdayPrefix::Comma, format: "%d %b %Y %H:%M:%S %z", zone: Zone::Numeric },
    Layout { name: "rfc3339", weekday: WeekdayPrefix::None, format: "", zone: Zone::Rfc3339 },
    Layout { name: "rss-comma-day", weekday: WeekdayPrefix::Comma, format: "%e, %b %Y %H:%M", zone: Zone::Absent },
    Layout { name: "rss-no-weekday", weekday: WeekdayPrefix::None, format: "%d %b %Y %H:%M:%S", zone: Zone::NamedLast },
];

/// Parse a feed timestamp. The result keeps the offset the string declared;
/// callers convert to UTC.
pub fn parse_time(formatted: &str) -> PodcastResult<DateTime<FixedOffset>> {
    let trimmed = formatted.trim();

    LAYOUTS
        .iter()
        .find_map(|layout| {
            let parsed = layout.parse(trimmed);
            if parsed.is_some() {
                tracing::trace!(layout = layout.name, input = trimmed, "parsed timestamp");
            }
            parsed
        })
        .ok_or_else(|| PodcastError::DateParse(trimmed.to_string()))
}

impl Layout {
    fn parse(&self, input: &str) -> Option<DateTime<FixedOffset>> {
        if self.zone == Zone::Rfc3339 {
            return DateTime::parse_from_rfc3339(input).ok();
        }

        let rest = self.strip_weekday(input)?;
        let mut tokens: Vec<&str> = rest.split_whitespace().collect();

        let named_offset = match self.zone {
            Zone::NamedLast | Zone::NamedBeforeYear => {
                let index = match self.zone {
                    Zone::NamedLast => tokens.len().checked_sub(1)?,
                    _ => tokens.len().checked_sub(2)?,
                };
                let offset = zone_offset(tokens[index])?;
                tokens.remove(index);
                Some(offset)
            }
            _ => None,
        };
        let rest = tokens.join(" ");

        match self.zone {
            Zone::Numeric => DateTime::parse_from_str(&rest, self.format).ok(),
            _ => {
                let naive = NaiveDateTime::parse_from_str(&rest, self.format).ok()?;
                let offset = named_offset.unwrap_or_else(|| Utc.fix());
                offset.from_local_datetime(&naive).single()
            }
        }
    }

    /// Drop a leading weekday name. It is checked for spelling only, never
    /// against the date itself.
    fn strip_weekday<'a>(&self, input: &'a str) -> Option<&'a str> {
        if self.weekday == WeekdayPrefix::None {
            return Some(input);
        }

        let (head, rest) = input.split_once(char::is_whitespace)?;
        let name = match self.weekday {
            WeekdayPrefix::Comma => head.strip_suffix(',')?,
            _ => head,
        };
        name.parse::<Weekday>().ok()?;

        Some(rest.trim_start())
    }
}

/// Offsets for zone abbreviations. The RFC 822 names (and `Z`) carry their real offset;
/// any other all-caps abbreviation is accepted at zero offset.
fn zone_offset(name: &str) -> Option<FixedOffset> {
    let hours = match name {
        "UT" | "UTC" | "GMT" | "Z" => 0,
        "EST" => -5,
        "EDT" => -4,
        "CST" => -6,
        "CDT" => -5,
        "MST" => -7,
        "MDT" => -6,
        "PST" => -8,
        "PDT" => -7,
        other => {
            let len = other.len();
            if (3..=5).contains(&len) && other.chars().all(|c| c.is_ascii_uppercase()) {
                0
            } else {
                return None;
            }
        }
    };
    FixedOffset::east_opt(hours * 3600)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc_of(input: &str) -> String {
        parse_time(input)
            .unwrap_or_else(|e| panic!("{} should parse: {}", input, e))
            .with_timezone(&Utc)
            .to_rfc3339()
    }

    #[test]
    fn test_rss_named_zone() {
        assert_eq!(utc_of("Mon, 02 Jan 2006 15:04:05 GMT"), "2006-01-02T15:04:05+00:00");
        assert_eq!(utc_of("Mon, 02 Jan 2006 15:04:05 MST"), "2006-01-02T22:04:05+00:00");
        assert_eq!(utc_of("Mon,  2 Jan 2006 15:04:05 PDT"), "2006-01-02T22:04:05+00:00");
    }

    #[test]
    fn test_rss_numeric_zone() {
        assert_eq!(utc_of("Mon, 02 Jan 2006 15:04:05 -0700"), "2006-01-02T22:04:05+00:00");
        assert_eq!(utc_of("Mon, 2 Jan 2006 15:04:05 +0100"), "2006-01-02T14:04:05+00:00");
    }

    #[test]
    fn test_ansic_and_unix_date() {
        assert_eq!(utc_of("Mon Jan  2 15:04:05 2006"), "2006-01-02T15:04:05+00:00");
        assert_eq!(utc_of("Mon Jan  2 15:04:05 EST 2006"), "2006-01-02T20:04:05+00:00");
    }

    #[test]
    fn test_ruby_date() {
        assert_eq!(utc_of("Mon Jan 02 15:04:05 -0700 2006"), "2006-01-02T22:04:05+00:00");
    }

    #[test]
    fn test_rfc822_variants() {
        assert_eq!(utc_of("02 Jan 06 15:04 UTC"), "2006-01-02T15:04:00+00:00");
        assert_eq!(utc_of("02 Jan 06 15:04 -0700"), "2006-01-02T22:04:00+00:00");
    }

    #[test]
    fn test_rfc850() {
        assert_eq!(utc_of("Monday, 02-Jan-06 15:04:05 GMT"), "2006-01-02T15:04:05+00:00");
    }

    #[test]
    fn test_rfc3339_with_and_without_fraction() {
        assert_eq!(utc_of("2006-01-02T15:04:05Z"), "2006-01-02T15:04:05+00:00");
        assert_eq!(utc_of("2006-01-02T15:04:05-07:00"), "2006-01-02T22:04:05+00:00");
        let nanos = parse_time("2006-01-02T15:04:05.999999999Z").unwrap();
        assert_eq!(nanos.timestamp_subsec_nanos(), 999_999_999);
    }

    #[test]
    fn test_comma_day_without_zone() {
        assert_eq!(utc_of("Mon, 2, Jan 2006 15:4"), "2006-01-02T15:04:00+00:00");
    }

    #[test]
    fn test_no_weekday_named_zone() {
        assert_eq!(utc_of("02 Jan 2006 15:04:05 GMT"), "2006-01-02T15:04:05+00:00");
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(utc_of("  \n Mon, 02 Jan 2006 15:04:05 GMT \t"), "2006-01-02T15:04:05+00:00");
    }

    #[test]
    fn test_wrong_weekday_is_tolerated() {
        // 2 Jan 2006 was a Monday.
        assert_eq!(utc_of("Fri, 02 Jan 2006 15:04:05 GMT"), "2006-01-02T15:04:05+00:00");
    }

    #[test]
    fn test_military_z_is_utc() {
        assert_eq!(utc_of("Mon, 02 Jan 2006 15:04:05 Z"), "2006-01-02T15:04:05+00:00");
    }

    #[test]
    fn test_unknown_abbreviation_reads_as_zero_offset() {
        assert_eq!(utc_of("Mon, 02 Jan 2006 15:04:05 XYZ"), "2006-01-02T15:04:05+00:00");
    }

    #[test]
    fn test_numeric_token_is_not_a_zone_name() {
        assert!(zone_offset("+0800").is_none());
        assert_eq!(utc_of("Mon, 02 Jan 2006 15:04:05 +0800"), "2006-01-02T07:04:05+00:00");
    }

    #[test]
    fn test_first_matching_layout_wins() {
        let layout = LAYOUTS
            .iter()
            .find(|l| l.parse("Mon, 02 Jan 2006 15:04:05 GMT").is_some())
            .unwrap();
        assert_eq!(layout.name, "rss-named-zone");
    }

    #[test]
    fn test_garbage_is_a_date_parse_error() {
        for input in ["", "yesterday", "2006/01/02", "Mon, 32 Jan 2006 15:04:05 GMT"] {
            match parse_time(input) {
                Err(PodcastError::DateParse(s)) => assert_eq!(s, input.trim()),
                other => panic!("{:?} should not parse, got {:?}", input, other),
            }
        }
    }
}
