//! Train number extraction from free-text queries.

use std::fmt;

/// Longest digit run accepted when a train number is glued to letters.
const MAX_GLUED_DIGITS: usize = 4;

/// A public train number (a trip's short display name), e.g. "1234".
///
/// Riders type train numbers in several shapes: bare ("1234"), with the
/// operator prefix ("amt1234", "AMT 1234"), or glued to a route name
/// ("Cardinal51"). `TrainNumber::extract` recognises these and returns the
/// digits; anything else yields `None` rather than an error, since most
/// queries are simply not train numbers.
///
/// # Examples
///
/// ```
/// use transit_index::domain::TrainNumber;
///
/// assert_eq!(TrainNumber::extract("amt1234").unwrap().as_str(), "1234");
/// assert_eq!(TrainNumber::extract("1234").unwrap().as_str(), "1234");
/// assert_eq!(TrainNumber::extract("Cardinal51").unwrap().as_str(), "51");
///
/// assert!(TrainNumber::extract("Union Station").is_none());
/// assert!(TrainNumber::extract("Route 12345").is_none());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TrainNumber(String);

impl TrainNumber {
    /// Derive a train number from a raw query.
    ///
    /// Heuristics are tried in order:
    /// 1. a leading "amt" prefix (any case) followed by digits;
    /// 2. the whole query is digits;
    /// 3. a trailing run of 1-4 digits directly preceded by a letter.
    pub fn extract(query: &str) -> Option<Self> {
        let query = query.trim();

        if query.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("amt")) {
            let rest = query[3..].trim();
            if is_all_digits(rest) {
                return Some(Self(rest.to_string()));
            }
        }

        if is_all_digits(query) {
            return Some(Self(query.to_string()));
        }

        let digits_start = query
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit())
            .last()
            .map(|(i, _)| i)?;
        let digits = &query[digits_start..];
        if digits.len() > MAX_GLUED_DIGITS {
            return None;
        }
        let preceded_by_letter = query[..digits_start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphabetic());
        if preceded_by_letter {
            Some(Self(digits.to_string()))
        } else {
            None
        }
    }

    /// Returns the digits as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `trip_id` ends in this number as its final segment,
    /// e.g. "AMTK_2024_1234" for train 1234.
    pub fn is_suffix_of_trip_id(&self, trip_id: &str) -> bool {
        trip_id
            .rsplit(|c: char| !c.is_ascii_alphanumeric())
            .next()
            .is_some_and(|last| last == self.0)
    }
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Debug for TrainNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrainNumber({})", self.0)
    }
}

impl fmt::Display for TrainNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
