use std::fmt;

use crate::rules::{find_fragment, Rules};

const MIN_LEN: usize = 2;
const EXTRA_ALLOWED: &[char] = &['-', '.', '(', ')', '/', '\'', '"', '_', '%'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted(Signals),
    Rejected(Rejection),
}

/// Every admission signal that fired for an accepted name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signals {
    /// A letter plus a digit or hyphen somewhere in the name.
    pub alnum_mixed: bool,
    /// The known-name fragment found in the name.
    pub known_name: Option<String>,
    /// Prefix matched by the first designation pattern that fits.
    pub designation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    TooShort,
    SkipPhrase(String),
    NoLetter,
    DisallowedChar(char),
    NoSignal,
}

impl Signals {
    fn any(&self) -> bool {
        self.alnum_mixed || self.known_name.is_some() || self.designation.is_some()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accepted(s) => {
                let mut parts = Vec::new();
                if s.alnum_mixed {
                    parts.push("alnum-mixed".to_string());
                }
                if let Some(k) = &s.known_name {
                    parts.push(format!("known-name {:?}", k));
                }
                if let Some(d) = &s.designation {
                    parts.push(format!("designation {:?}", d));
                }
                write!(f, "accepted ({})", parts.join(", "))
            }
            Verdict::Rejected(r) => match r {
                Rejection::TooShort => write!(f, "rejected (too short)"),
                Rejection::SkipPhrase(p) => write!(f, "rejected (skip phrase {:?})", p),
                Rejection::NoLetter => write!(f, "rejected (no letter)"),
                Rejection::DisallowedChar(c) => write!(f, "rejected (disallowed char {:?})", c),
                Rejection::NoSignal => write!(f, "rejected (no entity signal)"),
            },
        }
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || EXTRA_ALLOWED.contains(&c)
}

/// Decide whether a link title names a genuine entity.
pub fn classify(name: &str, rules: &Rules) -> Verdict {
    if name.chars().count() < MIN_LEN {
        return Verdict::Rejected(Rejection::TooShort);
    }

    let lower = name.to_lowercase();
    if let Some(phrase) = find_fragment(&rules.skip_phrases, &lower) {
        return Verdict::Rejected(Rejection::SkipPhrase(phrase.to_string()));
    }

    if !name.chars().any(|c| c.is_ascii_alphabetic()) {
        return Verdict::Rejected(Rejection::NoLetter);
    }

    if let Some(c) = name.chars().find(|&c| !is_allowed(c)) {
        return Verdict::Rejected(Rejection::DisallowedChar(c));
    }

    // Any letter plus any digit or hyphen, anywhere. Deliberately broad.
    let alnum_mixed = name.chars().any(|c| c.is_ascii_digit() || c == '-');

    let signals = Signals {
        alnum_mixed,
        known_name: find_fragment(&rules.known_names, &lower).map(str::to_string),
        designation: rules
            .designations
            .iter()
            .find_map(|re| re.find(name))
            .map(|m| m.as_str().to_string()),
    };

    if signals.any() {
        Verdict::Accepted(signals)
    } else {
        Verdict::Rejected(Rejection::NoSignal)
    }
}

/// Boolean view of [`classify`].
#[cfg(test)]
pub fn is_entity(name: &str, rules: &Rules) -> bool {
    matches!(classify(name, rules), Verdict::Accepted(_))
}
