//! Password strength classification.
//!
//! Pure and deterministic. Recomputed on every password edit so the UI can
//! warn before a submission is attempted, and again at submit time so the
//! guard always sees the latest value.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Strength classes a password can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordStrength {
    Weak,
    Strong,
}

impl PasswordStrength {
    pub fn is_strong(&self) -> bool {
        matches!(self, Self::Strong)
    }
}

impl std::fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weak => write!(f, "weak"),
            Self::Strong => write!(f, "strong"),
        }
    }
}

static HAS_UPPER: LazyLock<Regex> = LazyLock::new(|| Regex::new("[A-Z]").expect("valid regex"));
static HAS_LOWER: LazyLock<Regex> = LazyLock::new(|| Regex::new("[a-z]").expect("valid regex"));
static HAS_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").expect("valid regex"));
static HAS_SPECIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[!@#$%^&*(),.?":{}|<>]"#).expect("valid regex"));

/// Classify a password. Strong requires, simultaneously: length >= 8, an
/// uppercase letter, a lowercase letter, a digit, and a character from the
/// fixed special set `!@#$%^&*(),.?":{}|<>`. Any missing class is weak.
pub fn classify(password: &str) -> PasswordStrength {
    let long_enough = password.chars().count() >= 8;
    if long_enough
        && HAS_UPPER.is_match(password)
        && HAS_LOWER.is_match(password)
        && HAS_DIGIT.is_match(password)
        && HAS_SPECIAL.is_match(password)
    {
        PasswordStrength::Strong
    } else {
        PasswordStrength::Weak
    }
}
