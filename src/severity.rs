use serde::Serialize;
use std::fmt;

/// Severity classes the model predicts. Anything outside 1..=3 maps to
/// `Unknown` instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Fatal,
    Severe,
    Slight,
    Unknown,
}

impl Severity {
    pub fn from_class(class: i64) -> Self {
        match class {
            1 => Severity::Fatal,
            2 => Severity::Severe,
            3 => Severity::Slight,
            _ => Severity::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Fatal => "Fatal",
            Severity::Severe => "Severe",
            Severity::Slight => "Slight",
            Severity::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_classes() {
        assert_eq!(Severity::from_class(1).label(), "Fatal");
        assert_eq!(Severity::from_class(2).label(), "Severe");
        assert_eq!(Severity::from_class(3).label(), "Slight");
    }

    #[test]
    fn test_other_classes_are_unknown() {
        for class in [0, 4, -1, i64::MAX] {
            assert_eq!(Severity::from_class(class), Severity::Unknown);
        }
        assert_eq!(Severity::Unknown.to_string(), "Unknown");
    }
}
