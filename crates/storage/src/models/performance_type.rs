use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Performance category, derived from how many dancers an entry lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PerformanceType {
    Solo,
    Duet,
    Trio,
    Group,
}

impl PerformanceType {
    /// 1 dancer is a solo, 2 a duet, 3 a trio and anything larger a group.
    /// Returns `None` for an empty participant list.
    pub fn from_participant_count(count: usize) -> Option<Self> {
        match count {
            0 => None,
            1 => Some(Self::Solo),
            2 => Some(Self::Duet),
            3 => Some(Self::Trio),
            _ => Some(Self::Group),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Solo => "Solo",
            Self::Duet => "Duet",
            Self::Trio => "Trio",
            Self::Group => "Group",
        }
    }
}

impl fmt::Display for PerformanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PerformanceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "solo" => Ok(Self::Solo),
            "duet" => Ok(Self::Duet),
            "trio" => Ok(Self::Trio),
            "group" => Ok(Self::Group),
            other => Err(format!("Unknown performance type: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_participant_count() {
        assert_eq!(PerformanceType::from_participant_count(0), None);
        assert_eq!(
            PerformanceType::from_participant_count(1),
            Some(PerformanceType::Solo)
        );
        assert_eq!(
            PerformanceType::from_participant_count(2),
            Some(PerformanceType::Duet)
        );
        assert_eq!(
            PerformanceType::from_participant_count(3),
            Some(PerformanceType::Trio)
        );
        assert_eq!(
            PerformanceType::from_participant_count(4),
            Some(PerformanceType::Group)
        );
        assert_eq!(
            PerformanceType::from_participant_count(25),
            Some(PerformanceType::Group)
        );
    }

    #[test]
    fn test_parsing() {
        assert_eq!("SOLO".parse::<PerformanceType>(), Ok(PerformanceType::Solo));
        assert_eq!(" group ".parse::<PerformanceType>(), Ok(PerformanceType::Group));
        assert!("quartet".parse::<PerformanceType>().is_err());
    }
}
