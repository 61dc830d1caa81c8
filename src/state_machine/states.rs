use serde::{Deserialize, Serialize};
use std::fmt;

/// Fund lifecycle states
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "fund_status")]
pub enum FundStatus {
    /// Initial state; the fund is raising capital
    #[default]
    Fundraising,
    /// Capital is being deployed
    Investing,
    /// Terminal; no new investments accepted
    Closed,
}

impl FundStatus {
    pub const ALL: [FundStatus; 3] = [Self::Fundraising, Self::Investing, Self::Closed];

    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Whether investments may still be recorded against the fund
    pub fn accepts_investments(&self) -> bool {
        !self.is_terminal()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fundraising => "Fundraising",
            Self::Investing => "Investing",
            Self::Closed => "Closed",
        }
    }
}

impl fmt::Display for FundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FundStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fundraising" => Ok(Self::Fundraising),
            "Investing" => Ok(Self::Investing),
            "Closed" => Ok(Self::Closed),
            _ => Err(format!("Invalid fund status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fund_status_display_and_parse() {
        for status in FundStatus::ALL {
            assert_eq!(status.to_string().parse::<FundStatus>(), Ok(status));
        }
        assert!("closed".parse::<FundStatus>().is_err());
    }

    #[test]
    fn test_terminal_state() {
        assert!(FundStatus::Closed.is_terminal());
        assert!(!FundStatus::Investing.is_terminal());
        assert!(FundStatus::Fundraising.accepts_investments());
        assert!(!FundStatus::Closed.accepts_investments());
    }

    #[test]
    fn test_serde_uses_display_names() {
        assert_eq!(
            serde_json::to_string(&FundStatus::Fundraising).unwrap(),
            "\"Fundraising\""
        );
        let parsed: FundStatus = serde_json::from_str("\"Investing\"").unwrap();
        assert_eq!(parsed, FundStatus::Investing);
    }
}
