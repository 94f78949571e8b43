use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A subscription plan.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    /// The free tier.
    #[default]
    Free,
    /// Small businesses.
    Basic,
    /// Everything, with priority support.
    Pro,
}

impl Plan {
    /// All plans, in the order they are offered.
    pub const ALL: [Plan; 3] = [Plan::Free, Plan::Basic, Plan::Pro];

    /// The plan pre-selected in the sign-up form.
    pub const RECOMMENDED: Plan = Plan::Pro;

    /// Wire identifier.
    pub fn id(self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Basic => "basic",
            Plan::Pro => "pro",
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Plan::Free => "Free",
            Plan::Basic => "Basic",
            Plan::Pro => "Pro",
        }
    }

    /// Monthly price.
    pub fn price(self) -> &'static str {
        match self {
            Plan::Free => "Rp 0",
            Plan::Basic => "Rp 99,000",
            Plan::Pro => "Rp 299,000",
        }
    }

    /// Feature bullets shown under the price.
    pub fn features(self) -> &'static [&'static str] {
        match self {
            Plan::Free => {
                &["100 requests/month", "1 document", "Email support"]
            }
            Plan::Basic => &[
                "1,000 requests/month",
                "5 documents",
                "Email + Chat support",
            ],
            Plan::Pro => &[
                "10,000 requests/month",
                "Unlimited documents",
                "Priority support",
            ],
        }
    }

    /// Whether the plan is highlighted as the popular choice.
    #[inline]
    pub fn is_popular(self) -> bool {
        self == Plan::RECOMMENDED
    }
}

impl Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Returned when parsing an unknown plan id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownPlanError(String);

impl Display for UnknownPlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown plan `{}`, expected one of: free, basic, pro", self.0)
    }
}

impl std::error::Error for UnknownPlanError {}

impl FromStr for Plan {
    type Err = UnknownPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Plan::ALL
            .into_iter()
            .find(|plan| plan.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPlanError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("pro".parse::<Plan>().unwrap(), Plan::Pro);
        assert_eq!(" Basic ".parse::<Plan>().unwrap(), Plan::Basic);
        assert!("enterprise".parse::<Plan>().is_err());
    }

    #[test]
    fn test_serde_uses_ids() {
        let json = serde_json::to_string(&Plan::Basic).unwrap();
        assert_eq!(json, "\"basic\"");
        let plan: Plan = serde_json::from_str("\"free\"").unwrap();
        assert_eq!(plan, Plan::Free);
    }

    #[test]
    fn test_only_recommended_is_popular() {
        let popular: Vec<_> =
            Plan::ALL.into_iter().filter(|p| p.is_popular()).collect();
        assert_eq!(popular, [Plan::Pro]);
    }
}
