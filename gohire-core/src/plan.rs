//! Premium subscription plans

use serde::{Deserialize, Serialize};

/// A premium subscription plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Monthly,
    Annual,
}

impl Plan {
    /// Wire name accepted from clients ("monthly" / "annual").
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Monthly => "monthly",
            Plan::Annual => "annual",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "monthly" => Some(Plan::Monthly),
            "annual" => Some(Plan::Annual),
            _ => None,
        }
    }

    /// Catalogue name recorded on receipts.
    pub fn display_name(&self) -> &'static str {
        match self {
            Plan::Monthly => "Monthly Premium Plan",
            Plan::Annual => "Annual Premium Plan",
        }
    }
}
