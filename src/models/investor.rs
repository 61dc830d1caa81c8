use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Investor classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "investor_type")]
pub enum InvestorType {
    Individual,
    Institution,
    #[serde(rename = "Family Office")]
    #[sqlx(rename = "Family Office")]
    FamilyOffice,
}

impl fmt::Display for InvestorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Individual => write!(f, "Individual"),
            Self::Institution => write!(f, "Institution"),
            Self::FamilyOffice => write!(f, "Family Office"),
        }
    }
}

/// Investor represents an individual or organisation committing capital
/// Maps to `investors` table; `email` is unique
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Investor {
    pub id: Uuid,
    pub name: String,
    pub investor_type: InvestorType,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// New Investor for creation (without generated fields)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvestor {
    pub name: String,
    pub investor_type: InvestorType,
    pub email: String,
}

impl Investor {
    pub fn new(new_investor: NewInvestor) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new_investor.name,
            investor_type: new_investor.investor_type,
            email: new_investor.email,
            created_at: Utc::now(),
        }
    }
}
