//! Savings domain types.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use kopra_shared::types::{JournalEntryId, MemberId, TenantId};

use super::error::SavingsError;

/// The four statutory savings categories of an Indonesian cooperative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SavingsType {
    /// Principal savings, paid once on joining.
    Pokok,
    /// Mandatory savings, locked until membership ends.
    Wajib,
    /// Special savings.
    Khusus,
    /// Voluntary savings, freely withdrawable.
    Sukarela,
}

impl SavingsType {
    /// All savings types.
    pub const ALL: [Self; 4] = [Self::Pokok, Self::Wajib, Self::Khusus, Self::Sukarela];

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pokok => "pokok",
            Self::Wajib => "wajib",
            Self::Khusus => "khusus",
            Self::Sukarela => "sukarela",
        }
    }
}

impl std::fmt::Display for SavingsType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SavingsType {
    type Err = SavingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pokok" => Ok(Self::Pokok),
            "wajib" => Ok(Self::Wajib),
            "khusus" => Ok(Self::Khusus),
            "sukarela" => Ok(Self::Sukarela),
            other => Err(SavingsError::InvalidSavingsType(other.to_string())),
        }
    }
}

/// Membership status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    /// Member in good standing.
    Active,
    /// Membership temporarily suspended.
    Suspended,
    /// Membership ended.
    Terminated,
}

/// A cooperative member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Unique identifier.
    pub id: MemberId,
    /// Tenant this member belongs to.
    pub tenant_id: TenantId,
    /// Member number assigned by the cooperative.
    pub member_number: String,
    /// Full name.
    pub name: String,
    /// Membership status.
    pub status: MemberStatus,
}

/// Result of an accepted savings movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsReceipt {
    /// The journal entry recording the movement.
    pub movement_id: JournalEntryId,
    /// The member's savings balance for this type after the movement.
    pub new_balance: Decimal,
}
