//! Actors in the supply chain
//!
//! A holder is any actor that can take custody of a product: a farmer,
//! a retailer, or (implicitly) the terminal consumer when a product
//! exits the chain.

use serde::{Deserialize, Serialize};

/// User identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Farmer,
    Retailer,
    Admin,
}

impl Role {
    /// Parse from the role string carried in auth claims
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "farmer" => Some(Role::Farmer),
            "retailer" => Some(Role::Retailer),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Retailer => "retailer",
            Role::Admin => "admin",
        }
    }
}

/// A registered user
///
/// The API layer resolves the caller's identity to one of these and
/// passes it into core operations. Core code never reads ambient
/// principal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
}
