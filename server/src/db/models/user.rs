//! User Model

use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Account roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Sales,
    Accountant,
    Supplier,
    Customer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Admin => "admin",
            Role::Sales => "sales",
            Role::Accountant => "accountant",
            Role::Supplier => "supplier",
            Role::Customer => "customer",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "sales" => Ok(Role::Sales),
            "accountant" => Ok(Role::Accountant),
            "supplier" => Ok(Role::Supplier),
            "customer" => Ok(Role::Customer),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
}

/// Virtual bank account issued by the payment provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualAccount {
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
    pub provider_ref: String,
}

/// User entity
///
/// `ledger_balance` accumulates what the customer owes for orders placed
/// without full upfront payment; `lifetime_value` accumulates alongside it.
/// Users are never hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    /// Absent for social-login accounts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    pub role: Role,
    pub status: AccountStatus,
    pub is_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_token_expires_at: Option<bson::DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token_expires_at: Option<bson::DateTime>,
    #[serde(default)]
    pub ledger_balance: f64,
    #[serde(default)]
    pub lifetime_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_account: Option<VirtualAccount>,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl User {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let Some(hash) = &self.password_hash else {
            return Ok(false);
        };
        let parsed_hash = PasswordHash::new(hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    /// Public view without credential and token fields
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id.map(|i| i.to_hex()).unwrap_or_default(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            status: self.status,
            is_verified: self.is_verified,
            ledger_balance: self.ledger_balance,
            lifetime_value: self.lifetime_value,
            avatar: self.avatar.clone(),
            virtual_account: self.virtual_account.clone(),
        }
    }
}

/// User view returned by the API (no credential or token fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
    pub is_verified: bool,
    pub ledger_balance: f64,
    pub lifetime_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_account: Option<VirtualAccount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(hash: Option<String>) -> User {
        User {
            id: None,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: hash,
            role: Role::Customer,
            status: AccountStatus::Active,
            is_verified: true,
            verify_token: None,
            verify_token_expires_at: None,
            reset_token: None,
            reset_token_expires_at: None,
            ledger_balance: 0.0,
            lifetime_value: 0.0,
            avatar: None,
            virtual_account: None,
            created_at: bson::DateTime::now(),
            updated_at: bson::DateTime::now(),
        }
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = User::hash_password("hunter2!").expect("hash");
        let user = sample_user(Some(hash));
        assert!(user.verify_password("hunter2!").expect("verify"));
        assert!(!user.verify_password("wrong").expect("verify"));
    }

    #[test]
    fn test_social_account_never_verifies_password() {
        let user = sample_user(None);
        assert!(!user.verify_password("anything").expect("verify"));
    }

    #[test]
    fn test_role_parse_display_roundtrip() {
        for role in [
            Role::Admin,
            Role::Sales,
            Role::Accountant,
            Role::Supplier,
            Role::Customer,
        ] {
            let parsed: Role = role.to_string().parse().expect("parse");
            assert_eq!(parsed, role);
        }
        assert!("manager".parse::<Role>().is_err());
    }
}
