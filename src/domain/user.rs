//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{USER_TYPE_ADMIN, USER_TYPE_BOAT_OWNER};

/// Account types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Admin,
    BoatOwner,
}

impl UserType {
    /// Check if this type has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserType::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Admin => USER_TYPE_ADMIN,
            UserType::BoatOwner => USER_TYPE_BOAT_OWNER,
        }
    }
}

impl Default for UserType {
    fn default() -> Self {
        UserType::BoatOwner
    }
}

impl From<&str> for UserType {
    fn from(s: &str) -> Self {
        match s {
            USER_TYPE_ADMIN => UserType::Admin,
            _ => UserType::BoatOwner,
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity. The credential lives in its own table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user is an administrator
    pub fn is_admin(&self) -> bool {
        self.user_type.is_admin()
    }
}

/// Data for a user row inserted together with its credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub user_type: UserType,
}

/// Contact details change. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// User email address
    #[schema(example = "captain@example.com")]
    pub email: String,
    /// User display name
    #[schema(example = "Deniz Kaptan")]
    pub name: String,
    /// Contact phone number
    #[schema(example = "+905551112233")]
    pub phone_number: Option<String>,
    /// Account type
    #[schema(example = "boat_owner")]
    pub user_type: String,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            phone_number: user.phone_number,
            user_type: user.user_type.to_string(),
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_type_round_trip() {
        assert_eq!(UserType::from("admin"), UserType::Admin);
        assert_eq!(UserType::from("boat_owner"), UserType::BoatOwner);
        assert_eq!(UserType::from("unknown"), UserType::BoatOwner);
        assert_eq!(UserType::Admin.to_string(), "admin");
    }

    #[test]
    fn test_user_type_serde_matches_storage() {
        let json = serde_json::to_string(&UserType::BoatOwner).unwrap();
        assert_eq!(json, "\"boat_owner\"");
    }
}
