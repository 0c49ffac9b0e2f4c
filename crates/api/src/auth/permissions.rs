use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::auth::Claims;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    SuperAdmin,
    TurfOwner,
    Staff,
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Role::SuperAdmin),
            "turf_owner" => Ok(Role::TurfOwner),
            "staff" => Ok(Role::Staff),
            other => Err(AppError::Unauthorized(format!("Unknown role: {other}"))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::SuperAdmin => "super_admin",
            Role::TurfOwner => "turf_owner",
            Role::Staff => "staff",
        })
    }
}

/// The authenticated caller, decoded once per handler from the claims the
/// JWT middleware stashed in the extensions.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn from_claims(claims: &Claims) -> Result<Self, AppError> {
        Ok(Self {
            user_id: claims.user_id()?,
            role: claims.role.parse()?,
        })
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    pub fn require_super_admin(&self) -> Result<(), AppError> {
        if self.is_super_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "super_admin role required".to_string(),
            ))
        }
    }

    pub fn require_owner_or_admin(&self) -> Result<(), AppError> {
        match self.role {
            Role::SuperAdmin | Role::TurfOwner => Ok(()),
            Role::Staff => Err(AppError::Forbidden(
                "turf_owner or super_admin role required".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> Actor {
        Actor {
            user_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn role_parsing() {
        assert_eq!("super_admin".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert_eq!("turf_owner".parse::<Role>().unwrap(), Role::TurfOwner);
        assert!("manager".parse::<Role>().is_err());
    }

    #[test]
    fn gates() {
        assert!(actor(Role::SuperAdmin).require_super_admin().is_ok());
        assert!(actor(Role::TurfOwner).require_super_admin().is_err());
        assert!(actor(Role::TurfOwner).require_owner_or_admin().is_ok());
        assert!(actor(Role::Staff).require_owner_or_admin().is_err());
    }
}
