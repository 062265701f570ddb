use std::collections::BTreeSet;

use crate::{authorize::jwt::Claims, error::AuthError};

/// What a route demands from the `permissions` claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionRequirement {
    Single(String),
    /// Satisfied by any one of the set.
    AnyOf(BTreeSet<String>),
}

impl PermissionRequirement {
    pub fn single(permission: impl Into<String>) -> Self {
        Self::Single(permission.into())
    }

    pub fn any_of<I, T>(permissions: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::AnyOf(permissions.into_iter().map(Into::into).collect())
    }

    pub fn is_satisfied_by<T: AsRef<str>>(&self, granted: &[T]) -> bool {
        match self {
            PermissionRequirement::Single(permission) => {
                granted.iter().any(|g| g.as_ref() == permission)
            }
            PermissionRequirement::AnyOf(permissions) => {
                granted.iter().any(|g| permissions.contains(g.as_ref()))
            }
        }
    }

    /// An absent or empty `permissions` claim is refused before the requirement is consulted.
    #[tracing::instrument(skip(claims))]
    pub fn authorize(&self, claims: &Claims) -> Result<(), AuthError> {
        let granted = match claims.permissions.as_deref() {
            Some(granted) if !granted.is_empty() => granted,
            _ => return Err(AuthError::NoPermissionsClaim),
        };

        if self.is_satisfied_by(granted) {
            return Ok(());
        }

        Err(AuthError::PermissionDenied)
    }
}

impl From<&str> for PermissionRequirement {
    fn from(permission: &str) -> Self {
        Self::single(permission)
    }
}

#[cfg(test)]
mod tests {
    use crate::authorize::jwt::Audience;

    use super::*;

    fn claims(permissions: Option<&[&str]>) -> Claims {
        Claims {
            iss: String::from("https://coffee.eu.auth0.com/"),
            sub: None,
            aud: Audience::Single(String::from("coffee")),
            exp: u64::MAX,
            iat: None,
            permissions: permissions.map(|p| p.iter().map(|p| p.to_string()).collect()),
        }
    }

    #[test]
    fn single_permission() {
        let requirement = PermissionRequirement::single("post:drinks");

        assert_eq!(
            requirement.authorize(&claims(Some(&["get:drinks-detail", "post:drinks"]))),
            Ok(())
        );
        assert_eq!(
            requirement.authorize(&claims(Some(&["get:drinks-detail"]))),
            Err(AuthError::PermissionDenied)
        );
    }

    #[test]
    fn any_of_permissions() {
        let requirement = PermissionRequirement::any_of(["post:baristas", "post:managers"]);

        assert_eq!(requirement.authorize(&claims(Some(&["post:managers"]))), Ok(()));
        assert_eq!(requirement.authorize(&claims(Some(&["post:baristas"]))), Ok(()));
        assert_eq!(
            requirement.authorize(&claims(Some(&["patch:drinks"]))),
            Err(AuthError::PermissionDenied)
        );
    }

    #[test]
    fn empty_any_of_is_never_satisfied() {
        let requirement = PermissionRequirement::any_of(Vec::<String>::new());

        assert_eq!(
            requirement.authorize(&claims(Some(&["post:drinks"]))),
            Err(AuthError::PermissionDenied)
        );
    }

    #[test]
    fn missing_or_empty_permissions_claim() {
        let requirement = PermissionRequirement::from("post:drinks");

        assert_eq!(
            requirement.authorize(&claims(None)),
            Err(AuthError::NoPermissionsClaim)
        );
        assert_eq!(
            requirement.authorize(&claims(Some(&[]))),
            Err(AuthError::NoPermissionsClaim)
        );
    }

    #[test]
    fn permissions_match_exactly() {
        let requirement = PermissionRequirement::single("post:drinks");

        assert!(!requirement.is_satisfied_by(&["post:drinks-detail", "POST:DRINKS"]));
    }
}
