//! Ownership guard.
//!
//! Privileged requests name the user they act for (`user_id` in the body or
//! query). Before any storage call, that claimed subject must equal the
//! subject of the verified token. The guard does not look up who actually owns
//! the targeted row.

use crate::auth::extractors::VerifiedIdentity;
use crate::auth::UNAUTHORIZED;
use crate::error::AppError;

/// A request that claims to act on behalf of a particular user.
pub trait SubjectClaim {
    fn claimed_user_id(&self) -> i32;
}

/// Rejects the request unless the claimed subject is the verified one.
pub fn ensure_owner<C>(identity: &VerifiedIdentity, claim: &C) -> Result<(), AppError>
where
    C: SubjectClaim + ?Sized,
{
    let claimed = claim.claimed_user_id();
    if claimed != identity.user_id {
        log::warn!(
            "user {} attempted to act as user {}",
            identity.user_id,
            claimed
        );
        return Err(AppError::Unauthorized(UNAUTHORIZED.into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Claim(i32);

    impl SubjectClaim for Claim {
        fn claimed_user_id(&self) -> i32 {
            self.0
        }
    }

    fn alice() -> VerifiedIdentity {
        VerifiedIdentity {
            user_id: 7,
            username: "alice".to_string(),
        }
    }

    #[test]
    fn test_matching_subject_passes() {
        assert!(ensure_owner(&alice(), &Claim(7)).is_ok());
    }

    #[test]
    fn test_other_subject_is_unauthorized() {
        match ensure_owner(&alice(), &Claim(8)) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, UNAUTHORIZED),
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }
}
