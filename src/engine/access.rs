use crate::model::{Caller, UserRole};

use super::EngineError;

/// Role floor check. A `Guest` floor means no authentication is required;
/// any higher floor needs a present caller whose role clears it.
pub fn require_role(caller: Option<&Caller>, floor: UserRole) -> Result<(), EngineError> {
    if floor == UserRole::Guest {
        return Ok(());
    }
    match caller {
        Some(c) if c.role >= floor => Ok(()),
        _ => Err(EngineError::Forbidden),
    }
}

/// Like [`require_role`], but yields the caller for per-record ownership
/// checks. Only meaningful for floors above `Guest`.
pub fn require_caller<'a>(
    caller: Option<&'a Caller>,
    floor: UserRole,
) -> Result<&'a Caller, EngineError> {
    match caller {
        Some(c) if c.role >= floor => Ok(c),
        _ => Err(EngineError::Forbidden),
    }
}

/// Admins see every record; everyone else only their own.
pub fn ensure_owner(caller: &Caller, created_by: &str) -> Result<(), EngineError> {
    if caller.is_admin() || caller.user_id == created_by {
        Ok(())
    } else {
        Err(EngineError::Forbidden)
    }
}
