//! Active/inactive state shared by accounts, categories and household members.
//!
//! Both transitions are strict: activating an active entity (or deactivating
//! an inactive one) fails with the entity's own "already" error and leaves the
//! value untouched. Persisting the result is the caller's job.

/// Implements `activate` and `deactivate` for a type with `active: bool` and
/// `updated_at: DateTime<Utc>` fields.
macro_rules! impl_activity {
    ($ty:ty, $already_active:expr, $already_inactive:expr) => {
        impl $ty {
            /// Move from inactive to active.
            pub fn activate(
                &mut self,
                now: chrono::DateTime<chrono::Utc>,
            ) -> Result<(), $crate::DomainError> {
                if self.active {
                    return Err($already_active);
                }
                self.active = true;
                self.updated_at = now;
                Ok(())
            }

            /// Move from active to inactive.
            pub fn deactivate(
                &mut self,
                now: chrono::DateTime<chrono::Utc>,
            ) -> Result<(), $crate::DomainError> {
                if !self.active {
                    return Err($already_inactive);
                }
                self.active = false;
                self.updated_at = now;
                Ok(())
            }
        }
    };
}

pub(crate) use impl_activity;
