//! Record and field security
//!
//! - lock trees over records (`Lock`, `RecordSecurityLock`,
//!   `MultiRecordSecurityLock`) and their read/write projections
//! - per-session null-value behavior overrides
//! - field-level visibility locks
//! - evaluation of lock trees, directly or as query filters
//!
//! Every check takes the caller's `Session` explicitly.

mod errors;
mod field_lock;
mod key_type;
mod lock;
mod lock_filters;
mod null_behavior;
mod record_access;
mod session;

pub use errors::{SecurityError, SecurityResult};
pub use field_lock::{apply_field_locks, FieldSecurityBehavior, FieldSecurityLock};
pub use key_type::{SecurityKeyType, SecurityKeyTypeLookup};
pub use lock::{AccessMode, Lock, LockScope, MultiRecordSecurityLock, NullValueBehavior, RecordSecurityLock};
pub use lock_filters::RecordSecurityLockFilters;
pub use null_behavior::NullValueBehaviorResolver;
pub use record_access::RecordAccessEvaluator;
pub use session::Session;
