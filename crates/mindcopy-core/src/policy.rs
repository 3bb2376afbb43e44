//! Named error policies, one per fallible operation.
//!
//! | Operation | Policy | Effect |
//! |-----------|--------|--------|
//! | state read | `TreatAsEmpty` | unreadable or unparsable slot loads as an empty document |
//! | state write | `Propagate` | error returned to the caller, view left as it was |
//! | import parse | `ReportToUser` | alert shown, state untouched |
//! | auxiliary document fetch | `LeaveLastRendered` | panel keeps its last content |
//! | cache install | `KeepPriorCache` | worker goes redundant, older caches keep serving |
//!
//! Nothing is retried.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    TreatAsEmpty,
    Propagate,
    ReportToUser,
    LeaveLastRendered,
    KeepPriorCache,
}

pub const STATE_READ: ErrorPolicy = ErrorPolicy::TreatAsEmpty;
pub const STATE_WRITE: ErrorPolicy = ErrorPolicy::Propagate;
pub const IMPORT_PARSE: ErrorPolicy = ErrorPolicy::ReportToUser;
pub const AUX_DOC_FETCH: ErrorPolicy = ErrorPolicy::LeaveLastRendered;
pub const CACHE_INSTALL: ErrorPolicy = ErrorPolicy::KeepPriorCache;

impl ErrorPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorPolicy::TreatAsEmpty => "treat_as_empty",
            ErrorPolicy::Propagate => "propagate",
            ErrorPolicy::ReportToUser => "report_to_user",
            ErrorPolicy::LeaveLastRendered => "leave_last_rendered",
            ErrorPolicy::KeepPriorCache => "keep_prior_cache",
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
