use lasso::{Spur, ThreadedRodeo};
use std::sync::OnceLock;

/// Interned fighter/ability name. Copyable, 4 bytes, compares by identity.
pub type IStr = Spur;

/// Names seen in the log are interned once for the lifetime of the process.
static INTERNER: OnceLock<ThreadedRodeo> = OnceLock::new();

fn interner() -> &'static ThreadedRodeo {
    INTERNER.get_or_init(ThreadedRodeo::default)
}

/// Intern a name, returning its key.
pub fn intern(s: &str) -> IStr {
    interner().get_or_intern(s)
}

/// Resolve an interned key back to the name.
pub fn resolve(key: IStr) -> &'static str {
    interner().resolve(&key)
}
