//! Canonical job states and the raw-state alias table.

use crate::error::{AdapterError, ParsingError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

/// Scheduler-independent job status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CanonicalState {
    Undetermined,
    Queued,
    QueuedHeld,
    Running,
    Suspended,
    Requeued,
    RequeuedHeld,
    Done,
    Failed,
}

impl CanonicalState {
    pub const ALL: &'static [CanonicalState] = &[
        Self::Undetermined,
        Self::Queued,
        Self::QueuedHeld,
        Self::Running,
        Self::Suspended,
        Self::Requeued,
        Self::RequeuedHeld,
        Self::Done,
        Self::Failed,
    ];

    /// `Done` and `Failed` are final; every other state may still change.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Undetermined => "UNDETERMINED",
            Self::Queued => "QUEUED",
            Self::QueuedHeld => "QUEUED_HELD",
            Self::Running => "RUNNING",
            Self::Suspended => "SUSPENDED",
            Self::Requeued => "REQUEUED",
            Self::RequeuedHeld => "REQUEUED_HELD",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for CanonicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduler's native job state.
///
/// Implementors are closed enums, one per scheduler. `canonical_state` and
/// `aliases` are written as exhaustive matches so a new variant without a
/// mapping does not compile.
pub trait RawState: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    /// Literal spellings the scheduler uses for this state. The first one is
    /// the long name.
    fn aliases(self) -> &'static [&'static str];

    fn canonical_state(self) -> CanonicalState;

    fn name(self) -> &'static str {
        self.aliases().first().copied().unwrap_or("")
    }
}

/// Declare a raw-state enum together with `VARIANTS`, the list of every
/// variant in declaration order.
///
/// Implement [`RawState::ALL`] as `Self::VARIANTS` so a variant cannot be
/// missing from the alias table.
#[macro_export]
macro_rules! raw_state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$variant_meta])* $variant),+
        }

        impl $name {
            pub const VARIANTS: &'static [$name] = &[$($name::$variant),+];
        }
    };
}

/// Immutable `literal -> variant` lookup, validated once at construction.
#[derive(Debug, Clone)]
pub struct StateTable<S: RawState> {
    by_alias: HashMap<&'static str, S>,
}

impl<S: RawState> StateTable<S> {
    /// Build the table from `S::ALL`.
    ///
    /// Fails if a variant is listed twice, has no alias, or shares an alias
    /// with another variant.
    pub fn new() -> Result<Self, AdapterError> {
        if S::ALL.is_empty() {
            return Err(AdapterError::InvalidStateTable(
                "no raw states declared".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut by_alias = HashMap::new();
        for &state in S::ALL {
            if !seen.insert(state) {
                return Err(AdapterError::InvalidStateTable(format!(
                    "{:?} is declared more than once",
                    state
                )));
            }
            let aliases = state.aliases();
            if aliases.is_empty() || aliases.iter().any(|a| a.trim().is_empty()) {
                return Err(AdapterError::InvalidStateTable(format!(
                    "{:?} has no usable alias",
                    state
                )));
            }
            for &alias in aliases {
                if let Some(previous) = by_alias.insert(alias, state) {
                    if previous != state {
                        return Err(AdapterError::InvalidStateTable(format!(
                            "alias '{}' maps to both {:?} and {:?}",
                            alias, previous, state
                        )));
                    }
                }
            }
        }

        Ok(Self { by_alias })
    }

    /// Resolve a scheduler-emitted literal by exact match.
    pub fn lookup(&self, literal: &str) -> Result<S, ParsingError> {
        self.by_alias
            .get(literal.trim())
            .copied()
            .ok_or_else(|| ParsingError::new(format!("unknown job state '{}'", literal.trim())))
    }

    pub fn canonical(&self, literal: &str) -> Result<CanonicalState, ParsingError> {
        self.lookup(literal).map(RawState::canonical_state)
    }

    pub fn len(&self) -> usize {
        self.by_alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::raw_state_enum! {
        enum Toy {
            /// queued for resources
            Waiting,
            Busy,
        }
    }

    impl RawState for Toy {
        const ALL: &'static [Self] = Self::VARIANTS;

        fn aliases(self) -> &'static [&'static str] {
            match self {
                Toy::Waiting => &["WAITING", "W"],
                Toy::Busy => &["BUSY", "B"],
            }
        }

        fn canonical_state(self) -> CanonicalState {
            match self {
                Toy::Waiting => CanonicalState::Queued,
                Toy::Busy => CanonicalState::Running,
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Clashing {
        One,
        Two,
    }

    impl RawState for Clashing {
        const ALL: &'static [Self] = &[Clashing::One, Clashing::Two];

        fn aliases(self) -> &'static [&'static str] {
            match self {
                Clashing::One => &["ONE", "X"],
                Clashing::Two => &["TWO", "X"],
            }
        }

        fn canonical_state(self) -> CanonicalState {
            CanonicalState::Undetermined
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Repeated {
        Only,
    }

    impl RawState for Repeated {
        const ALL: &'static [Self] = &[Repeated::Only, Repeated::Only];

        fn aliases(self) -> &'static [&'static str] {
            &["ONLY"]
        }

        fn canonical_state(self) -> CanonicalState {
            CanonicalState::Done
        }
    }

    #[test]
    fn test_lookup_by_every_alias() {
        let table = StateTable::<Toy>::new().unwrap();
        assert_eq!(table.lookup("WAITING").unwrap(), Toy::Waiting);
        assert_eq!(table.lookup("W").unwrap(), Toy::Waiting);
        assert_eq!(table.lookup(" B ").unwrap(), Toy::Busy);
        assert_eq!(table.canonical("BUSY").unwrap(), CanonicalState::Running);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_lookup_unknown_literal() {
        let table = StateTable::<Toy>::new().unwrap();
        let err = table.lookup("busy").unwrap_err();
        assert_eq!(err.message(), "unknown job state 'busy'");
    }

    #[test]
    fn test_rejects_clashing_aliases() {
        let err = StateTable::<Clashing>::new().unwrap_err();
        assert!(matches!(err, AdapterError::InvalidStateTable(_)));
    }

    #[test]
    fn test_rejects_repeated_variant() {
        let err = StateTable::<Repeated>::new().unwrap_err();
        assert!(matches!(err, AdapterError::InvalidStateTable(_)));
    }

    #[test]
    fn test_terminal_states() {
        let terminal: Vec<_> = CanonicalState::ALL
            .iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(terminal, vec![&CanonicalState::Done, &CanonicalState::Failed]);
    }

    #[test]
    fn test_declared_variants_are_listed() {
        assert_eq!(Toy::VARIANTS, &[Toy::Waiting, Toy::Busy]);
        assert_eq!(Toy::ALL.len(), 2);
    }

    #[test]
    fn test_name_is_first_alias() {
        assert_eq!(Toy::Busy.name(), "BUSY");
        assert_eq!(CanonicalState::QueuedHeld.to_string(), "QUEUED_HELD");
    }
}
