//! Contract traits for the three closed message families.
//!
//! Every value that flows through a store belongs to one of three closed
//! sets: states, actions and events. The traits here carry no behavior
//! beyond naming a value's variant and comparing variant identity.

use std::fmt::Debug;
use std::mem;

/// Common surface of states, actions and events.
///
/// # Required Traits
///
/// - `Clone`: snapshots are handed to every subscriber
/// - `Debug`: values show up in diagnostics
/// - `Send` + `Sync` + `'static`: values cross task boundaries
///
/// # Example
///
/// ```rust
/// use tarte::core::Contract;
///
/// #[derive(Clone, Debug)]
/// enum Screen {
///     Loading,
///     Ready { items: usize },
/// }
///
/// impl Contract for Screen {
///     fn name(&self) -> &str {
///         match self {
///             Self::Loading => "Loading",
///             Self::Ready { .. } => "Ready",
///         }
///     }
/// }
///
/// assert!(Screen::Ready { items: 1 }.same_variant(&Screen::Ready { items: 9 }));
/// assert!(!Screen::Loading.same_variant(&Screen::Ready { items: 0 }));
/// ```
pub trait Contract: Clone + Debug + Send + Sync + 'static {
    /// Name of the variant, for display and logging.
    fn name(&self) -> &str;

    /// Check whether two values are the same case of the closed set,
    /// ignoring field values.
    ///
    /// The default compares enum discriminants. Non-enum implementors
    /// should override this.
    fn same_variant(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

/// A state machine state.
///
/// States are immutable snapshots. Equality is used to suppress
/// re-publishing a snapshot identical to the current one; variant identity
/// (see [`Contract::same_variant`]) decides whether enter/exit fire.
pub trait State: Contract + PartialEq {}

/// An intent submitted to a store.
pub trait Action: Contract {}

/// A one-shot side effect emitted while reducing. Never replayed.
pub trait Event: Contract {}
