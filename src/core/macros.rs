//! Macros for declaring contract types.

/// Implement [`Contract`](crate::core::Contract) and one of the marker
/// traits for an existing enum.
///
/// The generated `name()` matches every listed variant, whatever its shape,
/// so leaving one out is a compile error.
///
/// # Example
///
/// ```
/// use tarte::contract;
/// use tarte::core::Contract;
///
/// #[derive(Clone, PartialEq, Debug)]
/// pub enum ScreenState {
///     Initial,
///     Loading,
///     Stable { items: Vec<String>, clicks: u32 },
/// }
///
/// #[derive(Clone, Debug)]
/// pub enum ScreenAction {
///     Enter,
///     Click(u64),
/// }
///
/// contract!(state ScreenState { Initial, Loading, Stable });
/// contract!(action ScreenAction { Enter, Click });
///
/// assert_eq!(ScreenAction::Click(3).name(), "Click");
/// ```
#[macro_export]
macro_rules! contract {
    (state $name:ident { $($variant:ident),* $(,)? }) => {
        $crate::contract!(@contract $name { $($variant),* });
        impl $crate::core::State for $name {}
    };
    (action $name:ident { $($variant:ident),* $(,)? }) => {
        $crate::contract!(@contract $name { $($variant),* });
        impl $crate::core::Action for $name {}
    };
    (event $name:ident { $($variant:ident),* $(,)? }) => {
        $crate::contract!(@contract $name { $($variant),* });
        impl $crate::core::Event for $name {}
    };
    (@contract $name:ident { $($variant:ident),* }) => {
        impl $crate::core::Contract for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant { .. } => stringify!($variant)),*
                }
            }
        }
    };
}
