//! Locates and retrieves GitHub Actions artifacts for the most recent commit that has one.

pub mod api;
pub mod env;
pub mod error;
pub mod framework;
pub mod transactions;
pub mod workflow;

pub use error::{Error, OperationalError, Result};

#[cfg(test)]
pub(crate) mod testing;

/// A shorthand to define a statically allocated variable using a [`std::sync::LazyLock`].
///
/// # Examples
///
/// ```rust
/// use latest_artifact::static_lazy_lock;
///
/// static_lazy_lock! {
///     pub VAR_1: String = String::from("a static variable");
/// }
/// // ...equals to...
/// pub static VAR_2: std::sync::LazyLock<String> =
///     std::sync::LazyLock::new(|| String::from("a static variable"));
/// ```
#[macro_export]
macro_rules! static_lazy_lock {
    ($(#[$meta:meta])* $vis:vis $name:ident: $type:ty = $expr:expr $(;)?) => {
        $(#[$meta])*
        $vis static $name: $crate::__priv_macro_use::LazyLock<$type> =
            $crate::__priv_macro_use::LazyLock::new(|| $expr);
    };
}

#[doc(hidden)]
pub mod __priv_macro_use {
    pub use std::sync::LazyLock;
}
