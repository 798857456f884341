//! Typed dependency registry.
//!
//! A [`Container`] hands out shared collaborators (such as the logger) to
//! application code. The set of valid keys is closed: each key is a marker
//! type implementing [`DependencyKey`] for one schema, so fetching an
//! undeclared dependency does not compile.
//!
//! Each key can be injected once. Overwriting requires an explicit
//! [`Container::replace`], which in turn requires the key to be present.
//!
//! # Examples
//!
//! ```rust
//! use meh_core::dependency_schema;
//! use meh_core::registry::Container;
//!
//! dependency_schema! {
//!     /// Dependencies of the billing service.
//!     pub Billing {
//!         /// Currency code used for invoices.
//!         Currency("currency") => &'static str,
//!     }
//! }
//!
//! let deps = Container::<Billing>::new();
//! deps.inject::<Currency>("EUR").unwrap();
//! assert_eq!(deps.get::<Currency>().unwrap(), "EUR");
//! assert!(deps.inject::<Currency>("USD").is_err());
//! assert_eq!(Billing::KEYS, &["currency"]);
//! ```

mod container;

pub use container::Container;

/// A key of a dependency schema.
///
/// Implemented by zero-sized marker types, normally through
/// [`dependency_schema!`](crate::dependency_schema).
pub trait DependencyKey: 'static {
    /// The schema this key belongs to.
    type Schema: 'static;

    /// Type of the value stored under this key.
    type Value: Clone + Send + Sync + 'static;

    /// Name of the key, used in error messages and logs.
    const NAME: &'static str;
}

/// Declare a dependency schema and its keys.
///
/// Generates an uninhabited schema type with a `KEYS` constant listing the
/// key names, and one marker type per key implementing
/// [`DependencyKey`](crate::registry::DependencyKey).
///
/// # Syntax
///
/// ```ignore
/// dependency_schema! {
///     pub Schema {
///         KeyType("name") => ValueType,
///     }
/// }
/// ```
#[macro_export]
macro_rules! dependency_schema {
    (
        $(#[$meta:meta])*
        $vis:vis $schema:ident {
            $(
                $(#[$key_meta:meta])*
                $key:ident($name:literal) => $value:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        $vis enum $schema {}

        impl $schema {
            /// Names of every key in this schema.
            #[allow(dead_code)]
            pub const KEYS: &'static [&'static str] = &[$($name),*];
        }

        $(
            $(#[$key_meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            $vis struct $key;

            impl $crate::registry::DependencyKey for $key {
                type Schema = $schema;
                type Value = $value;
                const NAME: &'static str = $name;
            }
        )*
    };
}
