//! Integer ids for backend entities.
//!
//! Each entity gets its own wrapper so a product id cannot be passed where an
//! order id is expected. All of them serialize as bare JSON numbers.

/// Declare an `i64` id wrapper.
///
/// The generated type is `Copy`, ordered, hashable and `serde`-transparent,
/// converts to and from `i64`, and parses from text (surrounding whitespace
/// is ignored).
///
/// ```rust
/// # use webshop_core::define_id;
/// define_id!(CouponId);
///
/// let id: CouponId = " 12 ".parse().unwrap();
/// assert_eq!(id.as_i64(), 12);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw id.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(ProductId);
define_id!(OrderId);
define_id!(CategoryId);
define_id!(BrandId);
