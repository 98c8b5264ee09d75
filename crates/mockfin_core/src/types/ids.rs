//! Identifier types for generated and reference entities.
//!
//! Every identifier is an opaque unsigned integer rendered as plain digits.
//! Newtypes keep an asset id from being passed where a user id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates an identifier from its raw value.
            #[inline]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Returns the raw identifier value.
            #[inline]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a generated asset.
    ///
    /// # Examples
    ///
    /// ```
    /// use mockfin_core::types::AssetId;
    ///
    /// let id = AssetId::new(42);
    /// assert_eq!(id.get(), 42);
    /// assert_eq!(id.to_string(), "42");
    /// ```
    AssetId
);
define_id!(
    /// Unique identifier for a generated user.
    UserId
);
define_id!(
    /// Unique identifier for a generated transaction.
    TransactionId
);
define_id!(
    /// Reference to an asset class catalog row.
    AssetClassId
);
define_id!(
    /// Reference to a currency catalog row.
    CurrencyId
);
define_id!(
    /// Reference to a country catalog row.
    CountryId
);
define_id!(
    /// Reference to an investor profile catalog row.
    InvestorProfileId
);
define_id!(
    /// Reference to an activity level catalog row.
    ActivityLevelId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_order_by_raw_value() {
        assert!(UserId::new(2) < UserId::new(10));
        assert_eq!(CurrencyId::from(3), CurrencyId::new(3));
    }
}
