//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Declares a UUID-backed identifier with the usual constructors and conversions.
macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_identifier!(
    /// Unique identifier for an inforequest aggregate.
    InforequestId
);

uuid_identifier!(
    /// Unique identifier for a branch within an inforequest.
    BranchId
);

uuid_identifier!(
    /// Unique identifier for a legal action within a branch.
    ActionId
);

uuid_identifier!(
    /// Unique identifier for an inbound or outbound message.
    MessageId
);

uuid_identifier!(
    /// Reference to an applicant held by the identity provider.
    ApplicantId
);

uuid_identifier!(
    /// Reference to an obligee (public authority) held by the identity provider.
    ObligeeId
);

uuid_identifier!(
    /// Opaque reference to a set of attachments in the attachment store.
    AttachmentSetId
);
