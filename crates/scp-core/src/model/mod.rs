// ── Domain model ──
//
// Canonical types the collectors map into samples. Built fresh from each
// API response and dropped at the end of the scrape.

/// Declare a closed wire enumeration with an `Unknown` fallback that keeps
/// the raw string, so unexpected values still surface verbatim in labels.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
            Unknown(String),
        }

        impl $name {
            /// The value exactly as it appears on the wire.
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $wire, )+
                    Self::Unknown(raw) => raw.as_str(),
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                match raw {
                    $( $wire => Self::$variant, )+
                    other => Self::Unknown(other.to_owned()),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod legacy;
pub mod maintenance;
pub mod server;
pub mod task;

pub use legacy::{LegacyDisk, LegacyInterface, MonthlyTraffic, VServer};
pub use maintenance::MaintenanceWindow;
pub use server::{
    Architecture, Disk, Interface, Server, ServerListEntry, ServerLiveInfo, ServerState,
    StorageOptimization,
};
pub use task::{Task, TaskState};
