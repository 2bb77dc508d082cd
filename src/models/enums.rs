use serde::{Deserialize, Serialize};

/// Generates a string-backed enum whose parse is total: any value the
/// server sends that is not listed lands in `Other(raw)` instead of
/// failing the whole response.
macro_rules! open_str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $s,)+
                    Self::Other(raw) => raw.as_str(),
                }
            }

            pub fn parse(raw: &str) -> Self {
                let normalized = raw.trim().to_ascii_lowercase().replace('_', "-");
                match normalized.as_str() {
                    $($s => Self::$variant,)+
                    _ => Self::Other(raw.to_string()),
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, Self::Other(_))
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self::parse(&raw)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

open_str_enum!(QueueStatus {
    Scheduled => "scheduled",
    Waiting => "waiting",
    InProgress => "in-progress",
    Completed => "completed",
    Cancelled => "cancelled",
});

impl QueueStatus {
    /// Still expected to be seen today.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Scheduled | Self::Waiting | Self::InProgress)
    }
}
