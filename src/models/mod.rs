use thiserror::Error;

/// Nilai teks dari database atau query string yang tidak dikenal oleh enum.
#[derive(Debug, Error)]
#[error("nilai {kind} tidak dikenal: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

// Enum yang disimpan sebagai TEXT di Postgres.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err($crate::models::UnknownVariant {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::models::UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

pub mod activity;
pub mod attendance;
pub mod audit_log;
pub mod gallery;
pub mod iuran;
pub mod meeting;
pub mod transaction;
pub mod user;
