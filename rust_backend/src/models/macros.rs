/// Defines a newtype key wrapper around an integer scalar and generates:
/// - derives (Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)
/// - `Display`
/// - `FromStr` (accepting surrounding whitespace and a trailing `.0`, as exported by
///   spreadsheet-backed sources)
/// - `From<$inner> for $name` and `From<$name> for $inner`
///
/// Usage:
///   define_key_type!(i64, OrderId);
#[macro_export]
macro_rules! define_key_type {
    ($inner:ty, $name:ident) => {
        #[derive(
            Debug,
            Copy,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::write!(f, "{}", self.0)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::TimelineError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                let trimmed = s.trim();
                let digits = trimmed.strip_suffix(".0").unwrap_or(trimmed);
                digits.parse::<$inner>().map($name).map_err(|e| {
                    $crate::error::TimelineError::ParseError(::std::format!(
                        "invalid {} '{}': {}",
                        ::std::stringify!($name),
                        trimmed,
                        e
                    ))
                })
            }
        }

        impl ::std::convert::From<$inner> for $name {
            fn from(v: $inner) -> Self {
                $name(v)
            }
        }

        impl ::std::convert::From<$name> for $inner {
            fn from(v: $name) -> Self {
                v.0
            }
        }

        impl $name {
            pub fn new(value: $inner) -> Self {
                $name(value)
            }

            pub fn value(&self) -> $inner {
                self.0
            }
        }
    };
}
