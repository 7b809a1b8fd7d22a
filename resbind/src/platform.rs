//! Target platforms that realise resource contracts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Platform family of a realisation source set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Android resource tables (`R` class).
    Android,
    /// Apple bundles (`NSBundle`).
    Apple,
    /// JVM class-loader resources.
    Jvm,
    /// JavaScript bundles.
    Js,
}

impl Platform {
    /// Every supported platform, in registry order.
    pub const ALL: [Self; 4] = [Self::Android, Self::Apple, Self::Jvm, Self::Js];

    /// Returns the lowercase identifier used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Apple => "apple",
            Self::Jvm => "jvm",
            Self::Js => "js",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown platform name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform '{0}'; expected one of android, apple, jvm, js")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|platform| platform.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownPlatform(value.to_owned()))
    }
}
