use semver::Version;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// First SDK whose Podfile needs the react-imports patch hook.
pub const SDK_44: Version = Version::new(44, 0, 0);

/// First SDK that resolves native modules through an explicit config command.
/// The react-imports hook is obsolete from here on.
pub const SDK_52: Version = Version::new(52, 0, 0);

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("invalid SDK version '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: semver::Error,
    },
}

/// A declared SDK version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SdkVersion(Version);

impl SdkVersion {
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        Version::parse(input.trim())
            .map(SdkVersion)
            .map_err(|source| VersionError::Invalid {
                input: input.to_string(),
                source,
            })
    }

    pub fn as_semver(&self) -> &Version {
        &self.0
    }
}

impl FromStr for SdkVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SdkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Half-open SDK range `[min, below)` a rule is restricted to.
///
/// An unbounded gate applies even when no SDK version is known. A bounded gate never
/// applies without one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionGate {
    pub min: Option<Version>,
    pub below: Option<Version>,
}

impl VersionGate {
    pub const fn always() -> Self {
        Self {
            min: None,
            below: None,
        }
    }

    pub const fn at_least(min: Version) -> Self {
        Self {
            min: Some(min),
            below: None,
        }
    }

    pub const fn between(min: Version, below: Version) -> Self {
        Self {
            min: Some(min),
            below: Some(below),
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.min.is_some() || self.below.is_some()
    }

    pub fn allows(&self, sdk: Option<&SdkVersion>) -> bool {
        if !self.is_bounded() {
            return true;
        }
        let Some(sdk) = sdk else {
            return false;
        };
        let v = sdk.as_semver();
        if let Some(min) = &self.min
            && v < min
        {
            return false;
        }
        if let Some(below) = &self.below
            && v >= below
        {
            return false;
        }
        true
    }
}

impl fmt::Display for VersionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.min, &self.below) {
            (None, None) => f.write_str("any SDK"),
            (Some(min), None) => write!(f, ">= {min}"),
            (None, Some(below)) => write!(f, "< {below}"),
            (Some(min), Some(below)) => write!(f, ">= {min}, < {below}"),
        }
    }
}
