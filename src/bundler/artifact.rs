//! Build variants and artifact references.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use super::error::Error;

/// File extension of a directly installable package.
pub const INSTALLABLE_EXTENSION: &str = "apk";

/// File extension of a distributable bundle.
pub const BUNDLE_EXTENSION: &str = "aab";

/// Native build variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildVariant {
    /// Debug build, delivered unsigned
    Debug,
    /// Production build, always signed before delivery
    Release,
}

impl BuildVariant {
    /// Output folder name used by the native build tool.
    pub fn dir_name(self) -> &'static str {
        match self {
            BuildVariant::Debug => "debug",
            BuildVariant::Release => "release",
        }
    }

    /// Whether artifacts of this variant pass through signing.
    pub fn requires_signing(self) -> bool {
        matches!(self, BuildVariant::Release)
    }
}

impl fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for BuildVariant {
    type Err = Error;

    /// Accepts `debug`/`release`, their initials, and the `1`/`2` menu keys.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "debug" | "d" | "1" => Ok(BuildVariant::Debug),
            "release" | "r" | "production" | "prod" | "2" => Ok(BuildVariant::Release),
            _ => Err(Error::InvalidVariant {
                input: input.trim().to_string(),
            }),
        }
    }
}

/// What a located file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// `.apk`, installable as-is
    InstallablePackage,
    /// `.aab`, must be converted before install
    DistributableBundle,
}

impl ArtifactKind {
    /// File extension for this kind.
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::InstallablePackage => INSTALLABLE_EXTENSION,
            ArtifactKind::DistributableBundle => BUNDLE_EXTENSION,
        }
    }

    /// Output directory segment used by the native build tool.
    pub fn output_segment(self) -> &'static str {
        match self {
            ArtifactKind::InstallablePackage => "apk",
            ArtifactKind::DistributableBundle => "bundle",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::InstallablePackage => f.write_str("installable package"),
            ArtifactKind::DistributableBundle => f.write_str("distributable bundle"),
        }
    }
}

/// A located or produced artifact.
///
/// The kind is fixed when the artifact is located and never re-derived from
/// the file name afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    path: PathBuf,
    kind: ArtifactKind,
    variant: BuildVariant,
}

impl ArtifactRef {
    /// Creates an artifact reference.
    pub fn new(path: impl Into<PathBuf>, kind: ArtifactKind, variant: BuildVariant) -> Self {
        Self {
            path: path.into(),
            kind,
            variant,
        }
    }

    /// Path on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Artifact kind.
    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Variant that produced it.
    pub fn variant(&self) -> BuildVariant {
        self.variant
    }

    /// Directory containing the artifact.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Path of the signed, aligned package derived from this artifact,
    /// placed in `dir`.
    ///
    /// A trailing `-unsigned` is dropped from the stem. The alignment tool
    /// cannot rewrite in place, so a collision with the input path gets an
    /// `-aligned` suffix.
    pub fn terminal_path(&self, dir: &Path) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "app".to_string());
        let stem = stem.strip_suffix("-unsigned").unwrap_or(&stem).to_string();

        let candidate = dir.join(format!("{}.{}", stem, INSTALLABLE_EXTENSION));
        if candidate == self.path {
            dir.join(format!("{}-aligned.{}", stem, INSTALLABLE_EXTENSION))
        } else {
            candidate
        }
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.variant, self.kind, self.path.display())
    }
}
