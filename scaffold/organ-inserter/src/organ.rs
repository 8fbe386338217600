//! Organ names from file names.

use std::fmt;
use std::path::Path;

use scaffold_io::file_basename;

/// The organ an input file represents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrganName {
    /// A known organ keyword found in the file's basename.
    Keyword(String),
    /// No keyword matched; the whole basename.
    Basename(String),
}

impl OrganName {
    /// The name used for the organ's group.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Keyword(name) | Self::Basename(name) => name,
        }
    }

    /// True if a keyword matched.
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(self, Self::Keyword(_))
    }
}

impl fmt::Display for OrganName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name the organ in a file.
///
/// The basename (file name up to its first `.`) is searched
/// case-insensitively for each keyword in order; the first keyword it
/// contains is the organ name. Otherwise the basename itself is.
///
/// # Example
///
/// ```
/// use organ_inserter::{organ_name_from_path, OrganName};
///
/// let keywords = ["lung", "heart"];
/// assert_eq!(
///     organ_name_from_path("data/Heart_v2.exf", &keywords),
///     OrganName::Keyword("heart".to_string())
/// );
/// assert_eq!(
///     organ_name_from_path("data/colon.part.exf", &keywords),
///     OrganName::Basename("colon".to_string())
/// );
/// ```
#[must_use]
pub fn organ_name_from_path<P, S>(path: P, keywords: &[S]) -> OrganName
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let basename = file_basename(path);
    let lower = basename.to_lowercase();
    keywords
        .iter()
        .map(AsRef::as_ref)
        .find(|k| !k.is_empty() && lower.contains(&k.to_lowercase()))
        .map_or(OrganName::Basename(basename.clone()), |k| {
            OrganName::Keyword(k.to_string())
        })
}
