//! Syntactic validation of request parameters.
//!
//! The collaborator layer forwards raw query-string values here before
//! touching the engine. Validators are an explicit enumerated set, one
//! match arm per parameter, so there is no runtime name-to-handler
//! construction anywhere.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{MirrorError, Result};

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+(\.\d+)?$").unwrap());
static LANGUAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z]{2}_[A-Z]{2}$").unwrap());

/// Parameters the collaborator layer may submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    Version,
    Language,
    Page,
    PageSize,
}

impl Param {
    pub fn as_str(self) -> &'static str {
        match self {
            Param::Version => "version",
            Param::Language => "language",
            Param::Page => "page",
            Param::PageSize => "pageSize",
        }
    }

    /// The full, closed mapping of accepted parameter names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "version" => Some(Param::Version),
            "language" | "lang" => Some(Param::Language),
            "page" => Some(Param::Page),
            "pageSize" | "nb" => Some(Param::PageSize),
            _ => None,
        }
    }
}

/// Check one raw parameter value; `Ok(())` means syntactically valid.
///
/// Syntactic only: whether a version or language actually exists
/// upstream is [`VersionCatalog`](crate::versions::VersionCatalog)'s job.
pub fn check(param: Param, value: &str) -> Result<()> {
    let ok = match param {
        Param::Version => VERSION_RE.is_match(value),
        Param::Language => LANGUAGE_RE.is_match(value),
        // Pages are 1-based.
        Param::Page => value.parse::<usize>().is_ok_and(|n| n >= 1),
        // 0 is the documented "show everything" page size.
        Param::PageSize => value.parse::<usize>().is_ok(),
    };
    if ok {
        Ok(())
    } else {
        Err(MirrorError::InvalidParam {
            param: param.as_str().to_string(),
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_syntax() {
        assert!(check(Param::Version, "15.1.1").is_ok());
        assert!(check(Param::Version, "14.24").is_ok());
        assert!(check(Param::Version, "lolpatch_7.20").is_err());
        assert!(check(Param::Version, "").is_err());
    }

    #[test]
    fn test_language_syntax() {
        assert!(check(Param::Language, "fr_FR").is_ok());
        assert!(check(Param::Language, "en_US").is_ok());
        assert!(check(Param::Language, "french").is_err());
        assert!(check(Param::Language, "FR_fr").is_err());
    }

    #[test]
    fn test_page_bounds() {
        assert!(check(Param::Page, "1").is_ok());
        assert!(check(Param::Page, "42").is_ok());
        assert!(check(Param::Page, "0").is_err());
        assert!(check(Param::Page, "-3").is_err());
        assert!(check(Param::Page, "two").is_err());
    }

    #[test]
    fn test_page_size_allows_zero() {
        assert!(check(Param::PageSize, "0").is_ok());
        assert!(check(Param::PageSize, "20").is_ok());
        assert!(check(Param::PageSize, "-1").is_err());
    }

    #[test]
    fn test_param_name_mapping_is_closed() {
        assert_eq!(Param::from_name("version"), Some(Param::Version));
        assert_eq!(Param::from_name("lang"), Some(Param::Language));
        assert_eq!(Param::from_name("nb"), Some(Param::PageSize));
        assert_eq!(Param::from_name("handleVersion"), None);
        assert_eq!(Param::from_name(""), None);
    }
}
