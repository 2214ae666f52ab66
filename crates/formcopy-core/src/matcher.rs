//! Field-name matching under bracket decorations.
//!
//! Some authoring tools wrap field names in array markers, so the same logical
//! field may appear as `Name`, `[Name]`, `Name]` or `[Name`. Those four forms
//! are the only ones treated as equal; comparison is otherwise exact.

/// The accepted wrappings of a canonical field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
    /// `name`
    Bare,
    /// `[name]`
    Wrapped,
    /// `name]`
    TrailingOnly,
    /// `[name`
    LeadingOnly,
}

impl Decoration {
    /// Lookup order used when several variants could be present.
    pub const ALL: [Decoration; 4] = [
        Decoration::Bare,
        Decoration::Wrapped,
        Decoration::TrailingOnly,
        Decoration::LeadingOnly,
    ];

    /// Render `name` with this decoration.
    pub fn apply(self, name: &str) -> String {
        match self {
            Decoration::Bare => name.to_string(),
            Decoration::Wrapped => format!("[{name}]"),
            Decoration::TrailingOnly => format!("{name}]"),
            Decoration::LeadingOnly => format!("[{name}"),
        }
    }
}

/// Which decoration makes `candidate` equal to `requested`, if any.
pub fn decoration(requested: &str, candidate: &str) -> Option<Decoration> {
    if candidate == requested {
        return Some(Decoration::Bare);
    }

    let leading = candidate.strip_prefix('[');
    let trailing = candidate.strip_suffix(']');

    if leading.and_then(|s| s.strip_suffix(']')) == Some(requested) {
        Some(Decoration::Wrapped)
    } else if trailing == Some(requested) {
        Some(Decoration::TrailingOnly)
    } else if leading == Some(requested) {
        Some(Decoration::LeadingOnly)
    } else {
        None
    }
}

/// Whether `candidate` names the same field as `requested`.
pub fn matches(requested: &str, candidate: &str) -> bool {
    decoration(requested, candidate).is_some()
}

/// Strip one decoration from an extracted name.
///
/// Returns `None` when nothing is left once the brackets are removed.
pub fn normalize(name: &str) -> Option<&str> {
    let canonical = match (name.strip_prefix('['), name.strip_suffix(']')) {
        (Some(rest), Some(_)) => rest.strip_suffix(']').unwrap_or(rest),
        (Some(rest), None) => rest,
        (None, Some(rest)) => rest,
        (None, None) => name,
    };

    if canonical.is_empty() {
        None
    } else {
        Some(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_variants_match() {
        assert_eq!(decoration("Name", "Name"), Some(Decoration::Bare));
        assert_eq!(decoration("Name", "[Name]"), Some(Decoration::Wrapped));
        assert_eq!(decoration("Name", "Name]"), Some(Decoration::TrailingOnly));
        assert_eq!(decoration("Name", "[Name"), Some(Decoration::LeadingOnly));
    }

    #[test]
    fn test_other_variants_rejected() {
        assert!(!matches("Name", "[[Name]]"));
        assert!(!matches("Name", "Name]]"));
        assert!(!matches("Name", "(Name)"));
        assert!(!matches("Name", " Name"));
        assert!(!matches("Name", "name"));
        assert!(!matches("Name", "[Name] "));
        assert!(!matches("Name", "Names"));
    }

    #[test]
    fn test_apply_matches_itself() {
        for decoration_kind in Decoration::ALL {
            let decorated = decoration_kind.apply("DateOfBirth");
            assert_eq!(decoration("DateOfBirth", &decorated), Some(decoration_kind));
        }
    }

    #[test]
    fn test_bracketed_canonical_name() {
        // A canonical name that itself ends in a bracket still matches bare.
        assert!(matches("Row]", "Row]"));
        assert!(matches("Row]", "[Row]]"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Name"), Some("Name"));
        assert_eq!(normalize("[Name]"), Some("Name"));
        assert_eq!(normalize("Name]"), Some("Name"));
        assert_eq!(normalize("[Name"), Some("Name"));
        assert_eq!(normalize("[]"), None);
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("["), None);
    }
}
