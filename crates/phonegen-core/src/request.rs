//! Generation requests and their validation.

use std::collections::BTreeSet;

use crate::generator::GenError;
use crate::prefix::PrefixSelector;

/// A request for `target` unique numbers from the selected groups.
///
/// An empty group set means "all prefixes".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub target: usize,
    pub groups: BTreeSet<String>,
}

impl GenerationRequest {
    #[must_use]
    pub fn new<S: Into<String>>(target: usize, groups: impl IntoIterator<Item = S>) -> Self {
        Self {
            target,
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }

    /// A request over the full prefix universe.
    #[must_use]
    pub fn all(target: usize) -> Self {
        Self {
            target,
            groups: BTreeSet::new(),
        }
    }

    /// Validate against `selector` and return the resolved prefixes.
    ///
    /// # Errors
    ///
    /// Returns `GenError::InvalidRequest` when the target is zero, a group
    /// name is unknown, or no prefix survives resolution.
    pub fn validate(&self, selector: &PrefixSelector) -> Result<Vec<String>, GenError> {
        if self.target == 0 {
            return Err(GenError::InvalidRequest(
                "target count must be at least 1".into(),
            ));
        }
        let unknown = selector.unknown_groups(&self.groups);
        if !unknown.is_empty() {
            return Err(GenError::InvalidRequest(format!(
                "unknown group(s): {}",
                unknown.join(", ")
            )));
        }
        let prefixes: Vec<String> = selector.resolve(&self.groups).into_iter().collect();
        if prefixes.is_empty() {
            return Err(GenError::InvalidRequest(
                "no prefix selectable for this request".into(),
            ));
        }
        Ok(prefixes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefix::PrefixGroup;

    #[test]
    fn all_resolves_universe() {
        let selector = PrefixSelector::standard();
        let prefixes = GenerationRequest::all(10).validate(&selector).unwrap();
        assert_eq!(prefixes.len(), selector.universe().len());
    }

    #[test]
    fn named_groups_resolve() {
        let selector = PrefixSelector::standard();
        let prefixes = GenerationRequest::new(10, ["unicom"])
            .validate(&selector)
            .unwrap();
        assert_eq!(prefixes.len(), 9);
        assert!(prefixes.contains(&"176".to_string()));
    }

    #[test]
    fn zero_target_rejected() {
        let err = GenerationRequest::all(0)
            .validate(&PrefixSelector::standard())
            .unwrap_err();
        assert!(matches!(err, GenError::InvalidRequest(msg) if msg.contains("at least 1")));
    }

    #[test]
    fn unknown_group_rejected() {
        let err = GenerationRequest::new(5, ["mobile", "martian"])
            .validate(&PrefixSelector::standard())
            .unwrap_err();
        assert!(matches!(err, GenError::InvalidRequest(msg) if msg.contains("martian")));
    }

    #[test]
    fn empty_table_rejected() {
        let selector = PrefixSelector::new(Vec::<PrefixGroup>::new(), Vec::<String>::new());
        let err = GenerationRequest::all(5).validate(&selector).unwrap_err();
        assert!(matches!(err, GenError::InvalidRequest(_)));
    }
}
