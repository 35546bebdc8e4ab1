//! Include/exclude rules compiled from a filter set.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tessera_config::FilterSet;

use crate::DEFAULT_EXCLUDES;
use crate::error::{FsOpsError, FsOpsResult};

#[derive(Debug)]
pub(crate) struct RuleSet {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum RuleDecision {
    Include,
    Skip,
}

impl RuleSet {
    pub(crate) fn from_filter_set(filter_set: &FilterSet) -> FsOpsResult<Self> {
        let include_patterns = normalise_patterns(&filter_set.includes)?;
        let mut exclude_patterns = normalise_patterns(&filter_set.excludes)?;
        if filter_set.use_default_excludes {
            exclude_patterns.extend(DEFAULT_EXCLUDES.iter().map(ToString::to_string));
        }

        Ok(Self {
            include: build_globset(include_patterns)?,
            exclude: build_globset(exclude_patterns)?,
        })
    }

    /// `relative` uses `/` separators regardless of platform.
    pub(crate) fn evaluate(&self, relative: &str) -> RuleDecision {
        if self
            .exclude
            .as_ref()
            .is_some_and(|exclude| exclude.is_match(relative))
        {
            return RuleDecision::Skip;
        }

        match &self.include {
            Some(include) if include.is_match(relative) => RuleDecision::Include,
            Some(_) => RuleDecision::Skip,
            None => RuleDecision::Include,
        }
    }
}

/// Ant conventions: `\` is a separator and a trailing `/` selects the whole subtree.
fn normalise_patterns(patterns: &[String]) -> FsOpsResult<Vec<String>> {
    patterns
        .iter()
        .map(|pattern| {
            let trimmed = pattern.trim();
            if trimmed.is_empty() {
                return Err(FsOpsError::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: "glob patterns cannot be empty",
                });
            }
            let mut normalised = trimmed.replace('\\', "/");
            if let Some(stripped) = normalised.strip_prefix("./") {
                normalised = stripped.to_string();
            }
            if normalised.ends_with('/') {
                normalised.push_str("**");
            }
            Ok(normalised)
        })
        .collect()
}

fn build_globset(patterns: Vec<String>) -> FsOpsResult<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(&pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| FsOpsError::glob(pattern.clone(), source))?;
        builder.add(glob);
    }
    builder
        .build()
        .map(Some)
        .map_err(|source| FsOpsError::glob("<set>".to_string(), source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn rule_set(filter_set: &FilterSet) -> Result<RuleSet, Box<dyn Error>> {
        Ok(RuleSet::from_filter_set(filter_set)?)
    }

    #[test]
    fn empty_includes_select_everything_but_defaults() -> Result<(), Box<dyn Error>> {
        let rules = rule_set(&FilterSet::new("filters"))?;
        assert_eq!(rules.evaluate("en.properties"), RuleDecision::Include);
        assert_eq!(rules.evaluate("nested/de.properties"), RuleDecision::Include);
        assert_eq!(rules.evaluate(".git/config"), RuleDecision::Skip);
        assert_eq!(rules.evaluate("en.properties~"), RuleDecision::Skip);
        assert_eq!(rules.evaluate("sub/.DS_Store"), RuleDecision::Skip);
        Ok(())
    }

    #[test]
    fn single_star_stays_within_a_directory() -> Result<(), Box<dyn Error>> {
        let rules = rule_set(&FilterSet::new("filters").include("*.properties"))?;
        assert_eq!(rules.evaluate("en.properties"), RuleDecision::Include);
        assert_eq!(rules.evaluate("nested/de.properties"), RuleDecision::Skip);
        assert_eq!(rules.evaluate("notes.txt"), RuleDecision::Skip);

        let deep = rule_set(&FilterSet::new("filters").include("**/*.properties"))?;
        assert_eq!(deep.evaluate("en.properties"), RuleDecision::Include);
        assert_eq!(deep.evaluate("nested/de.properties"), RuleDecision::Include);
        Ok(())
    }

    #[test]
    fn excludes_win_and_trailing_slash_selects_subtree() -> Result<(), Box<dyn Error>> {
        let rules = rule_set(
            &FilterSet::new("filters")
                .include("**/*.properties")
                .exclude("drafts/"),
        )?;
        assert_eq!(rules.evaluate("drafts/fr.properties"), RuleDecision::Skip);
        assert_eq!(rules.evaluate("drafts/deep/fr.properties"), RuleDecision::Skip);
        assert_eq!(rules.evaluate("final/fr.properties"), RuleDecision::Include);
        Ok(())
    }

    #[test]
    fn default_excludes_can_be_disabled() -> Result<(), Box<dyn Error>> {
        let mut filter_set = FilterSet::new("filters");
        filter_set.use_default_excludes = false;
        let rules = rule_set(&filter_set)?;
        assert_eq!(rules.evaluate(".gitignore"), RuleDecision::Include);
        Ok(())
    }

    #[test]
    fn invalid_patterns_are_reported() {
        let empty = FilterSet::new("filters").include("  ");
        assert!(matches!(
            RuleSet::from_filter_set(&empty),
            Err(FsOpsError::InvalidPattern { .. })
        ));

        let broken = FilterSet::new("filters").include("[");
        assert!(matches!(
            RuleSet::from_filter_set(&broken),
            Err(FsOpsError::Glob { .. })
        ));
    }
}
