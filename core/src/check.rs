//! Compare the imports found in code against the declared dependencies.

use crate::types::{DeclaredDependency, ParsedImport, UndeclaredDependency, UnusedDependency};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Outcome of comparing imports to declared dependencies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyComparison {
    /// Imported names nobody declared
    pub undeclared: Vec<UndeclaredDependency>,
    /// Declared names nobody imports
    pub unused: Vec<UnusedDependency>,
}

impl DependencyComparison {
    pub fn is_clean(&self) -> bool {
        self.undeclared.is_empty() && self.unused.is_empty()
    }
}

/// Group items by name, keeping first-seen order of names and input order
/// of the occurrences within each group.
fn group_by_name<'a, T, F>(items: &'a [T], name: F) -> IndexMap<&'a str, Vec<T>>
where
    T: Clone,
    F: Fn(&'a T) -> &'a str,
{
    let mut groups: IndexMap<&str, Vec<T>> = IndexMap::new();
    for item in items {
        groups.entry(name(item)).or_default().push(item.clone());
    }
    groups
}

/// Compare imports to declared dependencies.
///
/// A name that is both imported and declared is reported in neither list.
/// The ignore sets only suppress names that would otherwise be reported:
/// `ignored_undeclared` filters `undeclared`, `ignored_unused` filters `unused`.
pub fn compare_imports_to_dependencies(
    imports: &[ParsedImport],
    declared: &[DeclaredDependency],
    ignored_unused: &HashSet<String>,
    ignored_undeclared: &HashSet<String>,
) -> DependencyComparison {
    let imported = group_by_name(imports, |i| i.name.as_str());
    let declared = group_by_name(declared, |d| d.name.as_str());

    let undeclared = imported
        .iter()
        .filter(|(name, _)| !declared.contains_key(**name) && !ignored_undeclared.contains(**name))
        .map(|(name, occurrences)| UndeclaredDependency {
            name: (*name).to_string(),
            occurrences: occurrences.clone(),
        })
        .collect();

    let unused = declared
        .iter()
        .filter(|(name, _)| !imported.contains_key(**name) && !ignored_unused.contains(**name))
        .map(|(name, occurrences)| UnusedDependency {
            name: (*name).to_string(),
            occurrences: occurrences.clone(),
        })
        .collect();

    DependencyComparison { undeclared, unused }
}
