//! Filterable dimensions of the advisor directory and the selection/option
//! snapshots built on top of them.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::types::TypeConstraintError;

/// A filterable dimension of an advisor record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Province,
    City,
    Firm,
    Branch,
    Team,
}

impl Facet {
    pub const ALL: [Facet; 5] = [
        Facet::Province,
        Facet::City,
        Facet::Firm,
        Facet::Branch,
        Facet::Team,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Facet::Province => "province",
            Facet::City => "city",
            Facet::Firm => "firm",
            Facet::Branch => "branch",
            Facet::Team => "team",
        }
    }
}

impl Display for Facet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facet {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Facet::ALL
            .into_iter()
            .find(|facet| facet.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("unknown facet `{s}`")))
    }
}

/// Immutable snapshot of the values chosen per facet.
///
/// Empty value sets are never stored, so two selections compare equal exactly
/// when every facet holds the same set of values regardless of insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Facet, BTreeSet<String>>")]
pub struct FacetSelection(BTreeMap<Facet, BTreeSet<String>>);

impl FacetSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when no facet has a chosen value.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values chosen for `facet`, if any.
    pub fn get(&self, facet: Facet) -> Option<&BTreeSet<String>> {
        self.0.get(&facet)
    }

    pub fn contains(&self, facet: Facet, value: &str) -> bool {
        self.0.get(&facet).is_some_and(|values| values.contains(value))
    }

    /// Iterates over facets that carry at least one value.
    pub fn iter(&self) -> impl Iterator<Item = (Facet, &BTreeSet<String>)> {
        self.0.iter().map(|(facet, values)| (*facet, values))
    }

    /// Returns a copy with `value` selected or deselected for `facet`.
    #[must_use]
    pub fn with_value(&self, facet: Facet, value: impl Into<String>, selected: bool) -> Self {
        let mut next = self.0.clone();
        let value = value.into();
        let values = next.entry(facet).or_default();
        if selected {
            values.insert(value);
        } else {
            values.remove(&value);
        }
        Self::from(next)
    }

    /// Returns a copy with `value` flipped for `facet`.
    #[must_use]
    pub fn toggled(&self, facet: Facet, value: impl Into<String>) -> Self {
        let value = value.into();
        let selected = !self.contains(facet, &value);
        self.with_value(facet, value, selected)
    }

    /// Returns a copy with every value of `facet` removed.
    #[must_use]
    pub fn without(&self, facet: Facet) -> Self {
        let mut next = self.0.clone();
        next.remove(&facet);
        Self(next)
    }

    /// Keeps only the values still offered by `options`, facet by facet.
    #[must_use]
    pub fn pruned_to(&self, options: &FacetOptions) -> Self {
        let next = self
            .0
            .iter()
            .map(|(facet, values)| {
                let kept = values
                    .iter()
                    .filter(|value| options.contains(*facet, value))
                    .cloned()
                    .collect::<BTreeSet<_>>();
                (*facet, kept)
            })
            .collect::<BTreeMap<_, _>>();
        Self::from(next)
    }

    /// Facets whose chosen values differ between the two snapshots.
    pub fn diff(&self, other: &FacetSelection) -> Vec<Facet> {
        Facet::ALL
            .into_iter()
            .filter(|facet| self.get(*facet) != other.get(*facet))
            .collect()
    }
}

impl From<BTreeMap<Facet, BTreeSet<String>>> for FacetSelection {
    fn from(mut map: BTreeMap<Facet, BTreeSet<String>>) -> Self {
        map.retain(|_, values| !values.is_empty());
        Self(map)
    }
}

impl<S: Into<String>> FromIterator<(Facet, S)> for FacetSelection {
    fn from_iter<I: IntoIterator<Item = (Facet, S)>>(iter: I) -> Self {
        let mut map: BTreeMap<Facet, BTreeSet<String>> = BTreeMap::new();
        for (facet, value) in iter {
            map.entry(facet).or_default().insert(value.into());
        }
        Self::from(map)
    }
}

/// Sorted, de-duplicated option list per facet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct FacetOptions(BTreeMap<Facet, Vec<String>>);

impl FacetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options offered for `facet`; empty when the facet has none.
    pub fn get(&self, facet: Facet) -> &[String] {
        self.0.get(&facet).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, facet: Facet, value: &str) -> bool {
        self.get(facet)
            .binary_search_by(|candidate| candidate.as_str().cmp(value))
            .is_ok()
    }

    /// Replaces the options of `facet` with the sorted, unique `values`.
    pub fn set(&mut self, facet: Facet, values: impl IntoIterator<Item = String>) {
        let values = values
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();
        if values.is_empty() {
            self.0.remove(&facet);
        } else {
            self.0.insert(facet, values);
        }
    }
}

impl FromIterator<(Facet, String)> for FacetOptions {
    fn from_iter<I: IntoIterator<Item = (Facet, String)>>(iter: I) -> Self {
        let mut grouped: BTreeMap<Facet, BTreeSet<String>> = BTreeMap::new();
        for (facet, value) in iter {
            grouped.entry(facet).or_default().insert(value);
        }
        Self(
            grouped
                .into_iter()
                .map(|(facet, values)| (facet, values.into_iter().collect()))
                .collect(),
        )
    }
}

impl Serialize for FacetOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Facet::ALL.len()))?;
        for facet in Facet::ALL {
            map.serialize_entry(&facet, self.get(facet))?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(pairs: &[(Facet, &str)]) -> FacetSelection {
        pairs.iter().map(|(facet, value)| (*facet, *value)).collect()
    }

    #[test]
    fn facet_parses_case_insensitively() {
        assert_eq!("Province".parse::<Facet>(), Ok(Facet::Province));
        assert!("region".parse::<Facet>().is_err());
    }

    #[test]
    fn equality_ignores_order_and_empty_facets() {
        let a = selection(&[(Facet::Firm, "Acme"), (Facet::Firm, "Zed")]);
        let b = selection(&[(Facet::Firm, "Zed"), (Facet::Firm, "Acme")])
            .with_value(Facet::City, "Toronto", true)
            .with_value(Facet::City, "Toronto", false);

        assert_eq!(a, b);
        assert!(a.diff(&b).is_empty());
    }

    #[test]
    fn toggled_adds_then_removes() {
        let empty = FacetSelection::new();
        let picked = empty.toggled(Facet::Province, "Ontario");

        assert!(picked.contains(Facet::Province, "Ontario"));
        assert!(empty.is_empty(), "snapshots are immutable");
        assert_eq!(picked.toggled(Facet::Province, "Ontario"), empty);
    }

    #[test]
    fn diff_reports_changed_facets() {
        let a = selection(&[(Facet::Province, "Ontario"), (Facet::Firm, "Acme")]);
        let b = selection(&[(Facet::Province, "Ontario"), (Facet::City, "Ottawa")]);

        assert_eq!(a.diff(&b), vec![Facet::City, Facet::Firm]);
    }

    #[test]
    fn pruned_to_drops_values_missing_from_options() {
        let pending = selection(&[(Facet::Firm, "Acme"), (Facet::Firm, "Gone")]);
        let options: FacetOptions = [(Facet::Firm, "Acme".to_string())].into_iter().collect();

        assert_eq!(pending.pruned_to(&options), selection(&[(Facet::Firm, "Acme")]));
    }

    #[test]
    fn options_are_sorted_and_unique() {
        let mut options = FacetOptions::new();
        options.set(
            Facet::City,
            ["Ottawa", "Montreal", "Ottawa"].map(String::from),
        );

        assert_eq!(options.get(Facet::City), ["Montreal", "Ottawa"]);
        assert!(options.contains(Facet::City, "Ottawa"));
        assert!(options.get(Facet::Team).is_empty());
    }

    #[test]
    fn options_serialize_every_facet() {
        let options: FacetOptions = [(Facet::Province, "Quebec".to_string())].into_iter().collect();
        let json = serde_json::to_value(&options).expect("serializable");

        assert_eq!(json["province"], serde_json::json!(["Quebec"]));
        assert_eq!(json["team"], serde_json::json!([]));
    }
}
