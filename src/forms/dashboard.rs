//! Actions posted by the dashboard page.

use serde::Deserialize;
use validator::Validate;

use crate::domain::advisor::SortColumn;
use crate::domain::facet::Facet;
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Current content of the search box.
pub struct SearchForm {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub q: String,
}

#[derive(Debug, Deserialize)]
/// Column header that was clicked.
pub struct SortForm {
    pub column: String,
}

impl TryFrom<SortForm> for SortColumn {
    type Error = FormError;

    fn try_from(form: SortForm) -> Result<Self, Self::Error> {
        form.column
            .parse()
            .map_err(|_| FormError::InvalidSortColumn)
    }
}

#[derive(Debug, Deserialize, Validate)]
/// A checkbox flipped in the filter panel.
pub struct ToggleFacetForm {
    pub facet: String,
    #[validate(length(min = 1))]
    pub value: String,
}

impl ToggleFacetForm {
    /// Validates the form and resolves its facet.
    pub fn parse(self) -> Result<(Facet, String), FormError> {
        self.validate()?;
        let facet = self
            .facet
            .parse::<Facet>()
            .map_err(|_| FormError::InvalidFacet)?;
        Ok((facet, self.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_longer_than_limit_is_rejected() {
        let form = SearchForm {
            q: "x".repeat(101),
        };
        assert!(form.validate().is_err());

        let form = SearchForm {
            q: "x".repeat(100),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn sort_form_parses_column() {
        let column = SortColumn::try_from(SortForm {
            column: "city".to_string(),
        })
        .expect("known column");
        assert_eq!(column, SortColumn::City);

        assert!(matches!(
            SortColumn::try_from(SortForm {
                column: "salary".to_string()
            }),
            Err(FormError::InvalidSortColumn)
        ));
    }

    #[test]
    fn toggle_form_requires_known_facet_and_value() {
        let parsed = ToggleFacetForm {
            facet: "Province".to_string(),
            value: "Ontario".to_string(),
        }
        .parse()
        .expect("valid toggle");
        assert_eq!(parsed, (Facet::Province, "Ontario".to_string()));

        assert!(matches!(
            ToggleFacetForm {
                facet: "country".to_string(),
                value: "Canada".to_string(),
            }
            .parse(),
            Err(FormError::InvalidFacet)
        ));
        assert!(matches!(
            ToggleFacetForm {
                facet: "city".to_string(),
                value: String::new(),
            }
            .parse(),
            Err(FormError::Validation(_))
        ));
    }
}
