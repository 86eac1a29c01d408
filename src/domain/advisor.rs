use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::facet::Facet;
use crate::domain::types::{
    AdvisorEmail, AdvisorId, PersonName, ProfileUrl, TypeConstraintError, normalize_optional_text,
};

/// Advisor record as exposed by the directory. Read-only for clients.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Advisor {
    pub id: AdvisorId,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub team_name: Option<String>,
    pub title: Option<String>,
    pub firm: Option<String>,
    pub branch: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub email: Option<AdvisorEmail>,
    pub website_url: Option<ProfileUrl>,
    pub linkedin_url: Option<ProfileUrl>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewAdvisor {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub team_name: Option<String>,
    pub title: Option<String>,
    pub firm: Option<String>,
    pub branch: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub email: Option<AdvisorEmail>,
    pub website_url: Option<ProfileUrl>,
    pub linkedin_url: Option<ProfileUrl>,
}

impl NewAdvisor {
    /// Creates an advisor with only the mandatory name parts set.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            first_name: PersonName::new(first_name)?,
            last_name: PersonName::new(last_name)?,
            team_name: None,
            title: None,
            firm: None,
            branch: None,
            city: None,
            province: None,
            email: None,
            website_url: None,
            linkedin_url: None,
        })
    }

    /// Sets the value of `facet`; blank input clears it.
    #[must_use]
    pub fn facet(mut self, facet: Facet, value: impl Into<String>) -> Self {
        let value = normalize_optional_text(Some(value.into()));
        match facet {
            Facet::Province => self.province = value,
            Facet::City => self.city = value,
            Facet::Firm => self.firm = value,
            Facet::Branch => self.branch = value,
            Facet::Team => self.team_name = value,
        }
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = normalize_optional_text(Some(title.into()));
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Result<Self, TypeConstraintError> {
        self.email = Some(AdvisorEmail::new(email)?);
        Ok(self)
    }

    pub fn website_url(mut self, url: impl Into<String>) -> Result<Self, TypeConstraintError> {
        self.website_url = Some(ProfileUrl::new(url)?);
        Ok(self)
    }

    pub fn linkedin_url(mut self, url: impl Into<String>) -> Result<Self, TypeConstraintError> {
        self.linkedin_url = Some(ProfileUrl::new(url)?);
        Ok(self)
    }
}

/// Column the advisor list can be ordered by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    FirstName,
    #[default]
    LastName,
    Title,
    Firm,
    Branch,
    City,
    Province,
    Team,
}

impl SortColumn {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortColumn::FirstName => "first_name",
            SortColumn::LastName => "last_name",
            SortColumn::Title => "title",
            SortColumn::Firm => "firm",
            SortColumn::Branch => "branch",
            SortColumn::City => "city",
            SortColumn::Province => "province",
            SortColumn::Team => "team",
        }
    }
}

impl FromStr for SortColumn {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            SortColumn::FirstName,
            SortColumn::LastName,
            SortColumn::Title,
            SortColumn::Firm,
            SortColumn::Branch,
            SortColumn::City,
            SortColumn::Province,
            SortColumn::Team,
        ]
        .into_iter()
        .find(|column| column.as_str() == s.trim())
        .ok_or_else(|| TypeConstraintError::InvalidValue(format!("unknown sort column `{s}`")))
    }
}

impl Display for SortColumn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl FromStr for SortDirection {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown sort direction `{other}`"
            ))),
        }
    }
}

/// Single active ordering of the advisor list. Defaults to last name, ascending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdvisorSort {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl AdvisorSort {
    pub const fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Ordering after the user clicks `column`: the same column flips
    /// direction, another column starts ascending.
    #[must_use]
    pub fn clicked(self, column: SortColumn) -> Self {
        if self.column == column {
            Self::new(column, self.direction.toggled())
        } else {
            Self::new(column, SortDirection::Ascending)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clicking_same_column_flips_direction() {
        let sort = AdvisorSort::default().clicked(SortColumn::LastName);
        assert_eq!(
            sort,
            AdvisorSort::new(SortColumn::LastName, SortDirection::Descending)
        );
        assert_eq!(sort.clicked(SortColumn::LastName), AdvisorSort::default());
    }

    #[test]
    fn clicking_other_column_starts_ascending() {
        let sort = AdvisorSort::new(SortColumn::Firm, SortDirection::Descending)
            .clicked(SortColumn::City);
        assert_eq!(
            sort,
            AdvisorSort::new(SortColumn::City, SortDirection::Ascending)
        );
    }

    #[test]
    fn new_advisor_normalizes_facets() {
        let advisor = NewAdvisor::new("Jane", "Doe")
            .expect("valid names")
            .facet(Facet::City, "  Ottawa ")
            .facet(Facet::Firm, "   ");

        assert_eq!(advisor.city.as_deref(), Some("Ottawa"));
        assert_eq!(advisor.firm, None);
    }

    #[test]
    fn sort_parsing() {
        assert_eq!("first_name".parse(), Ok(SortColumn::FirstName));
        assert_eq!("DESC".parse(), Ok(SortDirection::Descending));
        assert!("sideways".parse::<SortDirection>().is_err());
    }
}
