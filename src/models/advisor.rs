//! Diesel models for advisor records.

use diesel::prelude::*;

use crate::domain::advisor::{Advisor as DomainAdvisor, NewAdvisor as DomainNewAdvisor};
use crate::domain::types::{AdvisorEmail, AdvisorId, PersonName, ProfileUrl, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::advisors)]
/// Diesel model for [`crate::domain::advisor::Advisor`].
pub struct Advisor {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub team_name: Option<String>,
    pub title: Option<String>,
    pub firm: Option<String>,
    pub branch: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub email: Option<String>,
    pub website_url: Option<String>,
    pub linkedin_url: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::advisors)]
#[diesel(treat_none_as_default_value = false)]
/// Insertable form of [`Advisor`].
pub struct NewAdvisor<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub team_name: Option<&'a str>,
    pub title: Option<&'a str>,
    pub firm: Option<&'a str>,
    pub branch: Option<&'a str>,
    pub city: Option<&'a str>,
    pub province: Option<&'a str>,
    pub email: Option<&'a str>,
    pub website_url: Option<&'a str>,
    pub linkedin_url: Option<&'a str>,
}

/// Facet columns of a matching advisor, in `Facet::ALL` order.
pub type FacetRow = (
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

impl TryFrom<Advisor> for DomainAdvisor {
    type Error = TypeConstraintError;

    fn try_from(advisor: Advisor) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AdvisorId::try_from(advisor.id)?,
            first_name: PersonName::new(advisor.first_name)?,
            last_name: PersonName::new(advisor.last_name)?,
            team_name: advisor.team_name,
            title: advisor.title,
            firm: advisor.firm,
            branch: advisor.branch,
            city: advisor.city,
            province: advisor.province,
            email: advisor.email.map(AdvisorEmail::new).transpose()?,
            website_url: advisor.website_url.map(ProfileUrl::new).transpose()?,
            linkedin_url: advisor.linkedin_url.map(ProfileUrl::new).transpose()?,
        })
    }
}

impl<'a> From<&'a DomainNewAdvisor> for NewAdvisor<'a> {
    fn from(advisor: &'a DomainNewAdvisor) -> Self {
        Self {
            first_name: advisor.first_name.as_str(),
            last_name: advisor.last_name.as_str(),
            team_name: advisor.team_name.as_deref(),
            title: advisor.title.as_deref(),
            firm: advisor.firm.as_deref(),
            branch: advisor.branch.as_deref(),
            city: advisor.city.as_deref(),
            province: advisor.province.as_deref(),
            email: advisor.email.as_ref().map(AdvisorEmail::as_str),
            website_url: advisor.website_url.as_ref().map(ProfileUrl::as_str),
            linkedin_url: advisor.linkedin_url.as_ref().map(ProfileUrl::as_str),
        }
    }
}
