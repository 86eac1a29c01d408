use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::db::fold_case;
use crate::domain::advisor::{Advisor, AdvisorSort, NewAdvisor, SortColumn, SortDirection};
use crate::domain::facet::{Facet, FacetOptions, FacetSelection};
use crate::models::advisor::{Advisor as DbAdvisor, FacetRow, NewAdvisor as DbNewAdvisor};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{AdvisorQuery, AdvisorReader, AdvisorWriter, DieselRepository};
use crate::schema::advisors;

type BoxedAdvisors = advisors::BoxedQuery<'static, Sqlite>;

/// Escapes `LIKE` wildcards so user input only ever matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Applies the facet conjunction: `IN` within a facet, `AND` across facets.
fn filter_by_facets(mut query: BoxedAdvisors, filters: &FacetSelection) -> BoxedAdvisors {
    for (facet, values) in filters.iter() {
        let values = values.iter().cloned().collect::<Vec<String>>();
        query = match facet {
            Facet::Province => query.filter(advisors::province.eq_any(values)),
            Facet::City => query.filter(advisors::city.eq_any(values)),
            Facet::Firm => query.filter(advisors::firm.eq_any(values)),
            Facet::Branch => query.filter(advisors::branch.eq_any(values)),
            Facet::Team => query.filter(advisors::team_name.eq_any(values)),
        };
    }
    query
}

fn matching(query: &AdvisorQuery) -> BoxedAdvisors {
    let mut boxed = filter_by_facets(advisors::table.into_boxed(), &query.filters);

    if let Some(term) = &query.search {
        let pattern = like_pattern(&term.to_lowercase());
        boxed = boxed.filter(
            fold_case(advisors::first_name)
                .like(pattern.clone())
                .escape('\\')
                .or(fold_case(advisors::last_name).like(pattern).escape('\\')),
        );
    }

    boxed
}

/// Orders by the sort column with nulls last when ascending and first when
/// descending, then by id in the same direction so pages never overlap and
/// descending is the exact reverse of ascending.
fn ordered(query: BoxedAdvisors, sort: AdvisorSort) -> BoxedAdvisors {
    macro_rules! by_nullable {
        ($column:expr) => {
            match sort.direction {
                SortDirection::Ascending => query.order_by(($column.is_null().asc(), $column.asc())),
                SortDirection::Descending => {
                    query.order_by(($column.is_null().desc(), $column.desc()))
                }
            }
        };
    }
    macro_rules! by_required {
        ($column:expr) => {
            match sort.direction {
                SortDirection::Ascending => query.order_by($column.asc()),
                SortDirection::Descending => query.order_by($column.desc()),
            }
        };
    }

    let query = match sort.column {
        SortColumn::FirstName => by_required!(advisors::first_name),
        SortColumn::LastName => by_required!(advisors::last_name),
        SortColumn::Title => by_nullable!(advisors::title),
        SortColumn::Firm => by_nullable!(advisors::firm),
        SortColumn::Branch => by_nullable!(advisors::branch),
        SortColumn::City => by_nullable!(advisors::city),
        SortColumn::Province => by_nullable!(advisors::province),
        SortColumn::Team => by_nullable!(advisors::team_name),
    };

    match sort.direction {
        SortDirection::Ascending => query.then_order_by(advisors::id.asc()),
        SortDirection::Descending => query.then_order_by(advisors::id.desc()),
    }
}

impl AdvisorReader for DieselRepository {
    fn list_advisors(&self, query: &AdvisorQuery) -> RepositoryResult<(usize, Vec<Advisor>)> {
        let mut conn = self.conn()?;

        let total: i64 = matching(query).count().get_result(&mut conn)?;

        let mut items = ordered(matching(query), query.sort);
        if let Some(pagination) = query.pagination {
            let (offset, limit) = pagination.offset_limit().ok_or_else(|| {
                RepositoryError::ValidationError(format!(
                    "page {} is out of range",
                    pagination.page_index
                ))
            })?;
            items = items.offset(offset).limit(limit);
        }

        let advisors = items
            .load::<DbAdvisor>(&mut conn)?
            .into_iter()
            .map(Advisor::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let total = usize::try_from(total)
            .map_err(|_| RepositoryError::Unexpected(format!("invalid match count {total}")))?;

        Ok((total, advisors))
    }

    fn list_facet_values(&self, filters: &FacetSelection) -> RepositoryResult<FacetOptions> {
        let mut conn = self.conn()?;

        let rows = filter_by_facets(advisors::table.into_boxed(), filters)
            .select((
                advisors::province,
                advisors::city,
                advisors::firm,
                advisors::branch,
                advisors::team_name,
            ))
            .distinct()
            .load::<FacetRow>(&mut conn)?;

        Ok(rows
            .into_iter()
            .flat_map(|(province, city, firm, branch, team)| {
                Facet::ALL
                    .into_iter()
                    .zip([province, city, firm, branch, team])
                    .filter_map(|(facet, value)| value.map(|value| (facet, value)))
            })
            .collect())
    }
}

impl AdvisorWriter for DieselRepository {
    fn create_advisors(&self, new_advisors: &[NewAdvisor]) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        let insertables: Vec<DbNewAdvisor> = new_advisors.iter().map(Into::into).collect();
        let affected = diesel::insert_into(advisors::table)
            .values(&insertables)
            .execute(&mut conn)?;

        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("jane"), "%jane%");
        assert_eq!(like_pattern("50%_a\\b"), "%50\\%\\_a\\\\b%");
    }
}
