#![allow(dead_code)]

use advisor_directory::db::{DbPool, establish_connection_pool};
use advisor_directory::domain::advisor::NewAdvisor;
use advisor_directory::domain::facet::Facet;
use advisor_directory::repository::{AdvisorWriter, DieselRepository};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Migrated SQLite database living in a temporary directory.
pub struct TestDb {
    pool: DbPool,
    _dir: TempDir,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"))
            .expect("connection pool");

        let mut conn = pool.get().expect("connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("migrations applied");

        Self { pool, _dir: dir }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

pub fn advisor(first: &str, last: &str, facets: &[(Facet, &str)]) -> NewAdvisor {
    facets.iter().fold(
        NewAdvisor::new(first, last).expect("valid names"),
        |advisor, (facet, value)| advisor.facet(*facet, *value),
    )
}

/// A small directory spread over two provinces.
pub fn seed_directory(repo: &DieselRepository) {
    let advisors = [
        advisor(
            "Jane",
            "Doe",
            &[
                (Facet::Province, "Ontario"),
                (Facet::City, "Ottawa"),
                (Facet::Firm, "Acme"),
                (Facet::Team, "North"),
            ],
        ),
        advisor(
            "John",
            "Smith",
            &[
                (Facet::Province, "Ontario"),
                (Facet::City, "Toronto"),
                (Facet::Firm, "Globex"),
            ],
        ),
        advisor(
            "Marie",
            "Tremblay",
            &[
                (Facet::Province, "Quebec"),
                (Facet::City, "Montreal"),
                (Facet::Firm, "Acme"),
                (Facet::Team, "East"),
            ],
        ),
        advisor("Janet", "Roy", &[(Facet::Province, "Quebec")]),
    ];
    repo.create_advisors(&advisors).expect("seeded");
}

/// `count` advisors named `Advisor<n>` with zero-padded last names.
pub fn seed_many(repo: &DieselRepository, count: usize) {
    let advisors = (0..count)
        .map(|n| advisor("Advisor", &format!("Number{n:04}"), &[(Facet::Province, "Ontario")]))
        .collect::<Vec<_>>();
    repo.create_advisors(&advisors).expect("seeded");
}
