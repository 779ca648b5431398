//! A throwaway postgres server for database tests.

use deadpool_postgres::{Object, Pool, Runtime};
use postgresql_embedded::{PostgreSQL, Settings, Version};
use tokio_postgres::NoTls;

static DATABASE: &str = "pgjson-test";

/// Server plus a pool on a database holding the test schema. The server
/// stops when this drops.
pub struct TestPg {
    _server: PostgreSQL,
    pool: Pool,
}

impl TestPg {
    pub async fn start(schema: &str) -> TestPg {
        let settings = Settings {
            version: Version::new(17, Some(2), Some(0)),
            ..Default::default()
        };
        let mut server = PostgreSQL::new(settings);
        server.setup().await.expect("setting up pg");
        server.start().await.expect("starting pg");
        server
            .create_database(DATABASE)
            .await
            .expect("creating test db");
        let mut config = deadpool_postgres::Config::new();
        config.url = Some(server.settings().url(DATABASE));
        let pool = config
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .expect("creating pool");
        let test_pg = TestPg {
            _server: server,
            pool,
        };
        test_pg
            .client()
            .await
            .batch_execute(schema)
            .await
            .expect("applying schema");
        test_pg
    }

    pub async fn client(&self) -> Object {
        self.pool
            .get()
            .await
            .expect("unable to get test client from test pool")
    }
}
