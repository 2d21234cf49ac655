//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use async_trait::async_trait;
use duckdb::Connection;
use lf_core::Relation;
use std::path::Path;
use std::sync::Mutex;

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| DbError::Connection {
            message: e.to_string(),
        })?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::Connection {
            message: e.to_string(),
        })?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.conn.lock().unwrap();
        conn.execute(sql, []).map_err(|e| DbError::Execution {
            message: format!("{}: {}", e, sql),
        })
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(sql).map_err(|e| DbError::Execution {
            message: e.to_string(),
        })
    }

    /// Query a single integer value synchronously
    fn query_scalar_sync(&self, sql: &str) -> DbResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(sql, [], |row| row.get::<_, i64>(0))
            .map_err(|e| DbError::Query {
                message: format!("{}: {}", e, sql),
            })
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn query_scalar(&self, sql: &str) -> DbResult<i64> {
        self.query_scalar_sync(sql)
    }

    async fn relation_exists(&self, relation: &Relation) -> DbResult<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables \
                 WHERE table_catalog = ? AND table_schema = ? AND table_name = ?",
                duckdb::params![relation.database, relation.schema, relation.identifier],
                |row| row.get(0),
            )
            .map_err(|e| DbError::Query {
                message: e.to_string(),
            })?;
        Ok(count > 0)
    }

    async fn drop_if_exists(&self, relation_sql: &str) -> DbResult<()> {
        // The object may be either kind; a kind mismatch fails one drop
        // and the other succeeds. Both failing is a real error.
        let view = self.execute_sync(&format!("DROP VIEW IF EXISTS {}", relation_sql));
        let table = self.execute_sync(&format!("DROP TABLE IF EXISTS {}", relation_sql));
        match (view, table) {
            (Err(view_err), Err(table_err)) => Err(DbError::Execution {
                message: format!(
                    "could not drop {} as view ({}) or table ({})",
                    relation_sql, view_err, table_err
                ),
            }),
            _ => Ok(()),
        }
    }

    async fn create_schema_if_not_exists(&self, schema_sql: &str) -> DbResult<()> {
        self.execute_sync(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema_sql))?;
        Ok(())
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}
