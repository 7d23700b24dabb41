//! # Department Repository

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use orderdesk_core::Department;

/// Repository for department database operations.
#[derive(Debug, Clone)]
pub struct DepartmentRepository {
    pool: SqlitePool,
}

impl DepartmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DepartmentRepository { pool }
    }

    pub async fn get_all(&self) -> DbResult<Vec<Department>> {
        let departments =
            sqlx::query_as::<_, Department>("SELECT id, name FROM departments ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(departments)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Department>> {
        let department =
            sqlx::query_as::<_, Department>("SELECT id, name FROM departments WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(department)
    }

    pub async fn insert(&self, department: &Department) -> DbResult<()> {
        debug!(id = %department.id, "Inserting department");

        sqlx::query("INSERT INTO departments (id, name) VALUES (?1, ?2)")
            .bind(&department.id)
            .bind(&department.name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
