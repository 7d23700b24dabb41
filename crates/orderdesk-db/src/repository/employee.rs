//! # Employee Repository
//!
//! Employee lookups plus the department join and hire-date queries.

use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use orderdesk_core::{Employee, EmployeeDepartment};

/// Repository for employee database operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Lists every employee ordered by id.
    pub async fn get_all(&self) -> DbResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, position, department_id, hire_date, phone
            FROM employees
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    /// Gets an employee by id; `Ok(None)` when absent.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Employee>> {
        let mut conn = self.pool.acquire().await?;
        Self::get_by_id_in(&mut conn, id).await
    }

    pub async fn get_by_id_in(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, position, department_id, hire_date, phone
            FROM employees
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(employee)
    }

    /// Lists employees with the name of their department.
    pub async fn get_with_department_name(&self) -> DbResult<Vec<EmployeeDepartment>> {
        let rows = sqlx::query_as::<_, EmployeeDepartment>(
            r#"
            SELECT
                e.id AS employee_id,
                e.name AS employee_name,
                d.name AS department_name,
                e.hire_date AS hire_date
            FROM employees e
            INNER JOIN departments d ON d.id = e.department_id
            ORDER BY e.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Employees of one department holding one position.
    pub async fn find_by_department_and_position(
        &self,
        department_id: &str,
        position: &str,
    ) -> DbResult<Vec<Employee>> {
        debug!(department_id = %department_id, position = %position, "Filtering employees");

        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, position, department_id, hire_date, phone
            FROM employees
            WHERE department_id = ?1 AND position = ?2
            ORDER BY id
            "#,
        )
        .bind(department_id)
        .bind(position)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    /// Employees hired on or after `date`, earliest first.
    pub async fn find_hired_since(&self, date: NaiveDate) -> DbResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, position, department_id, hire_date, phone
            FROM employees
            WHERE hire_date >= ?1
            ORDER BY hire_date, id
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    /// Employees sharing the most recent hire date.
    pub async fn find_latest_hired(&self) -> DbResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, position, department_id, hire_date, phone
            FROM employees
            WHERE hire_date = (SELECT MAX(hire_date) FROM employees)
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    /// Inserts an employee.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - id already exists
    /// * `Err(DbError::ForeignKeyViolation)` - department doesn't exist
    pub async fn insert(&self, employee: &Employee) -> DbResult<()> {
        debug!(id = %employee.id, "Inserting employee");

        sqlx::query(
            r#"
            INSERT INTO employees (id, name, position, department_id, hire_date, phone)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&employee.id)
        .bind(&employee.name)
        .bind(&employee.position)
        .bind(&employee.department_id)
        .bind(employee.hire_date)
        .bind(&employee.phone)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::repository::fixtures::{date, department, employee, seeded_db};

    #[tokio::test]
    async fn test_department_join_and_filters() {
        let db = seeded_db().await;
        db.departments()
            .insert(&department("D02", "Logistics"))
            .await
            .unwrap();
        let repo = db.employees();
        repo.insert(&employee("E02", "D02", "Driver", "2023-01-09"))
            .await
            .unwrap();
        repo.insert(&employee("E03", "D01", "Sales Manager", "2023-01-09"))
            .await
            .unwrap();

        let joined = repo.get_with_department_name().await.unwrap();
        assert_eq!(joined.len(), 3);
        assert_eq!(joined[1].employee_id, "E02");
        assert_eq!(joined[1].department_name, "Logistics");

        let reps = repo
            .find_by_department_and_position("D01", "Sales Representative")
            .await
            .unwrap();
        assert_eq!(reps.len(), 1);
        assert_eq!(reps[0].id, "E01");
    }

    #[tokio::test]
    async fn test_hire_date_queries() {
        let db = seeded_db().await;
        let repo = db.employees();
        repo.insert(&employee("E02", "D01", "Clerk", "2023-06-01"))
            .await
            .unwrap();
        repo.insert(&employee("E03", "D01", "Clerk", "2023-06-01"))
            .await
            .unwrap();

        let since = repo.find_hired_since(date("2023-01-01")).await.unwrap();
        let ids: Vec<_> = since.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["E02", "E03"]);

        let latest = repo.find_latest_hired().await.unwrap();
        assert_eq!(latest.len(), 2);
        assert!(latest.iter().all(|e| e.hire_date == date("2023-06-01")));
    }

    #[tokio::test]
    async fn test_unknown_department_is_foreign_key_violation() {
        let db = seeded_db().await;

        let err = db
            .employees()
            .insert(&employee("E09", "D77", "Clerk", "2024-01-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
