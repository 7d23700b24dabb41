//! # Employee Service
//!
//! Employee lookups, the department join and hire-date queries.

use tracing::info;

use orderdesk_core::validation::{parse_date, validate_employee, validate_key, validate_text};
use orderdesk_core::{Employee, EmployeeDepartment};
use orderdesk_db::{Database, DbError};

use crate::error::{ServiceError, ServiceResult};

/// Employee operations.
#[derive(Debug, Clone)]
pub struct EmployeeService {
    db: Database,
}

impl EmployeeService {
    pub fn new(db: Database) -> Self {
        EmployeeService { db }
    }

    pub async fn get_all_employees(&self) -> ServiceResult<Vec<Employee>> {
        Ok(self.db.employees().get_all().await?)
    }

    pub async fn get_employee_by_id(&self, id: &str) -> ServiceResult<Employee> {
        validate_key("employee_id", id)?;

        self.db
            .employees()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Employee", id))
    }

    /// Every employee with their department name.
    pub async fn get_employees_with_department_name(
        &self,
    ) -> ServiceResult<Vec<EmployeeDepartment>> {
        Ok(self.db.employees().get_with_department_name().await?)
    }

    pub async fn get_employees_by_department_and_position(
        &self,
        department_id: &str,
        position: &str,
    ) -> ServiceResult<Vec<Employee>> {
        validate_key("department_id", department_id)?;
        validate_text("position", position)?;

        Ok(self
            .db
            .employees()
            .find_by_department_and_position(department_id, position.trim())
            .await?)
    }

    /// Validates and stores a new employee.
    ///
    /// ## Errors
    /// * `InvalidRequest` - bad fields, unknown department or an id already in use
    pub async fn save_employee(&self, employee: Employee) -> ServiceResult<Employee> {
        validate_employee(&employee)?;

        if self
            .db
            .departments()
            .get_by_id(&employee.department_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::InvalidRequest(format!(
                "Unknown department: {}",
                employee.department_id
            )));
        }

        match self.db.employees().insert(&employee).await {
            Ok(()) => {}
            Err(DbError::UniqueViolation { .. }) => {
                return Err(ServiceError::InvalidRequest(format!(
                    "Employee {} already exists",
                    employee.id
                )));
            }
            Err(e) => return Err(e.into()),
        }

        info!(id = %employee.id, department_id = %employee.department_id, "Employee saved");
        Ok(employee)
    }

    /// Employees hired on or after `hire_date` (`YYYY-MM-DD`).
    pub async fn get_employees_by_hire_date(&self, hire_date: &str) -> ServiceResult<Vec<Employee>> {
        let since = parse_date("hire_date", hire_date)?;
        Ok(self.db.employees().find_hired_since(since).await?)
    }

    /// Employees sharing the most recent hire date.
    pub async fn get_latest_hired_employees(&self) -> ServiceResult<Vec<Employee>> {
        Ok(self.db.employees().find_latest_hired().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, seeded_db};

    fn employee(id: &str, department_id: &str, position: &str, hired: &str) -> Employee {
        Employee {
            id: id.to_string(),
            name: format!("Employee {}", id),
            position: position.to_string(),
            department_id: department_id.to_string(),
            hire_date: date(hired),
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let service = EmployeeService::new(seeded_db().await);

        assert_eq!(service.get_employee_by_id("E01").await.unwrap().id, "E01");
        assert!(service.get_employee_by_id("E77").await.unwrap_err().is_not_found());
        assert!(service.get_employee_by_id("").await.unwrap_err().is_invalid_request());
    }

    #[tokio::test]
    async fn test_save_employee_rules() {
        let service = EmployeeService::new(seeded_db().await);

        let saved = service
            .save_employee(employee("E02", "D02", "Driver", "2024-02-01"))
            .await
            .unwrap();
        assert_eq!(saved.id, "E02");

        let unknown_department = service
            .save_employee(employee("E03", "D99", "Driver", "2024-02-01"))
            .await
            .unwrap_err();
        assert!(unknown_department.is_invalid_request());

        let duplicate = service
            .save_employee(employee("E02", "D01", "Clerk", "2024-02-01"))
            .await
            .unwrap_err();
        assert!(duplicate.is_invalid_request());

        let blank_position = service
            .save_employee(employee("E04", "D01", " ", "2024-02-01"))
            .await
            .unwrap_err();
        assert!(blank_position.is_invalid_request());

        assert_eq!(service.get_all_employees().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_department_queries() {
        let service = EmployeeService::new(seeded_db().await);
        service
            .save_employee(employee("E02", "D02", "Driver", "2024-02-01"))
            .await
            .unwrap();

        let joined = service.get_employees_with_department_name().await.unwrap();
        let pairs: Vec<_> = joined
            .iter()
            .map(|r| (r.employee_id.as_str(), r.department_name.as_str()))
            .collect();
        assert_eq!(pairs, vec![("E01", "Sales"), ("E02", "Logistics")]);

        let drivers = service
            .get_employees_by_department_and_position("D02", "Driver")
            .await
            .unwrap();
        assert_eq!(drivers.len(), 1);
        assert!(service
            .get_employees_by_department_and_position("D01", "Driver")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_hire_date_queries() {
        let service = EmployeeService::new(seeded_db().await);
        service
            .save_employee(employee("E02", "D02", "Driver", "2024-02-01"))
            .await
            .unwrap();
        service
            .save_employee(employee("E03", "D01", "Clerk", "2024-02-01"))
            .await
            .unwrap();

        // E01 was hired 2022-04-01.
        let recent = service.get_employees_by_hire_date("2022-04-02").await.unwrap();
        assert_eq!(recent.len(), 2);
        let all = service.get_employees_by_hire_date("2022-04-01").await.unwrap();
        assert_eq!(all.len(), 3);

        let err = service.get_employees_by_hire_date("April 2022").await.unwrap_err();
        assert!(err.is_invalid_request());

        let latest = service.get_latest_hired_employees().await.unwrap();
        let ids: Vec<_> = latest.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["E02", "E03"]);
    }
}
