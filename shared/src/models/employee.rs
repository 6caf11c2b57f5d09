//! Employee Model

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Fixed catalogue of positions an employee can hold
pub const POSTES: &[&str] = &[
    "Développeur",
    "Designer",
    "Chef de projet",
    "Analyste",
    "Consultant",
    "Manager",
    "Directeur",
];

/// Employee record as returned by the backend
///
/// `id` is assigned by the backend and immutable; `created_at` and
/// `updated_at` are server-managed audit timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub poste: String,
    pub department: String,
    pub email: String,
    pub hiring_date: NaiveDateTime,
    pub enabled: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Mutable subset submitted on create/update
///
/// No `id`, no audit timestamps. Callers are expected to run
/// [`Validate::validate`] before submitting.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeFormData {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(custom(function = validate_poste))]
    pub poste: String,
    #[validate(length(min = 1))]
    pub department: String,
    #[validate(email)]
    pub email: String,
    pub hiring_date: NaiveDate,
    pub enabled: bool,
}

fn validate_poste(poste: &str) -> Result<(), ValidationError> {
    if !POSTES.contains(&poste) {
        return Err(ValidationError::new("poste"));
    }
    Ok(())
}

/// Status facet of [`EmployeeFilters`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Enabled,
    Disabled,
}

/// Client-side list filters
///
/// `search` matches case-insensitively against first name, last name,
/// email and poste; `poste: None` means "all positions".
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilters {
    pub search: String,
    pub poste: Option<String>,
    pub status: StatusFilter,
}

impl EmployeeFilters {
    /// True when the employee passes every active facet
    pub fn matches(&self, employee: &Employee) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = needle.is_empty()
            || employee.first_name.to_lowercase().contains(&needle)
            || employee.last_name.to_lowercase().contains(&needle)
            || employee.email.to_lowercase().contains(&needle)
            || employee.poste.to_lowercase().contains(&needle);

        let matches_poste = match &self.poste {
            Some(poste) => employee.poste == *poste,
            None => true,
        };

        let matches_status = match self.status {
            StatusFilter::All => true,
            StatusFilter::Enabled => employee.enabled,
            StatusFilter::Disabled => !employee.enabled,
        };

        matches_search && matches_poste && matches_status
    }
}
