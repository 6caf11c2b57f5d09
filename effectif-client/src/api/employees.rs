//! Employee API

use crate::error::ClientResult;
use crate::interceptor::HttpInterceptor;
use reqwest::Response;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use shared::{ApiResponse, Employee, EmployeeFormData};
use std::sync::Arc;
use tracing::warn;

/// User-facing message for a body that is not the JSON we expected
const INVALID_FORMAT_ERROR: &str = "Format de réponse invalide";

/// Error body shape of the employee endpoints
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    state: Option<String>,
}

/// Typed client for the employees resource
pub struct EmployeeApi {
    http: Arc<HttpInterceptor>,
}

impl EmployeeApi {
    pub fn new(http: Arc<HttpInterceptor>) -> Self {
        Self { http }
    }

    /// List all employees
    pub async fn get_all(&self) -> ApiResponse<Vec<Employee>> {
        let result = self.try_get("/employes").await;
        normalize(result, "Erreur lors de la récupération des employés")
    }

    /// Fetch one employee by id
    pub async fn get_by_id(&self, id: i64) -> ApiResponse<Employee> {
        let result = self.try_get(&format!("/employes/{id}")).await;
        normalize(result, "Erreur lors de la récupération de l'employé")
    }

    /// Create a new employee
    pub async fn create(&self, employee: &EmployeeFormData) -> ApiResponse<Employee> {
        let result = self.try_create(employee).await;
        normalize(result, "Erreur lors de la création de l'employé")
    }

    /// Update an existing employee
    pub async fn update(&self, id: i64, employee: &EmployeeFormData) -> ApiResponse<Employee> {
        let result = self.try_update(id, employee).await;
        normalize(result, "Erreur lors de la mise à jour de l'employé")
    }

    /// Delete an employee
    pub async fn delete(&self, id: i64) -> ApiResponse<()> {
        let result = self.try_delete(id).await;
        normalize(result, "Erreur lors de la suppression de l'employé")
    }

    async fn try_get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<ApiResponse<T>> {
        handle_response(self.http.get(path).await?).await
    }

    async fn try_create(&self, employee: &EmployeeFormData) -> ClientResult<ApiResponse<Employee>> {
        handle_response(self.http.post("/employes", Some(employee)).await?).await
    }

    async fn try_update(
        &self,
        id: i64,
        employee: &EmployeeFormData,
    ) -> ClientResult<ApiResponse<Employee>> {
        handle_response(self.http.put(&format!("/employes/{id}"), Some(employee)).await?).await
    }

    async fn try_delete(&self, id: i64) -> ClientResult<ApiResponse<()>> {
        handle_empty_response(self.http.delete(&format!("/employes/{id}")).await?).await
    }
}

/// Convert transport-level failures into the envelope; the boundary never
/// propagates a raw error to callers
fn normalize<T>(result: ClientResult<ApiResponse<T>>, message: &str) -> ApiResponse<T> {
    match result {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!(error = %err, "employee API call failed");
            ApiResponse::error(500, message)
        }
    }
}

/// Normalize an interceptor response into the envelope shape
///
/// Non-OK status yields `error` (preferring the backend's `error` field),
/// OK status yields the parsed body as `data`. A body that fails to parse
/// yields the generic invalid-format error.
async fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<ApiResponse<T>> {
    let status = response.status();
    let code = status.as_u16();
    let text = response.text().await?;

    if !status.is_success() {
        let body: Option<ErrorBody> = serde_json::from_str(&text).ok();
        let (message, state) = match body {
            Some(body) => (
                body.error
                    .unwrap_or_else(|| format!("HTTP Error: {code}")),
                body.state,
            ),
            None => (format!("HTTP Error: {code}"), None),
        };
        return Ok(ApiResponse::error_with_state(code, message, state));
    }

    match serde_json::from_str::<T>(&text) {
        Ok(data) => Ok(ApiResponse::ok(data, code)),
        Err(err) => {
            warn!(error = %err, "response body is not the expected JSON");
            Ok(ApiResponse::error(code, INVALID_FORMAT_ERROR))
        }
    }
}

/// Like [`handle_response`] for endpoints whose success body is empty
async fn handle_empty_response(response: Response) -> ClientResult<ApiResponse<()>> {
    let status = response.status();
    let code = status.as_u16();

    if !status.is_success() {
        let text = response.text().await?;
        let body: Option<ErrorBody> = serde_json::from_str(&text).ok();
        let (message, state) = match body {
            Some(body) => (
                body.error
                    .unwrap_or_else(|| format!("HTTP Error: {code}")),
                body.state,
            ),
            None => (format!("HTTP Error: {code}"), None),
        };
        return Ok(ApiResponse::error_with_state(code, message, state));
    }

    Ok(ApiResponse::ok((), code))
}
