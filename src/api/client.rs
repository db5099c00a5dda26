//! REST client for the course platform backend

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::api::ApiError;
use crate::config::Config;
use crate::models::{
    Course, CourseListResponse, CourseStatus, StatusUpdate, UserRegistrationRequest,
};

/// Backend endpoints used by the console
pub struct Endpoints;

impl Endpoints {
    pub const COURSES: &'static str = "/courses";
    pub const REGISTER_BY_ADMIN: &'static str = "/users/registerByAdmin";
}

/// Operations the console needs from the backend
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// `GET /courses`
    async fn list_courses(&self) -> Result<Vec<Course>, ApiError>;

    /// `DELETE /courses/{id}`
    async fn delete_course(&self, course_id: &str) -> Result<(), ApiError>;

    /// `PUT /courses/{id}` with `{ status }`
    async fn update_course_status(
        &self,
        course_id: &str,
        status: CourseStatus,
    ) -> Result<(), ApiError>;

    /// `POST /users/registerByAdmin`
    async fn register_user(&self, request: &UserRegistrationRequest) -> Result<(), ApiError>;
}

/// Error body the backend returns on failures
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// `AdminApi` over HTTP with reqwest
#[derive(Debug, Clone)]
pub struct HttpAdminApi {
    client: Client,
    base_url: String,
}

impl HttpAdminApi {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let base_url = config.api_base().to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidBaseUrl(config.api_base_url.clone()));
        }

        let client = Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `/courses/{id}` with the id percent-encoded as one path segment
    fn course_url(&self, course_id: &str) -> Result<Url, ApiError> {
        let invalid = || ApiError::InvalidBaseUrl(self.base_url.clone());
        let mut url = Url::parse(&self.url(Endpoints::COURSES)).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .push(course_id);
        Ok(url)
    }
}

/// Turn non-2xx responses into `ApiError::Status`, keeping the server message
async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message);

    warn!("Request failed with status {}: {}", status, body);

    Err(ApiError::Status {
        status_code: status.as_u16(),
        message,
    })
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        let url = self.url(Endpoints::COURSES);
        debug!("Fetching courses from: {}", url);

        let response = ensure_success(self.client.get(&url).send().await?).await?;
        let body = response.text().await?;
        let courses = serde_json::from_str::<CourseListResponse>(&body)?.into_courses();

        info!("Fetched {} courses", courses.len());
        Ok(courses)
    }

    async fn delete_course(&self, course_id: &str) -> Result<(), ApiError> {
        let url = self.course_url(course_id)?;
        info!("Deleting course {}", course_id);

        ensure_success(self.client.delete(url).send().await?).await?;
        Ok(())
    }

    async fn update_course_status(
        &self,
        course_id: &str,
        status: CourseStatus,
    ) -> Result<(), ApiError> {
        let url = self.course_url(course_id)?;
        info!("Setting course {} status to {}", course_id, status.as_str());

        ensure_success(
            self.client
                .put(url)
                .json(&StatusUpdate { status })
                .send()
                .await?,
        )
        .await?;
        Ok(())
    }

    async fn register_user(&self, request: &UserRegistrationRequest) -> Result<(), ApiError> {
        let url = self.url(Endpoints::REGISTER_BY_ADMIN);
        info!("Registering {} account for {}", request.role.as_str(), request.email);

        ensure_success(self.client.post(&url).json(request).send().await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(Endpoints::COURSES, "/courses");
        assert_eq!(Endpoints::REGISTER_BY_ADMIN, "/users/registerByAdmin");
    }

    #[test]
    fn test_course_id_is_one_path_segment() {
        let config = Config::default().with_api_base_url("http://localhost:9000/api");
        let api = HttpAdminApi::new(&config).unwrap();

        assert_eq!(
            api.course_url("abc").unwrap().as_str(),
            "http://localhost:9000/api/courses/abc"
        );
        assert_eq!(
            api.course_url("a/b?c#d").unwrap().as_str(),
            "http://localhost:9000/api/courses/a%2Fb%3Fc%23d"
        );
    }

    #[test]
    fn test_client_rejects_bad_base_url() {
        let config = Config::default().with_api_base_url("localhost:8080");
        assert!(matches!(HttpAdminApi::new(&config), Err(ApiError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_client_joins_paths() {
        let config = Config::default().with_api_base_url("http://localhost:9000/api/");
        let api = HttpAdminApi::new(&config).unwrap();
        assert_eq!(api.url("/courses"), "http://localhost:9000/api/courses");
    }
}
