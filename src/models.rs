use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Label shown instead of a price for free courses
pub const FREE_LABEL: &str = "Free";
/// Currency marker appended to formatted prices
pub const CURRENCY: &str = "VND";
/// Placeholder for optional text columns
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub image: Option<CourseImage>,
    #[serde(default)]
    pub teacher_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<f64>,
    #[serde(rename = "type", default)]
    pub delivery_type: Option<DeliveryType>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: CourseStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseImage {
    #[serde(default)]
    pub file_url: Option<String>,
}

impl Course {
    pub fn image_url(&self) -> Option<&str> {
        self.image
            .as_ref()
            .and_then(|image| image.file_url.as_deref())
            .filter(|url| !url.is_empty())
    }

    pub fn teacher_display(&self) -> &str {
        non_empty_or_na(self.teacher_name.as_deref())
    }

    pub fn category_display(&self) -> &str {
        non_empty_or_na(self.category.as_deref())
    }

    pub fn price_display(&self) -> String {
        format_price(self.price)
    }

    /// Route of the course detail view
    pub fn detail_route(&self) -> String {
        detail_route(&self.id)
    }
}

pub fn detail_route(course_id: &str) -> String {
    format!("/courses/view/{}", course_id)
}

fn non_empty_or_na(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_AVAILABLE,
    }
}

/// Colors used for tags, independent of the rendering backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagColor {
    Gray,
    Orange,
    Green,
    Blue,
    Red,
    Purple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    #[default]
    Draft,
    Pending,
    Published,
    Hidden,
    Rejected,
    /// A status this console does not know; never sent back
    #[serde(other)]
    Unknown,
}

impl CourseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseStatus::Draft => "draft",
            CourseStatus::Pending => "pending",
            CourseStatus::Published => "published",
            CourseStatus::Hidden => "hidden",
            CourseStatus::Rejected => "rejected",
            CourseStatus::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CourseStatus::Draft => "Draft",
            CourseStatus::Pending => "Pending review",
            CourseStatus::Published => "Published",
            CourseStatus::Hidden => "Hidden",
            CourseStatus::Rejected => "Rejected",
            CourseStatus::Unknown => "Unknown",
        }
    }

    pub fn color(&self) -> TagColor {
        match self {
            CourseStatus::Draft => TagColor::Gray,
            CourseStatus::Pending => TagColor::Orange,
            CourseStatus::Published => TagColor::Green,
            CourseStatus::Hidden => TagColor::Blue,
            CourseStatus::Rejected => TagColor::Red,
            CourseStatus::Unknown => TagColor::Gray,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    Online,
    Offline,
    /// Any value the backend sends that this console does not know
    #[serde(other)]
    Unknown,
}

/// Tag text and color for a course's delivery type.
///
/// A missing or unrecognised type falls back to a gray `N/A` tag.
pub fn delivery_tag(delivery_type: Option<DeliveryType>) -> (&'static str, TagColor) {
    match delivery_type {
        Some(DeliveryType::Online) => ("ONLINE", TagColor::Blue),
        Some(DeliveryType::Offline) => ("OFFLINE", TagColor::Purple),
        Some(DeliveryType::Unknown) | None => (NOT_AVAILABLE, TagColor::Gray),
    }
}

/// Format a price for display: free label for missing or zero prices,
/// otherwise a thousands-grouped number with the currency marker.
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) if p != 0.0 && p.is_finite() => format!("{} {}", group_thousands(p), CURRENCY),
        _ => FREE_LABEL.to_string(),
    }
}

fn group_thousands(value: f64) -> String {
    // At most three fraction digits, trailing zeros dropped
    let rounded = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    if value < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if !frac_part.is_empty() {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

/// Admin moderation of a pending course
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Reject,
}

impl ModerationAction {
    /// Parse a menu/command key. Unknown keys produce no action.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "approve" | "published" => Some(ModerationAction::Approve),
            "reject" | "rejected" => Some(ModerationAction::Reject),
            _ => None,
        }
    }

    pub fn target_status(self) -> CourseStatus {
        match self {
            ModerationAction::Approve => CourseStatus::Published,
            ModerationAction::Reject => CourseStatus::Rejected,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            ModerationAction::Approve => "approve",
            ModerationAction::Reject => "reject",
        }
    }

    pub fn confirm_label(self) -> &'static str {
        match self {
            ModerationAction::Approve => "Approve",
            ModerationAction::Reject => "Reject",
        }
    }

    /// Only pending courses can be moderated
    pub fn is_allowed_from(self, status: CourseStatus) -> bool {
        status == CourseStatus::Pending
    }
}

/// Body of `PUT /courses/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusUpdate {
    pub status: CourseStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Teacher, Role::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Teacher => "Teacher",
            Role::Student => "Student",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Role::ALL
            .into_iter()
            .find(|role| role.label() == value || role.as_str() == value.to_lowercase())
    }
}

/// Body of `POST /users/registerByAdmin`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRegistrationRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: Role,
}

/// `GET /courses` answers either with a bare array or wrapped in `data`
#[derive(Debug)]
pub enum CourseListResponse {
    List(Vec<Course>),
    Wrapped { data: Vec<Course> },
}

impl CourseListResponse {
    pub fn into_courses(self) -> Vec<Course> {
        match self {
            CourseListResponse::List(courses) => courses,
            CourseListResponse::Wrapped { data } => data,
        }
    }
}

impl<'de> Deserialize<'de> for CourseListResponse {
    // Dispatch on the shape so a bad course reports its own error
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wrapped {
            data: Vec<Course>,
        }

        match Value::deserialize(deserializer)? {
            value @ Value::Array(_) => serde_json::from_value(value)
                .map(CourseListResponse::List)
                .map_err(serde::de::Error::custom),
            value => serde_json::from_value::<Wrapped>(value)
                .map(|wrapped| CourseListResponse::Wrapped { data: wrapped.data })
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Treat an explicit `null` like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        other => Err(serde::de::Error::custom(format!(
            "expected numeric price, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_deserialization() {
        let json = r#"{
            "id": 42,
            "name": "Rust for Beginners",
            "description": "Ownership, borrowing and lifetimes",
            "image": { "file_url": "https://cdn.example.com/rust.png" },
            "teacher_name": "Nguyen Van A",
            "category": null,
            "price": "1500000",
            "type": "online",
            "status": "pending"
        }"#;

        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.id, "42");
        assert_eq!(course.image_url(), Some("https://cdn.example.com/rust.png"));
        assert_eq!(course.teacher_display(), "Nguyen Van A");
        assert_eq!(course.category_display(), NOT_AVAILABLE);
        assert_eq!(course.price, Some(1_500_000.0));
        assert_eq!(course.delivery_type, Some(DeliveryType::Online));
        assert_eq!(course.status, CourseStatus::Pending);
        assert_eq!(course.detail_route(), "/courses/view/42");
    }

    #[test]
    fn test_course_with_missing_optional_fields() {
        let course: Course = serde_json::from_str(r#"{"id": "c-1", "name": "Intro"}"#).unwrap();
        assert_eq!(course.teacher_display(), NOT_AVAILABLE);
        assert_eq!(course.image_url(), None);
        assert_eq!(course.price_display(), FREE_LABEL);
        assert_eq!(course.delivery_type, None);
        assert_eq!(course.status, CourseStatus::Draft);
    }

    #[test]
    fn test_empty_teacher_name_is_not_available() {
        let course: Course =
            serde_json::from_str(r#"{"id": "c-1", "teacher_name": ""}"#).unwrap();
        assert_eq!(course.teacher_display(), NOT_AVAILABLE);
    }

    #[test]
    fn test_unknown_delivery_type_falls_back() {
        let course: Course = serde_json::from_str(r#"{"id": "c-1", "type": "hybrid"}"#).unwrap();
        assert_eq!(course.delivery_type, Some(DeliveryType::Unknown));
        assert_eq!(delivery_tag(course.delivery_type), (NOT_AVAILABLE, TagColor::Gray));
    }

    #[test]
    fn test_free_prices() {
        assert_eq!(format_price(None), FREE_LABEL);
        assert_eq!(format_price(Some(0.0)), FREE_LABEL);
    }

    #[test]
    fn test_paid_prices_are_grouped() {
        assert_eq!(format_price(Some(5.0)), "5 VND");
        assert_eq!(format_price(Some(999.0)), "999 VND");
        assert_eq!(format_price(Some(1000.0)), "1,000 VND");
        assert_eq!(format_price(Some(1_500_000.0)), "1,500,000 VND");
        assert_eq!(format_price(Some(1234.5)), "1,234.5 VND");
        assert_eq!(format_price(Some(0.1239)), "0.124 VND");
    }

    #[test]
    fn test_delivery_tags_are_fixed() {
        assert_eq!(delivery_tag(Some(DeliveryType::Online)), ("ONLINE", TagColor::Blue));
        assert_eq!(delivery_tag(Some(DeliveryType::Offline)), ("OFFLINE", TagColor::Purple));
    }

    #[test]
    fn test_moderation_action_mapping() {
        assert_eq!(ModerationAction::Approve.target_status(), CourseStatus::Published);
        assert_eq!(ModerationAction::Reject.target_status(), CourseStatus::Rejected);
        assert_eq!(ModerationAction::from_key("published"), Some(ModerationAction::Approve));
        assert_eq!(ModerationAction::from_key("Reject"), Some(ModerationAction::Reject));
        assert_eq!(ModerationAction::from_key("hidden"), None);
        assert_eq!(ModerationAction::from_key("delete"), None);
    }

    #[test]
    fn test_only_pending_courses_are_moderated() {
        assert!(ModerationAction::Approve.is_allowed_from(CourseStatus::Pending));
        assert!(!ModerationAction::Approve.is_allowed_from(CourseStatus::Published));
        assert!(!ModerationAction::Reject.is_allowed_from(CourseStatus::Draft));
    }

    #[test]
    fn test_status_update_wire_format() {
        let body = serde_json::to_value(StatusUpdate { status: CourseStatus::Rejected }).unwrap();
        assert_eq!(body, serde_json::json!({ "status": "rejected" }));
    }

    #[test]
    fn test_course_list_response_shapes() {
        let bare: CourseListResponse = serde_json::from_str(r#"[{"id": 1}]"#).unwrap();
        assert_eq!(bare.into_courses().len(), 1);

        let wrapped: CourseListResponse =
            serde_json::from_str(r#"{"data": [{"id": 1}, {"id": 2}]}"#).unwrap();
        assert_eq!(wrapped.into_courses().len(), 2);
    }

    #[test]
    fn test_null_fields_do_not_fail_the_list() {
        let list: CourseListResponse = serde_json::from_str(
            r#"[
                {"id": 1, "name": "A", "description": null, "status": "pending"},
                {"id": 2, "name": "B"},
                {"id": 3, "name": null, "status": null},
                {"id": 4, "status": "archived"}
            ]"#,
        )
        .unwrap();
        let courses = list.into_courses();

        assert_eq!(courses.len(), 4);
        assert_eq!(courses[0].description, "");
        assert_eq!(courses[0].status, CourseStatus::Pending);
        assert_eq!(courses[2].name, "");
        assert_eq!(courses[2].status, CourseStatus::Draft);
        assert_eq!(courses[3].status, CourseStatus::Unknown);
        assert_eq!(courses[3].status.label(), "Unknown");
        assert!(!ModerationAction::Approve.is_allowed_from(courses[3].status));
    }

    #[test]
    fn test_bad_course_reports_its_own_error() {
        let err = serde_json::from_str::<CourseListResponse>(r#"{"data": [{"id": true}]}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("expected string or number id"), "{}", err);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::from_label("Teacher"), Some(Role::Teacher));
        assert_eq!(Role::from_label("student"), Some(Role::Student));
        assert_eq!(Role::from_label("admin"), None);
    }
}
