//! Event request DTOs

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::{
    constants::{MAX_EVENT_DESCRIPTION_LENGTH, MAX_EVENT_TITLE_LENGTH, MAX_LOCATION_LENGTH},
    utils::validation::{
        validate_event_status, validate_not_blank, validate_programs, validate_time_of_day,
    },
};

/// Create event request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(
        length(min = 1, max = MAX_EVENT_TITLE_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub title: String,

    #[validate(
        length(min = 1, max = MAX_EVENT_DESCRIPTION_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub description: String,

    pub date: NaiveDate,

    #[validate(custom(function = "validate_time_of_day"))]
    pub start_time: String,

    #[validate(custom(function = "validate_time_of_day"))]
    pub end_time: String,

    #[validate(
        length(min = 1, max = MAX_LOCATION_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub location: String,

    #[validate(range(min = 1))]
    pub capacity: i32,

    pub image_url: Option<String>,

    pub tags: Option<Vec<String>>,

    /// Eligible programs; omitted or empty means everyone
    #[validate(custom(function = "validate_programs"))]
    pub programs: Option<Vec<String>>,
}

/// Partial event update; omitted fields are left alone
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(
        length(min = 1, max = MAX_EVENT_TITLE_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub title: Option<String>,

    #[validate(
        length(min = 1, max = MAX_EVENT_DESCRIPTION_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub description: Option<String>,

    pub date: Option<NaiveDate>,

    #[validate(custom(function = "validate_time_of_day"))]
    pub start_time: Option<String>,

    #[validate(custom(function = "validate_time_of_day"))]
    pub end_time: Option<String>,

    #[validate(
        length(min = 1, max = MAX_LOCATION_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub location: Option<String>,

    #[validate(range(min = 1))]
    pub capacity: Option<i32>,

    pub image_url: Option<String>,

    #[validate(custom(function = "validate_event_status"))]
    pub status: Option<String>,

    pub tags: Option<Vec<String>>,

    #[validate(custom(function = "validate_programs"))]
    pub programs: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_json() -> serde_json::Value {
        serde_json::json!({
            "title": "Resume Workshop",
            "description": "Bring a printed copy",
            "date": "2026-11-20",
            "startTime": "18:00",
            "endTime": "20:00",
            "location": "ENG 103",
            "capacity": 40,
            "programs": ["Computer Engineering"]
        })
    }

    #[test]
    fn test_create_request_accepts_camel_case() {
        let req: CreateEventRequest = serde_json::from_value(create_json()).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.start_time, "18:00");
        assert_eq!(req.tags, None);
    }

    #[test]
    fn test_create_request_rejects_bad_fields() {
        let mut json = create_json();
        json["capacity"] = 0.into();
        let req: CreateEventRequest = serde_json::from_value(json).unwrap();
        assert!(req.validate().is_err());

        let mut json = create_json();
        json["startTime"] = "6pm".into();
        let req: CreateEventRequest = serde_json::from_value(json).unwrap();
        assert!(req.validate().is_err());

        let mut json = create_json();
        json["programs"] = serde_json::json!(["Underwater Basket Weaving"]);
        let req: CreateEventRequest = serde_json::from_value(json).unwrap();
        assert!(req.validate().is_err());

        for field in ["title", "description", "location"] {
            let mut json = create_json();
            json[field] = "   ".into();
            let req: CreateEventRequest = serde_json::from_value(json).unwrap();
            assert!(req.validate().is_err(), "blank {field} accepted");
        }
    }

    #[test]
    fn test_update_request_validates_only_present_fields() {
        let req: UpdateEventRequest =
            serde_json::from_value(serde_json::json!({ "status": "published" })).unwrap();
        assert!(req.validate().is_ok());

        let req: UpdateEventRequest =
            serde_json::from_value(serde_json::json!({ "status": "archived" })).unwrap();
        assert!(req.validate().is_err());

        let req: UpdateEventRequest =
            serde_json::from_value(serde_json::json!({ "capacity": -3 })).unwrap();
        assert!(req.validate().is_err());

        let req: UpdateEventRequest =
            serde_json::from_value(serde_json::json!({ "title": "  " })).unwrap();
        assert!(req.validate().is_err());
    }
}
