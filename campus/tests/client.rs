// Client configuration and API model shape tests. Live API calls are
// exercised against a development tenant, not from this suite.

use serial_test::serial;

use campus::client::{
    ClientConfig, ContentItem, Lesson, NewContentItem, NewLesson, Page, WebPackage,
    DEFAULT_BASE_URL,
};

#[test]
#[serial]
fn client_config_defaults_the_base_url() {
    std::env::set_var("CAMPUS_API_KEY", "key-123");
    std::env::remove_var("CAMPUS_BASE_URL");

    let config = ClientConfig::from_env().expect("Config should resolve");
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.api_key, "key-123");

    std::env::remove_var("CAMPUS_API_KEY");
}

#[test]
#[serial]
fn client_config_trims_trailing_slashes_from_the_base_url() {
    std::env::set_var("CAMPUS_API_KEY", "key-123");
    std::env::set_var("CAMPUS_BASE_URL", "https://staging.campuslearn.io/");

    let config = ClientConfig::from_env().expect("Config should resolve");
    assert_eq!(config.base_url, "https://staging.campuslearn.io");

    std::env::remove_var("CAMPUS_API_KEY");
    std::env::remove_var("CAMPUS_BASE_URL");
}

#[test]
#[serial]
fn client_config_requires_an_api_key() {
    std::env::remove_var("CAMPUS_API_KEY");

    let err = ClientConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("CAMPUS_API_KEY"));
}

#[test]
fn new_lesson_serialises_to_the_api_shape() {
    let body = serde_json::to_value(NewLesson {
        course_id: 3,
        title: "Introduction",
        position: None,
    })
    .expect("Serializes");
    assert_eq!(
        body,
        serde_json::json!({"course_id": 3, "title": "Introduction"})
    );

    let body = serde_json::to_value(NewContentItem {
        lesson_id: 7,
        title: "Lesson one",
        kind: "web_package",
        web_package_id: Some(31),
    })
    .expect("Serializes");
    assert_eq!(
        body,
        serde_json::json!({
            "lesson_id": 7,
            "title": "Lesson one",
            "kind": "web_package",
            "web_package_id": 31
        })
    );
}

#[test]
fn lesson_pages_deserialise() {
    let json = r#"{
        "items": [
            {"lesson_id": 1, "course_id": 3, "title": "Introduction", "position": 1},
            {"lesson_id": 2, "course_id": 3, "title": "Recursion", "position": 2}
        ],
        "page": 1,
        "page_size": 50,
        "total_items": 2
    }"#;

    let page: Page<Lesson> = serde_json::from_str(json).expect("Deserializes");
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].title, "Introduction");
    assert_eq!(page.items[1].lesson_id, 2);
    assert_eq!(page.total_items, 2);
}

#[test]
fn web_package_and_content_item_responses_deserialise() {
    let json = r#"{
        "web_package_id": 31,
        "lesson_id": 7,
        "name": "lesson1.zip",
        "checksum": "c0ffee",
        "size_bytes": 2048,
        "updated_datetime": "2026-01-12T09:30:00Z"
    }"#;
    let package: WebPackage = serde_json::from_str(json).expect("Deserializes");
    assert_eq!(package.web_package_id, 31);
    assert_eq!(package.checksum, "c0ffee");

    let json = r#"{
        "content_item_id": 91,
        "lesson_id": 7,
        "title": "Lesson one",
        "kind": "web_package",
        "web_package_id": 31
    }"#;
    let item: ContentItem = serde_json::from_str(json).expect("Deserializes");
    assert_eq!(item.kind, "web_package");
    assert_eq!(item.web_package_id, Some(31));
}
