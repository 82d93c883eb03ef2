// Pipeline tests: packaging plus upload against a mocked publisher.

use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::tempdir;

use campus_core::config::PublishConfig;
use campus_core::contract::{
    ContentItem, MockArchiver, MockPublisher, MockRenderer, NewContentItem, NewWebPackage,
    WebPackage,
};
use campus_core::publish::{publish, PublishError};

fn write_document(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, "---\ntitle: Lesson\n---\n\nHello.\n").expect("writing document fixture");
    path
}

fn rendering_ok() -> MockRenderer {
    let mut renderer = MockRenderer::new();
    renderer.expect_render().returning(|_, entry_point, output_dir, _| {
        fs::create_dir_all(output_dir).unwrap();
        fs::write(output_dir.join(entry_point), "<html>rendered</html>").unwrap();
        Ok(())
    });
    renderer
}

fn archiving_ok() -> MockArchiver {
    let mut archiver = MockArchiver::new();
    archiver.expect_archive().returning(|archive_name, _, _| {
        fs::write(archive_name, b"PK\x03\x04 fake archive").unwrap();
        Ok(0)
    });
    archiver
}

#[tokio::test]
#[serial]
async fn publishes_every_configured_document() {
    let dir = tempdir().unwrap();
    let config = PublishConfig {
        lesson_id: 7,
        output_dir: None,
        overwrite: false,
        quiet: true,
        documents: vec![
            write_document(dir.path(), "lesson1.qmd"),
            write_document(dir.path(), "lesson2.qmd"),
        ],
    };

    let mut publisher = MockPublisher::new();
    publisher
        .expect_upload_web_package()
        .times(2)
        .returning(|req: NewWebPackage<'_>| {
            assert_eq!(req.lesson_id, 7);
            assert!(req.archive.is_file(), "archive must exist at upload time");
            Ok(WebPackage {
                web_package_id: 31,
                lesson_id: req.lesson_id,
                name: req.name.to_owned(),
                checksum: "hash123".to_string(),
                updated_datetime: None,
            })
        });
    publisher
        .expect_create_content_item()
        .times(2)
        .returning(|req: NewContentItem<'_>| {
            assert_eq!(req.web_package_id, 31);
            Ok(ContentItem {
                content_item_id: 91,
                lesson_id: req.lesson_id,
                title: req.title.to_owned(),
                kind: "web_package".to_string(),
                web_package_id: Some(req.web_package_id),
                updated_datetime: None,
            })
        });

    let report = publish(&config, &rendering_ok(), &archiving_ok(), &publisher)
        .await
        .expect("publish should succeed");

    assert_eq!(report.lesson_id, 7);
    assert_eq!(report.published.len(), 2);
    let names: Vec<_> = report
        .published
        .iter()
        .map(|p| p.archive_path.file_name().unwrap().to_str().unwrap().to_owned())
        .collect();
    assert_eq!(names, ["lesson1.zip", "lesson2.zip"]);

    let output_dir = dir.path().canonicalize().unwrap();
    assert!(!output_dir.join("_lesson1").exists());
    assert!(!output_dir.join("_lesson2").exists());
}

#[tokio::test]
#[serial]
async fn stops_at_the_first_failing_upload() {
    let dir = tempdir().unwrap();
    let config = PublishConfig {
        lesson_id: 7,
        output_dir: None,
        overwrite: false,
        quiet: true,
        documents: vec![
            write_document(dir.path(), "lesson1.qmd"),
            write_document(dir.path(), "lesson2.qmd"),
        ],
    };

    let mut publisher = MockPublisher::new();
    // Content item creation must never be reached: no expectation set.
    publisher
        .expect_upload_web_package()
        .times(1)
        .returning(|_: NewWebPackage<'_>| Err("server rejected the archive".into()));

    let err = publish(&config, &rendering_ok(), &archiving_ok(), &publisher)
        .await
        .unwrap_err();

    match err {
        PublishError::Upload { document, source } => {
            assert_eq!(document.file_name().unwrap(), "lesson1.qmd");
            assert!(source.to_string().contains("server rejected"));
        }
        other => panic!("expected an upload error, got {other:?}"),
    }
}

#[tokio::test]
#[serial]
async fn packaging_errors_abort_before_any_upload() {
    let dir = tempdir().unwrap();
    let config = PublishConfig {
        lesson_id: 7,
        output_dir: None,
        overwrite: false,
        quiet: true,
        // Never written to disk, so packaging fails validation.
        documents: vec![dir.path().join("lesson1.qmd")],
    };

    let err = publish(
        &config,
        &MockRenderer::new(),
        &MockArchiver::new(),
        &MockPublisher::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PublishError::Package(_)));
}
