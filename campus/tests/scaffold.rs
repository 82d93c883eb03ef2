use std::fs;

use tempfile::tempdir;

use campus::scaffold::{install_workflow, ScaffoldError};

#[test]
fn installs_the_workflow_into_a_fresh_project() {
    let project = tempdir().unwrap();

    let path = install_workflow(project.path(), false).expect("Install should succeed");
    assert_eq!(
        path,
        project
            .path()
            .join(".github")
            .join("workflows")
            .join("publish-lessons.yml")
    );
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("quarto-dev/quarto-actions/setup"));
    assert!(contents.contains("campus publish"));
}

#[test]
fn refuses_to_overwrite_without_force() {
    let project = tempdir().unwrap();
    let path = install_workflow(project.path(), false).expect("Install should succeed");
    fs::write(&path, "# locally edited\n").unwrap();

    let err = install_workflow(project.path(), false).unwrap_err();
    assert!(matches!(err, ScaffoldError::WorkflowExists { .. }));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "# locally edited\n",
        "the edited workflow must be untouched"
    );
}

#[test]
fn force_restores_the_shipped_workflow() {
    let project = tempdir().unwrap();
    let path = install_workflow(project.path(), false).expect("Install should succeed");
    fs::write(&path, "# locally edited\n").unwrap();

    install_workflow(project.path(), true).expect("Forced install should succeed");
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("Publish lessons"));
}
