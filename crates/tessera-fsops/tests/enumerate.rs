use std::error::Error;

use tessera_config::FilterSet;
use tessera_fsops::{FileEnumerator, FsOpsError, GlobEnumerator};
use tessera_test_support::Workspace;

#[test]
fn enumerates_matching_files_in_relative_path_order() -> Result<(), Box<dyn Error>> {
    let workspace = Workspace::new()?;
    workspace.write("filters/q2.properties", "quarter=2")?;
    workspace.write("filters/q1.properties", "quarter=1")?;
    workspace.write("filters/README.txt", "ignored")?;
    workspace.write("filters/archive/q4.properties", "quarter=4")?;
    workspace.write("filters/.git/config.properties", "vcs")?;

    let filter_set = FilterSet::new(workspace.join("filters")).include("**/*.properties");
    let files = GlobEnumerator::new().enumerate(&filter_set)?;

    assert_eq!(
        files,
        vec![
            workspace.join("filters/archive/q4.properties"),
            workspace.join("filters/q1.properties"),
            workspace.join("filters/q2.properties"),
        ]
    );
    Ok(())
}

#[test]
fn excludes_remove_files_from_the_selection() -> Result<(), Box<dyn Error>> {
    let workspace = Workspace::new()?;
    workspace.write("filters/en.properties", "name=World")?;
    workspace.write("filters/de.properties", "name=Welt")?;

    let filter_set = FilterSet::new(workspace.join("filters"))
        .include("*.properties")
        .exclude("de.*");
    let files = GlobEnumerator::new().enumerate(&filter_set)?;

    assert_eq!(files, vec![workspace.join("filters/en.properties")]);
    Ok(())
}

#[test]
fn empty_directory_yields_no_files() -> Result<(), Box<dyn Error>> {
    let workspace = Workspace::new()?;
    workspace.mkdir("filters")?;
    let files = GlobEnumerator::new().enumerate(&FilterSet::new(workspace.join("filters")))?;
    assert!(files.is_empty());
    Ok(())
}

#[test]
fn missing_directory_is_reported() -> Result<(), Box<dyn Error>> {
    let workspace = Workspace::new()?;
    let err = GlobEnumerator::new()
        .enumerate(&FilterSet::new(workspace.join("vanished")))
        .err()
        .ok_or_else(|| std::io::Error::other("expected failure"))?;
    assert!(matches!(err, FsOpsError::DirectoryMissing { .. }));
    assert!(err.to_string().contains("vanished"));
    Ok(())
}
