use std::error::Error;
use std::path::Path;
use std::process::{Command, Output};

use tessera_test_support::Workspace;

fn tessera(args: &[&str], cwd: &Path) -> Result<Output, Box<dyn Error>> {
    Ok(Command::new(env!("CARGO_BIN_EXE_tessera"))
        .args(args)
        .current_dir(cwd)
        .env_remove("TESSERA_CONFIG")
        .env_remove("RUST_LOG")
        .output()?)
}

fn project(workspace: &Workspace, filters: &str) -> Result<(), Box<dyn Error>> {
    workspace.write("templates/report.vm", "Quarter ${quarter} by ${vendor}\n")?;
    workspace.write("filters/q1.properties", "quarter=1\n")?;
    workspace.write("filters/q2.properties", "quarter=2\n")?;
    workspace.write(
        "tessera.yaml",
        format!(
            "output_directory: generated
properties:
  vendor: acme
inherit_environment: false
templates:
  - source: templates/report.vm
    line_ending: dos
    filter_set:
      directory: {filters}
      includes: ['*.properties']
"
        ),
    )?;
    Ok(())
}

#[test]
fn run_uses_the_default_document_and_renders_json() -> Result<(), Box<dyn Error>> {
    let workspace = Workspace::new()?;
    project(&workspace, "filters")?;

    let output = tessera(&["--log-level", "warn", "run", "--format", "json"], workspace.path())?;

    assert_eq!(output.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["templates"][0]["skipped"], false);
    assert_eq!(
        report["templates"][0]["outputs"]
            .as_array()
            .map(Vec::len),
        Some(2)
    );
    assert_eq!(workspace.read("generated/q1.vm")?, "Quarter 1 by acme\r\n");
    assert_eq!(workspace.read("generated/q2.vm")?, "Quarter 2 by acme\r\n");
    Ok(())
}

#[test]
fn output_dir_flag_redirects_generated_files() -> Result<(), Box<dyn Error>> {
    let workspace = Workspace::new()?;
    project(&workspace, "filters")?;
    let target = workspace.join("elsewhere");
    let target = target.to_str().ok_or("non UTF-8 temp path")?;

    let output = tessera(&["run", "--output-dir", target], workspace.path())?;

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8(output.stdout)?.contains("wrote 2 file(s)"));
    assert_eq!(workspace.list("elsewhere")?, vec!["q1.vm", "q2.vm"]);
    assert!(!workspace.join("generated").exists());
    Ok(())
}

#[test]
fn check_validates_without_writing() -> Result<(), Box<dyn Error>> {
    let workspace = Workspace::new()?;
    project(&workspace, "filters")?;

    let output = tessera(&["check"], workspace.path())?;

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8(output.stdout)?.contains("configuration ok: 1 template(s)"));
    assert!(!workspace.join("generated").exists());
    Ok(())
}

#[test]
fn invalid_documents_exit_with_two() -> Result<(), Box<dyn Error>> {
    let workspace = Workspace::new()?;
    project(&workspace, "no-such-dir")?;

    let output = tessera(&["run"], workspace.path())?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("error: filters directory not found"));
    assert!(stderr.contains("no-such-dir"));
    assert!(!workspace.join("generated").exists());
    Ok(())
}

#[test]
fn write_failures_exit_with_three() -> Result<(), Box<dyn Error>> {
    let workspace = Workspace::new()?;
    project(&workspace, "filters")?;
    workspace.mkdir("generated/q1.vm")?;

    let output = tessera(&["run"], workspace.path())?;

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8(output.stderr)?.contains("error creating file"));
    Ok(())
}
