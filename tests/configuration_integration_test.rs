//! Integration tests for loading a configuration from an INI file

use navigator_config::config::{Configuration, RawSource};
use navigator_config::domain::ErrorKind;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

const EVERY_SU: &str = "\
PSU_ID,AREA,SSU_ID,SSU_NAME,TSU_ID,TSU_NAME
204,Uptown,One,West Side,1-1,Center
204,Uptown,Two,West Side,,
204,Downtown,Three,Dorms,,
";

const NAVIGATOR_INI: &str = r#"
[Study Center]
sc_id = 20000000
recruitment_type_id = 3
short_name = GCSC
username = Greater Chicago NetID
sampling_units_file = every_su.csv
exception_email_recipients = Fred MacMurray <fred@pitt.edu>, Jim Stewart <jim@pitt.edu>
footer_logo_left = ncs_logo.png
footer_text = "National Children's Study - Greater Chicago Study Center\nInstitute for Healthcare Studies\nFeinberg School of Medicine\nNorthwestern University\n420 East Superior, 10th Floor"

[Staff Portal]
uri = https://staffportal.greaterchicagoncs.org/
mail_from = staffportal@greaterchicagoncs.org
psc_user_password = secret

[Core]
uri = https://ncsnavigator.greaterchicagoncs.org/
machine_account_username = ncs_navigator_cases
machine_account_password = hush

[PSC]
uri = https://calendar.greaterchicagoncs.org/

[SMTP]
host = smtp.greaterchicagoncs.org
port = 587
domain = greaterchicagoncs.org
authentication = plain
username = mailman
password = tiger
starttls = true
"#;

/// Writes the INI and the sampling units CSV into the same directory
fn write_fixture(ini: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("every_su.csv"), EVERY_SU).unwrap();
    let ini_path = dir.path().join("navigator.ini");
    fs::write(&ini_path, ini).unwrap();
    (dir, ini_path)
}

#[test]
fn test_load_complete_file() {
    let (_dir, ini_path) = write_fixture(NAVIGATOR_INI);
    let config = Configuration::from_file(&ini_path).unwrap();

    assert_eq!(config.study_center_id(), Some("20000000"));
    assert_eq!(config.recruitment_type_id(), Some("3"));
    assert_eq!(config.study_center_short_name(), "GCSC");
    assert_eq!(config.study_center_username(), "Greater Chicago NetID");
    assert_eq!(
        config.exception_email_recipients(),
        ["Fred MacMurray <fred@pitt.edu>", "Jim Stewart <jim@pitt.edu>"]
    );
    assert_eq!(
        config.staff_portal_uri().unwrap().as_str(),
        "https://staffportal.greaterchicagoncs.org/"
    );
    assert_eq!(
        config.staff_portal_mail_from(),
        "staffportal@greaterchicagoncs.org"
    );
    assert_eq!(
        config.core_machine_account_username(),
        Some("ncs_navigator_cases")
    );
    assert_eq!(config.core_mail_from(), "cases@navigator.example.edu");
    assert_eq!(
        config.psc_uri().unwrap().host_str(),
        Some("calendar.greaterchicagoncs.org")
    );
    assert_eq!(config.smtp_port(), 587);
    assert_eq!(config.smtp_authentication_method().unwrap().as_str(), "plain");
    assert!(config.smtp_starttls());
}

#[test]
fn test_relative_paths_resolve_against_file_directory() {
    let (dir, ini_path) = write_fixture(NAVIGATOR_INI);
    let config = Configuration::from_file(&ini_path).unwrap();

    let expected_dir = dir.path().canonicalize().unwrap();
    let resolved = config.sampling_units_file().unwrap();
    assert!(resolved.is_absolute());
    assert_eq!(
        resolved.canonicalize().unwrap(),
        expected_dir.join("every_su.csv")
    );
    assert_eq!(
        config.footer_logo_left().unwrap().file_name(),
        Some(Path::new("ncs_logo.png").as_os_str())
    );
    assert!(config.footer_logo_left().unwrap().is_absolute());
    assert!(config.source_path().unwrap().is_absolute());
}

#[test]
fn test_file_and_mapping_sources_agree() {
    let (_dir, ini_path) = write_fixture(NAVIGATOR_INI);
    let from_file = Configuration::new(ini_path.as_path()).unwrap();

    let raw = RawSource::from_ini_str(NAVIGATOR_INI).unwrap();
    let from_mapping = Configuration::new(raw).unwrap();

    assert_eq!(from_file.study_center_id(), from_mapping.study_center_id());
    assert_eq!(from_file.staff_portal_uri(), from_mapping.staff_portal_uri());
    assert_eq!(from_file.psc_uri(), from_mapping.psc_uri());
    assert_eq!(
        serde_json::to_value(from_file.smtp_settings()).unwrap(),
        serde_json::to_value(from_mapping.smtp_settings()).unwrap()
    );
    assert_eq!(from_file.footer_text(), from_mapping.footer_text());
    assert_eq!(from_file.staff_portal(), from_mapping.staff_portal());

    // Only the file-backed configuration resolves relative paths
    assert_eq!(
        from_mapping.sampling_units_file(),
        Some(Path::new("every_su.csv"))
    );
    assert_ne!(
        from_file.sampling_units_file(),
        from_mapping.sampling_units_file()
    );
}

#[test]
fn test_sampling_unit_hierarchy_from_file() {
    let (_dir, ini_path) = write_fixture(NAVIGATOR_INI);
    let config = Configuration::from_file(&ini_path).unwrap();

    let psus = config.primary_sampling_units().unwrap();
    assert_eq!(psus.len(), 1);
    assert_eq!(psus[0].id(), "204");

    let areas: Vec<_> = psus[0].sampling_unit_areas().map(|a| a.name()).collect();
    assert_eq!(areas, ["Uptown", "Downtown"]);
    assert_eq!(config.sampling_unit_areas().unwrap().len(), 2);

    let uptown = psus[0].sampling_unit_areas().next().unwrap();
    let ssu_ids: Vec<_> = uptown.secondary_sampling_units().map(|s| s.id()).collect();
    assert_eq!(ssu_ids, ["One", "Two"]);

    let ssus = config.secondary_sampling_units().unwrap();
    assert_eq!(ssus.len(), 3);

    let one = &ssus[0];
    assert_eq!(one.name(), Some("West Side"));
    assert_eq!(one.sampling_unit_area(), uptown);
    assert_eq!(one.primary_sampling_unit(), psus[0]);

    let tsus: Vec<_> = one.tertiary_sampling_units().collect();
    assert_eq!(tsus.len(), 1);
    assert_eq!(tsus[0].id(), "1-1");
    assert_eq!(tsus[0].name(), Some("Center"));
    assert_eq!(tsus[0].secondary_sampling_unit(), *one);

    assert_eq!(ssus[1].tertiary_sampling_units().count(), 0);
}

#[test]
fn test_sampling_units_are_loaded_once() {
    let (dir, ini_path) = write_fixture(NAVIGATOR_INI);
    let config = Configuration::from_file(&ini_path).unwrap();

    let first = config.sampling_units().unwrap() as *const _;
    fs::remove_file(dir.path().join("every_su.csv")).unwrap();
    let second = config.sampling_units().unwrap() as *const _;
    assert_eq!(first, second);
}

#[test]
fn test_missing_sampling_units_file_fails_on_access_only() {
    let dir = TempDir::new().unwrap();
    let ini_path = dir.path().join("navigator.ini");
    fs::write(&ini_path, NAVIGATOR_INI).unwrap();

    let config = Configuration::from_file(&ini_path).unwrap();
    assert!(config.study_center_id().is_some());
    assert!(config.primary_sampling_units().is_err());

    // Not cached: a file that appears later is picked up
    fs::write(dir.path().join("every_su.csv"), EVERY_SU).unwrap();
    assert_eq!(config.primary_sampling_units().unwrap().len(), 1);
}

#[test]
fn test_missing_configuration_file() {
    let err = Configuration::from_file("/nonexistent/navigator.ini").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SourceUnreadable);
    assert!(err.to_string().contains("/nonexistent/navigator.ini"));
    assert!(err.to_string().contains("does not exist or is not readable"));
}

#[test]
fn test_missing_required_uri_in_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(b"[Study Center]\nsc_id = 18\n\n[PSC]\nuri = https://psc.example.edu/\n")
        .unwrap();

    let err = Configuration::from_file(temp_file.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredAttribute);
    assert_eq!(err.to_string(), "Please set a value for [Staff Portal]: uri");
}

#[test]
fn test_invalid_port_in_file() {
    let ini = NAVIGATOR_INI.replace("port = 587", "port = twenty-five");
    let (_dir, ini_path) = write_fixture(&ini);

    let err = Configuration::from_file(&ini_path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CoercionFailure);
    assert!(err.to_string().contains("[SMTP]"));
    assert!(err.to_string().contains("twenty-five"));
}

#[test]
fn test_footer_text_lines_become_html() {
    let (_dir, ini_path) = write_fixture(NAVIGATOR_INI);
    let config = Configuration::from_file(&ini_path).unwrap();

    assert_eq!(config.footer_text().unwrap().lines().count(), 5);

    let html = config.footer_center_html().unwrap();
    let lines: Vec<_> = html.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[0],
        "National Children's Study - Greater Chicago Study Center<br>"
    );
    assert_eq!(lines[4], "420 East Superior, 10th Floor");
}

#[test]
fn test_pass_through_sections() {
    let (_dir, ini_path) = write_fixture(NAVIGATOR_INI);
    let config = Configuration::from_file(&ini_path).unwrap();

    assert_eq!(
        config.staff_portal().get("psc_user_password").map(String::as_str),
        Some("secret")
    );
    assert_eq!(
        config.core().get("uri").map(String::as_str),
        Some("https://ncsnavigator.greaterchicagoncs.org/")
    );
    assert!(config.section("SMTP").is_none());
}

#[test]
fn test_debug_output_hides_passwords() {
    let (_dir, ini_path) = write_fixture(NAVIGATOR_INI);
    let config = Configuration::from_file(&ini_path).unwrap();

    let rendered = format!("{config:?}");
    assert!(rendered.contains("REDACTED"));
    assert!(!rendered.contains("tiger"));
    assert!(!rendered.contains("hush"));
    assert!(rendered.contains("20000000"));
}

#[test]
fn test_backslashes_survive_file_decoding() {
    let ini = NAVIGATOR_INI.replace(
        "footer_logo_left = ncs_logo.png",
        r"footer_logo_left = C:\data\logos\big.png",
    );
    let (_dir, ini_path) = write_fixture(&ini);
    let config = Configuration::from_file(&ini_path).unwrap();

    let logo = config.footer_logo_left().unwrap().to_string_lossy();
    assert!(logo.ends_with(r"C:\data\logos\big.png"));

    // The footer's `\n` escapes are still decoded
    assert_eq!(config.footer_text().unwrap().lines().count(), 5);
}
