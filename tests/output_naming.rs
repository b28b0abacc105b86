use sheet_linkcheck::report::{json_path, output_path};
use std::path::{Path, PathBuf};

const SUFFIX: &str = "_broken_urls.xlsx";

fn out(p: &str) -> PathBuf {
    output_path(Path::new(p), SUFFIX).unwrap()
}

#[test]
fn replaces_spreadsheet_extensions() {
    assert_eq!(out("links.xlsx"), PathBuf::from("links_broken_urls.xlsx"));
    assert_eq!(out("links.xls"), PathBuf::from("links_broken_urls.xlsx"));
    assert_eq!(out("LINKS.XLSX"), PathBuf::from("LINKS_broken_urls.xlsx"));
    assert_eq!(
        out("data/q1.links.xlsx"),
        PathBuf::from("data/q1.links_broken_urls.xlsx")
    );
}

#[test]
fn only_the_file_name_changes() {
    assert_eq!(
        out("archive.xlsx.d/links.xlsx"),
        PathBuf::from("archive.xlsx.d/links_broken_urls.xlsx")
    );
}

#[test]
fn unknown_extension_never_collides_with_input() {
    assert_eq!(out("links.csv"), PathBuf::from("links.csv_broken_urls.xlsx"));
    assert_eq!(out("links"), PathBuf::from("links_broken_urls.xlsx"));
    assert_ne!(out("links.ods"), PathBuf::from("links.ods"));
}

#[test]
fn rejects_paths_without_file_name() {
    assert!(output_path(Path::new(".."), SUFFIX).is_err());
}

#[cfg(unix)]
#[test]
fn non_utf8_names_keep_their_bytes() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let input = Path::new(OsStr::from_bytes(b"dir/li\xffnks.xlsx"));
    let got = output_path(input, SUFFIX).unwrap();
    assert_eq!(got.as_os_str().as_bytes(), b"dir/li\xffnks_broken_urls.xlsx");
}

#[test]
fn json_sidecar_never_replaces_the_report() {
    assert_eq!(
        json_path(Path::new("out/links_broken_urls.xlsx")),
        PathBuf::from("out/links_broken_urls.json")
    );
    assert_eq!(
        json_path(Path::new("out/report.json")),
        PathBuf::from("out/report.json.json")
    );
}
