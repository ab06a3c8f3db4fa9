//! Canned scanner reports and fake scanner binaries for tests

#[cfg(unix)]
use std::path::{Path, PathBuf};

/// Trivy report with a single CRITICAL openssh finding (the regreSSHion CVE).
pub const REPORT_SINGLE_CRITICAL: &str = r#"{
    "SchemaVersion": 2,
    "ArtifactName": "nginx:latest",
    "Results": [
        {
            "Target": "nginx:latest (debian 12.5)",
            "Class": "os-pkgs",
            "Vulnerabilities": [
                {
                    "VulnerabilityID": "CVE-2024-6387",
                    "PkgName": "openssh",
                    "InstalledVersion": "9.6p1",
                    "FixedVersion": "9.8p1",
                    "Severity": "CRITICAL",
                    "Title": "regreSSHion",
                    "Description": "A signal handler race condition in OpenSSH's server.",
                    "References": ["https://nvd.nist.gov/vuln/detail/CVE-2024-6387"]
                }
            ]
        }
    ]
}"#;

/// Report with mixed severities across two targets, including an unmappable
/// severity string and an out-of-order finding list.
pub const REPORT_MIXED_SEVERITIES: &str = r#"{
    "SchemaVersion": 2,
    "ArtifactName": "shop/api:2.4.1",
    "Results": [
        {
            "Target": "shop/api:2.4.1 (alpine 3.19)",
            "Class": "os-pkgs",
            "Vulnerabilities": [
                {"VulnerabilityID": "CVE-2024-0030", "PkgName": "busybox", "InstalledVersion": "1.36.1", "Severity": "LOW"},
                {"VulnerabilityID": "CVE-2024-0010", "PkgName": "openssl", "InstalledVersion": "3.1.4", "FixedVersion": "3.1.5", "Severity": "CRITICAL"},
                {"VulnerabilityID": "CVE-2024-0040", "PkgName": "musl", "InstalledVersion": "1.2.4", "Severity": "NEGLIGIBLE"}
            ]
        },
        {
            "Target": "app/package-lock.json",
            "Class": "lang-pkgs",
            "Vulnerabilities": [
                {"VulnerabilityID": "CVE-2024-0020", "PkgName": "lodash", "InstalledVersion": "4.17.20", "FixedVersion": "4.17.21", "Severity": "HIGH"}
            ]
        }
    ]
}"#;

/// Report for a clean image (Trivy omits the Results key entirely).
pub const REPORT_CLEAN: &str = r#"{"SchemaVersion": 2, "ArtifactName": "scratch:latest"}"#;

/// Write an executable shell script standing in for the scanner binary.
///
/// The script receives the exact CLI invocation the executor builds; most
/// fixtures just ignore the arguments and emit a canned outcome.
#[cfg(unix)]
pub fn write_fake_scanner(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-trivy");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write fake scanner");
    let mut perms = std::fs::metadata(&path).expect("stat fake scanner").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod fake scanner");
    path
}
