//! User namespace identity mapping.
//!
//! Maps namespace root onto the invoking user's real UID/GID so the isolated
//! child gains root inside its namespaces without any host privilege.

use std::fs;
use std::path::Path;

use burrow_common::constants::HOST_PROC_DIR;
use burrow_common::error::{BurrowError, Result};
use burrow_common::types::IdMapping;

/// Real UID and GID of the calling process.
#[must_use]
pub fn host_identity() -> (u32, u32) {
    (
        nix::unistd::getuid().as_raw(),
        nix::unistd::getgid().as_raw(),
    )
}

/// Writes the UID and GID maps of process `pid` through the host `/proc`.
///
/// # Errors
///
/// Returns an error if writing `setgroups`, `uid_map` or `gid_map` fails.
pub fn write_id_maps(pid: u32, uid_map: IdMapping, gid_map: IdMapping) -> Result<()> {
    let proc_dir = Path::new(HOST_PROC_DIR).join(pid.to_string());
    write_id_maps_at(&proc_dir, uid_map, gid_map)?;
    tracing::debug!(pid, %uid_map, %gid_map, "wrote UID/GID map");
    Ok(())
}

/// Writes the UID and GID maps into a process directory.
///
/// `setgroups` is set to `deny` first when present: an unprivileged writer
/// may not install a `gid_map` otherwise.
///
/// # Errors
///
/// Returns an error if any of the files cannot be written.
pub fn write_id_maps_at(proc_dir: &Path, uid_map: IdMapping, gid_map: IdMapping) -> Result<()> {
    let setgroups_path = proc_dir.join("setgroups");
    if setgroups_path.exists() {
        write_proc_file(&setgroups_path, "deny")?;
    }
    write_proc_file(&proc_dir.join("uid_map"), &uid_map.to_string())?;
    write_proc_file(&proc_dir.join("gid_map"), &gid_map.to_string())?;
    Ok(())
}

fn write_proc_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| BurrowError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_are_written_as_single_lines() {
        let dir = tempfile::tempdir().unwrap();
        write_id_maps_at(dir.path(), IdMapping::root_to(1000), IdMapping::root_to(100)).unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("uid_map")).unwrap(), "0 1000 1");
        assert_eq!(fs::read_to_string(dir.path().join("gid_map")).unwrap(), "0 100 1");
        assert!(!dir.path().join("setgroups").exists());
    }

    #[test]
    fn setgroups_is_denied_when_present() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("setgroups"), "allow").unwrap();

        write_id_maps_at(dir.path(), IdMapping::root_to(1000), IdMapping::root_to(1000)).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("setgroups")).unwrap(), "deny");
    }

    #[test]
    fn missing_process_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("4194304");

        let err = write_id_maps_at(&gone, IdMapping::root_to(1), IdMapping::root_to(1)).unwrap_err();
        assert!(matches!(err, BurrowError::Io { ref path, .. } if path.ends_with("uid_map")));
    }

    #[test]
    fn host_identity_matches_process_credentials() {
        let (uid, gid) = host_identity();
        assert_eq!(uid, nix::unistd::getuid().as_raw());
        assert_eq!(gid, nix::unistd::getgid().as_raw());
    }
}
