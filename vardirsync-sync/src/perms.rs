//! Permission bit access.
//!
//! Only the low 12 bits (rwx for user/group/other plus setuid, setgid and
//! sticky) are carried; file type bits never leave this module.

use std::fs::Metadata;
use std::path::Path;

pub const PERMISSION_MASK: u32 = 0o7777;

#[cfg(unix)]
pub fn mode_of(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & PERMISSION_MASK
}

#[cfg(not(unix))]
pub fn mode_of(metadata: &Metadata) -> u32 {
    if metadata.permissions().readonly() { 0o444 } else { 0o644 }
}

#[cfg(unix)]
fn permissions_for(mode: u32) -> std::fs::Permissions {
    use std::os::unix::fs::PermissionsExt;
    std::fs::Permissions::from_mode(mode & PERMISSION_MASK)
}

/// Applies exactly `mode`, independent of the process umask.
#[cfg(unix)]
pub async fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    tokio::fs::set_permissions(path, permissions_for(mode)).await
}

#[cfg(not(unix))]
pub async fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_readonly(mode & 0o222 == 0);
    tokio::fs::set_permissions(path, perms).await
}
