//! Device shell command lines
//!
//! Everything the engine runs through `adb shell` is built here so the
//! command text lives in one place and quoting is consistent.

/// Staging directory writable by the shell user
pub const STAGING_DIR: &str = "/data/local/tmp";

pub const GET_ABI: &str = "getprop ro.product.cpu.abi";
pub const READ_MOUNTS: &str = "cat /proc/mounts";
pub const CURRENT_UID: &str = "id -u";
pub const SELINUX_PERMISSIVE: &str = "setenforce 0";

/// Quote one shell word for the device's `sh`
pub fn quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_./:=@%+-,".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', "'\\''"))
    }
}

/// Run `command` as root through the device's `su`
pub fn su(command: &str) -> String {
    format!("su -c {}", quote(command))
}

/// Undo `su` wrapping; `None` when `command` is not an `su -c` line
pub fn strip_su(command: &str) -> Option<String> {
    let rest = command.strip_prefix("su -c ")?;
    Some(unquote(rest))
}

/// Reverse of [`quote`] for a single word
pub fn unquote(word: &str) -> String {
    match word.strip_prefix('\'').and_then(|w| w.strip_suffix('\'')) {
        Some(inner) => inner.replace("'\\''", "'"),
        None => word.to_string(),
    }
}

pub fn chmod(mode: &str, path: &str) -> String {
    format!("chmod {} {}", mode, quote(path))
}

pub fn chown(owner: &str, path: &str) -> String {
    format!("chown {} {}", owner, quote(path))
}

pub fn sha256sum(path: &str) -> String {
    format!("sha256sum {}", quote(path))
}

pub fn copy(source: &str, destination: &str) -> String {
    format!("cp {} {}", quote(source), quote(destination))
}

pub fn remove(path: &str) -> String {
    format!("rm -f {}", quote(path))
}

/// Process ids of a running binary by name
pub fn pidof(name: &str) -> String {
    format!("pidof {}", quote(name))
}

/// Stop every process started from `path`
pub fn pkill(path: &str) -> String {
    format!("pkill -f {}", quote(path))
}

/// Start `path` detached from the shell session
pub fn launch_detached(path: &str) -> String {
    format!("nohup {} >/dev/null 2>&1 &", quote(path))
}

/// Remount a mount point through the shell
pub fn remount(mount_point: &str, writable: bool) -> String {
    let mode = if writable { "rw" } else { "ro" };
    format!("mount -o {},remount {}", mode, quote(mount_point))
}

/// Staging path for a file pushed as the shell user before a root copy
pub fn staging_path(file_name: &str) -> String {
    format!("{}/{}", STAGING_DIR, file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_leaves_plain_words() {
        assert_eq!(quote("/data/local/tmp/frida-server"), "/data/local/tmp/frida-server");
        assert_eq!(quote("9a5ba575.0"), "9a5ba575.0");
    }

    #[test]
    fn quote_wraps_spaces_and_quotes() {
        assert_eq!(quote("setenforce 0"), "'setenforce 0'");
        assert_eq!(quote("it's"), "'it'\\''s'");
        assert_eq!(quote(""), "''");
    }

    #[test]
    fn su_wrapping_round_trips() {
        let line = su("nohup /data/local/tmp/frida-server >/dev/null 2>&1 &");
        assert_eq!(
            line,
            "su -c 'nohup /data/local/tmp/frida-server >/dev/null 2>&1 &'"
        );
        assert_eq!(
            strip_su(&line).as_deref(),
            Some("nohup /data/local/tmp/frida-server >/dev/null 2>&1 &")
        );
        assert_eq!(strip_su("id -u"), None);
        assert_eq!(unquote("'it'\\''s'"), "it's");
    }

    #[test]
    fn command_builders() {
        assert_eq!(
            chmod("644", "/system/etc/security/cacerts/9a5ba575.0"),
            "chmod 644 /system/etc/security/cacerts/9a5ba575.0"
        );
        assert_eq!(
            launch_detached("/data/local/tmp/frida-server"),
            "nohup /data/local/tmp/frida-server >/dev/null 2>&1 &"
        );
        assert_eq!(remount("/system", false), "mount -o ro,remount /system");
        assert_eq!(staging_path("9a5ba575.0"), "/data/local/tmp/9a5ba575.0");
    }
}
