use std::path::{Component, Path, PathBuf};

use nix::unistd::{access, AccessFlags};

/// Normalize a path logically (resolving . and ..) without hitting the disk.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) => {
                    // At root, .. does nothing
                }
                _ => {
                    normalized.push(Component::ParentDir);
                }
            },
            _ => normalized.push(component),
        }
    }

    if normalized.as_os_str().is_empty() {
        normalized.push(Component::CurDir);
    }

    normalized
}

/// Expand `~` to the home directory and normalize the resulting path.
pub fn expand_home(path_str: &str) -> PathBuf {
    if path_str == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return normalize_path(&home.join(rest));
        }
    }
    normalize_path(Path::new(path_str))
}

/// Resolve a command name to an executable.
///
/// A name containing `/` is taken as a path and used as written, apart from
/// a leading `~/`. Otherwise each directory of `search_path` is tried in
/// order and the first executable match wins.
pub fn find_executable(cmd: &str, search_path: Option<&str>) -> Option<PathBuf> {
    if cmd.contains('/') {
        return check_path(explicit_path(cmd));
    }
    candidates(cmd, search_path?).find_map(check_path)
}

/// Every executable match for `cmd` along `search_path`, in order.
pub fn find_all_executables(cmd: &str, search_path: Option<&str>) -> Vec<PathBuf> {
    if cmd.contains('/') {
        return check_path(explicit_path(cmd)).into_iter().collect();
    }
    match search_path {
        Some(paths) => candidates(cmd, paths).filter_map(check_path).collect(),
        None => Vec::new(),
    }
}

/// `..` is left for the kernel to resolve, since a symlinked directory
/// before it changes where it leads.
fn explicit_path(cmd: &str) -> PathBuf {
    match (cmd.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(cmd),
    }
}

fn candidates<'a>(cmd: &'a str, search_path: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
    std::env::split_paths(search_path)
        .map(|dir| if dir.as_os_str().is_empty() { PathBuf::from(".") } else { dir })
        .map(move |dir| dir.join(cmd))
}

fn check_path(p: PathBuf) -> Option<PathBuf> {
    if p.is_file() && access(&p, AccessFlags::X_OK).is_ok() {
        Some(p)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn touch(dir: &Path, name: &str, mode: u32) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    fn join(dirs: &[&Path]) -> String {
        std::env::join_paths(dirs).unwrap().into_string().unwrap()
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize_path(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize_path(Path::new("")), PathBuf::from("."));
    }

    #[test]
    fn test_later_directory_found() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let x = touch(b.path(), "x", 0o755);
        let path = join(&[a.path(), b.path()]);
        assert_eq!(find_executable("x", Some(&path)), Some(x));
    }

    #[test]
    fn test_first_match_wins() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let first = touch(a.path(), "x", 0o755);
        let second = touch(b.path(), "x", 0o755);
        let path = join(&[a.path(), b.path()]);
        assert_eq!(find_executable("x", Some(&path)), Some(first.clone()));
        assert_eq!(find_all_executables("x", Some(&path)), vec![first, second]);
    }

    #[test]
    fn test_non_executable_skipped() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        touch(a.path(), "x", 0o644);
        let good = touch(b.path(), "x", 0o755);
        let path = join(&[a.path(), b.path()]);
        assert_eq!(find_executable("x", Some(&path)), Some(good));
    }

    #[test]
    fn test_directories_are_not_executables() {
        let a = tempfile::tempdir().unwrap();
        fs::create_dir(a.path().join("x")).unwrap();
        let path = join(&[a.path()]);
        assert_eq!(find_executable("x", Some(&path)), None);
    }

    #[test]
    fn test_explicit_path_used_verbatim() {
        let a = tempfile::tempdir().unwrap();
        let x = touch(a.path(), "tool", 0o755);
        let name = x.to_str().unwrap();
        assert_eq!(find_executable(name, Some("/nonexistent")), Some(x.clone()));
        assert_eq!(find_executable(name, None), Some(x));
    }

    #[test]
    fn test_explicit_path_is_not_normalized() {
        let root = tempfile::tempdir().unwrap();
        let real = root.path().join("real");
        fs::create_dir_all(real.join("sub")).unwrap();
        touch(&real, "tool", 0o755);
        std::os::unix::fs::symlink(real.join("sub"), root.path().join("link")).unwrap();

        let name = format!("{}/link/../tool", root.path().display());
        assert_eq!(find_executable(&name, None), Some(PathBuf::from(&name)));
        assert_eq!(find_all_executables(&name, None), vec![PathBuf::from(&name)]);

        let dotted = format!("{}/./real/tool", root.path().display());
        assert_eq!(find_executable(&dotted, None), Some(PathBuf::from(&dotted)));
    }

    #[test]
    fn test_missing_command() {
        let a = tempfile::tempdir().unwrap();
        let path = join(&[a.path()]);
        assert_eq!(find_executable("fsh-no-such-command", Some(&path)), None);
        assert_eq!(find_executable("anything", None), None);
    }
}
