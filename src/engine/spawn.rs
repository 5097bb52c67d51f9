//! fork/exec/wait for a single pipeline stage.

use std::ffi::{c_char, CStr, CString};
use std::fs::File;
use std::io::Read;
use std::os::fd::{AsRawFd, BorrowedFd, RawFd};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::libc;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{fork, pipe2, ForkResult, Pid};

use crate::signals;

use super::error::{ShellError, ABNORMAL_STATUS, NOT_FOUND_STATUS};

/// A null-terminated `char *[]` together with the strings it points into.
struct CStringArray {
    _owned: Vec<CString>,
    ptrs: Vec<*const c_char>,
}

impl CStringArray {
    fn new<S: AsRef<str>>(items: &[S]) -> Result<Self, Errno> {
        let owned = items
            .iter()
            .map(|s| CString::new(s.as_ref()).map_err(|_| Errno::EINVAL))
            .collect::<Result<Vec<_>, _>>()?;
        let ptrs = owned.iter().map(|s| s.as_ptr()).chain(std::iter::once(std::ptr::null())).collect();
        Ok(CStringArray { _owned: owned, ptrs })
    }

    fn as_ptr(&self) -> *const *const c_char {
        self.ptrs.as_ptr()
    }
}

/// Start `path` as a child process.
///
/// `stdin`/`stdout`, when given, replace the child's standard input and
/// output. Everything the child needs is allocated before forking. An
/// `execve` failure is reported back through a close-on-exec pipe, so the
/// caller gets [`ShellError::ExecFailed`] instead of an exit status it
/// would have to guess about.
pub fn spawn(
    path: &Path,
    argv: &[String],
    envp: &[String],
    stdin: Option<BorrowedFd<'_>>,
    stdout: Option<BorrowedFd<'_>>,
) -> Result<Pid, ShellError> {
    let program = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| ShellError::ExecFailed(path.to_path_buf(), Errno::EINVAL))?;
    let args = CStringArray::new(argv).map_err(|e| ShellError::ExecFailed(path.to_path_buf(), e))?;
    let vars = CStringArray::new(envp).map_err(|e| ShellError::ExecFailed(path.to_path_buf(), e))?;
    let (report_read, report_write) = pipe2(OFlag::O_CLOEXEC).map_err(ShellError::Pipe)?;

    let stdin = stdin.map(|fd| fd.as_raw_fd());
    let stdout = stdout.map(|fd| fd.as_raw_fd());

    // SAFETY: the child only performs async-signal-safe calls on memory
    // allocated above before it either execs or exits.
    match unsafe { fork() } {
        Err(e) => Err(ShellError::SpawnFailed(path.display().to_string(), e)),
        Ok(ForkResult::Child) => {
            // SAFETY: we are the forked child.
            unsafe { exec_child(&program, &args, &vars, stdin, stdout, report_write.as_raw_fd()) }
        }
        Ok(ForkResult::Parent { child }) => {
            drop(report_write);
            tracing::debug!(target: "exec", "forked {} for {}", child, path.display());
            match read_exec_report(report_read) {
                None => Ok(child),
                Some(errno) => {
                    wait_for(child);
                    Err(ShellError::ExecFailed(path.to_path_buf(), errno))
                }
            }
        }
    }
}

/// Waits for the child's copy of the report pipe to close. Nothing to read
/// means `execve` succeeded.
fn read_exec_report(report: impl Into<File>) -> Option<Errno> {
    let mut report: File = report.into();
    let mut buf = Vec::with_capacity(4);
    if report.read_to_end(&mut buf).is_err() {
        return None;
    }
    let bytes: [u8; 4] = buf.get(..4)?.try_into().ok()?;
    Some(Errno::from_raw(i32::from_ne_bytes(bytes)))
}

/// # Safety
///
/// Must only be called in the child right after `fork`.
unsafe fn exec_child(
    program: &CStr,
    args: &CStringArray,
    vars: &CStringArray,
    stdin: Option<RawFd>,
    stdout: Option<RawFd>,
    report: RawFd,
) -> ! {
    // SAFETY: plain libc calls on descriptors and buffers owned by this
    // process image; none of them allocate.
    unsafe {
        signals::restore_default();
        if let Some(fd) = stdin {
            redirect(fd, libc::STDIN_FILENO, report);
        }
        if let Some(fd) = stdout {
            redirect(fd, libc::STDOUT_FILENO, report);
        }
        libc::execve(program.as_ptr(), args.as_ptr(), vars.as_ptr());
        report_and_exit(report)
    }
}

unsafe fn redirect(fd: RawFd, target: RawFd, report: RawFd) {
    if fd == target {
        // Pipe ends are close-on-exec; one that already sits on its target
        // must have the flag cleared to survive `execve`.
        // SAFETY: see exec_child.
        if unsafe { keep_across_exec(fd) } == -1 {
            unsafe { report_and_exit(report) };
        }
        return;
    }
    // SAFETY: see exec_child.
    unsafe {
        if libc::dup2(fd, target) == -1 {
            report_and_exit(report);
        }
        libc::close(fd);
    }
}

/// Clear `FD_CLOEXEC` on `fd`.
///
/// # Safety
///
/// `fd` must be an open descriptor.
unsafe fn keep_across_exec(fd: RawFd) -> i32 {
    // SAFETY: F_SETFD only touches the descriptor flags.
    unsafe { libc::fcntl(fd, libc::F_SETFD, 0) }
}

unsafe fn report_and_exit(report: RawFd) -> ! {
    let bytes = (Errno::last() as i32).to_ne_bytes();
    // SAFETY: see exec_child.
    unsafe {
        libc::write(report, bytes.as_ptr().cast(), bytes.len());
        libc::_exit(NOT_FOUND_STATUS)
    }
}

/// Block until `pid` terminates and return its exit status, or
/// [`ABNORMAL_STATUS`] when it did not exit normally.
pub fn wait_for(pid: Pid) -> i32 {
    loop {
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => {
                tracing::debug!(target: "exec", "reaped {} (exit {})", pid, code);
                return code;
            }
            Ok(WaitStatus::Signaled(_, signal, _)) => {
                tracing::debug!(target: "exec", "reaped {} (killed by {:?})", pid, signal);
                return ABNORMAL_STATUS;
            }
            Ok(_) => continue,
            Err(Errno::EINTR) => continue,
            Err(e) => {
                tracing::warn!(target: "exec", "waitpid({}) failed: {}", pid, e);
                return ABNORMAL_STATUS;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::fd::AsFd;
    use std::os::unix::fs::PermissionsExt;

    fn script(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn argv(path: &Path) -> Vec<String> {
        vec![path.display().to_string()]
    }

    #[test]
    fn test_exit_status_is_returned() {
        let dir = tempfile::tempdir().unwrap();
        let path = script(dir.path(), "seven", "exit 7");
        let pid = spawn(&path, &argv(&path), &[], None, None).unwrap();
        assert_eq!(wait_for(pid), 7);
    }

    #[test]
    fn test_killed_child_is_abnormal() {
        let dir = tempfile::tempdir().unwrap();
        let path = script(dir.path(), "suicide", "kill -9 $$");
        let pid = spawn(&path, &argv(&path), &[], None, None).unwrap();
        assert_eq!(wait_for(pid), ABNORMAL_STATUS);
    }

    #[test]
    fn test_exec_failure_is_reported_out_of_band() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage");
        fs::write(&path, [0x7f, 0x00, 0x01, 0x02]).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        match spawn(&path, &argv(&path), &[], None, None) {
            Err(ShellError::ExecFailed(p, errno)) => {
                assert_eq!(p, path);
                assert_eq!(errno, Errno::ENOEXEC);
            }
            other => panic!("expected ExecFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_program_exiting_127_is_not_an_exec_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = script(dir.path(), "fake", "exit 127");
        let pid = spawn(&path, &argv(&path), &[], None, None).unwrap();
        assert_eq!(wait_for(pid), 127);
    }

    #[test]
    fn test_stdout_redirected_into_pipe() {
        let dir = tempfile::tempdir().unwrap();
        let path = script(dir.path(), "hello", "echo hello");
        let (read, write) = pipe2(OFlag::O_CLOEXEC).unwrap();
        let pid = spawn(&path, &argv(&path), &[], None, Some(write.as_fd())).unwrap();
        drop(write);
        let mut out = String::new();
        File::from(read).read_to_string(&mut out).unwrap();
        assert_eq!(wait_for(pid), 0);
        assert_eq!(out, "hello\n");
    }

    #[test]
    fn test_keep_across_exec_clears_cloexec() {
        let (read, _write) = pipe2(OFlag::O_CLOEXEC).unwrap();
        let fd = read.as_raw_fd();
        let flags = || unsafe { libc::fcntl(fd, libc::F_GETFD) };
        assert_ne!(flags() & libc::FD_CLOEXEC, 0);
        assert_eq!(unsafe { keep_across_exec(fd) }, 0);
        assert_eq!(flags() & libc::FD_CLOEXEC, 0);
    }

    #[test]
    fn test_environment_is_passed() {
        let dir = tempfile::tempdir().unwrap();
        let path = script(dir.path(), "show", "printf '%s' \"$FSH_VALUE\"");
        let (read, write) = pipe2(OFlag::O_CLOEXEC).unwrap();
        let env = vec!["FSH_VALUE=abc".to_string()];
        let pid = spawn(&path, &argv(&path), &env, None, Some(write.as_fd())).unwrap();
        drop(write);
        let mut out = String::new();
        File::from(read).read_to_string(&mut out).unwrap();
        assert_eq!(wait_for(pid), 0);
        assert_eq!(out, "abc");
    }
}
