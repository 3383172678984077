//! Disassembly through the engine's own read-object trace.
//!
//! The engine prints the trace (offsets, raw bytes, tags, atoms and the
//! per-function instruction listing) with C stdio while it reads a buffer.
//! The traced read runs in a forked child whose standard output is a pipe
//! back to the caller. The caller's own file descriptor 1 is never touched,
//! so other threads can keep writing to stdout while a dump is taken.
//!
//! Without the `dump` feature every call returns an empty string.

use tracing::debug;

use crate::compile::compile;
use crate::error::RuntimeResult;

/// Disassemble a bytecode buffer.
///
/// Returns the engine's text verbatim. An empty string means disassembly is
/// unavailable in this build (or the capture failed), not that the buffer
/// holds no instructions. Buffers not produced by this build must pass
/// [`crate::is_compatible`] first.
pub fn disassemble(bytes: &[u8]) -> String {
    imp::disassemble(bytes)
}

/// Compile `source` as a module, then disassemble the result.
pub fn disassemble_source(source: &str, label: &str, modules: &[String]) -> RuntimeResult<String> {
    let bytes = compile(source, label, modules)?;
    let text = disassemble(&bytes);
    debug!(label, len = text.len(), "disassembled");
    Ok(text)
}

#[cfg(all(feature = "dump", unix))]
mod imp {
    use qjsbc_core::with_engine;
    use rquickjs_sys as sys;
    use std::ffi::c_int;
    use std::fs::File;
    use std::io::{self, Read};
    use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::LazyLock;
    use tracing::dispatcher::{self, Dispatch};
    use tracing::subscriber::NoSubscriber;
    use tracing::{debug, warn};

    use crate::error::RuntimeError;
    use crate::loader;

    unsafe extern "C" {
        #[cfg_attr(
            any(target_vendor = "apple", target_os = "freebsd"),
            link_name = "__stdoutp"
        )]
        static mut stdout: *mut libc::FILE;
    }

    /// Silences `tracing` in the child. Built before forking so the child
    /// never takes the dispatcher registry lock.
    static QUIET: LazyLock<Dispatch> = LazyLock::new(|| Dispatch::new(NoSubscriber::default()));

    pub(super) fn disassemble(bytes: &[u8]) -> String {
        match trace_in_child(bytes) {
            Ok(text) => text,
            Err(err) => {
                warn!(%err, "could not capture disassembly");
                String::new()
            }
        }
    }

    /// Read the buffer with the trace flag on. A read failure is not an
    /// error here: whatever was traced up to that point is the output.
    fn trace_read(bytes: &[u8]) {
        let result = with_engine(|engine| {
            loader::install(engine, &[])?;
            engine.set_dump_flags(sys::JS_DUMP_READ_OBJECT as u64);
            engine
                .read_object(bytes, sys::JS_READ_OBJ_BYTECODE as c_int)
                .map_err(RuntimeError::deserialization)?;
            Ok::<_, RuntimeError>(())
        });
        if let Err(err) = result {
            debug!(%err, "buffer read failed during disassembly");
        }
    }

    fn trace_in_child(bytes: &[u8]) -> io::Result<String> {
        let quiet = LazyLock::force(&QUIET).clone();

        let mut fds: [c_int; 2] = [-1; 2];
        // SAFETY: fds has room for both ends
        if unsafe { libc::pipe(fds.as_mut_ptr()) } < 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: pipe() returned two fresh descriptors owned by nobody else
        let (reader, writer) = unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) };

        // SAFETY: the child runs only the traced read on this thread and
        // leaves through _exit without returning into the caller
        let pid = unsafe { libc::fork() };
        if pid < 0 {
            return Err(io::Error::last_os_error());
        }
        if pid == 0 {
            run_child(reader, writer, bytes, &quiet);
        }

        drop(writer);
        let _reap = scopeguard::guard(pid, |pid| match wait_for(pid) {
            Ok(0) => {}
            Ok(status) => debug!(status, "disassembly child exited abnormally"),
            Err(err) => warn!(%err, "could not reap disassembly child"),
        });

        let mut raw = Vec::new();
        File::from(reader).read_to_end(&mut raw)?;
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }

    fn run_child(reader: OwnedFd, writer: OwnedFd, bytes: &[u8], quiet: &Dispatch) -> ! {
        drop(reader);

        // SAFETY: plain descriptor and stdio calls on this process only
        unsafe {
            // bytes the parent left in the stdio buffer go nowhere
            let null = libc::open(c"/dev/null".as_ptr(), libc::O_WRONLY);
            if null >= 0 {
                libc::dup2(null, libc::STDOUT_FILENO);
                libc::close(null);
            }
            libc::fflush(stdout);

            if libc::dup2(writer.as_raw_fd(), libc::STDOUT_FILENO) < 0 {
                libc::_exit(2);
            }
        }
        drop(writer);

        let traced = panic::catch_unwind(AssertUnwindSafe(|| {
            dispatcher::with_default(quiet, || trace_read(bytes))
        }));

        // SAFETY: flush the trace into the pipe, then leave without running
        // the parent's exit handlers or destructors
        unsafe {
            libc::fflush(stdout);
            libc::_exit(if traced.is_ok() { 0 } else { 1 })
        }
    }

    /// Exit status of a finished child, retrying on EINTR
    fn wait_for(pid: libc::pid_t) -> io::Result<c_int> {
        let mut status: c_int = 0;
        loop {
            // SAFETY: pid is our own child and status is a valid out-pointer
            if unsafe { libc::waitpid(pid, &mut status, 0) } >= 0 {
                return Ok(status);
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::compile::compile;

        #[test]
        fn test_child_trace_reaches_pipe() {
            let bytes = compile("export const x = 1;", "c.js", &[]).unwrap();
            let text = trace_in_child(&bytes).unwrap();
            assert!(text.contains("bytecode {"), "{text}");
        }

        #[test]
        fn test_failed_read_still_returns() {
            // the child exits cleanly after a rejected buffer
            let text = trace_in_child(&[]).unwrap();
            assert!(!text.contains("bytecode {"), "{text}");
        }
    }
}

#[cfg(not(all(feature = "dump", unix)))]
mod imp {
    pub(super) fn disassemble(_bytes: &[u8]) -> String {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(all(feature = "dump", unix))]
    #[test]
    fn test_disassembly_lists_bytecode() {
        let text = disassemble_source("export const answer = 6 * 7;", "d.js", &[]).unwrap();
        assert!(text.contains("bytecode {"), "{text}");
        assert!(text.contains("atom indexes {"), "{text}");
    }

    #[cfg(not(all(feature = "dump", unix)))]
    #[test]
    fn test_disabled_is_empty() {
        assert_eq!(disassemble_source("1;", "d.js", &[]).unwrap(), "");
    }

    #[test]
    fn test_garbage_does_not_panic() {
        let _ = disassemble(&[0xff, 0x00, 0x13]);
        let _ = disassemble(&[]);
    }

    #[test]
    fn test_source_compile_error_propagates() {
        assert!(disassemble_source("function (", "d.js", &[]).is_err());
    }
}
