//! Child process invocation.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

use super::RealRuntime;

impl RealRuntime {
    /// Stdio is inherited, so the child owns the terminal for its lifetime.
    /// A missing exit code means the child died to a signal; report that as 1.
    #[tracing::instrument(skip(self))]
    pub(crate) fn exec_impl(&self, program: &Path, args: &[String]) -> Result<i32> {
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("Failed to execute {:?}", program))?;
        Ok(status.code().unwrap_or(1))
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use std::path::Path;

    #[cfg(unix)]
    #[test]
    fn test_exec_forwards_exit_code() {
        let runtime = RealRuntime;
        let code = runtime
            .exec(Path::new("/bin/sh"), &["-c".to_string(), "exit 7".to_string()])
            .unwrap();
        assert_eq!(code, 7);
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_success_is_zero() {
        let runtime = RealRuntime;
        let code = runtime.exec(Path::new("/bin/true"), &[]).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_exec_missing_program_errors() {
        let runtime = RealRuntime;
        let result = runtime.exec(Path::new("/definitely/not/here"), &[]);
        assert!(result.is_err());
    }
}
