//! Fake LaTeX engines for exercising the compile loop without a TeX install
//!
//! A fake engine is a `#!/bin/sh` script that understands the invocation
//! `<engine> -output-directory <dir> -interaction=batchmode <dir>/temp.tex`,
//! counts its invocations in a file next to the script and writes a log and an
//! artifact the way a real engine would.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tempfile::TempDir;

/// Log line that asks for another pass (contains "run")
pub const RERUN_LOG: &str =
    "LaTeX Warning: Label(s) may have changed. Rerun to get cross-references right.";

/// Log line of a converged pass (must not contain "run")
pub const STABLE_LOG: &str = "Output written on temp.pdf (1 page).";

#[derive(Debug, Clone)]
enum Failure {
    /// Write the message to the log file, then exit 1
    WithLog(String),
    /// Print the message on stdout, write no log, exit 1
    WithoutLog(String),
}

/// Builder for [`FakeEngine`]
#[derive(Debug, Clone)]
pub struct FakeEngineBuilder {
    /// `None` requests a rerun on every pass
    reruns: Option<u32>,
    failure: Option<Failure>,
    artifact: bool,
    sleep_secs: u32,
    extension: String,
}

impl Default for FakeEngineBuilder {
    fn default() -> Self {
        Self {
            reruns: Some(0),
            failure: None,
            artifact: true,
            sleep_secs: 0,
            extension: "pdf".to_string(),
        }
    }
}

impl FakeEngineBuilder {
    /// Request a rerun on the first `n` passes, then report a stable log
    pub fn converges_after(mut self, n: u32) -> Self {
        self.reruns = Some(n);
        self
    }

    /// Request a rerun on every pass
    pub fn always_rerun(mut self) -> Self {
        self.reruns = None;
        self
    }

    pub fn fails_with_log(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(Failure::WithLog(message.into()));
        self
    }

    pub fn fails_without_log(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(Failure::WithoutLog(message.into()));
        self
    }

    /// Succeed without writing an artifact
    pub fn without_artifact(mut self) -> Self {
        self.artifact = false;
        self
    }

    /// Sleep before doing anything (for timeout tests)
    pub fn sleeps(mut self, secs: u32) -> Self {
        self.sleep_secs = secs;
        self
    }

    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        self.extension = ext.into();
        self
    }

    /// Write the script and wait until it can be executed
    ///
    /// # Panics
    ///
    /// Panics if the script cannot be written or never becomes executable.
    pub fn build(self) -> FakeEngine {
        let dir = TempDir::new().expect("Failed to create fake engine directory");
        let path = dir.path().join("fakelatex");
        let calls = dir.path().join("calls");
        let args = dir.path().join("args");

        fs::write(&path, self.script(&calls, &args)).expect("Failed to write fake engine");
        let mut perms = fs::metadata(&path)
            .expect("Failed to stat fake engine")
            .permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("Failed to chmod fake engine");

        wait_until_executable(&path);

        FakeEngine {
            _dir: dir,
            path,
            calls,
            args,
        }
    }

    fn script(&self, calls: &Path, args: &Path) -> String {
        let mut script = String::from("#!/bin/sh\n");
        script.push_str("if [ \"$1\" = \"--probe\" ]; then\n  exit 0\nfi\n");
        script.push_str("if [ \"$1\" = \"--version\" ]; then\n  echo \"fakelatex 1.0\"\n  exit 0\nfi\n");
        script.push_str(&format!("echo \"$@\" > '{}'\n", args.display()));
        script.push_str(&format!("echo pass >> '{}'\n", calls.display()));
        script.push_str(&format!(
            "pass=$(wc -l < '{}' | tr -d ' ')\n",
            calls.display()
        ));
        script.push_str("outdir=\"$2\"\nsource=\"$4\"\njob=$(basename \"$source\" .tex)\n");

        if self.sleep_secs > 0 {
            script.push_str(&format!("sleep {}\n", self.sleep_secs));
        }

        match &self.failure {
            Some(Failure::WithLog(message)) => {
                script.push_str(&format!(
                    "printf '%s\\n' {} > \"$outdir/$job.log\"\n",
                    sh_quote(message)
                ));
                script.push_str("echo \"engine stdout\"\nexit 1\n");
                return script;
            }
            Some(Failure::WithoutLog(message)) => {
                script.push_str(&format!("printf '%s\\n' {}\nexit 1\n", sh_quote(message)));
                return script;
            }
            None => {}
        }

        match self.reruns {
            Some(n) => script.push_str(&format!(
                "if [ \"$pass\" -le {} ]; then\n  echo '{}' > \"$outdir/$job.log\"\nelse\n  echo '{}' > \"$outdir/$job.log\"\nfi\n",
                n, RERUN_LOG, STABLE_LOG
            )),
            None => script.push_str(&format!("echo '{}' > \"$outdir/$job.log\"\n", RERUN_LOG)),
        }

        if self.artifact {
            script.push_str(&format!(
                "{{ echo \"artifact pass $pass\"; cat \"$source\"; }} > \"$outdir/$job.{}\"\n",
                self.extension
            ));
        }
        script.push_str("exit 0\n");
        script
    }
}

/// Single-quote `s` for the shell, including embedded `'`
fn sh_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Run the freshly written script until the kernel stops reporting it busy
///
/// A concurrently forked test process can briefly inherit the write handle,
/// which makes `exec` fail with ETXTBSY.
fn wait_until_executable(path: &Path) {
    const ETXTBSY: i32 = 26;
    for _ in 0..100 {
        match Command::new(path).arg("--probe").status() {
            Ok(_) => return,
            Err(e) if e.raw_os_error() == Some(ETXTBSY) => {
                std::thread::sleep(Duration::from_millis(10));
            }
            Err(e) => panic!("Fake engine {} is not executable: {}", path.display(), e),
        }
    }
    panic!("Fake engine {} stayed busy", path.display());
}

/// A fake engine script living in its own temporary directory
#[derive(Debug)]
pub struct FakeEngine {
    _dir: TempDir,
    path: PathBuf,
    calls: PathBuf,
    args: PathBuf,
}

impl FakeEngine {
    pub fn builder() -> FakeEngineBuilder {
        FakeEngineBuilder::default()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Engine name to hand to the compiler (absolute path of the script)
    pub fn command(&self) -> String {
        self.path.display().to_string()
    }

    /// Number of compile passes the script has served
    pub fn invocations(&self) -> usize {
        fs::read_to_string(&self.calls)
            .map(|s| s.lines().count())
            .unwrap_or(0)
    }

    /// Arguments of the most recent invocation
    pub fn last_args(&self) -> Vec<String> {
        fs::read_to_string(&self.args)
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
