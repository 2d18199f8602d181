use std::env;
use std::ffi::OsString;
use std::io::{self, Read};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use decompview_api::{format_address, DecompiledCode};
use decompview_provider_api::{Decompiler, DecompilerError, DecompilerResult};
use tracing::{debug, warn};
use wait_timeout::ChildExt;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BINARY: &str = "r2dec";
const BIN_ENV: &str = "DECOMPVIEW_COMMAND_BIN";
const TIMEOUT_ENV: &str = "DECOMPVIEW_COMMAND_TIMEOUT_SECS";

/// Decompiler backed by an external process printing r2-style JSON.
///
/// The process is invoked as `<binary> [args..] <0xaddress>` and must print
/// `{"lines":[{"str":..,"offset":..}, ..]}` on stdout. Empty output means the
/// address cannot be decompiled.
#[derive(Debug, Clone)]
pub struct CommandDecompiler {
    binary: OsString,
    args: Vec<OsString>,
    timeout: Duration,
}

impl CommandDecompiler {
    /// Create a decompiler running `binary` with the default timeout.
    pub fn new(binary: impl Into<OsString>) -> Self {
        Self {
            binary: binary.into(),
            args: Vec::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Configure from `DECOMPVIEW_COMMAND_BIN` and `DECOMPVIEW_COMMAND_TIMEOUT_SECS`.
    #[must_use]
    pub fn from_env() -> Self {
        let binary = env::var_os(BIN_ENV).unwrap_or_else(|| OsString::from(DEFAULT_BINARY));
        let timeout = env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self::new(binary).with_timeout(Duration::from_secs(timeout))
    }

    /// Arguments passed before the address.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Upper bound on how long a single decompilation may run.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn run(&self, address: u64) -> DecompilerResult<ProcessOutput> {
        let mut command = Command::new(&self.binary);
        command.args(&self.args);
        command.arg(format_address(address));
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        debug!(
            binary = %self.binary.to_string_lossy(),
            address = %format_address(address),
            "spawning decompiler command"
        );

        let mut child = command.spawn().map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                DecompilerError::Unavailable {
                    reason: format!("{} not found", self.binary.to_string_lossy()),
                }
            } else {
                DecompilerError::message(format!("failed to spawn decompiler: {err}"))
            }
        })?;

        let stdout = StreamReader::spawn("stdout", child.stdout.take());
        let stderr = StreamReader::spawn("stderr", child.stderr.take());

        let failure = match child.wait_timeout(self.timeout) {
            Ok(Some(_)) => None,
            Ok(None) => Some(format!(
                "decompiler timed out after {}s",
                self.timeout.as_secs()
            )),
            Err(err) => Some(format!("failed waiting on decompiler: {err}")),
        };
        if let Some(message) = failure {
            warn!(address = %format_address(address), %message, "stopping decompiler command");
            let _ = child.kill();
            let _ = child.wait();
            return Err(DecompilerError::message(message));
        }

        let status = child
            .wait()
            .map_err(|err| DecompilerError::message(format!("failed to reap decompiler: {err}")))?;

        let stdout = stdout.finish()?;
        let stderr = stderr.finish()?;

        if !status.success() {
            let code = status
                .code()
                .map_or_else(|| "terminated".to_string(), |c| c.to_string());
            return Err(DecompilerError::message(format!(
                "decompiler failed with status {}: {}",
                code,
                stderr.trim()
            )));
        }

        Ok(ProcessOutput { stdout })
    }
}

impl Default for CommandDecompiler {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Decompiler for CommandDecompiler {
    fn id(&self) -> &'static str {
        "command"
    }

    fn name(&self) -> &'static str {
        "External command"
    }

    fn decompile_at(&self, address: u64) -> DecompilerResult<DecompiledCode> {
        let output = self.run(address)?;
        parse_output(&output.stdout)
    }
}

#[derive(Debug)]
struct ProcessOutput {
    stdout: String,
}

/// Drains one child pipe on its own thread so a chatty stream cannot
/// block the other.
struct StreamReader {
    stream: &'static str,
    handle: Option<JoinHandle<io::Result<Vec<u8>>>>,
}

impl StreamReader {
    fn spawn<R>(stream: &'static str, pipe: Option<R>) -> Self
    where
        R: Read + Send + 'static,
    {
        let handle = pipe.map(|mut pipe| {
            thread::spawn(move || {
                let mut bytes = Vec::new();
                pipe.read_to_end(&mut bytes)?;
                Ok(bytes)
            })
        });
        Self { stream, handle }
    }

    fn finish(self) -> DecompilerResult<String> {
        let Some(handle) = self.handle else {
            return Ok(String::new());
        };
        let stream = self.stream;
        let bytes = handle
            .join()
            .map_err(|_| {
                DecompilerError::message(format!("failed to join decompiler {stream} reader"))
            })?
            .map_err(|err| {
                DecompilerError::message(format!("failed to read decompiler {stream}: {err}"))
            })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn parse_output(stdout: &str) -> DecompilerResult<DecompiledCode> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(DecompiledCode::new());
    }
    serde_json::from_str(trimmed)
        .map_err(|err| DecompilerError::message(format!("malformed decompiler output: {err}")))
}
