//! Subprocess runner shared by the OCR engine and the translator.
//!
//! Every invocation gets its own output buffer. Stdout and stderr are read
//! line by line and appended in arrival order, each line followed by `\n`.
//! Each stream is also kept on its own. Lines are decoded lossily, so stray
//! bytes that are not UTF-8 never lose the rest of the output.
//! The child is killed when the run is cancelled, when the deadline passes,
//! or when the future is dropped.

use std::future::Future;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Output of a finished process.
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    /// Stdout and stderr lines in arrival order.
    pub text: String,
    pub stdout: String,
    pub stderr: String,
    pub status: ExitStatus,
}

#[derive(Debug, Default)]
struct Collected {
    text: String,
    stdout: String,
    stderr: String,
}

#[derive(Debug, Clone, Copy)]
enum Source {
    Stdout,
    Stderr,
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("I/O error while talking to `{program}`: {source}")]
    Io {
        program: String,
        source: std::io::Error,
    },

    #[error("`{program}` did not finish within {}s and was killed", timeout.as_secs_f64())]
    TimedOut { program: String, timeout: Duration },

    #[error("`{program}` was cancelled")]
    Cancelled { program: String },
}

enum Interrupt {
    Cancelled,
    TimedOut,
}

/// Run `command` to completion and capture its output.
///
/// `stdin`, when given, is written from a separate task and the pipe is
/// closed afterwards so the child sees EOF.
pub async fn run_captured(
    mut command: Command,
    stdin: Option<Vec<u8>>,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<CapturedOutput, ProcessError> {
    let program = command.as_std().get_program().to_string_lossy().into_owned();
    let deadline = Instant::now() + timeout;

    command
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command.spawn().map_err(|source| ProcessError::Spawn {
        program: program.clone(),
        source,
    })?;

    log::debug!("[PROCESS] Started `{}` (pid {:?})", program, child.id());

    if let (Some(bytes), Some(mut pipe)) = (stdin, child.stdin.take()) {
        let program = program.clone();
        tokio::spawn(async move {
            if let Err(e) = pipe.write_all(&bytes).await {
                log::warn!("[PROCESS] Writing stdin of `{}` failed: {}", program, e);
            }
            // Dropping the pipe closes it.
        });
    }

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let collected = match guard(read_interleaved(stdout, stderr), deadline, cancel).await {
        Ok(read) => read.map_err(|source| ProcessError::Io {
            program: program.clone(),
            source,
        })?,
        Err(interrupt) => return Err(terminate(&mut child, program, timeout, interrupt).await),
    };

    let status = match guard(child.wait(), deadline, cancel).await {
        Ok(waited) => waited.map_err(|source| ProcessError::Io {
            program: program.clone(),
            source,
        })?,
        Err(interrupt) => return Err(terminate(&mut child, program, timeout, interrupt).await),
    };

    log::debug!("[PROCESS] `{}` exited with {}", program, status);

    Ok(CapturedOutput {
        text: collected.text,
        stdout: collected.stdout,
        stderr: collected.stderr,
        status,
    })
}

/// Race `work` against cancellation and the deadline.
async fn guard<F: Future>(
    work: F,
    deadline: Instant,
    cancel: &CancellationToken,
) -> Result<F::Output, Interrupt> {
    tokio::select! {
        out = work => Ok(out),
        _ = cancel.cancelled() => Err(Interrupt::Cancelled),
        _ = tokio::time::sleep_until(deadline) => Err(Interrupt::TimedOut),
    }
}

async fn terminate(
    child: &mut Child,
    program: String,
    timeout: Duration,
    interrupt: Interrupt,
) -> ProcessError {
    if let Err(e) = child.kill().await {
        log::warn!("[PROCESS] Failed to kill `{}`: {}", program, e);
    }

    match interrupt {
        Interrupt::Cancelled => {
            log::info!("[PROCESS] `{}` killed after cancellation", program);
            ProcessError::Cancelled { program }
        }
        Interrupt::TimedOut => {
            log::warn!("[PROCESS] `{}` killed after {:?}", program, timeout);
            ProcessError::TimedOut { program, timeout }
        }
    }
}

async fn read_interleaved<O, E>(stdout: Option<O>, stderr: Option<E>) -> std::io::Result<Collected>
where
    O: AsyncRead + Unpin + Send + 'static,
    E: AsyncRead + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    if let Some(stream) = stdout {
        tokio::spawn(forward_lines(stream, Source::Stdout, tx.clone()));
    }
    if let Some(stream) = stderr {
        tokio::spawn(forward_lines(stream, Source::Stderr, tx.clone()));
    }
    drop(tx);

    let mut collected = Collected::default();
    while let Some((source, line)) = rx.recv().await {
        let line = line?;
        let own = match source {
            Source::Stdout => &mut collected.stdout,
            Source::Stderr => &mut collected.stderr,
        };
        for buffer in [&mut collected.text, own] {
            buffer.push_str(&line);
            buffer.push('\n');
        }
    }

    Ok(collected)
}

async fn forward_lines<R>(
    stream: R,
    source: Source,
    tx: mpsc::UnboundedSender<(Source, std::io::Result<String>)>,
) where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut raw = Vec::new();
    loop {
        raw.clear();
        match reader.read_until(b'\n', &mut raw).await {
            Ok(0) => return,
            Ok(_) => {
                if tx.send((source, Ok(decode_line(&raw)))).is_err() {
                    return;
                }
            }
            Err(e) => {
                let _ = tx.send((source, Err(e)));
                return;
            }
        }
    }
}

/// Strip the line ending and replace invalid UTF-8.
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
