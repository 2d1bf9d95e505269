// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! OS-process implementation of [`StageRunner`].
//!
//! ## Stream plumbing
//!
//! stdout and stderr are ordinary pipes. The auxiliary channel is a pipe whose write end is
//! duplicated onto file descriptor 3 in the child just before `exec`, which is where the
//! playground runtime writes its event stream. Every captured stream is read by its own task,
//! so a chatty stream can never block the child on a full pipe while another is being read.
//!
//! ## Termination
//!
//! The stage resolves when the child exits. Readers are then drained: they normally hit EOF
//! immediately, but a grandchild holding a pipe open would keep them alive, so draining is
//! bounded by [`DRAIN_GRACE`]. On timeout or cancellation the child is killed first and drained
//! the same way.

use async_trait::async_trait;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::engine::{ChunkSender, StageCommand, StreamChunk, StreamKind, StreamSinks};
use crate::errors::ExecutionError;
use crate::observability::messages::stage::{StageCompleted, StageStarted};
use crate::observability::messages::StructuredLog;
use crate::traits::StageRunner;

/// Read buffer size for each stream
const CHUNK_SIZE: usize = 8 * 1024;
/// How long readers may keep draining after the child is gone
pub const DRAIN_GRACE: Duration = Duration::from_secs(5);

type PumpResult = Result<(), (StreamKind, io::Error)>;

/// Runs stages as child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessStageRunner {
    timeout: Option<Duration>,
}

impl ProcessStageRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn spawn(
        &self,
        command: &StageCommand,
        sinks: &StreamSinks,
    ) -> Result<(Child, Option<aux::AuxChannel>), ExecutionError> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .current_dir(&command.cwd)
            .stdin(Stdio::null())
            .stdout(stdio_for(sinks, StreamKind::Stdout))
            .stderr(stdio_for(sinks, StreamKind::Stderr))
            .kill_on_drop(true);
        for (key, value) in &command.env {
            cmd.env(key, value);
        }

        let spawn_error = |source: io::Error| ExecutionError::Spawn {
            stage: command.stage.clone(),
            program: command.program.clone(),
            source,
        };

        let channel = if sinks.wants(StreamKind::Aux) {
            Some(aux::attach(&mut cmd).map_err(spawn_error)?)
        } else {
            None
        };

        let child = cmd.spawn().map_err(spawn_error)?;
        Ok((child, channel))
    }

    /// Wait for the child, killing it on timeout or cancellation.
    async fn wait(
        &self,
        child: &mut Child,
        cancel: &CancellationToken,
        stage: &str,
    ) -> Result<ExitStatus, ExecutionError> {
        let deadline = async {
            match self.timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => std::future::pending::<()>().await,
            }
        };

        let interrupted = tokio::select! {
            status = child.wait() => {
                return status.map_err(|source| ExecutionError::Process {
                    stage: stage.to_string(),
                    source,
                });
            }
            _ = cancel.cancelled() => ExecutionError::Cancelled {
                stage: stage.to_string(),
            },
            _ = deadline => ExecutionError::StageTimedOut {
                stage: stage.to_string(),
                timeout: self.timeout.unwrap_or_default(),
            },
        };

        if let Err(e) = child.kill().await {
            tracing::warn!(stage, error = %e, "Failed to kill stage process");
        }
        Err(interrupted)
    }
}

#[async_trait]
impl StageRunner for ProcessStageRunner {
    async fn run_stage(
        &self,
        command: &StageCommand,
        sinks: StreamSinks,
        cancel: CancellationToken,
    ) -> Result<(), ExecutionError> {
        let start_msg = StageStarted {
            stage: &command.stage,
            program: &command.program,
            arg_count: command.args.len(),
        };
        let span = start_msg.span("run_stage");
        span.in_scope(|| start_msg.log());

        self.supervise(command, sinks, cancel).instrument(span).await
    }
}

impl ProcessStageRunner {
    /// Spawn the stage, pump its streams and wait for it to finish.
    async fn supervise(
        &self,
        command: &StageCommand,
        mut sinks: StreamSinks,
        cancel: CancellationToken,
    ) -> Result<(), ExecutionError> {
        let started = Instant::now();
        let (mut child, channel) = self.spawn(command, &sinks)?;

        let mut pumps: Vec<JoinHandle<PumpResult>> = Vec::new();
        if let (Some(out), Some(sink)) = (child.stdout.take(), sinks.take(StreamKind::Stdout)) {
            pumps.push(tokio::spawn(pump(out, StreamKind::Stdout, sink)));
        }
        if let (Some(err), Some(sink)) = (child.stderr.take(), sinks.take(StreamKind::Stderr)) {
            pumps.push(tokio::spawn(pump(err, StreamKind::Stderr, sink)));
        }
        if let (Some(channel), Some(sink)) = (channel, sinks.take(StreamKind::Aux)) {
            // Closes the parent's write end, so EOF arrives when the child exits
            let reader = channel.into_reader();
            pumps.push(tokio::spawn(pump(reader, StreamKind::Aux, sink)));
        }

        let waited = self.wait(&mut child, &cancel, &command.stage).await;
        let disconnect = drain(pumps, &command.stage).await;

        let status = waited?;
        if let Some(error) = disconnect {
            return Err(error);
        }
        check_status(&command.stage, status)?;

        StageCompleted {
            stage: &command.stage,
            duration: started.elapsed(),
        }
        .log();
        Ok(())
    }
}

fn stdio_for(sinks: &StreamSinks, stream: StreamKind) -> Stdio {
    if sinks.wants(stream) {
        Stdio::piped()
    } else {
        Stdio::null()
    }
}

/// Forward everything `reader` yields to `sink` until EOF.
async fn pump<R>(mut reader: R, stream: StreamKind, sink: ChunkSender) -> PumpResult
where
    R: AsyncRead + Unpin,
{
    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        let read = reader
            .read(&mut buffer)
            .await
            .map_err(|e| (stream, e))?;
        if read == 0 {
            return Ok(());
        }
        // A closed receiver is not an error: keep reading so the child never blocks
        let _ = sink.send(StreamChunk::new(stream, &buffer[..read]));
    }
}

/// Wait for every reader, returning the first stream failure as a disconnect.
async fn drain(pumps: Vec<JoinHandle<PumpResult>>, stage: &str) -> Option<ExecutionError> {
    let mut first_error = None;
    for mut handle in pumps {
        let outcome = match tokio::time::timeout(DRAIN_GRACE, &mut handle).await {
            Ok(joined) => joined,
            Err(_) => {
                tracing::warn!(stage, "Stream still open after process exit; abandoning it");
                handle.abort();
                continue;
            }
        };

        let error = match outcome {
            Ok(Ok(())) => continue,
            Ok(Err((stream, e))) => ExecutionError::ProcessDisconnect {
                stage: stage.to_string(),
                stream,
                reason: e.to_string(),
            },
            Err(join_error) => ExecutionError::InternalError {
                message: format!("Stream reader task failed: {}", join_error),
            },
        };
        first_error.get_or_insert(error);
    }
    first_error
}

fn check_status(stage: &str, status: ExitStatus) -> Result<(), ExecutionError> {
    if status.success() {
        return Ok(());
    }
    if let Some(code) = status.code() {
        return Err(ExecutionError::ProcessExit {
            stage: stage.to_string(),
            code,
        });
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Err(ExecutionError::ProcessSignaled {
                stage: stage.to_string(),
                signal,
            });
        }
    }

    Err(ExecutionError::InternalError {
        message: format!("stage '{}' ended with unrecognized status {}", stage, status),
    })
}

#[cfg(unix)]
mod aux {
    use std::io;
    use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
    use tokio::process::Command;

    use crate::config::consts::AUX_CHANNEL_FD;

    /// Both ends of the side-channel pipe, before and after spawning.
    pub(super) struct AuxChannel {
        reader: OwnedFd,
        writer: OwnedFd,
    }

    impl AuxChannel {
        /// Drop the parent's write end and hand back an async reader.
        pub(super) fn into_reader(self) -> tokio::fs::File {
            drop(self.writer);
            tokio::fs::File::from_std(std::fs::File::from(self.reader))
        }
    }

    /// Create the pipe and arrange for its write end to become the child's fd 3.
    pub(super) fn attach(command: &mut Command) -> io::Result<AuxChannel> {
        let (reader, writer) = cloexec_pipe()?;
        let source = writer.as_raw_fd();
        // SAFETY: the hook only calls async-signal-safe libc functions.
        unsafe {
            command.pre_exec(move || redirect(source, AUX_CHANNEL_FD));
        }
        Ok(AuxChannel { reader, writer })
    }

    fn redirect(source: RawFd, target: RawFd) -> io::Result<()> {
        if source == target {
            // dup2 onto itself keeps close-on-exec set, so clear it directly
            let flags = unsafe { libc::fcntl(target, libc::F_GETFD) };
            if flags == -1 || unsafe { libc::fcntl(target, libc::F_SETFD, flags & !libc::FD_CLOEXEC) } == -1 {
                return Err(io::Error::last_os_error());
            }
        } else if unsafe { libc::dup2(source, target) } == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn cloexec_pipe() -> io::Result<(OwnedFd, OwnedFd)> {
        let mut fds: [libc::c_int; 2] = [-1, -1];

        #[cfg(any(target_os = "linux", target_os = "android"))]
        let created = unsafe { libc::pipe2(fds.as_mut_ptr(), libc::O_CLOEXEC) };
        #[cfg(not(any(target_os = "linux", target_os = "android")))]
        let created = unsafe { libc::pipe(fds.as_mut_ptr()) };

        if created == -1 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: pipe returned two fresh descriptors that nothing else owns.
        let (reader, writer) = unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) };

        #[cfg(not(any(target_os = "linux", target_os = "android")))]
        for fd in [reader.as_raw_fd(), writer.as_raw_fd()] {
            if unsafe { libc::fcntl(fd, libc::F_SETFD, libc::FD_CLOEXEC) } == -1 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok((reader, writer))
    }
}

#[cfg(not(unix))]
mod aux {
    use std::io;
    use tokio::process::Command;

    pub(super) struct AuxChannel;

    impl AuxChannel {
        pub(super) fn into_reader(self) -> tokio::io::Empty {
            tokio::io::empty()
        }
    }

    pub(super) fn attach(_command: &mut Command) -> io::Result<AuxChannel> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "the auxiliary event channel requires a unix platform",
        ))
    }
}
