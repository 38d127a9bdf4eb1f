//! External player process (mpv)
//!
//! Each launch owns exactly one child. Pause/resume are SIGSTOP/SIGCONT sent
//! to that child's pid and stop kills that child only, so other mpv instances
//! on the machine are left alone.

use async_trait::async_trait;
use std::ffi::OsString;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::{oneshot, watch};

use crate::error::{PlayerError, Result};
use crate::model::PlaySource;
use super::{Launched, PlayerLauncher, PlayerProcess};

pub struct MpvLauncher {
    program: String,
}

impl MpvLauncher {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    fn args(source: &PlaySource, volume: u8) -> Vec<OsString> {
        vec![
            OsString::from("--no-video"),
            OsString::from(format!("--volume={}", volume.min(100))),
            source.as_arg().to_os_string(),
        ]
    }
}

#[async_trait]
impl PlayerLauncher for MpvLauncher {
    async fn launch(&self, source: &PlaySource, volume: u8) -> Result<Launched> {
        let mut child = Command::new(&self.program)
            .args(Self::args(source, volume))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| PlayerError::LaunchFailed {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        let pid = child.id();
        let alive = Arc::new(AtomicBool::new(true));
        let (exit_tx, exit_rx) = oneshot::channel();
        let (kill_tx, kill_rx) = oneshot::channel::<()>();
        let (reaped_tx, reaped_rx) = watch::channel(false);

        tracing::info!(pid, source = %source, volume, "Player launched");

        let alive_flag = alive.clone();
        tokio::spawn(async move {
            tokio::select! {
                status = child.wait() => match status {
                    Ok(status) => tracing::debug!(pid, %status, "Player exited"),
                    Err(e) => tracing::warn!(pid, error = %e, "Waiting on player failed"),
                },
                // Fires on terminate() and when the handle is dropped
                _ = kill_rx => {
                    if let Err(e) = child.kill().await {
                        tracing::warn!(pid, error = %e, "Killing player failed");
                    } else {
                        tracing::debug!(pid, "Player killed");
                    }
                }
            }
            alive_flag.store(false, Ordering::SeqCst);
            let _ = exit_tx.send(());
            let _ = reaped_tx.send(true);
        });

        Ok(Launched {
            process: Box::new(MpvProcess {
                pid,
                alive,
                kill: Some(kill_tx),
                reaped: reaped_rx,
            }),
            exited: exit_rx,
        })
    }
}

struct MpvProcess {
    pid: Option<u32>,
    alive: Arc<AtomicBool>,
    kill: Option<oneshot::Sender<()>>,
    /// Flips to true once the child has been waited on
    reaped: watch::Receiver<bool>,
}

impl MpvProcess {
    fn signal(&self, signal: Signal) -> Result<()> {
        match self.pid {
            Some(pid) if self.alive.load(Ordering::SeqCst) => send_signal(pid, signal),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl PlayerProcess for MpvProcess {
    fn suspend(&mut self) -> Result<()> {
        self.signal(Signal::Stop)
    }

    fn resume(&mut self) -> Result<()> {
        self.signal(Signal::Continue)
    }

    async fn terminate(&mut self) {
        if let Some(kill) = self.kill.take() {
            let _ = kill.send(());
        }
        // `Child::kill` also reaps, so the pid is gone once this flips
        let reaped = self.reaped.wait_for(|done| *done).await.is_ok();
        if !reaped {
            tracing::warn!(pid = ?self.pid, "Player waiter went away before reaping");
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Signal {
    Stop,
    Continue,
}

#[cfg(unix)]
fn send_signal(pid: u32, signal: Signal) -> Result<()> {
    let raw = match signal {
        Signal::Stop => libc::SIGSTOP,
        Signal::Continue => libc::SIGCONT,
    };
    let target = libc::pid_t::try_from(pid).map_err(|e| PlayerError::Signal {
        pid,
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, e),
    })?;

    // SAFETY: kill(2) takes plain integers and touches no memory of ours
    if unsafe { libc::kill(target, raw) } == 0 {
        return Ok(());
    }

    let err = std::io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        // Exited between the liveness check and the signal
        return Ok(());
    }
    Err(PlayerError::Signal { pid, source: err })
}

#[cfg(not(unix))]
fn send_signal(_pid: u32, _signal: Signal) -> Result<()> {
    Err(PlayerError::SignalUnsupported)
}
