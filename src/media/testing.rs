//! Test doubles for the media seams, shared by the session and controller tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{oneshot, Semaphore};

use crate::error::{PlayerError, Result};
use crate::model::{PlaySource, TrackRef};
use super::{Fetcher, Launched, PlayerLauncher, PlayerProcess, Resolver};

#[derive(Default)]
pub(crate) struct StubResolver {
    results: HashMap<String, TrackRef>,
    /// Queries that block until a permit is added
    gates: HashMap<String, Arc<Semaphore>>,
    calls: StdMutex<Vec<String>>,
}

impl StubResolver {
    pub(crate) fn with(mut self, query: &str, reference: &str) -> Self {
        self.results.insert(query.to_string(), TrackRef::new(reference));
        self
    }

    pub(crate) fn gated(mut self, query: &str) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gates.insert(query.to_string(), gate.clone());
        (self, gate)
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Resolver for StubResolver {
    async fn resolve(&self, query: &str) -> Option<TrackRef> {
        self.calls.lock().unwrap().push(query.to_string());
        if let Some(gate) = self.gates.get(query) {
            let _permit = gate.acquire().await.unwrap();
        }
        self.results.get(query).cloned()
    }
}

pub(crate) struct StubFetcher {
    path: Option<PathBuf>,
    calls: StdMutex<Vec<TrackRef>>,
}

impl StubFetcher {
    pub(crate) fn returning(path: &str) -> Self {
        Self {
            path: Some(PathBuf::from(path)),
            calls: StdMutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            path: None,
            calls: StdMutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<TrackRef> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn materialize(&self, reference: &TrackRef) -> Result<PathBuf> {
        self.calls.lock().unwrap().push(reference.clone());
        self.path.clone().ok_or_else(|| PlayerError::FetchFailed {
            reference: reference.to_string(),
            reason: "provider error".to_string(),
        })
    }
}

pub(crate) type ExitSender = Arc<StdMutex<Option<oneshot::Sender<()>>>>;

/// Launcher that tracks how many of its processes are alive at once
#[derive(Default)]
pub(crate) struct StubLauncher {
    pub(crate) fail: AtomicBool,
    launches: StdMutex<Vec<PlaySource>>,
    exits: StdMutex<Vec<ExitSender>>,
    live: Arc<AtomicUsize>,
    max_live: Arc<AtomicUsize>,
    signals: Arc<StdMutex<Vec<&'static str>>>,
}

impl StubLauncher {
    pub(crate) fn launches(&self) -> Vec<PlaySource> {
        self.launches.lock().unwrap().clone()
    }

    pub(crate) fn signals(&self) -> Vec<&'static str> {
        self.signals.lock().unwrap().clone()
    }

    pub(crate) fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub(crate) fn max_live(&self) -> usize {
        self.max_live.load(Ordering::SeqCst)
    }

    /// Make the most recently launched process exit on its own
    pub(crate) fn finish_latest(&self) {
        let exit = self.exits.lock().unwrap().last().cloned().unwrap();
        if let Some(tx) = exit.lock().unwrap().take() {
            self.live.fetch_sub(1, Ordering::SeqCst);
            let _ = tx.send(());
        }
    }
}

#[async_trait]
impl PlayerLauncher for StubLauncher {
    async fn launch(&self, source: &PlaySource, _volume: u8) -> Result<Launched> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PlayerError::LaunchFailed {
                program: "mpv".to_string(),
                reason: "No such file or directory".to_string(),
            });
        }

        self.launches.lock().unwrap().push(source.clone());
        let now_live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_live.fetch_max(now_live, Ordering::SeqCst);

        let (tx, rx) = oneshot::channel();
        let exit: ExitSender = Arc::new(StdMutex::new(Some(tx)));
        self.exits.lock().unwrap().push(exit.clone());

        Ok(Launched {
            process: Box::new(StubProcess {
                exit,
                live: self.live.clone(),
                signals: self.signals.clone(),
            }),
            exited: rx,
        })
    }
}

pub(crate) struct StubProcess {
    exit: ExitSender,
    live: Arc<AtomicUsize>,
    signals: Arc<StdMutex<Vec<&'static str>>>,
}

#[async_trait]
impl PlayerProcess for StubProcess {
    fn suspend(&mut self) -> Result<()> {
        self.signals.lock().unwrap().push("suspend");
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        self.signals.lock().unwrap().push("resume");
        Ok(())
    }

    async fn terminate(&mut self) {
        self.signals.lock().unwrap().push("terminate");
        if let Some(tx) = self.exit.lock().unwrap().take() {
            self.live.fetch_sub(1, Ordering::SeqCst);
            let _ = tx.send(());
        }
    }
}

/// Shell script standing in for mpv: records its pid next to itself, then sleeps
#[cfg(unix)]
pub(crate) fn sleeping_player(dir: &std::path::Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("fake-mpv.sh");
    std::fs::write(&script, "#!/bin/sh\necho $$ >> \"$0.pids\"\nexec sleep 30\n").unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

/// Pids recorded by [`sleeping_player`], once at least `count` have started
#[cfg(unix)]
pub(crate) async fn wait_for_pids(script: &std::path::Path, count: usize) -> Vec<u32> {
    let file = PathBuf::from(format!("{}.pids", script.display()));
    tokio::time::timeout(std::time::Duration::from_secs(5), async {
        loop {
            let pids: Vec<u32> = std::fs::read_to_string(&file)
                .unwrap_or_default()
                .lines()
                .filter_map(|line| line.trim().parse().ok())
                .collect();
            if pids.len() >= count {
                return pids;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("player script never started")
}

/// Whether `pid` still has a process entry (zombies included)
#[cfg(target_os = "linux")]
pub(crate) fn is_running(pid: u32) -> bool {
    std::path::Path::new(&format!("/proc/{pid}")).exists()
}

/// Launch, retrying briefly while a freshly written script is still busy
/// (ETXTBSY when another test forks at the same moment)
#[cfg(unix)]
pub(crate) async fn launch_retrying(launcher: &dyn PlayerLauncher, source: &PlaySource) -> Launched {
    let mut attempts = 0;
    loop {
        match launcher.launch(source, 50).await {
            Ok(launched) => return launched,
            Err(e) if attempts < 10 => {
                attempts += 1;
                tracing::debug!(error = %e, attempts, "Retrying launch");
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            }
            Err(e) => panic!("player never launched: {e}"),
        }
    }
}
