use super::*;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::media::testing::{StubFetcher, StubLauncher, StubResolver};
use crate::model::{PlaySource, Settings, TrackRef};
use crate::session::SessionEvent;

const LOFI: &str = "https://www.youtube.com/watch?v=abc123";
const JAZZ: &str = "https://www.youtube.com/watch?v=jazz42";

struct Fixture {
    controller: AppController,
    launcher: Arc<StubLauncher>,
    resolver: Arc<StubResolver>,
    fetcher: Arc<StubFetcher>,
    store: SettingsStore,
    _events: UnboundedReceiver<SessionEvent>,
    _dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        Self::with_store_path(dir.path().join("settings.json"), dir)
    }

    fn with_store_path(path: PathBuf, dir: TempDir) -> Self {
        let resolver = StubResolver::default().with("lofi beats", LOFI).with("jazz", JAZZ);
        Self::build(resolver, path, dir)
    }

    fn with_resolver(resolver: StubResolver) -> Self {
        let dir = TempDir::new().unwrap();
        Self::build(resolver, dir.path().join("settings.json"), dir)
    }

    fn build(resolver: StubResolver, path: PathBuf, dir: TempDir) -> Self {
        let resolver = Arc::new(resolver);
        let fetcher = Arc::new(StubFetcher::returning("/cache/abc123.mp3"));
        let launcher = Arc::new(StubLauncher::default());
        let (session, events) = PlayerSession::new(resolver.clone(), fetcher.clone(), launcher.clone());
        let model = Arc::new(AppModel::new(Settings::default()));
        let controller = AppController::new(model, session, SettingsStore::new(&path));
        Self {
            controller,
            launcher,
            resolver,
            fetcher,
            store: SettingsStore::new(path),
            _events: events,
            _dir: dir,
        }
    }

    async fn type_song(&self, text: &str) {
        self.controller.model.clear_input().await;
        for c in text.chars() {
            self.controller.model.append_to_input(c).await;
        }
    }

    async fn run(&self, intent: Intent) {
        if let Some(worker) = self.controller.dispatch(intent).await {
            worker.await.unwrap();
        }
    }

    fn saved(&self) -> Settings {
        self.store.load().unwrap()
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

// ============================================================================
// Playback intents
// ============================================================================

#[tokio::test]
async fn test_play_uses_form_values() {
    let f = Fixture::new();
    f.type_song("lofi beats").await;
    f.controller.model.set_volume(80).await;
    f.controller.model.toggle_offline().await;

    f.run(Intent::Play).await;

    assert_eq!(f.fetcher.calls(), vec![TrackRef::new(LOFI)]);
    assert_eq!(
        f.launcher.launches(),
        vec![PlaySource::Local(PathBuf::from("/cache/abc123.mp3"))]
    );
    let snapshot = f.controller.session.snapshot().await;
    assert_eq!(snapshot.current, Some(TrackRef::new(LOFI)));
    assert_eq!(f.controller.model.get_ui_state().await.busy_workers, 0);
}

#[tokio::test]
async fn test_play_not_found_launches_nothing() {
    let f = Fixture::new();
    f.type_song("zzqqxx-nonexistent").await;

    f.run(Intent::Play).await;

    assert!(f.launcher.launches().is_empty());
    assert!(f.controller.session.snapshot().await.is_idle());
}

#[tokio::test]
async fn test_stop_cancels_play_still_waiting_for_a_worker() {
    let (resolver, gate) = StubResolver::default()
        .with("slow", LOFI)
        .with("late", JAZZ)
        .gated("slow");
    let f = Fixture::with_resolver(resolver);

    // Fill every worker slot with a search that hangs
    f.type_song("slow").await;
    let mut workers = Vec::new();
    for _ in 0..MAX_WORKERS {
        workers.push(f.controller.dispatch(Intent::Play).await.unwrap());
    }
    tokio::time::timeout(std::time::Duration::from_secs(2), async {
        while f.resolver.calls().len() < MAX_WORKERS {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();

    // Issued before Stop, but only gets a slot after it
    f.type_song("late").await;
    workers.push(f.controller.dispatch(Intent::Play).await.unwrap());
    f.run(Intent::Stop).await;

    gate.add_permits(MAX_WORKERS);
    for worker in workers {
        worker.await.unwrap();
    }

    assert!(f.launcher.launches().is_empty());
    assert!(f.controller.session.snapshot().await.is_idle());
    assert!(!f.resolver.calls().contains(&"late".to_string()));
    assert_eq!(f.controller.model.get_ui_state().await.busy_workers, 0);
}

#[tokio::test]
async fn test_pause_and_stop_when_idle_are_noops() {
    let f = Fixture::new();

    f.run(Intent::Pause).await;
    assert!(f.launcher.signals().is_empty());
    f.run(Intent::Stop).await;

    assert!(!f.controller.model.has_error().await);
    assert!(f.controller.model.latest_status().await.unwrap().ends_with("Nothing is playing"));
}

#[tokio::test]
async fn test_pause_toggles_running_player() {
    let f = Fixture::new();
    f.type_song("lofi beats").await;
    f.run(Intent::Play).await;

    f.run(Intent::Pause).await;
    f.run(Intent::Pause).await;

    assert_eq!(f.launcher.signals(), vec!["suspend", "resume"]);
}

#[tokio::test]
async fn test_next_on_empty_playlist_is_a_noop() {
    let f = Fixture::new();

    assert!(f.controller.dispatch(Intent::Next).await.is_none());

    assert!(f.launcher.launches().is_empty());
    assert!(f.controller.model.latest_status().await.unwrap().ends_with("Playlist is empty"));
}

#[tokio::test]
async fn test_next_pops_front_and_persists() {
    let f = Fixture::new();
    f.controller.model.add_to_playlist(TrackRef::new(LOFI)).await;
    f.controller.model.add_to_playlist(TrackRef::new(JAZZ)).await;

    f.run(Intent::Next).await;

    assert_eq!(f.launcher.launches(), vec![PlaySource::Stream(TrackRef::new(LOFI))]);
    let saved: Vec<TrackRef> = f.saved().playlist.iter().cloned().collect();
    assert_eq!(saved, vec![TrackRef::new(JAZZ)]);
}

#[tokio::test]
async fn test_toggle_loop_reaches_live_session() {
    let f = Fixture::new();
    f.type_song("lofi beats").await;
    f.run(Intent::Play).await;

    f.run(Intent::ToggleLoop).await;
    assert!(f.controller.session.snapshot().await.loop_enabled);

    f.run(Intent::ToggleLoop).await;
    assert!(!f.controller.session.snapshot().await.loop_enabled);
}

#[tokio::test]
async fn test_exit_stops_player_and_quits() {
    let f = Fixture::new();
    f.type_song("lofi beats").await;
    f.run(Intent::Play).await;

    f.run(Intent::Exit).await;

    assert!(f.controller.model.should_quit().await);
    assert_eq!(f.launcher.live(), 0);
    assert!(f.controller.session.snapshot().await.is_idle());
}

// ============================================================================
// Playlist and settings intents
// ============================================================================

#[tokio::test]
async fn test_add_url_goes_straight_in() {
    let f = Fixture::new();
    f.type_song(JAZZ).await;

    assert!(f.controller.dispatch(Intent::AddToPlaylist).await.is_none());

    let saved: Vec<TrackRef> = f.saved().playlist.iter().cloned().collect();
    assert_eq!(saved, vec![TrackRef::new(JAZZ)]);
    assert!(f.launcher.launches().is_empty());
}

#[tokio::test]
async fn test_add_text_resolves_first() {
    let f = Fixture::new();
    f.type_song("lofi beats").await;
    f.run(Intent::AddToPlaylist).await;

    f.type_song("zzqqxx-nonexistent").await;
    f.run(Intent::AddToPlaylist).await;

    let saved: Vec<TrackRef> = f.saved().playlist.iter().cloned().collect();
    assert_eq!(saved, vec![TrackRef::new(LOFI)]);
}

#[tokio::test]
async fn test_clear_and_remove_persist() {
    let f = Fixture::new();
    for r in [LOFI, JAZZ] {
        f.type_song(r).await;
        f.run(Intent::AddToPlaylist).await;
    }

    f.run(Intent::RemoveSelected).await;
    assert_eq!(f.saved().playlist.len(), 1);

    f.run(Intent::ClearPlaylist).await;
    assert!(f.saved().playlist.is_empty());
}

#[tokio::test]
async fn test_theme_and_volume_persist() {
    let f = Fixture::new();

    f.run(Intent::ChangeTheme).await;
    f.run(Intent::VolumeChanged(130)).await;

    let saved = f.saved();
    assert_eq!(saved.theme, "Light");
    assert_eq!(saved.volume, 100);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_saves_keep_the_latest_playlist() {
    let f = Fixture::new();

    for round in 0..10 {
        let mut saves = Vec::new();
        for i in 0..8 {
            let controller = f.controller.clone();
            saves.push(tokio::spawn(async move {
                controller
                    .model
                    .add_to_playlist(TrackRef::from_video_id(&format!("r{round}i{i}")))
                    .await;
                controller.persist().await;
            }));
        }
        for save in saves {
            save.await.unwrap();
        }

        assert!(!f.controller.model.has_error().await, "round {round} failed to save");
        assert_eq!(f.saved().playlist, f.controller.model.get_settings().await.playlist);
    }
    assert_eq!(f.saved().playlist.len(), 80);
}

#[tokio::test]
async fn test_persistence_failure_is_reported_not_fatal() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let f = Fixture::with_store_path(blocker.join("settings.json"), dir);

    f.run(Intent::ChangeTheme).await;

    assert!(f.controller.model.has_error().await);
    assert_eq!(f.controller.model.get_settings().await.theme, "Light");

    // Playback still works afterwards
    f.controller.model.clear_error().await;
    f.type_song("lofi beats").await;
    f.run(Intent::Play).await;
    assert_eq!(f.launcher.launches().len(), 1);
}

#[tokio::test]
async fn test_listener_mirrors_events_to_status_panel() {
    let resolver = Arc::new(StubResolver::default().with("lofi beats", LOFI));
    let launcher = Arc::new(StubLauncher::default());
    let (session, events) = PlayerSession::new(resolver, Arc::new(StubFetcher::failing()), launcher);
    let dir = TempDir::new().unwrap();
    let model = Arc::new(AppModel::default());
    let controller = AppController::new(model.clone(), session, SettingsStore::new(dir.path().join("s.json")));
    controller.start_session_event_listener(events);

    model.append_to_input('x').await;
    controller.dispatch(Intent::Play).await.unwrap().await.unwrap();

    tokio::time::timeout(std::time::Duration::from_secs(2), async {
        while !model
            .latest_status()
            .await
            .is_some_and(|line| line.ends_with("Song not found, please try again."))
        {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();
    assert!(!model.has_error().await);

    // Offline download failure raises the overlay
    model.clear_input().await;
    for c in "lofi beats".chars() {
        model.append_to_input(c).await;
    }
    model.toggle_offline().await;
    controller.dispatch(Intent::Play).await.unwrap().await.unwrap();

    tokio::time::timeout(std::time::Duration::from_secs(2), async {
        while !model.has_error().await {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();
}

// ============================================================================
// Keys
// ============================================================================

#[tokio::test]
async fn test_typing_then_enter_plays() {
    let f = Fixture::new();
    for c in "jazz".chars() {
        f.controller.handle_key_event(key(KeyCode::Char(c))).await.unwrap();
    }
    assert_eq!(f.controller.model.form_values().await.song, "jazz");

    f.controller.handle_key_event(key(KeyCode::Enter)).await.unwrap();

    tokio::time::timeout(std::time::Duration::from_secs(2), async {
        while f.launcher.launches().is_empty() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();
    assert_eq!(f.launcher.launches(), vec![PlaySource::Stream(TrackRef::new(JAZZ))]);
}

#[tokio::test]
async fn test_playlist_section_shortcuts() {
    let f = Fixture::new();
    f.controller.handle_key_event(key(KeyCode::Tab)).await.unwrap();

    f.controller.handle_key_event(key(KeyCode::Char('l'))).await.unwrap();
    f.controller.handle_key_event(key(KeyCode::Char('o'))).await.unwrap();
    f.controller.handle_key_event(key(KeyCode::Char('-'))).await.unwrap();

    let form = f.controller.model.form_values().await;
    assert!(form.loop_enabled);
    assert!(form.offline);
    assert_eq!(form.volume, 45);
    assert!(form.song.is_empty());
    assert_eq!(f.saved().volume, 45);

    f.controller.handle_key_event(key(KeyCode::Char('q'))).await.unwrap();
    assert!(f.controller.model.should_quit().await);
}

#[tokio::test]
async fn test_volume_keys_stop_at_the_bounds() {
    let f = Fixture::new();
    f.controller.model.set_volume(98).await;

    f.controller.handle_key_event(key(KeyCode::Up)).await.unwrap();
    assert_eq!(f.controller.model.form_values().await.volume, 100);
    assert_eq!(f.saved().volume, 100);

    // Already at the top, nothing to report
    let status = f.controller.model.latest_status().await;
    f.controller.handle_key_event(key(KeyCode::Up)).await.unwrap();
    assert_eq!(f.controller.model.latest_status().await, status);

    f.controller.model.set_volume(3).await;
    f.controller.handle_key_event(key(KeyCode::Down)).await.unwrap();
    assert_eq!(f.controller.model.form_values().await.volume, 0);
}

#[tokio::test]
async fn test_error_overlay_swallows_keys() {
    let f = Fixture::new();
    f.controller.model.set_error("boom".to_string()).await;

    f.controller.handle_key_event(key(KeyCode::Char('q'))).await.unwrap();
    assert!(!f.controller.model.should_quit().await);

    f.controller.handle_key_event(key(KeyCode::Esc)).await.unwrap();
    assert!(!f.controller.model.has_error().await);
}

#[tokio::test]
async fn test_ctrl_q_quits_from_song_field() {
    let f = Fixture::new();
    f.controller
        .handle_key_event(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL))
        .await
        .unwrap();

    assert!(f.controller.model.should_quit().await);
    assert!(f.controller.model.form_values().await.song.is_empty());
}
