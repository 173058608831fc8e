//! Watch session lifecycle.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tokio::sync::mpsc;
use tr_core::{Config, FileContext, FsEvent, GenerateOptions};
use tr_scanner::{ScanConfig, Scanner};
use tr_typegen::DeclarationGenerator;
use tracing::{debug, info, trace};

use crate::classifier::PathClassifier;
use crate::error::SessionError;
use crate::handler::{EventOutcome, apply_event};
use crate::index::RouteIndex;
use crate::regenerator::{DebouncedRegenerator, RegenerationOutcome};

/// Lifecycle state of a [`WatchSession`].
///
/// There is no uninitialized state: a session only exists once
/// [`WatchSession::start`] has scanned the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Scanned and accepting events.
    Armed,
    /// The event stream has ended; further events are dropped.
    TornDown,
}

/// Counters collected over the life of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Events handed to the session.
    pub events: usize,
    /// Events whose path was outside the app root.
    pub ignored: usize,
    /// Regeneration requests scheduled (before debouncing).
    pub scheduled: usize,
    /// Declaration files written.
    pub written: usize,
    /// Regenerations that had nothing to declare.
    pub skipped: usize,
    /// Regenerations that failed.
    pub failed: usize,
    /// Files tracked in the context.
    pub files: usize,
    /// Route files tracked in the index.
    pub routes: usize,
}

impl SessionStats {
    fn record(&mut self, outcome: &RegenerationOutcome) {
        match outcome {
            RegenerationOutcome::Written { .. } => self.written += 1,
            RegenerationOutcome::Skipped => self.skipped += 1,
            RegenerationOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// Keeps `router.d.ts` in sync with the route tree below one app root.
///
/// A session owns its [`FileContext`] and [`RouteIndex`] exclusively and
/// processes one event at a time. Qualifying events schedule a debounced
/// regeneration that reads the context as it is when the timer fires.
///
/// Sessions without an app root are inert: every event is ignored.
///
/// # Examples
///
/// ```no_run
/// use tokio::sync::mpsc;
/// use tr_core::Config;
/// use tr_session::WatchSession;
/// use tr_typegen::TypedRoutesGenerator;
///
/// # async fn example(config: Config) -> Result<(), tr_session::SessionError> {
/// let mut session = WatchSession::start(&config, TypedRoutesGenerator)?;
/// session.regenerate_now();
///
/// let (_tx, mut rx) = mpsc::channel(100);
/// session.run(&mut rx).await;
/// let stats = session.teardown();
/// println!("{} declaration files written", stats.written);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct WatchSession<G> {
    classifier: PathClassifier,
    context: FileContext,
    routes: RouteIndex,
    output_dir: Utf8PathBuf,
    options: GenerateOptions,
    regenerator: DebouncedRegenerator<G>,
    state: SessionState,
    stats: SessionStats,
}

impl<G: DeclarationGenerator> WatchSession<G> {
    /// Starts a session from configuration.
    ///
    /// Scans `project.app_root` once to seed the context and route index.
    /// Without an app root the session is armed but inert.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Scan`] if the initial scan fails.
    pub fn start(config: &Config, generator: G) -> Result<Self, SessionError> {
        let interval = config.watch.debounce();
        let output_dir = config.typegen.output_dir.clone();

        let Some(root) = &config.project.app_root else {
            info!("No app root configured, watch session is inert");
            return Ok(Self::from_parts(
                None,
                FileContext::default(),
                output_dir,
                interval,
                generator,
            )
            .with_options(config.typegen.options()));
        };

        let scan = Scanner::new(ScanConfig::from_project(root, &config.project))?.scan()?;
        let session = Self::from_parts(
            Some(root.clone()),
            scan.context,
            output_dir,
            interval,
            generator,
        )
        .with_options(config.typegen.options());

        info!(
            root = %root,
            files = session.context.len(),
            routes = session.routes.len(),
            elapsed_ms = scan.elapsed.as_millis(),
            "Watch session armed"
        );
        Ok(session)
    }

    /// Assembles a session from an existing context.
    ///
    /// The route index is seeded from `context`.
    #[must_use]
    pub fn from_parts(
        root: Option<Utf8PathBuf>,
        context: FileContext,
        output_dir: Utf8PathBuf,
        interval: Duration,
        generator: G,
    ) -> Self {
        let routes = RouteIndex::from_context(&context);
        Self {
            classifier: PathClassifier::new(root),
            context,
            routes,
            output_dir,
            options: GenerateOptions::default(),
            regenerator: DebouncedRegenerator::new(generator, interval),
            state: SessionState::Armed,
            stats: SessionStats::default(),
        }
    }

    /// Sets the options used by [`regenerate_now`](Self::regenerate_now).
    ///
    /// Event-driven regenerations always use the default options.
    #[must_use]
    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    /// Applies one event, scheduling a regeneration when it touches a route.
    ///
    /// Returns `true` if a regeneration was scheduled.
    pub fn handle_event(&mut self, event: &FsEvent) -> bool {
        if self.state == SessionState::TornDown {
            trace!(path = %event.path, "Dropping event after teardown");
            return false;
        }

        self.stats.events += 1;
        match apply_event(&self.classifier, &mut self.context, &mut self.routes, event) {
            EventOutcome::Ignored => {
                self.stats.ignored += 1;
                false
            }
            EventOutcome::Applied { regenerate: false } => false,
            EventOutcome::Applied { regenerate: true } => {
                self.regenerator
                    .schedule(self.output_dir.clone(), GenerateOptions::default());
                self.stats.scheduled += 1;
                true
            }
        }
    }

    /// Processes events until the stream closes, then tears down.
    ///
    /// Pending regenerations fire from inside this loop once their interval
    /// passes. A request still pending when the stream closes is dropped.
    pub async fn run(&mut self, events: &mut mpsc::Receiver<FsEvent>) {
        debug!("Watch session running");
        loop {
            tokio::select! {
                biased;

                event = events.recv() => match event {
                    Some(event) => {
                        self.handle_event(&event);
                    }
                    None => break,
                },
                () = self.regenerator.ready() => {
                    self.fire();
                }
            }
        }
        self.shut_down();
    }

    /// Waits for the pending regeneration's deadline and runs it.
    ///
    /// Returns `None` immediately if nothing is pending.
    pub async fn settle(&mut self) -> Option<RegenerationOutcome> {
        if !self.regenerator.is_pending() {
            return None;
        }
        self.regenerator.ready().await;
        self.fire()
    }

    /// Runs the pending regeneration now.
    pub fn flush(&mut self) -> Option<RegenerationOutcome> {
        let outcome = self.regenerator.flush(&self.context)?;
        self.stats.record(&outcome);
        Some(outcome)
    }

    /// Regenerates immediately with the configured options.
    ///
    /// Used for the initial artifact; a pending request is left in place.
    pub fn regenerate_now(&mut self) -> RegenerationOutcome {
        let outcome = self
            .regenerator
            .run(&self.context, &self.output_dir, &self.options);
        self.stats.record(&outcome);
        outcome
    }

    fn fire(&mut self) -> Option<RegenerationOutcome> {
        let outcome = self.regenerator.fire(&self.context)?;
        self.stats.record(&outcome);
        Some(outcome)
    }

    fn shut_down(&mut self) {
        if self.state == SessionState::TornDown {
            return;
        }
        if self.regenerator.cancel() {
            debug!("Dropped pending regeneration at teardown");
        }
        self.state = SessionState::TornDown;
    }

    /// Returns the tracked files.
    #[inline]
    #[must_use]
    pub const fn context(&self) -> &FileContext {
        &self.context
    }

    /// Returns the tracked route files.
    #[inline]
    #[must_use]
    pub const fn routes(&self) -> &RouteIndex {
        &self.routes
    }

    /// Returns the lifecycle state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the directory receiving the declaration file.
    #[inline]
    #[must_use]
    pub fn output_dir(&self) -> &Utf8Path {
        &self.output_dir
    }

    /// Returns `true` if a regeneration is waiting to fire.
    #[inline]
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.regenerator.is_pending()
    }

    /// Returns the session counters.
    #[must_use]
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            files: self.context.len(),
            routes: self.routes.len(),
            ..self.stats
        }
    }

    /// Ends the session, dropping any pending regeneration.
    #[must_use]
    pub fn teardown(mut self) -> SessionStats {
        self.shut_down();
        let stats = self.stats();
        info!(
            events = stats.events,
            written = stats.written,
            failed = stats.failed,
            "Watch session torn down"
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use tr_core::{DECLARATION_FILE_NAME, RelativePath};
    use tr_typegen::{GenerateError, TypedRoutesGenerator};

    const ROOT: &str = "/project/app";
    const INTERVAL: Duration = Duration::from_millis(1000);

    fn temp_dir() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("Invalid path");
        (dir, path)
    }

    fn session<G: DeclarationGenerator>(
        keys: &[&str],
        output_dir: &Utf8Path,
        generator: G,
    ) -> WatchSession<G> {
        let context = FileContext::from_keys(ROOT, keys.iter().copied().map(RelativePath::new));
        WatchSession::from_parts(
            Some(Utf8PathBuf::from(ROOT)),
            context,
            output_dir.to_owned(),
            INTERVAL,
            generator,
        )
    }

    fn path(relative: &str) -> Utf8PathBuf {
        Utf8Path::new(ROOT).join(relative)
    }

    fn counting(
        calls: &Arc<AtomicUsize>,
    ) -> impl Fn(&FileContext, &GenerateOptions) -> Result<Option<String>, GenerateError> + use<>
    {
        let calls = Arc::clone(calls);
        move |ctx: &FileContext, _: &GenerateOptions| -> Result<Option<String>, GenerateError> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(format!("// {} files\n", ctx.len())))
        }
    }

    fn read_declaration(output_dir: &Utf8Path) -> String {
        fs::read_to_string(output_dir.join(DECLARATION_FILE_NAME)).expect("declaration written")
    }

    #[tokio::test(start_paused = true)]
    async fn test_regeneration_is_idempotent() {
        let (_dir, out) = temp_dir();
        let mut session = session(&["index.tsx", "users/[id].tsx"], &out, TypedRoutesGenerator);

        assert!(session.regenerate_now().is_written());
        let first = read_declaration(&out);
        assert!(session.regenerate_now().is_written());
        assert_eq!(read_declaration(&out), first);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_regenerates_once() {
        let (_dir, out) = temp_dir();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut session = session(&["index.tsx"], &out, counting(&calls));

        for name in ["a.tsx", "b.tsx", "c.tsx", "d.tsx"] {
            assert!(session.handle_event(&FsEvent::added(path(name))));
            tokio::time::advance(Duration::from_millis(200)).await;
        }
        assert!(session.handle_event(&FsEvent::modified(path("index.tsx"))));

        let outcome = session.settle().await;
        assert!(outcome.is_some_and(|o| o.is_written()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(read_declaration(&out), "// 5 files\n");
        assert!(session.settle().await.is_none());

        let stats = session.stats();
        assert_eq!(stats.scheduled, 5);
        assert_eq!(stats.written, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_folder_rename_is_stable() {
        let (_dir, out) = temp_dir();
        let mut session = session(&["index.tsx", "(tabs)/route.tsx"], &out, TypedRoutesGenerator);

        session.handle_event(&FsEvent::added(path("(tabs,test)/route.tsx")));
        // Halfway through the rename both files claim /route
        assert!(matches!(
            TypedRoutesGenerator.generate(session.context(), &GenerateOptions::default()),
            Err(GenerateError::ConflictingRoutes { .. })
        ));
        session.handle_event(&FsEvent::deleted(path("(tabs)/route.tsx")));

        let outcome = session.settle().await;
        assert!(outcome.is_some_and(|o| o.is_written()));
        let text = read_declaration(&out);
        assert!(text.contains("`/(tabs)/route`"));
        assert!(text.contains("`/(test)/route`"));
        assert!(session.settle().await.is_none());

        let stats = session.stats();
        assert_eq!(stats.scheduled, 2);
        assert_eq!(stats.written, 1);
        assert_eq!(stats.failed, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_outside_root_changes_nothing() {
        let (_dir, out) = temp_dir();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut session = session(&["index.tsx"], &out, counting(&calls));

        for event in [
            FsEvent::added("/project/lib/util.tsx"),
            FsEvent::deleted("/project/app/../index.tsx"),
            FsEvent::modified("/somewhere/else.tsx"),
        ] {
            assert!(!session.handle_event(&event));
        }

        assert!(!session.is_pending());
        assert_eq!(session.context().len(), 1);
        assert_eq!(session.routes().len(), 1);
        assert_eq!(session.stats().ignored, 3);
        assert!(session.flush().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_route_changes_do_not_regenerate() {
        let (_dir, out) = temp_dir();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut session = session(&["index.tsx", "_layout.tsx"], &out, counting(&calls));

        assert!(!session.handle_event(&FsEvent::added(path("components/Button.jsx.snap"))));
        assert!(!session.handle_event(&FsEvent::added(path("+html.tsx"))));
        assert!(!session.handle_event(&FsEvent::modified(path("_layout.tsx"))));
        assert!(!session.handle_event(&FsEvent::deleted(path("_layout.tsx"))));

        assert!(!session.is_pending());
        assert!(session.context().contains("./+html.tsx"));
        assert!(!session.context().contains("./_layout.tsx"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_contained() {
        let (_dir, out) = temp_dir();
        let generator = |ctx: &FileContext,
                         _: &GenerateOptions|
         -> Result<Option<String>, GenerateError> {
            if ctx.contains("./broken.tsx") {
                Err(GenerateError::NotARoute("./broken.tsx".to_owned()))
            } else {
                Ok(Some("// ok\n".to_owned()))
            }
        };
        let mut session = session(&["index.tsx"], &out, generator);

        session.handle_event(&FsEvent::added(path("broken.tsx")));
        let outcome = session.settle().await;
        assert!(matches!(outcome, Some(RegenerationOutcome::Failed { .. })));
        assert_eq!(session.state(), SessionState::Armed);

        session.handle_event(&FsEvent::deleted(path("broken.tsx")));
        let outcome = session.settle().await;
        assert!(outcome.is_some_and(|o| o.is_written()));

        let stats = session.stats();
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.written, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_result_leaves_file() {
        let (_dir, out) = temp_dir();
        fs::write(out.join(DECLARATION_FILE_NAME), "previous").unwrap();
        let mut session = session(&["index.tsx"], &out, TypedRoutesGenerator);

        session.handle_event(&FsEvent::deleted(path("index.tsx")));
        let outcome = session.settle().await;
        assert!(matches!(outcome, Some(RegenerationOutcome::Skipped)));
        assert_eq!(read_declaration(&out), "previous");
    }

    #[tokio::test(start_paused = true)]
    async fn test_regenerates_from_latest_context() {
        let (_dir, out) = temp_dir();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut session = session(&["index.tsx"], &out, counting(&calls));

        assert!(session.handle_event(&FsEvent::added(path("about.tsx"))));
        // Not a route, so no reschedule, but still part of the context
        assert!(!session.handle_event(&FsEvent::added(path("logo.png"))));

        session.settle().await;
        assert_eq!(read_declaration(&out), "// 3 files\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_event_regeneration_uses_default_options() {
        let (_dir, out) = temp_dir();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = {
            let seen = Arc::clone(&seen);
            move |_: &FileContext, options: &GenerateOptions| -> Result<Option<String>, GenerateError> {
                seen.lock().unwrap().push(*options);
                Ok(None)
            }
        };
        let partial = GenerateOptions {
            partial_typed_groups: true,
        };
        let mut session = session(&["index.tsx"], &out, recorder).with_options(partial);

        session.regenerate_now();
        session.handle_event(&FsEvent::modified(path("index.tsx")));
        session.settle().await;

        assert_eq!(*seen.lock().unwrap(), vec![partial, GenerateOptions::default()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_fires_while_stream_is_open() {
        let (_dir, out) = temp_dir();
        let mut session = session(&["index.tsx"], &out, TypedRoutesGenerator);
        let (tx, mut rx) = mpsc::channel(8);

        let feed = async move {
            tx.send(FsEvent::added(path("about.tsx"))).await.unwrap();
            tx.send(FsEvent::added(path("/project/outside.tsx"))).await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        };
        tokio::join!(session.run(&mut rx), feed);

        assert_eq!(session.state(), SessionState::TornDown);
        assert!(read_declaration(&out).contains("`/about`"));

        let stats = session.teardown();
        assert_eq!(stats.events, 2);
        assert_eq!(stats.ignored, 1);
        assert_eq!(stats.written, 1);
        assert_eq!(stats.routes, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_drops_pending_on_close() {
        let (_dir, out) = temp_dir();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut session = session(&["index.tsx"], &out, counting(&calls));
        let (tx, mut rx) = mpsc::channel(8);

        tx.send(FsEvent::added(path("about.tsx"))).await.unwrap();
        drop(tx);
        session.run(&mut rx).await;

        assert_eq!(session.state(), SessionState::TornDown);
        assert!(session.context().contains("./about.tsx"));
        assert!(!session.is_pending());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(!session.handle_event(&FsEvent::added(path("late.tsx"))));
        assert!(!session.context().contains("./late.tsx"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_drops_pending() {
        let (_dir, out) = temp_dir();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut session = session(&["index.tsx"], &out, counting(&calls));

        session.handle_event(&FsEvent::modified(path("index.tsx")));
        let stats = session.teardown();

        assert_eq!(stats.scheduled, 1);
        assert_eq!(stats.written, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_start_without_root_is_inert() {
        let (_dir, out) = temp_dir();
        let mut config = Config::default();
        config.typegen.output_dir = out;

        let mut session = WatchSession::start(&config, TypedRoutesGenerator).unwrap();
        assert!(session.context().is_empty());
        assert!(!session.handle_event(&FsEvent::added("/project/app/index.tsx")));
        assert!(session.context().is_empty());
        assert_eq!(session.state(), SessionState::Armed);
    }

    #[test]
    fn test_start_scans_root() {
        let (_root_dir, root) = temp_dir();
        let (_out_dir, out) = temp_dir();
        fs::create_dir_all(root.join("(tabs)")).unwrap();
        for file in ["index.tsx", "_layout.tsx", "(tabs)/settings.tsx", "env.d.ts"] {
            fs::write(root.join(file), "").unwrap();
        }

        let mut config = Config::default();
        config.project.app_root = Some(root);
        config.typegen.output_dir = out.clone();

        let mut session = WatchSession::start(&config, TypedRoutesGenerator).unwrap();
        assert_eq!(session.context().len(), 3);
        assert_eq!(session.routes().len(), 2);
        assert!(session.routes().is_subset_of(session.context()));

        assert!(session.regenerate_now().is_written());
        assert!(read_declaration(&out).contains("`/settings`"));
    }

    #[test]
    fn test_start_missing_root_fails() {
        let mut config = Config::default();
        config.project.app_root = Some(Utf8PathBuf::from("/nonexistent/path/that/does/not/exist"));

        let result = WatchSession::start(&config, TypedRoutesGenerator);
        assert!(matches!(result, Err(SessionError::Scan(_))));
    }

    #[test]
    fn test_stats_serialize() {
        let json = serde_json::to_value(SessionStats::default()).unwrap();
        assert_eq!(json["written"], 0);
        assert_eq!(
            serde_json::to_value(SessionState::TornDown).unwrap(),
            "torn_down"
        );
    }
}
