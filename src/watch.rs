//! Rebuild-and-repack loop for `npdk watch`.
//!
//! File events from the project tree are debounced; a relevant change runs
//! the manifest's build command and, if it succeeds, packs the build output.

use crate::archive::{ARCHIVE_EXTENSION, PackReport, Packer};
use crate::error::{CommandError, IoError, Result};
use crate::manifest::PluginManifest;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Component, Path, PathBuf};
use std::process::Command;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Default quiet period before a rebuild.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(1);

/// Directory names whose changes never trigger a rebuild.
pub const IGNORED_DIRS: &[&str] = &["dist", "node_modules"];

/// Settings for a watch session.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Project root holding `plugin.conf.toml`; archives are written here.
    pub root: PathBuf,
    /// Build output directory to pack.
    pub source: PathBuf,
    /// Quiet period before a rebuild.
    pub debounce: Duration,
}

impl WatchOptions {
    /// Options for `root`, packing `root/dist`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            source: root.join("dist"),
            root,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// Watches a plugin project and rebuilds it on change.
#[derive(Debug)]
pub struct PluginWatcher {
    options: WatchOptions,
    manifest: PluginManifest,
}

impl PluginWatcher {
    /// Loads the project manifest and resolves the root to an absolute path,
    /// matching the paths the platform watcher reports.
    ///
    /// # Errors
    ///
    /// Returns an error if `plugin.conf.toml` is missing or invalid, or the
    /// root can't be resolved.
    pub fn new(mut options: WatchOptions) -> Result<Self> {
        let manifest = PluginManifest::load_from_dir(&options.root)?;
        options.root = options.root.canonicalize().map_err(|e| IoError::ReadFailed {
            path: options.root.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { options, manifest })
    }

    /// The resolved project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.options.root
    }

    /// The loaded manifest.
    #[must_use]
    pub const fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    /// Watches the project root until the watcher shuts down.
    ///
    /// # Errors
    ///
    /// Returns an error if the file watcher can't be started.
    pub fn run(&self) -> Result<()> {
        let (tx, rx) = mpsc::channel();
        let mut watcher = RecommendedWatcher::new(tx, notify::Config::default())?;
        watcher.watch(&self.options.root, RecursiveMode::Recursive)?;
        info!(
            root = %self.options.root.display(),
            build = %self.manifest.profile.build,
            "watching plugin project"
        );

        let rebuilds = self.process(&rx);
        info!(rebuilds, "watcher stopped");
        Ok(())
    }

    /// Consumes events until the channel closes, returning the number of
    /// rebuilds attempted.
    pub fn process(&self, rx: &Receiver<notify::Result<Event>>) -> usize {
        let mut rebuilds = 0;

        while let Ok(received) = rx.recv() {
            if !self.accept(received) {
                continue;
            }
            let open = self.settle(rx);

            rebuilds += 1;
            match self.rebuild() {
                Ok(report) => info!(
                    path = %report.path.display(),
                    entries = report.entries,
                    "rebuild packed"
                ),
                Err(e) => error!("rebuild failed: {e}"),
            }

            if !open {
                break;
            }
        }

        rebuilds
    }

    /// Runs the build command, then packs the build output into the root.
    ///
    /// # Errors
    ///
    /// Returns an error if the build fails or packing fails.
    pub fn rebuild(&self) -> Result<PackReport> {
        info!(command = %self.manifest.profile.build, "rebuilding");
        run_build(&self.manifest.profile.build, &self.options.root)?;
        Packer::new(&self.options.source)?.pack(&self.options.root)
    }

    fn accept(&self, received: notify::Result<Event>) -> bool {
        match received {
            Ok(event) => {
                let relevant = is_relevant(&self.options.root, &event);
                debug!(kind = ?event.kind, paths = ?event.paths, relevant, "file event");
                relevant
            }
            Err(e) => {
                warn!("file watcher error: {e}");
                false
            }
        }
    }

    /// Drains events until the debounce window passes quietly. Returns false
    /// if the channel closed meanwhile.
    fn settle(&self, rx: &Receiver<notify::Result<Event>>) -> bool {
        loop {
            match rx.recv_timeout(self.options.debounce) {
                Ok(_) => {}
                Err(RecvTimeoutError::Timeout) => return true,
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
    }
}

/// Whether `event` should trigger a rebuild.
///
/// Access events are ignored, as are events whose every path is build
/// output, a dependency, or a packed archive.
#[must_use]
pub fn is_relevant(root: &Path, event: &Event) -> bool {
    if event.kind.is_access() {
        return false;
    }
    event.paths.iter().any(|path| !is_ignored_path(root, path))
}

/// Whether changes to `path` are produced by the build itself.
///
/// Only components below `root` are checked against [`IGNORED_DIRS`]; a path
/// outside `root` is never treated as build output.
#[must_use]
pub fn is_ignored_path(root: &Path, path: &Path) -> bool {
    let in_ignored_dir = path.strip_prefix(root).is_ok_and(|rel| {
        rel.components().any(|c| match c {
            Component::Normal(part) => IGNORED_DIRS.iter().any(|d| part == *d),
            _ => false,
        })
    });
    let is_archive = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(&format!(".{ARCHIVE_EXTENSION}")));

    in_ignored_dir || is_archive
}

/// Runs `command` through the platform shell in `cwd`.
///
/// # Errors
///
/// Returns an error if the shell can't be spawned or the command exits
/// unsuccessfully.
pub fn run_build(command: &str, cwd: &Path) -> Result<()> {
    let status = shell(command)
        .current_dir(cwd)
        .status()
        .map_err(|e| CommandError::ExecutionFailed(format!("failed to run '{command}': {e}")))?;

    if status.success() {
        Ok(())
    } else {
        Err(CommandError::BuildFailed {
            command: command.to_string(),
            status: status.to_string(),
        }
        .into())
    }
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", command]);
    cmd
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", command]);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::MANIFEST_FILE;
    use notify::EventKind;
    use notify::event::{AccessKind, CreateKind, ModifyKind};
    use tempfile::TempDir;

    fn event(kind: EventKind, paths: &[&Path]) -> Event {
        paths
            .iter()
            .fold(Event::new(kind), |e, p| e.add_path(p.to_path_buf()))
    }

    #[test]
    fn test_ignored_paths() {
        let root = Path::new("/work/plugin");
        assert!(is_ignored_path(root, &root.join("dist/remoteEntry.js")));
        assert!(is_ignored_path(root, &root.join("node_modules/react/index.js")));
        assert!(is_ignored_path(root, &root.join("foo.notex.plugin")));
        assert!(!is_ignored_path(root, &root.join("src/index.tsx")));
        assert!(!is_ignored_path(root, &root.join("distribution.md")));
    }

    #[test]
    fn test_ancestor_dirs_are_not_build_output() {
        let root = Path::new("/home/u/dist/proj");
        assert!(!is_ignored_path(root, &root.join("src/index.tsx")));
        assert!(is_ignored_path(root, &root.join("dist/index.js")));

        let relative = Path::new(".");
        assert!(!is_ignored_path(
            relative,
            Path::new("/home/u/dist/proj/src/index.tsx")
        ));
    }

    #[test]
    fn test_watcher_resolves_root() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(MANIFEST_FILE),
            "[package]\nname = \"demo\"\nversion = \"0.1.0\"\n\n[profile]\nbuild = \"true\"\n",
        )
        .unwrap();
        let nested = temp.path().join("src");
        std::fs::create_dir(&nested).unwrap();

        let watcher = PluginWatcher::new(WatchOptions::new(nested.join(".."))).unwrap();
        assert!(watcher.root().is_absolute());
        assert_eq!(watcher.root(), temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_is_relevant() {
        let root = Path::new("/work/plugin");
        let src = root.join("src/App.tsx");
        let dist = root.join("dist/index.js");

        let modify = EventKind::Modify(ModifyKind::Any);
        assert!(is_relevant(root, &event(modify, &[&src])));
        assert!(is_relevant(root, &event(modify, &[&dist, &src])));
        assert!(!is_relevant(root, &event(modify, &[&dist])));
        assert!(!is_relevant(
            root,
            &event(EventKind::Access(AccessKind::Any), &[&src])
        ));
        assert!(is_relevant(
            root,
            &event(EventKind::Create(CreateKind::File), &[&src])
        ));
    }

    #[test]
    fn test_watcher_requires_manifest() {
        let temp = TempDir::new().unwrap();
        assert!(PluginWatcher::new(WatchOptions::new(temp.path())).is_err());
    }

    #[cfg(unix)]
    fn project(build: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        let manifest = format!(
            "[package]\nname = \"demo\"\nversion = \"0.1.0\"\nexposes = [\"./Demo\"]\n\n[profile]\nbuild = \"{build}\"\n"
        );
        std::fs::write(temp.path().join(MANIFEST_FILE), manifest).unwrap();
        temp
    }

    #[cfg(unix)]
    #[test]
    fn test_run_build_status() {
        let temp = TempDir::new().unwrap();
        assert!(run_build("true", temp.path()).is_ok());
        let err = run_build("exit 3", temp.path()).unwrap_err();
        assert!(err.to_string().contains("exit 3"));
    }

    #[cfg(unix)]
    #[test]
    fn test_rebuild_packs_output() {
        let temp = project("mkdir -p dist && cp plugin.conf.toml dist/ && echo x > dist/remoteEntry.js");
        let watcher = PluginWatcher::new(WatchOptions::new(temp.path())).unwrap();

        let report = watcher.rebuild().unwrap();
        assert_eq!(
            report.path,
            temp.path().canonicalize().unwrap().join("demo.notex.plugin")
        );
        assert_eq!(report.entries, 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_process_debounces_events() {
        let temp = project("exit 1");
        let mut options = WatchOptions::new(temp.path());
        options.debounce = Duration::from_millis(10);
        let watcher = PluginWatcher::new(options).unwrap();

        let (tx, rx) = mpsc::channel();
        let src = temp.path().join("src/index.tsx");
        let dist = temp.path().join("dist/index.js");
        let modify = EventKind::Modify(ModifyKind::Any);
        tx.send(Ok(event(modify, &[&dist]))).unwrap();
        tx.send(Ok(event(modify, &[&src]))).unwrap();
        tx.send(Ok(event(modify, &[&src]))).unwrap();
        tx.send(Ok(event(modify, &[&src]))).unwrap();
        drop(tx);

        assert_eq!(watcher.process(&rx), 1);
    }
}
