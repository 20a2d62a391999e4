// ── Recovery download ──
//
// The actual download is done by macrecovery.py. This module turns a
// resolved selection into its command line, prepares the output folder,
// and runs the script with stdio inherited so its progress streams
// straight to the terminal.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::{SelectionState, Variant};

/// Folder name OpenCore expects the recovery image in.
pub const DEFAULT_OUTPUT_DIR: &str = "com.apple.recovery.boot";

/// A fully specified macrecovery.py invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPlan {
    pub script: PathBuf,
    pub board_id: String,
    pub mlb: String,
    pub output_dir: PathBuf,
    pub variant: Variant,
}

/// What [`DownloadPlan::prepare_output_dir`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputDirPrep {
    /// A previous download was removed first.
    pub removed_existing: bool,
}

impl DownloadPlan {
    /// Build a plan from the session's selection. Both the board id and the
    /// MLB must be set.
    pub fn from_selection(
        state: &SelectionState,
        script: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self, CoreError> {
        let board_id = state
            .target_board
            .clone()
            .ok_or(CoreError::IncompleteSelection { missing: "board id" })?;
        let mlb = state
            .target_mlb
            .clone()
            .ok_or(CoreError::IncompleteSelection { missing: "MLB" })?;
        Ok(Self {
            script: script.into(),
            board_id,
            mlb,
            output_dir: output_dir.into(),
            variant: state.variant,
        })
    }

    /// Arguments after the interpreter: the script path, then its flags.
    pub fn args(&self) -> Vec<OsString> {
        vec![
            self.script.clone().into_os_string(),
            "-b".into(),
            self.board_id.clone().into(),
            "-m".into(),
            self.mlb.clone().into(),
            "-o".into(),
            self.output_dir.clone().into_os_string(),
            "-os".into(),
            self.variant.to_string().into(),
            "download".into(),
        ]
    }

    /// The command as shown to the user, with the script reduced to its
    /// file name.
    pub fn display_command(&self) -> String {
        let mut parts: Vec<String> = self
            .args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        if let Some(first) = parts.first_mut() {
            if let Some(name) = self.script.file_name() {
                *first = name.to_string_lossy().into_owned();
            }
        }
        parts.join(" ")
    }

    /// Remove any previous download and create an empty output folder.
    pub fn prepare_output_dir(&self) -> Result<OutputDirPrep, CoreError> {
        let dir = &self.output_dir;
        let removed_existing = dir.exists();
        if removed_existing {
            debug!(dir = %dir.display(), "removing previous download");
            remove_path(dir)?;
        }
        std::fs::create_dir_all(dir)
            .map_err(|e| CoreError::io(format!("failed to create {}", dir.display()), e))?;
        Ok(OutputDirPrep { removed_existing })
    }

    /// The process that performs the download.
    pub fn command(&self, interpreter: &OsStr) -> Command {
        let mut cmd = Command::new(interpreter);
        cmd.args(self.args())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }

    /// Fail early when macrecovery.py has not been installed yet.
    pub fn check_script(&self) -> Result<(), CoreError> {
        if self.script.exists() {
            Ok(())
        } else {
            Err(CoreError::DownloaderMissing {
                path: self.script.display().to_string(),
            })
        }
    }

    /// Run macrecovery.py under `interpreter` and wait for it to finish.
    pub fn run(&self, interpreter: &OsStr) -> Result<(), CoreError> {
        self.check_script()?;

        info!(
            board = %self.board_id,
            mlb = %self.mlb,
            os_type = %self.variant,
            "launching macrecovery"
        );
        let status = self
            .command(interpreter)
            .status()
            .map_err(|e| CoreError::DownloaderLaunch {
                program: interpreter.to_string_lossy().into_owned(),
                reason: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(CoreError::DownloaderFailed {
                code: status.code(),
            })
        }
    }
}

fn remove_path(path: &Path) -> Result<(), CoreError> {
    let result = if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    result.map_err(|e| CoreError::io(format!("failed to remove {}", path.display()), e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn selection() -> SelectionState {
        SelectionState::resolved(
            "11.6",
            "Mac-E43C1C25D4880AD6",
            "00000000000000000",
            Variant::Latest,
        )
    }

    #[test]
    fn plan_requires_board_and_mlb() {
        let mut state = selection();
        state.target_mlb = None;
        let err = DownloadPlan::from_selection(&state, "macrecovery.py", "out").unwrap_err();
        assert!(matches!(
            err,
            CoreError::IncompleteSelection { missing: "MLB" }
        ));

        let err = DownloadPlan::from_selection(&SelectionState::new(), "m.py", "out").unwrap_err();
        assert!(matches!(
            err,
            CoreError::IncompleteSelection { missing: "board id" }
        ));
    }

    #[test]
    fn args_follow_macrecovery_order() {
        let plan = DownloadPlan::from_selection(&selection(), "/data/macrecovery.py", "out").unwrap();
        let args: Vec<_> = plan
            .args()
            .into_iter()
            .map(|a| a.into_string().unwrap())
            .collect();
        assert_eq!(
            args,
            [
                "/data/macrecovery.py",
                "-b",
                "Mac-E43C1C25D4880AD6",
                "-m",
                "00000000000000000",
                "-o",
                "out",
                "-os",
                "latest",
                "download"
            ]
        );
    }

    #[test]
    fn display_command_shows_script_name_only() {
        let plan = DownloadPlan::from_selection(&selection(), "/data/macrecovery.py", "out").unwrap();
        assert_eq!(
            plan.display_command(),
            "macrecovery.py -b Mac-E43C1C25D4880AD6 -m 00000000000000000 -o out -os latest download"
        );
    }

    #[test]
    fn prepare_output_dir_replaces_previous_download() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join(DEFAULT_OUTPUT_DIR);
        let plan = DownloadPlan::from_selection(&selection(), "m.py", &out).unwrap();

        let first = plan.prepare_output_dir().unwrap();
        assert!(!first.removed_existing);
        std::fs::write(out.join("BaseSystem.dmg"), b"old").unwrap();

        let second = plan.prepare_output_dir().unwrap();
        assert!(second.removed_existing);
        assert!(out.is_dir());
        assert!(!out.join("BaseSystem.dmg").exists());
    }

    #[test]
    fn run_reports_missing_script() {
        let dir = tempfile::tempdir().unwrap();
        let plan =
            DownloadPlan::from_selection(&selection(), dir.path().join("nope.py"), dir.path())
                .unwrap();
        let err = plan.run(OsStr::new("python3")).unwrap_err();
        assert!(matches!(err, CoreError::DownloaderMissing { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn run_passes_arguments_to_script() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("macrecovery.py");
        std::fs::write(&script, "printf '%s ' \"$@\" > \"$6/args.txt\"\n").unwrap();
        let out = dir.path().join("out");

        let plan = DownloadPlan::from_selection(&selection(), &script, &out).unwrap();
        plan.prepare_output_dir().unwrap();
        plan.run(OsStr::new("sh")).unwrap();

        let recorded = std::fs::read_to_string(out.join("args.txt")).unwrap();
        assert_eq!(
            recorded.trim_end(),
            "-b Mac-E43C1C25D4880AD6 -m 00000000000000000 -o ".to_owned()
                + out.to_str().unwrap()
                + " -os latest download"
        );
    }

    #[cfg(unix)]
    #[test]
    fn run_surfaces_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("macrecovery.py");
        std::fs::write(&script, "exit 3\n").unwrap();

        let plan = DownloadPlan::from_selection(&selection(), &script, dir.path()).unwrap();
        let err = plan.run(OsStr::new("sh")).unwrap_err();
        assert!(matches!(err, CoreError::DownloaderFailed { code: Some(3) }));
    }
}
