use crate::core::alias::{extract_aliases, AliasMap};
use crate::core::anchor::find_anchor;
use crate::core::boundary::{resolve_function, FunctionRecord};
use crate::core::patch::{apply, plan, PatchOutcome, PatchPlan};
use crate::error::PatchError;
use crate::ui::DiffReporter;
use std::fs;
use std::path::{Path, PathBuf};

/// Drives one patch run over a single target file.
///
/// The buffer is read fully into memory, analyzed and rewritten there, and
/// written back exactly once by `save`. The file on disk is never touched
/// between `new` and `save`.
#[derive(Debug)]
pub struct LspPatcher {
    path: PathBuf,
    content: String,
}

impl LspPatcher {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, PatchError> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path).map_err(|source| PatchError::io(&path, source))?;
        Ok(Self { path, content })
    }

    /// Current buffer content (rewritten once `patch` has applied
    /// operations).
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Find the anchor and resolve the enclosing function's boundaries.
    pub fn locate(&self) -> Result<FunctionRecord, PatchError> {
        let anchor = find_anchor(&self.content)?;
        resolve_function(&self.content, &anchor)
    }

    /// Recover the aliases the function currently uses.
    pub fn aliases(&self, function: &FunctionRecord) -> AliasMap {
        extract_aliases(&self.content, function)
    }

    /// Plan and apply the rewrite. Diff previews are rendered against the
    /// original buffer before the content is swapped.
    pub fn patch(
        &mut self,
        function: &FunctionRecord,
        aliases: &AliasMap,
        reporter: &DiffReporter,
    ) -> PatchOutcome {
        match plan(function, aliases) {
            PatchPlan::Skip(outcome) => outcome,
            PatchPlan::Apply(operations) => {
                for (index, op) in operations.iter().enumerate() {
                    let title = format!("URI construction {}/{}", index + 1, operations.len());
                    reporter.preview(&title, &self.content, op);
                }
                let count = operations.len();
                self.content = apply(&self.content, function, &operations);
                PatchOutcome::Applied { count }
            }
        }
    }

    /// Locate, extract, and patch in one step.
    pub fn run(&mut self, reporter: &DiffReporter) -> Result<PatchOutcome, PatchError> {
        let function = self.locate()?;
        let aliases = self.aliases(&function);
        Ok(self.patch(&function, &aliases, reporter))
    }

    /// Single terminal write of the fully-computed content.
    pub fn save(&self) -> Result<(), PatchError> {
        fs::write(&self.path, &self.content).map_err(|source| PatchError::io(&self.path, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const RETURN: &str = "return{initialize:a,shutdown:b,getServerForFile:c,\
                          ensureServerStarted:d,sendRequest:e,getAllServers:f,\
                          openFile:g,changeFile:h,saveFile:i,closeFile:j,isFileOpen:k}";

    fn legacy_bundle() -> String {
        format!(
            "import{{pathToFileURL as q}}from\"url\";\
             function Z9(){{let u=`file://${{p.resolve(file)}}`;{}}}",
            RETURN
        )
    }

    fn quiet_reporter() -> DiffReporter {
        DiffReporter::new(40, false)
    }

    #[test]
    fn patches_and_saves_in_place() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let target = dir.path().join("cli.js");
        fs::write(&target, legacy_bundle()).unwrap();

        let mut patcher = LspPatcher::new(&target).unwrap();
        let outcome = patcher.run(&quiet_reporter()).unwrap();
        assert_eq!(outcome, PatchOutcome::Applied { count: 1 });
        patcher.save().unwrap();

        let written = fs::read_to_string(&target).unwrap();
        assert!(written.contains("q(p.resolve(file)).href"));
        assert_eq!(written, patcher.content());
    }

    #[test]
    fn second_run_is_a_no_op() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let target = dir.path().join("cli.js");
        fs::write(&target, legacy_bundle()).unwrap();

        let mut first = LspPatcher::new(&target).unwrap();
        first.run(&quiet_reporter()).unwrap();
        first.save().unwrap();
        let after_first = fs::read_to_string(&target).unwrap();

        let mut second = LspPatcher::new(&target).unwrap();
        let outcome = second.run(&quiet_reporter()).unwrap();
        assert_eq!(outcome, PatchOutcome::AlreadyPatched);
        second.save().unwrap();

        let after_second = fs::read_to_string(&target).unwrap();
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let err = LspPatcher::new(dir.path().join("absent.js")).unwrap_err();
        assert!(matches!(err, PatchError::Io { .. }));
    }

    #[test]
    fn anchorless_file_fails_without_touching_content() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let target = dir.path().join("cli.js");
        fs::write(&target, "var nothing=1;").unwrap();

        let mut patcher = LspPatcher::new(&target).unwrap();
        let err = patcher.run(&quiet_reporter()).unwrap_err();
        assert!(matches!(err, PatchError::AnchorNotFound));
        assert_eq!(patcher.content(), "var nothing=1;");
    }
}
