use crate::core::alias::{AliasMap, UriShape};
use crate::core::boundary::FunctionRecord;
use regex::Regex;
use std::fmt;

/// One precisely-scoped text replacement. Offsets are byte offsets into the
/// ORIGINAL buffer; `old_text` sits verbatim at `[start, end)` there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOperation {
    pub start: usize,
    pub end: usize,
    pub old_text: String,
    pub new_text: String,
}

/// Soft result of a run. Every variant completes with exit code 0; only
/// `PatchError` conditions are fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The legacy template was rewritten `count` times.
    Applied { count: usize },
    /// The function already uses the target construction.
    AlreadyPatched,
    /// Neither the legacy nor the target template matched; left untouched.
    Unrecognized,
    /// A required alias could not be discovered; partial information is
    /// not acted upon.
    MissingAlias {
        url_converter: Option<String>,
        path_module: Option<String>,
    },
}

impl fmt::Display for PatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchOutcome::Applied { count } => {
                write!(f, "{} patch(es) applied", count)
            }
            PatchOutcome::AlreadyPatched => {
                write!(f, "already patched, nothing to do")
            }
            PatchOutcome::Unrecognized => {
                write!(f, "unrecognized URI construction, left untouched")
            }
            PatchOutcome::MissingAlias {
                url_converter,
                path_module,
            } => {
                write!(
                    f,
                    "missing aliases (pathToFileURL: {}, path: {}), left untouched",
                    url_converter.as_deref().unwrap_or("NOT FOUND"),
                    path_module.as_deref().unwrap_or("NOT FOUND"),
                )
            }
        }
    }
}

/// What the planner decided for this run.
#[derive(Debug)]
pub enum PatchPlan {
    /// Nothing to change; the buffer passes through unmodified.
    Skip(PatchOutcome),
    /// Replacements to apply, non-overlapping and ordered by position.
    Apply(Vec<PatchOperation>),
}

/// Plan every rewrite of the legacy URI template inside the function.
///
/// The legacy template is parameterized by the discovered path alias, and
/// each occurrence captures its own inner file-argument identifier, so two
/// occurrences with different file variables produce two distinct
/// operations. Offsets are resolved against the immutable function slice.
pub fn plan(function: &FunctionRecord, aliases: &AliasMap) -> PatchPlan {
    match aliases.uri_shape {
        UriShape::Patched => return PatchPlan::Skip(PatchOutcome::AlreadyPatched),
        UriShape::Unknown => return PatchPlan::Skip(PatchOutcome::Unrecognized),
        UriShape::Legacy => {}
    }

    let (Some(url_alias), Some(path_alias)) =
        (aliases.url_converter.as_deref(), aliases.path_module.as_deref())
    else {
        return PatchPlan::Skip(PatchOutcome::MissingAlias {
            url_converter: aliases.url_converter.clone(),
            path_module: aliases.path_module.clone(),
        });
    };

    let template = format!(
        r"`file://\$\{{{}\.resolve\(([$\w]+)\)\}}`",
        regex::escape(path_alias)
    );
    let legacy = Regex::new(&template).expect("parameterized legacy regex should compile");

    let mut operations = Vec::new();
    for caps in legacy.captures_iter(&function.source) {
        let (Some(whole), Some(file_var)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        operations.push(PatchOperation {
            start: function.start + whole.start(),
            end: function.start + whole.end(),
            old_text: whole.as_str().to_string(),
            new_text: format!(
                "{}({}.resolve({})).href",
                url_alias,
                path_alias,
                file_var.as_str()
            ),
        });
    }

    PatchPlan::Apply(operations)
}

/// Apply the planned operations and return the new buffer.
///
/// The rewritten function text is composed in a single pass over the
/// immutable function slice (unchanged gap, replacement, unchanged gap,
/// ...), then spliced back between the untouched prefix and suffix of the
/// original buffer. Nothing is ever re-searched on a moving buffer, so
/// earlier replacements cannot invalidate later offsets.
pub fn apply(content: &str, function: &FunctionRecord, operations: &[PatchOperation]) -> String {
    let mut rewritten = String::with_capacity(function.source.len());
    let mut cursor = 0usize;

    for op in operations {
        let rel_start = op.start - function.start;
        let rel_end = op.end - function.start;
        debug_assert_eq!(&function.source[rel_start..rel_end], op.old_text);

        rewritten.push_str(&function.source[cursor..rel_start]);
        rewritten.push_str(&op.new_text);
        cursor = rel_end;
    }
    rewritten.push_str(&function.source[cursor..]);

    let mut output = String::with_capacity(content.len() + rewritten.len());
    output.push_str(&content[..function.start]);
    output.push_str(&rewritten);
    output.push_str(&content[function.end..]);
    output
}
