use crate::core::boundary::FunctionRecord;
use regex::Regex;
use std::sync::OnceLock;

/// Which URI construction the target function currently exhibits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriShape {
    /// `` `file://${path.resolve(f)}` `` interpolation. Needs patching.
    Legacy,
    /// `pathToFileURL(path.resolve(f)).href`. Already the target shape.
    Patched,
    /// Neither template matched. No patch is planned.
    Unknown,
}

/// Identifiers currently bound to the capabilities the patch needs, plus
/// the function's URI-construction classification.
///
/// Built once per run and read-only afterward. Replacement text is always
/// assembled from these discovered names, never from hardcoded ones.
#[derive(Debug, Clone)]
pub struct AliasMap {
    /// Local alias of `pathToFileURL`, from the whole-file import rebinding
    /// `import{pathToFileURL as X}from"url"`.
    pub url_converter: Option<String>,
    /// Local alias of the `path` module, from `X.resolve(` usage inside
    /// the function body.
    pub path_module: Option<String>,
    pub uri_shape: UriShape,
}

static IMPORT_REBINDING: OnceLock<Regex> = OnceLock::new();
static RESOLVE_CALL: OnceLock<Regex> = OnceLock::new();
static LEGACY_URI: OnceLock<Regex> = OnceLock::new();
static PATCHED_URI: OnceLock<Regex> = OnceLock::new();

fn import_rebinding() -> &'static Regex {
    IMPORT_REBINDING.get_or_init(|| {
        Regex::new(r#"import\{pathToFileURL as ([$\w]+)\}from["']url["']"#)
            .expect("import rebinding regex should compile")
    })
}

fn resolve_call() -> &'static Regex {
    RESOLVE_CALL
        .get_or_init(|| Regex::new(r"([$\w]+)\.resolve\(").expect("resolve regex should compile"))
}

/// Template-literal interpolation: `` `file://${IDENT.resolve(...)}` ``
fn legacy_uri() -> &'static Regex {
    LEGACY_URI.get_or_init(|| {
        Regex::new(r"`file://\$\{[$\w]+\.resolve\([^)]+\)\}`")
            .expect("legacy URI regex should compile")
    })
}

/// Conversion call with trailing property access:
/// `IDENT(IDENT.resolve(...)).href`
fn patched_uri() -> &'static Regex {
    PATCHED_URI.get_or_init(|| {
        Regex::new(r"[$\w]+\([$\w]+\.resolve\([^)]+\)\)\.href")
            .expect("patched URI regex should compile")
    })
}

/// Recover the current aliases and classify the URI construction.
///
/// Never fails: an absent alias is recorded as `None`, an unmatched shape
/// as `UriShape::Unknown`. Acting on partial information is the planner's
/// decision, not the extractor's.
pub fn extract_aliases(content: &str, function: &FunctionRecord) -> AliasMap {
    let url_converter = import_rebinding()
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|alias| alias.as_str().to_string());

    let path_module = resolve_call()
        .captures(&function.source)
        .and_then(|caps| caps.get(1))
        .map(|alias| alias.as_str().to_string());

    let uri_shape = if legacy_uri().is_match(&function.source) {
        UriShape::Legacy
    } else if patched_uri().is_match(&function.source) {
        UriShape::Patched
    } else {
        UriShape::Unknown
    };

    AliasMap {
        url_converter,
        path_module,
        uri_shape,
    }
}
