use crate::core::anchor::AnchorMatch;
use crate::error::PatchError;
use crate::utils::text::floor_char_boundary;
use regex::Regex;
use std::sync::OnceLock;

/// How far before the function's open brace the declaration template is
/// searched for. Minified declarations are short; the window only needs to
/// cover `function LONG_NAME()`.
const DECLARATION_WINDOW: usize = 100;

/// The resolved target function. `start` points at the `function` keyword,
/// `end` is exclusive and includes the closing brace, so
/// `start < anchor.start < anchor.end <= end` and the slice is
/// brace-balanced.
#[derive(Debug, Clone)]
pub struct FunctionRecord {
    pub name: String,
    pub start: usize,
    pub end: usize,
    /// Immutable reference copy of `content[start..end]`; patch planning
    /// resolves offsets against this slice, never against a moving buffer.
    pub source: String,
}

/// Delimiter-level scanning over raw source text.
///
/// The shipped implementation counts raw bytes and assumes the scanned
/// region carries no unbalanced braces inside string or regex literals —
/// which holds for the observed minified target, where template literals
/// contribute only balanced `${...}` pairs. A lexer-backed implementation
/// can replace it without touching the resolver.
pub trait DelimiterScanner {
    /// Offset of the first closing delimiter at or after `from`.
    fn next_close(&self, content: &str, from: usize) -> Option<usize>;

    /// Offset of the opening delimiter matching the closer at `close`,
    /// found by scanning backward with a signed depth counter.
    fn matching_open(&self, content: &str, close: usize) -> Result<usize, PatchError>;
}

/// Byte-wise `{` / `}` scanner.
pub struct BraceScanner;

impl DelimiterScanner for BraceScanner {
    fn next_close(&self, content: &str, from: usize) -> Option<usize> {
        content.as_bytes()[from..]
            .iter()
            .position(|&byte| byte == b'}')
            .map(|offset| from + offset)
    }

    fn matching_open(&self, content: &str, close: usize) -> Result<usize, PatchError> {
        let bytes = content.as_bytes();
        let mut depth = 1u32;
        let mut pos = close;

        while pos > 0 {
            pos -= 1;
            match bytes[pos] {
                b'}' => depth += 1,
                b'{' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(pos);
                    }
                }
                _ => {}
            }
        }

        Err(PatchError::BracketMismatch)
    }
}

static DECLARATION: OnceLock<Regex> = OnceLock::new();

/// `function IDENT()` ending exactly at the function body's open brace.
fn declaration() -> &'static Regex {
    DECLARATION.get_or_init(|| {
        Regex::new(r"function ([$\w]+)\(\)$").expect("declaration regex should compile")
    })
}

/// Resolve the boundaries of the function enclosing `anchor` using the
/// default brace scanner.
pub fn resolve_function(content: &str, anchor: &AnchorMatch) -> Result<FunctionRecord, PatchError> {
    resolve_function_with(content, anchor, &BraceScanner)
}

/// Resolve the boundaries of the function enclosing `anchor`.
///
/// The anchor is the tail expression of the function, so the first closing
/// brace after it is the function body's closing brace. Walking backward
/// from there with a depth counter finds the body's open brace, and the
/// declaration template must end exactly at that brace.
pub fn resolve_function_with<S: DelimiterScanner>(
    content: &str,
    anchor: &AnchorMatch,
    scanner: &S,
) -> Result<FunctionRecord, PatchError> {
    let close = scanner
        .next_close(content, anchor.end)
        .ok_or(PatchError::BoundaryNotFound(
            "no closing brace after the anchor",
        ))?;

    let open = scanner.matching_open(content, close)?;

    let window_start = floor_char_boundary(content, open.saturating_sub(DECLARATION_WINDOW));
    let window = &content[window_start..open];
    let caps = declaration()
        .captures(window)
        .ok_or(PatchError::BoundaryNotFound(
            "no function declaration before the open brace",
        ))?;

    let declaration_len = caps
        .get(0)
        .map(|matched| matched.as_str().len())
        .unwrap_or(0);
    let name = caps
        .get(1)
        .map(|ident| ident.as_str().to_string())
        .unwrap_or_default();

    let start = open - declaration_len;
    let end = close + 1;

    Ok(FunctionRecord {
        name,
        start,
        end,
        source: content[start..end].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::anchor::find_anchor;

    const RETURN: &str = "return{initialize:a,shutdown:b,getServerForFile:c,\
                          ensureServerStarted:d,sendRequest:e,getAllServers:f,\
                          openFile:g,changeFile:h,saveFile:i,closeFile:j,isFileOpen:k}";

    fn balance(slice: &str) -> i64 {
        slice.bytes().fold(0i64, |acc, b| match b {
            b'{' => acc + 1,
            b'}' => acc - 1,
            _ => acc,
        })
    }

    #[test]
    fn resolves_simple_function() {
        let content = format!("var w=1;function Z9(){{let a=w;{}}}var t=2;", RETURN);
        let anchor = find_anchor(&content).unwrap();
        let record = resolve_function(&content, &anchor).unwrap();

        assert_eq!(record.name, "Z9");
        assert!(record.source.starts_with("function Z9()"));
        assert!(record.source.ends_with('}'));
        assert_eq!(balance(&record.source), 0);
        assert!(record.start < anchor.start);
        assert!(anchor.end <= record.end);
        assert_eq!(&content[record.start..record.end], record.source);
    }

    #[test]
    fn resolves_through_nested_braces() {
        let content = format!(
            "function Y8(){{return 0}}function $z(){{function o(F){{if(F){{return F}}return null}}{}}}",
            RETURN
        );
        let anchor = find_anchor(&content).unwrap();
        let record = resolve_function(&content, &anchor).unwrap();

        assert_eq!(record.name, "$z");
        assert_eq!(balance(&record.source), 0);
        assert!(record.source.contains("function o(F)"));
        // The preceding function must not be swallowed.
        assert!(!record.source.contains("Y8"));
    }

    #[test]
    fn balanced_template_braces_do_not_break_the_scan() {
        let content = format!(
            "function Z9(){{let u=`file://${{p.resolve(F)}}`;{}}}",
            RETURN
        );
        let anchor = find_anchor(&content).unwrap();
        let record = resolve_function(&content, &anchor).unwrap();
        assert_eq!(record.name, "Z9");
        assert_eq!(balance(&record.source), 0);
    }

    #[test]
    fn missing_close_is_boundary_not_found() {
        // Buffer ends right after the anchor; the function's own closing
        // brace is missing.
        let content = format!("function Z9(){{{}", RETURN);
        let anchor = find_anchor(&content).unwrap();
        let err = resolve_function(&content, &anchor).unwrap_err();
        assert!(matches!(err, PatchError::BoundaryNotFound(_)));
    }

    #[test]
    fn unbalanced_buffer_is_bracket_mismatch() {
        // No opening brace anywhere before the anchor.
        let content = format!("{}}}", RETURN);
        let anchor = find_anchor(&content).unwrap();
        let err = resolve_function(&content, &anchor).unwrap_err();
        assert!(matches!(err, PatchError::BracketMismatch));
    }

    #[test]
    fn anonymous_function_is_boundary_not_found() {
        let content = format!("var Z9=function(){{{}}};", RETURN);
        let anchor = find_anchor(&content).unwrap();
        let err = resolve_function(&content, &anchor).unwrap_err();
        assert!(matches!(err, PatchError::BoundaryNotFound(_)));
    }
}
