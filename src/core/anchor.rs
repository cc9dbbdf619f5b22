use crate::error::PatchError;
use regex::Regex;
use std::sync::OnceLock;

/// Field names of the LSP helper's return object, in declaration order.
///
/// The field names and their order survive minification; only the bound
/// identifiers change between builds. Eleven ordered fields are a long
/// enough fingerprint to mark the function uniquely in practice.
const RETURN_FIELDS: [&str; 11] = [
    "initialize",
    "shutdown",
    "getServerForFile",
    "ensureServerStarted",
    "sendRequest",
    "getAllServers",
    "openFile",
    "changeFile",
    "saveFile",
    "closeFile",
    "isFileOpen",
];

/// One located signature occurrence, addressed by byte offsets into the
/// scanned buffer (`end` exclusive).
#[derive(Debug, Clone)]
pub struct AnchorMatch {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Lazily-compiled signature regex. Assembly and compilation happen only
/// once per process, regardless of how many buffers are scanned.
static SIGNATURE: OnceLock<Regex> = OnceLock::new();

/// The full return-statement signature:
/// `return{initialize:IDENT,shutdown:IDENT,...,isFileOpen:IDENT}` with
/// arbitrary space runs between tokens. Every identifier is matched by the
/// generic class `[$\w]+` (minifiers emit names like `G`, `$52`, `_bar`).
fn signature() -> &'static Regex {
    SIGNATURE.get_or_init(|| {
        let fields = RETURN_FIELDS
            .iter()
            .map(|field| format!(r"{}: *[$\w]+", field))
            .collect::<Vec<_>>()
            .join(r" *, *");
        let pattern = format!(r"return *\{{ *{} *\}}", fields);
        Regex::new(&pattern).expect("signature regex should compile")
    })
}

/// Locate the LSP helper's return-statement anchor.
///
/// First match wins; the scan does not look for further occurrences.
pub fn find_anchor(content: &str) -> Result<AnchorMatch, PatchError> {
    let found = signature().find(content).ok_or(PatchError::AnchorNotFound)?;
    Ok(AnchorMatch {
        start: found.start(),
        end: found.end(),
        text: found.as_str().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPACT: &str = "return{initialize:a,shutdown:b,getServerForFile:c,\
                           ensureServerStarted:d,sendRequest:e,getAllServers:f,\
                           openFile:g,changeFile:h,saveFile:i,closeFile:j,isFileOpen:k}";

    #[test]
    fn finds_compact_signature() {
        let content = format!("var x=1;function Z9(){{{}}}", COMPACT);
        let anchor = find_anchor(&content).expect("anchor should be found");
        assert_eq!(anchor.start, content.find("return").unwrap());
        assert_eq!(anchor.text, COMPACT);
    }

    #[test]
    fn tolerates_spaces_between_tokens() {
        let content = "return { initialize: W1 , shutdown: W2 , getServerForFile: W3 , \
                       ensureServerStarted: W4 , sendRequest: W5 , getAllServers: W6 , \
                       openFile: W7 , changeFile: W8 , saveFile: W9 , closeFile: Wa , \
                       isFileOpen: Wb }";
        let anchor = find_anchor(content).expect("anchor should be found");
        assert_eq!(anchor.start, 0);
        assert_eq!(anchor.end, content.len());
    }

    #[test]
    fn accepts_dollar_and_underscore_identifiers() {
        let content = COMPACT
            .replace(":a,", ":$52,")
            .replace(":b,", ":_f0,");
        assert!(find_anchor(&content).is_ok());
    }

    #[test]
    fn fails_without_signature() {
        let err = find_anchor("function Z9(){return{initialize:a}}").unwrap_err();
        assert!(matches!(err, PatchError::AnchorNotFound));
    }

    #[test]
    fn fails_when_field_order_differs() {
        // Same fields, shutdown and initialize swapped.
        let content = COMPACT.replacen("initialize:a,shutdown:b", "shutdown:b,initialize:a", 1);
        assert!(find_anchor(&content).is_err());
    }

    #[test]
    fn first_match_wins() {
        let content = format!("function A(){{{}}}function B(){{{}}}", COMPACT, COMPACT);
        let anchor = find_anchor(&content).expect("anchor should be found");
        assert_eq!(anchor.start, content.find("return").unwrap());
        assert!(anchor.start < content.len() / 2);
    }
}
