pub mod alias;
pub mod anchor;
pub mod boundary;
pub mod patch;
pub mod patcher;

pub use alias::{extract_aliases, AliasMap, UriShape};
pub use anchor::{find_anchor, AnchorMatch};
pub use boundary::{resolve_function, BraceScanner, DelimiterScanner, FunctionRecord};
pub use patch::{PatchOperation, PatchOutcome, PatchPlan};
pub use patcher::LspPatcher;
