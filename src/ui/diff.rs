use crate::core::patch::PatchOperation;
use crate::utils::text::{ceil_char_boundary, floor_char_boundary};
use ansi_term::Colour::{Green, Red};
use ansi_term::Style;

/// Renders before/after previews for planned replacements.
///
/// Presentation only: the reporter makes no decisions and the output is
/// not a machine contract.
#[derive(Debug)]
pub struct DiffReporter {
    /// Bytes of context shown on each side of the changed range.
    context: usize,
    color: bool,
}

impl DiffReporter {
    pub fn new(context: usize, color: bool) -> Self {
        Self { context, color }
    }

    /// Show one replacement with surrounding context, positioned by the
    /// original buffer's absolute offsets.
    pub fn preview(&self, title: &str, content: &str, op: &PatchOperation) {
        let context_start = floor_char_boundary(content, op.start.saturating_sub(self.context));
        let context_end = ceil_char_boundary(content, op.end.saturating_add(self.context));

        let before = &content[context_start..op.start];
        let old = &content[op.start..op.end];
        let after = &content[op.end..context_end];

        let rule = "━".repeat(78);
        println!("\n{}", self.dim(&format!("━━━ {} ━━━", title)));
        println!(
            "{} {}{}{}",
            self.painted("[-] OLD:", Red),
            before,
            self.painted(old, Red),
            after
        );
        println!(
            "{} {}{}{}",
            self.painted("[+] NEW:", Green),
            before,
            self.painted(&op.new_text, Green),
            after
        );
        println!("{}\n", self.dim(&rule));
    }

    fn painted(&self, text: &str, colour: ansi_term::Colour) -> String {
        if self.color {
            colour.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            Style::new().dimmed().paint(text).to_string()
        } else {
            text.to_string()
        }
    }
}
