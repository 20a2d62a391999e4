// ── Target selection ──
//
// Pure validators turn raw input into identifiers; a small retry driver
// re-prompts until one succeeds; the engine strings them into the menu
// flows. All terminal I/O goes through the `Prompter` trait so the flows
// run unchanged under a scripted prompter.

pub mod engine;
pub mod prompt;
pub mod validate;

pub use engine::{FlowOutcome, SelectionEngine, toggle_variant};
pub use prompt::{MenuInput, Prompted, Prompter, Screen, classify_input, prompt_until};
pub use validate::{InvalidInput, parse_board_id, parse_menu_index, parse_mlb};
