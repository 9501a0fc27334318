use std::path::Path;

use gm_core::PromptBuilder;

pub fn run(dir: &Path, command: &str) -> Result<(), String> {
    let (rules, preamble) = super::load_game(dir)?;
    let state = rules.initial_state();

    let prompt = PromptBuilder::new(&preamble, &rules)
        .build(&state, &[], command.trim())
        .map_err(|e| e.to_string())?;
    println!("{prompt}");

    Ok(())
}
