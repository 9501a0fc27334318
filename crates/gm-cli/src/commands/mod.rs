pub mod check;
pub mod init;
pub mod play;
pub mod prompt;

use std::path::Path;

use gm_core::{Rules, read_preamble};
use gm_session::SessionConfig;

/// Load the rules and preamble of the game in `dir`.
fn load_game(dir: &Path) -> Result<(Rules, String), String> {
    let config = SessionConfig::in_dir(dir);
    let rules = Rules::load(&config.rules_path).map_err(|e| e.to_string())?;
    let preamble = read_preamble(&config.preamble_path).map_err(|e| e.to_string())?;
    Ok((rules, preamble))
}
