use std::fs;
use std::path::Path;

use serde_json::json;

pub fn run(name: &str) -> Result<(), String> {
    let dir = Path::new(name);

    if dir.exists() {
        return Err(format!("directory '{name}' already exists"));
    }

    fs::create_dir_all(dir.join("prompts")).map_err(|e| format!("cannot create directory: {e}"))?;

    let rules = json!({
        "START": {
            "location": "village_square",
            "inventory": [],
            "flags": {},
            "hp": 10,
            "turns": 0
        },
        "END_CONDITIONS": {
            "WIN_ALL_FLAGS": ["amulet_recovered"],
            "LOSE_ANY_FLAGS": ["hp_zero"],
            "MAX_TURNS": 40
        },
        "COMMANDS": ["look", "go <place>", "take <item>", "use <item>", "talk <someone>"],
        "QUEST": {
            "intro": format!("Welcome to {name}! The village amulet has been stolen. Recover it.")
        }
    });
    let rules = serde_json::to_string_pretty(&rules).map_err(|e| e.to_string())?;
    fs::write(dir.join("rules.json"), rules + "\n")
        .map_err(|e| format!("cannot write rules.json: {e}"))?;

    fs::write(dir.join("prompts/gm.txt"), preamble(name))
        .map_err(|e| format!("cannot write prompts/gm.txt: {e}"))?;

    println!("Created game '{name}' in {name}/");
    println!("  rules.json      — start state, end conditions, commands");
    println!("  prompts/gm.txt  — instructions sent to the game master");
    println!();
    println!("Get started:");
    println!("  cd {name}");
    println!("  gm check       # Validate the rules");
    println!("  gm play        # Start playing (needs `ollama run llama3.1:8b`)");

    Ok(())
}

fn preamble(name: &str) -> String {
    format!(
        r#"You are the game master of a text adventure called "{name}".
Narrate in the second person, in two to four vivid sentences.
Respect the rules and the current state you are given. Never invent new rules.

Express every change to the game state with these atoms:
  move_to:<location>
  add_item:<item>
  remove_item:<item>
  set_flag:<flag>
  hp_delta:<signed integer>

Only raise flags named in the rules when the player has truly earned them.
Reply with a single JSON object and nothing else, for example:
{{"narration": "You step into the cave.", "state_change": ["move_to:cave"]}}
"#
    )
}
