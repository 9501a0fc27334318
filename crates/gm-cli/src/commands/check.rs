use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

pub fn run(dir: &Path) -> Result<(), String> {
    let (rules, preamble) = super::load_game(dir)?;
    let start = rules.initial_state();
    let end = &rules.end_conditions;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec![
        "Start location".to_string(),
        start.location.clone().unwrap_or_else(|| "—".to_string()),
    ]);
    table.add_row(vec!["Hit points".to_string(), start.hp.to_string()]);
    table.add_row(vec!["Inventory".to_string(), start.inventory_summary()]);
    table.add_row(vec![
        "Commands".to_string(),
        format!("{} ({})", rules.commands.len(), rules.commands.join(", ")),
    ]);
    table.add_row(vec!["Win (all of)".to_string(), list_or_none(&end.win_all_flags)]);
    table.add_row(vec!["Lose (any of)".to_string(), list_or_none(&end.lose_any_flags)]);
    table.add_row(vec![
        "Turn limit".to_string(),
        end.max_turns.map_or_else(|| "none".to_string(), |n| n.to_string()),
    ]);
    table.add_row(vec![
        "Preamble".to_string(),
        format!("{} lines", preamble.lines().count()),
    ]);

    println!("{table}");
    println!();

    if end.win_all_flags.is_empty() {
        println!(
            "  {} WIN_ALL_FLAGS is empty, so the first resolved turn wins",
            "warning:".yellow().bold()
        );
    }
    if rules.commands.is_empty() {
        println!(
            "  {} COMMANDS is empty, so 'help' lists nothing",
            "warning:".yellow().bold()
        );
    }
    if preamble.trim().is_empty() {
        println!("  {} the preamble is empty", "warning:".yellow().bold());
    }

    println!("  All checks passed for '{}'.", dir.display());

    Ok(())
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
