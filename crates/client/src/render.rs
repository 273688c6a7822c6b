//! Plain-text rendering of a [`CombatView`].

use combat_core::system::{CombatView, CombatantView};
use combat_core::{CombatantId, CombatSystemState};

/// Renders one frame. Lines are separated by `\n` with no trailing newline.
pub fn render(view: &CombatView) -> String {
    let mut lines = vec![format!("== Round {} [{}] ==", view.round, view.state)];

    lines.push("Party:".to_owned());
    lines.extend(
        view.players
            .iter()
            .map(|member| combatant_line(member, view, view.current_player == Some(member.id))),
    );
    lines.push("Enemies:".to_owned());
    lines.extend(
        view.enemies
            .iter()
            .map(|enemy| combatant_line(enemy, view, false)),
    );

    if let Some(text) = &view.text {
        lines.push(String::new());
        lines.push(text.clone());
    }

    if let Some(menu) = &view.menu {
        let choices: Vec<String> = menu
            .choices
            .iter()
            .enumerate()
            .map(|(i, choice)| {
                if i == menu.selected {
                    format!("[{}]", choice.label())
                } else {
                    format!(" {} ", choice.label())
                }
            })
            .collect();
        lines.push(choices.join(" "));
    }

    if view.state == CombatSystemState::SelectTechnique {
        for technique in &view.techniques {
            let cursor = if technique.selected { '>' } else { ' ' };
            let note = if technique.affordable { "" } else { "  (not enough RP)" };
            lines.push(format!("  {cursor} {}{note}", technique.label));
        }
    }

    if let Some(meter) = &view.meter {
        lines.push(format!(
            "Power {}/{}  {}  x{:.2}",
            meter.stage + 1,
            meter.stages,
            meter.render(),
            meter.modifier
        ));
    }

    if let Some(outcome) = view.outcome {
        lines.push(format!("Outcome: {outcome}"));
    }

    lines.join("\n")
}

fn combatant_line(combatant: &CombatantView, view: &CombatView, acting: bool) -> String {
    let marker = marker(combatant.id, view, acting);
    let status = if combatant.alive { "" } else { "  (down)" };
    format!(
        "  {marker} {:<10} HP {:>7}  RP {:>7}{status}",
        combatant.name,
        combatant.health.to_string(),
        combatant.resource.to_string()
    )
}

fn marker(id: CombatantId, view: &CombatView, acting: bool) -> char {
    if view.target == Some(id) {
        '*'
    } else if view.cue == Some(id) {
        '!'
    } else if acting {
        '>'
    } else {
        ' '
    }
}
