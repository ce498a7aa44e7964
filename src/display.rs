//! Text rendering of the terminal view for the command line.

use owo_colors::OwoColorize;

use crate::presentation::{CabinetView, Notice, NoticeLevel, TerminalViewModel};
use crate::types::CabinetStatus;

fn paint(text: &str, colored: bool, f: impl Fn(&str) -> String) -> String {
    if colored { f(text) } else { text.to_string() }
}

pub fn format_status(status: &CabinetStatus, colored: bool) -> String {
    let label = status.as_str();
    match status {
        CabinetStatus::Available => paint(label, colored, |s| s.green().to_string()),
        CabinetStatus::Occupied => paint(label, colored, |s| s.yellow().to_string()),
        CabinetStatus::Unknown(_) => paint(label, colored, |s| s.dimmed().to_string()),
    }
}

pub fn format_notice(notice: &Notice, colored: bool) -> String {
    let message = notice.message.as_str();
    match notice.level {
        NoticeLevel::Warning => paint(message, colored, |s| s.yellow().to_string()),
        NoticeLevel::Error => paint(message, colored, |s| s.red().to_string()),
        NoticeLevel::Success => paint(message, colored, |s| s.green().bold().to_string()),
    }
}

fn format_cabinet(cabinet: &CabinetView, colored: bool) -> String {
    let marker = if cabinet.is_highlighted {
        paint(">", colored, |s| s.green().bold().to_string())
    } else {
        " ".to_string()
    };
    let number = format!("#{:<4}", cabinet.number);
    let number = if cabinet.is_highlighted {
        paint(&number, colored, |s| s.bold().to_string())
    } else {
        number
    };

    if cabinet.has_transaction {
        // Pad the plain label so the parcel column lines up.
        let pad = " ".repeat(10usize.saturating_sub(cabinet.status.as_str().len()));
        format!(
            "{marker} {number}{}{pad}{}",
            format_status(&cabinet.status, colored),
            paint("parcel", colored, |s| s.dimmed().to_string())
        )
    } else {
        format!("{marker} {number}{}", format_status(&cabinet.status, colored))
    }
}

/// Render the cabinet grid and the current notice.
pub fn render_grid(view: &TerminalViewModel, colored: bool) -> String {
    let mut lines = Vec::new();

    match &view.location {
        None => lines.push(paint("No location selected.", colored, |s| {
            s.dimmed().to_string()
        })),
        Some(location) => {
            lines.push(paint(location, colored, |s| s.cyan().bold().to_string()));
            if view.is_loading {
                lines.push("Loading lockers...".to_string());
            } else if view.cabinets.is_empty() {
                lines.push(paint("No cabinets at this location.", colored, |s| {
                    s.dimmed().to_string()
                }));
            } else {
                lines.extend(view.cabinets.iter().map(|c| format_cabinet(c, colored)));
            }
        }
    }

    if let Some(notice) = &view.notice {
        lines.push(String::new());
        lines.push(format_notice(notice, colored));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::RecordId;

    fn view(cabinets: Vec<CabinetView>, notice: Option<Notice>) -> TerminalViewModel {
        TerminalViewModel {
            location: Some("Espoo".to_string()),
            input_code: String::new(),
            cabinets,
            notice,
            is_loading: false,
            can_unlock: false,
        }
    }

    fn tile(number: u32, status: CabinetStatus, parcel: bool, lit: bool) -> CabinetView {
        CabinetView {
            locker_id: RecordId::new("L1"),
            cabinet_id: RecordId::new(format!("c{number}")),
            number,
            status,
            has_transaction: parcel,
            is_highlighted: lit,
        }
    }

    #[test]
    fn test_render_grid_plain() {
        let output = render_grid(
            &view(
                vec![
                    tile(1, CabinetStatus::Available, false, false),
                    tile(3, CabinetStatus::Occupied, true, true),
                    tile(12, CabinetStatus::Unknown("broken".to_string()), false, false),
                ],
                Some(Notice::success("Cabinet 3 is now occupied")),
            ),
            false,
        );

        insta::assert_snapshot!(output, @r"
Espoo
  #1   available
> #3   occupied  parcel
  #12  broken

Cabinet 3 is now occupied
");
    }

    #[test]
    fn test_render_grid_without_location() {
        let mut vm = view(vec![], None);
        vm.location = None;
        assert_eq!(render_grid(&vm, false), "No location selected.");
    }

    #[test]
    fn test_render_grid_empty_location() {
        let output = render_grid(&view(vec![], None), false);
        assert_eq!(output, "Espoo\nNo cabinets at this location.");
    }

    #[test]
    fn test_colored_output_contains_ansi() {
        let output = render_grid(
            &view(vec![tile(1, CabinetStatus::Available, false, true)], None),
            true,
        );
        assert!(output.contains("\u{1b}["));
        assert!(output.contains("available"));
    }
}
