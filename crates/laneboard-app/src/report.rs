//! Plain-text board summary.

use laneboard_core::{Board, FilterContext, SavedView, WipStatus, filter_board};
use std::fmt::Write;

fn wip_marker(status: WipStatus) -> &'static str {
    match status {
        WipStatus::Over => " (over WIP limit)",
        WipStatus::Critical => " (critical: over twice the WIP limit)",
        WipStatus::Unlimited | WipStatus::Within => "",
    }
}

/// Render the board, one column per block.
pub fn render(board: &Board, query: &str, view: Option<&SavedView>, ctx: &FilterContext) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({} cards)", board.project, board.card_size);
    if let Some(view) = view {
        let _ = writeln!(out, "View: {}", view.name);
    }

    for filtered in filter_board(board, query, view, ctx) {
        let column = filtered.column;
        let count = match column.wip_limit {
            Some(limit) => format!("{}/{}", column.len(), limit),
            None => column.len().to_string(),
        };
        let _ = writeln!(
            out,
            "\n{} {} [{}]{}",
            column.color,
            column.name,
            count,
            wip_marker(column.wip_status())
        );
        for task in filtered.tasks {
            let _ = write!(out, "  - {}", task.title);
            if let Some(activity) = &task.activity {
                let _ = write!(out, "  ({})", activity);
            }
            if let Some(reason) = &task.blocked_reason {
                let _ = write!(out, "  BLOCKED: {}", reason);
            }
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use laneboard_core::SeedConfig;

    #[test]
    fn test_render_lists_columns_and_tasks() {
        let board = Board::seeded("DEMO", &SeedConfig { tasks_per_column: 1 });
        let text = render(&board, "", None, &FilterContext::default());

        assert!(text.starts_with("DEMO (medium cards)\n"));
        assert!(text.contains("#60A5FA Open [1]"));
        assert!(text.contains("In Progress [1/15]"));
        assert_eq!(text.matches("  - ").count(), board.task_count());
    }

    #[test]
    fn test_render_applies_search() {
        let board = Board::seeded("DEMO", &SeedConfig { tasks_per_column: 3 });
        let text = render(&board, "database", None, &FilterContext::default());

        assert!(text.contains("Database schema optimization"));
        assert!(!text.contains("User authentication flow design"));
    }
}
