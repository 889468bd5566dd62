use ludo::{
    board_layout, piece_label, CellKind, PlayerId, Snapshot, TurnPhase, CELL_SIZE, GRID_CELLS,
};
use ludo_match::MatchResult;
use ratatui::{prelude::*, widgets::*};

/// Terminal columns per board cell.
pub const CELL_WIDTH: u16 = 2;

pub const BOARD_WIDGET_WIDTH: u16 = GRID_CELLS as u16 * CELL_WIDTH + 2;
pub const BOARD_WIDGET_HEIGHT: u16 = GRID_CELLS as u16 + 2;

pub fn player_color(player: PlayerId) -> Color {
    match player.index() {
        0 => Color::Red,
        1 => Color::Green,
        2 => Color::Yellow,
        _ => Color::Blue,
    }
}

fn cell_style(kind: CellKind) -> (&'static str, Style) {
    match kind {
        CellKind::Blank => ("  ", Style::new()),
        CellKind::Yard(player) => ("  ", Style::new().bg(player_color(player))),
        CellKind::Track => ("··", Style::new().fg(Color::DarkGray)),
        CellKind::Safe => ("✶ ", Style::new().fg(Color::White)),
        CellKind::HomeStretch(player) => ("░░", Style::new().fg(player_color(player))),
        CellKind::Centre => ("▓▓", Style::new().fg(Color::Gray)),
    }
}

/// The board with all pieces, inside a rounded border.
pub struct BoardWidget<'a> {
    pub snapshot: &'a Snapshot,
}

impl Widget for BoardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::new()
            .border_type(BorderType::Rounded)
            .borders(Borders::all())
            .title(" Board ");
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width < GRID_CELLS as u16 * CELL_WIDTH || inner.height < GRID_CELLS as u16 {
            buf.set_string(inner.x, inner.y, "Terminal too small", Style::new());
            return;
        }

        for (row, kinds) in board_layout().iter().enumerate() {
            for (col, &kind) in kinds.iter().enumerate() {
                let (symbol, style) = cell_style(kind);
                let x = inner.x + col as u16 * CELL_WIDTH;
                buf.set_string(x, inner.y + row as u16, symbol, style);
            }
        }

        let mut stacked = [[0u8; GRID_CELLS]; GRID_CELLS];
        for piece in &self.snapshot.pieces {
            let col = (piece.pixel.x / CELL_SIZE) as usize;
            let row = (piece.pixel.y / CELL_SIZE) as usize;
            if col >= GRID_CELLS || row >= GRID_CELLS {
                continue;
            }
            stacked[row][col] += 1;
            let label = piece_label(piece.player, piece.slot, stacked[row][col] > 1);
            let mut style = Style::new()
                .fg(Color::Black)
                .bg(player_color(piece.player))
                .add_modifier(Modifier::BOLD);
            if piece.finished {
                style = style.add_modifier(Modifier::DIM);
            }
            buf.set_string(
                inner.x + col as u16 * CELL_WIDTH,
                inner.y + row as u16,
                label,
                style,
            );
        }
    }
}

/// The button that rolls the dice when clicked.
pub struct DiceWidget<'a> {
    pub snapshot: &'a Snapshot,
}

impl Widget for DiceWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rolling = self.snapshot.turn.phase == TurnPhase::AwaitingRoll;
        let border_style = if rolling {
            Style::new().fg(player_color(self.snapshot.turn.turn))
        } else {
            Style::new().fg(Color::DarkGray)
        };
        let text = match (self.snapshot.dice.as_slice(), self.snapshot.last_roll) {
            ([], Some(value)) => format!("last: {}", value),
            ([], None) => String::from("-"),
            (values, _) => values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" "),
        };
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(
                Block::new()
                    .border_type(BorderType::Rounded)
                    .borders(Borders::all())
                    .border_style(border_style)
                    .title(" Dice (space) "),
            )
            .render(area, buf);
    }
}

/// Turn, scores and finishing order.
pub struct StatusWidget<'a> {
    pub snapshot: &'a Snapshot,
}

impl Widget for StatusWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snapshot = self.snapshot;
        let state = snapshot.turn;
        let turn_line = match state.phase {
            TurnPhase::AwaitingRoll => Line::from(vec![
                Span::styled(state.turn.to_string(), Style::new().fg(player_color(state.turn))),
                Span::raw(" to roll"),
            ]),
            TurnPhase::AwaitingMove => Line::from(vec![
                Span::styled(
                    state.last_turn.to_string(),
                    Style::new().fg(player_color(state.last_turn)),
                ),
                Span::raw(" to move a piece"),
            ]),
            TurnPhase::Halted => Line::raw("Match over"),
        };

        let mut lines = vec![turn_line, Line::raw("")];
        for player in PlayerId::ALL {
            let place = snapshot
                .winners
                .iter()
                .position(|&w| w == player)
                .map(|idx| format!(" #{}", idx + 1))
                .unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<7}", player.to_string()),
                    Style::new().fg(player_color(player)),
                ),
                Span::raw(format!("{:>3}{}", snapshot.scores[player.index()], place)),
            ]));
        }
        lines.push(Line::raw(""));
        lines.push(Line::raw("Click the dice, then a piece."));
        lines.push(Line::raw("q: quit"));

        Paragraph::new(lines)
            .block(
                Block::new()
                    .border_type(BorderType::Rounded)
                    .borders(Borders::all())
                    .title(" Match "),
            )
            .render(area, buf);
    }
}

/// Final standings, shown once the match is decided.
pub struct ResultWidget<'a> {
    pub result: &'a MatchResult,
}

impl Widget for ResultWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.result.aborted {
            " Match aborted "
        } else {
            " Match over "
        };
        let mut lines = Vec::new();
        for (place, &player) in self.result.winners.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::raw(format!("{}. ", place + 1)),
                Span::styled(
                    format!("{:<7}", player.to_string()),
                    Style::new().fg(player_color(player)),
                ),
                Span::raw(format!("{:>3} points", self.result.scores[player.index()])),
            ]));
        }
        lines.push(Line::raw(""));
        lines.push(Line::raw("Press any key to exit."));

        Paragraph::new(lines)
            .block(
                Block::new()
                    .border_type(BorderType::Rounded)
                    .borders(Borders::all())
                    .title(title),
            )
            .render(area, buf);
    }
}
