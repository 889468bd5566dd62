use crate::{board_layout, CellKind, PlayerId, Snapshot, TurnPhase, CELL_SIZE, GRID_CELLS};

/// The two characters used for a piece, e.g. `R0` for red's first piece.
///
/// Stacked pieces are shown with a `+` instead of the slot number.
pub fn piece_label(player: PlayerId, slot: u8, stacked: bool) -> String {
    let initial = player.color_name().chars().next().unwrap_or('?');
    if stacked {
        format!("{}+", initial)
    } else {
        format!("{}{}", initial, slot)
    }
}

fn cell_label(kind: CellKind) -> &'static str {
    match kind {
        CellKind::Blank => "  ",
        CellKind::Yard(_) => "░░",
        CellKind::Track => "· ",
        CellKind::Safe => "✶ ",
        CellKind::HomeStretch(_) => "▒▒",
        CellKind::Centre => "██",
    }
}

/// Draws the board with all pieces, followed by a status block.
pub fn visualize(snapshot: &Snapshot) -> String {
    let mut labels: Vec<Vec<String>> = board_layout()
        .iter()
        .map(|row| row.iter().map(|&kind| cell_label(kind).to_owned()).collect())
        .collect();
    let mut occupied = [[0u8; GRID_CELLS]; GRID_CELLS];
    for piece in &snapshot.pieces {
        let col = (piece.pixel.x / CELL_SIZE) as usize;
        let row = (piece.pixel.y / CELL_SIZE) as usize;
        if col >= GRID_CELLS || row >= GRID_CELLS {
            continue;
        }
        occupied[row][col] += 1;
        labels[row][col] = piece_label(piece.player, piece.slot, occupied[row][col] > 1);
    }

    let mut result = String::from("╭");
    result += &"──".repeat(GRID_CELLS);
    result += "╮\n";
    for row in labels {
        result += "│";
        for label in row {
            result += &label;
        }
        result += "│\n";
    }
    result += "╰";
    result += &"──".repeat(GRID_CELLS);
    result += "╯\n";
    result += &status(snapshot);
    result
}

fn status(snapshot: &Snapshot) -> String {
    let state = snapshot.turn;
    let mut result = match state.phase {
        TurnPhase::AwaitingRoll => format!("{} to roll", state.turn),
        TurnPhase::AwaitingMove => format!("{} to move", state.last_turn),
        TurnPhase::Halted => String::from("Match over"),
    };
    if !snapshot.dice.is_empty() {
        result += &format!(", dice {:?}", snapshot.dice);
    } else if let Some(value) = snapshot.last_roll {
        result += &format!(", last roll {}", value);
    }
    result += "\nScores:";
    for player in PlayerId::ALL {
        result += &format!(" {} {}", player, snapshot.scores[player.index()]);
    }
    if !snapshot.winners.is_empty() {
        let winners: Vec<String> = snapshot.winners.iter().map(|p| p.to_string()).collect();
        result += &format!("\nFinishing order: {}", winners.join(", "));
    }
    result
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::{Board, Cell, DiceExchange, ScriptedDice, TurnControl, TurnScheduler};

    #[test]
    fn draws_pieces_and_status() {
        let [p0, p1, ..] = PlayerId::ALL;
        let mut board = Board::new(1).unwrap();
        board.move_piece(p0, 0, 6).unwrap();
        let mut turns =
            TurnControl::new(TurnScheduler::with_queue(vec![p1], StdRng::seed_from_u64(0)));
        let dice = DiceExchange::new(Box::new(ScriptedDice::new(vec![2]).unwrap()), &mut turns);
        let snapshot = Snapshot::capture(&board, &dice, &turns);

        let text = visualize(&snapshot);
        let lines: Vec<&str> = text.lines().collect();
        // Border, 15 rows, border, status
        assert_eq!(lines.len(), GRID_CELLS + 4);
        let (col, row) = crate::cell_coordinates(Cell::release(p0));
        let cells: Vec<char> = lines[row + 1].chars().collect();
        let label: String = cells[1 + 2 * col..3 + 2 * col].iter().collect();
        assert_eq!(label, "R0");
        assert_eq!(lines[GRID_CELLS + 2], "GREEN to roll");
        assert!(lines[GRID_CELLS + 3].starts_with("Scores: RED 0"));
    }

    #[test]
    fn stacked_pieces_are_marked() {
        assert_eq!(piece_label(PlayerId::ALL[3], 2, false), "B2");
        assert_eq!(piece_label(PlayerId::ALL[3], 2, true), "B+");
    }
}
