use ludo::{visualize, Point, Snapshot};
use tracing::trace;

/// Pointer input, polled once per tick.
pub trait InputSource {
    fn pointer_position(&mut self) -> Point;

    /// Whether a click happened since the last call.
    fn was_clicked(&mut self) -> bool;

    /// The user wants to quit, e.g. closed the window.
    fn should_close(&mut self) -> bool {
        false
    }
}

/// Draws a frame.
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot) -> anyhow::Result<()>;
}

/// Something that takes input and draws frames, like a window.
pub trait Frontend: InputSource + Renderer {}

impl<T: InputSource + Renderer> Frontend for T {}

/// Writes the board to the log whenever it changes.
#[derive(Debug, Default)]
pub struct LogRenderer {
    last: Option<Snapshot>,
}

impl Renderer for LogRenderer {
    fn render(&mut self, snapshot: &Snapshot) -> anyhow::Result<()> {
        if self.last.as_ref() != Some(snapshot) {
            trace!("\n{}", visualize(snapshot));
            self.last = Some(snapshot.clone());
        }
        Ok(())
    }
}
