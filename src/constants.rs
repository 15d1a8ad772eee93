//! Shared crate-wide constants.

use std::time::Duration;

/// Rows occupied by a tab label in a single-row strip: the rounded top edge
/// plus the text row. The content frame's border line sits directly below.
pub const TAB_HEIGHT: u16 = 2;

/// Rows occupied by a tab label in a table row that does not hold the
/// selection. The extra row closes the label's bottom edge.
pub const CLOSED_TAB_HEIGHT: u16 = 3;

/// Rows occupied by a label when tabs are stacked on the left or right side.
pub const VERTICAL_TAB_HEIGHT: u16 = 3;

/// Horizontal padding inside a label on each side of its text.
pub const LABEL_PADDING: u16 = 1;

/// Length (in columns) of a ghost placeholder in a horizontal strip.
pub const GHOST_TAB_LENGTH: u16 = 2;

/// Length (in rows) of a ghost placeholder in a vertical strip.
pub const GHOST_TAB_LENGTH_VERTICAL: u16 = 1;

/// Length of the "more" overflow button along the strip axis.
pub const MORE_BUTTON_LENGTH: u16 = 3;

/// Length of the "more" overflow button in a vertical strip.
pub const MORE_BUTTON_LENGTH_VERTICAL: u16 = 1;

/// Glyph shown on the overflow button.
pub const MORE_GLYPH: &str = "»";

/// Frame period of the attraction blink.
///
/// Each elapsed period advances the blink counter of every attracted tab, so
/// a full on/off pulse takes two periods.
pub const ATTRACTION_INTERVAL: Duration = Duration::from_millis(500);

/// Default border thickness used when a caller asks for "default" borders.
pub const DEFAULT_BORDER: u16 = 1;
