//! Engine configuration.
//!
//! Games configure the engine at startup:
//! - `EngineConfig`: search and loading knobs for the analyzer
//! - `BoardKind`: per board type settings (color map, default size)
//!
//! The defaults reproduce the reference rule set; changing them is only
//! needed for variants that want ambiguous reactions or strict loading.

use serde::{Deserialize, Serialize};

/// Search and loading configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// A passive behaviour whose action produces more branches than this is
    /// dropped: a reaction must be unambiguous.
    pub passive_branch_limit: usize,

    /// Whether the piece that made the move may also react to it.
    pub reactions_include_initiator: bool,

    /// Treat every load issue as a hard error instead of a warning.
    pub strict_load: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            passive_branch_limit: 1,
            reactions_include_initiator: false,
            strict_load: false,
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the passive branch limit.
    #[must_use]
    pub fn with_passive_branch_limit(mut self, limit: usize) -> Self {
        self.passive_branch_limit = limit;
        self
    }

    /// Allow the moving piece to react to its own move.
    #[must_use]
    pub fn with_initiator_reactions(mut self, include: bool) -> Self {
        self.reactions_include_initiator = include;
        self
    }

    /// Fail loads on any issue.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict_load = true;
        self
    }
}

/// Configuration for one kind of board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardKind {
    /// Type name stored in snapshots (e.g. `vanilla.basic`).
    pub name: String,

    /// Colors assigned to nation color indices.
    pub colormap: Vec<String>,

    /// Size given to freshly created boards of this kind.
    pub default_size: (i32, i32),
}

impl BoardKind {
    /// Create a board kind with an empty color map and an 8x8 default size.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            colormap: Vec::new(),
            default_size: (8, 8),
        }
    }

    /// Set the color map.
    #[must_use]
    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colormap = colors.into_iter().map(Into::into).collect();
        self
    }

    /// Set the default size.
    #[must_use]
    pub fn with_default_size(mut self, width: i32, height: i32) -> Self {
        self.default_size = (width, height);
        self
    }

    /// Look up the color for a nation color index.
    #[must_use]
    pub fn color(&self, index: i32) -> Option<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.colormap.get(i))
            .map(String::as_str)
    }

    /// The basic rectangular board shipped with the engine.
    #[must_use]
    pub fn vanilla_basic() -> Self {
        Self::new("vanilla.basic")
            .with_colors(["white", "black"])
            .with_default_size(8, 8)
    }
}
