//! Process-wide registries.
//!
//! Loading a snapshot needs three lookups by type name: action types,
//! condition primitives and board kinds. They are bundled in
//! [`Registries`]. Call sites that want full control pass a `Registries`
//! explicitly; everything else uses [`global`], which is either what the
//! host installed at startup with [`install`] or the vanilla set.
//!
//! Installation happens at most once per process:
//!
//! ```
//! use rust_piecework::registry::{self, Registries};
//!
//! let mut registries = Registries::vanilla();
//! registries.boards.register(
//!     rust_piecework::core::BoardKind::new("mod.hex").with_default_size(9, 9),
//! );
//! // The first install wins; later calls fail.
//! let _ = registry::install(registries);
//! assert!(registry::global().boards.contains("vanilla.basic"));
//! ```

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::conditions::PrimitiveRegistry;
use crate::core::BoardKind;
use crate::error::EngineError;
use crate::rules::ActionRegistry;

/// Registry of board kinds.
#[derive(Clone, Debug, Default)]
pub struct BoardKindRegistry {
    kinds: FxHashMap<String, BoardKind>,
    order: Vec<String>,
}

impl BoardKindRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Just `vanilla.basic`.
    #[must_use]
    pub fn with_vanilla() -> Self {
        let mut registry = Self::new();
        registry.register(BoardKind::vanilla_basic());
        registry
    }

    /// Register a board kind.
    ///
    /// # Panics
    ///
    /// Panics if a kind with the same name is already registered.
    pub fn register(&mut self, kind: BoardKind) {
        assert!(
            !self.kinds.contains_key(&kind.name),
            "board kind `{}` already registered",
            kind.name
        );
        self.order.push(kind.name.clone());
        self.kinds.insert(kind.name.clone(), kind);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BoardKind> {
        self.kinds.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Board kinds in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &BoardKind> {
        self.order.iter().filter_map(|name| self.kinds.get(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Everything needed to turn a snapshot into a playable board.
#[derive(Clone, Debug, Default)]
pub struct Registries {
    pub actions: ActionRegistry,
    pub primitives: PrimitiveRegistry,
    pub boards: BoardKindRegistry,
}

impl Registries {
    /// The engine's own types and primitives.
    #[must_use]
    pub fn vanilla() -> Self {
        Self {
            actions: ActionRegistry::with_vanilla(),
            primitives: PrimitiveRegistry::with_vanilla(),
            boards: BoardKindRegistry::with_vanilla(),
        }
    }
}

static GLOBAL: OnceLock<Registries> = OnceLock::new();

/// Install the process-wide registries.
///
/// Fails if they were already installed, or if [`global`] was already
/// called and fell back to the vanilla set.
pub fn install(registries: Registries) -> Result<(), EngineError> {
    GLOBAL.set(registries).map_err(|_| EngineError::RegistryInstalled)?;
    log::info!("installed process-wide registries");
    Ok(())
}

/// The process-wide registries, defaulting to [`Registries::vanilla`].
pub fn global() -> &'static Registries {
    GLOBAL.get_or_init(Registries::vanilla)
}
