//! Engine-wide configuration.
//!
//! There is no on-disk config format: the host embeds the engine and
//! supplies an [`EngineConfig`] programmatically at construction time, so
//! this module carries no parsing crate, just a plain builder-style struct.

/// Tunables fixed for the lifetime of an [`crate::controller::Engine`].
///
/// Passed once to `Engine::new` and immutable afterward — a mid-session
/// config change is a new engine plus a `save`/`load` round-trip, not a
/// mutation method on this type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Minimum (and, by symmetry, `1.0 - min_ratio` maximum) allowed value
    /// for any side of a split. Spec default: `0.05`.
    pub min_ratio: f64,
    /// Thickness, in the host's geometry units, of the draggable handle
    /// between a split's two children. Spec default: `4.0`.
    pub handle_thickness: f64,
    /// Size below which a leaf's allocated rectangle is flagged as
    /// overflowing rather than shrinking further. Spec default: `(20.0, 20.0)`.
    pub min_leaf_size: (f64, f64),
    /// Maximum number of undo entries retained; the oldest is discarded
    /// once the bound is exceeded. Spec default: `100`.
    pub undo_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_ratio: 0.05,
            handle_thickness: 4.0,
            min_leaf_size: (20.0, 20.0),
            undo_capacity: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.min_ratio, 0.05);
        assert_eq!(config.handle_thickness, 4.0);
        assert_eq!(config.min_leaf_size, (20.0, 20.0));
        assert_eq!(config.undo_capacity, 100);
    }
}
