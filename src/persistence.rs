//! Opaque byte-stream persistence for a `Registry` (component C10, §6): `serde` derive plus
//! `bincode` round-trips every `Player`, `Game`, history, and the `Config` exactly. The only
//! contract is round-trip equality — no compatibility with any other system is claimed.

use std::io::{Read, Write};

use log::{debug, info};

use crate::error::{WhrError, WhrResult};
use crate::registry::Registry;

/// Serializes `registry` to `writer` as an opaque `bincode` byte stream.
pub fn save<W: Write>(registry: &Registry, writer: W) -> WhrResult<()> {
    bincode::serialize_into(writer, registry).map_err(|err| {
        WhrError::PersistenceError(format!("failed to serialize registry: {err}"))
    })?;
    info!(
        "persistence: saved registry with {} players, {} games",
        registry.player_count(),
        registry.game_count()
    );
    Ok(())
}

/// Deserializes a `Registry` previously written by [`save`] from `reader`. A truncated stream or
/// a format mismatch surfaces as `WhrError::PersistenceError` rather than panicking.
pub fn load<R: Read>(reader: R) -> WhrResult<Registry> {
    let registry: Registry = bincode::deserialize_from(reader).map_err(|err| {
        WhrError::PersistenceError(format!("failed to deserialize registry: {err}"))
    })?;
    debug!(
        "persistence: loaded registry with {} players, {} games",
        registry.player_count(),
        registry.game_count()
    );
    Ok(registry)
}
