use rand::Rng;
use uuid::Uuid;

/// Fresh random identifier for an entity created at runtime (e.g. a sent message).
pub fn new_id() -> Uuid {
    Uuid::new_v4()
}

/// Identifier drawn from a caller-supplied RNG.
/// Seeded generators use this so the same seed yields the same ids.
pub fn id_from_rng<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.random()).into_uuid()
}

/// Tag for one materialisation of a cache entry.
pub fn new_generation() -> Uuid {
    Uuid::new_v4()
}
