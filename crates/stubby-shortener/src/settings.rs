use std::time::Duration;
use typed_builder::TypedBuilder;

/// Default bound on a single storage call.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// First identifier handed out by an empty store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdBase {
    /// Start at 0, so the first code is the single zero digit `"a"`.
    Zero,
    /// Start at 1, so the first code is `"b"`.
    #[default]
    One,
}

impl IdBase {
    pub fn value(self) -> u64 {
        match self {
            IdBase::Zero => 0,
            IdBase::One => 1,
        }
    }
}

/// Where identifiers are allocated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Allocation {
    /// An atomic counter inside this process, seeded from the store at
    /// start-up. Only valid while this process is the sole writer.
    #[default]
    InProcess,
    /// The storage engine's own key generation. Required when several
    /// processes write to one store. Identifiers then start at the engine's
    /// first key and `id_base` is ignored.
    Backend,
}

/// Configures a [`MappingStore`](crate::MappingStore).
#[derive(Debug, Clone, TypedBuilder)]
pub struct StoreSettings {
    #[builder(default)]
    pub id_base: IdBase,
    #[builder(default)]
    pub allocation: Allocation,
    /// Upper bound on every storage call made by `create` and `resolve`.
    /// `None` leaves calls unbounded unless the caller passes a deadline.
    #[builder(default = Some(DEFAULT_OPERATION_TIMEOUT))]
    pub operation_timeout: Option<Duration>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}
