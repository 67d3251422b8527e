use crate::models::Entity;
use crate::types::Operation;

/// A mutation reported to observers once it has been applied
#[derive(Debug, Clone, Copy)]
pub struct ChangeEvent<'a> {
    pub store: &'a str,
    pub operation: Operation,
    pub ids: &'a [String],
}

/// Hook run after every store mutation
pub trait StoreObserver<T>: Send + Sync {
    /// Observer name for logging and debugging
    fn name(&self) -> &'static str;

    fn applies_to_operation(&self, _operation: Operation) -> bool {
        true
    }

    fn on_change(&self, event: &ChangeEvent<'_>, items: &[T]);
}

/// Emits one debug event per mutation
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl<T: Entity> StoreObserver<T> for TracingObserver {
    fn name(&self) -> &'static str {
        "TracingObserver"
    }

    fn on_change(&self, event: &ChangeEvent<'_>, items: &[T]) {
        tracing::debug!(
            store = %event.store,
            operation = event.operation.as_str(),
            affected = event.ids.len(),
            total = items.len(),
            "Store changed"
        );
    }
}
