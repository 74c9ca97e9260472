pub mod books;

use std::sync::Arc;

use bookshelf_kernel::ModuleRegistry;

use books::store::InMemoryBookStore;

/// Register all project-specific modules with the registry
///
/// Each module gets its own freshly constructed store.
pub fn register_all(registry: &mut ModuleRegistry) {
    registry.register(books::create_module(Arc::new(InMemoryBookStore::new())));
}
