pub mod authority;
pub mod errors;
pub mod memory;
pub mod store;

pub use authority::SessionAuthority;
pub use errors::AuthError;
pub use memory::InMemorySessionStore;
pub use store::session_key;
pub use store::SessionStore;
pub use store::SessionStoreError;
