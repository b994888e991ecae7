pub mod identity;
pub mod persistence;
pub mod supabase;

pub use identity::{FakeIdentityService, IdentityError, IdentityService, User};
pub use persistence::{InMemoryStore, RecordStore, StoreError};
pub use supabase::{Supabase, SupabaseConfig};
