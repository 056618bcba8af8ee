pub mod router;
pub mod types;
pub mod handlers {
    pub mod common;
    pub mod crosswalks;
    pub mod documents;
    pub mod health;
    pub mod roads;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;
