mod lock;
mod status;
mod unlock;

pub use lock::handle_lock;
pub use status::handle_status;
pub use unlock::handle_unlock;
