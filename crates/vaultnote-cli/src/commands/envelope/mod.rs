mod inspect;
mod strength;
mod transform;

pub use inspect::handle_inspect;
pub use strength::handle_strength;
pub(crate) use transform::decrypt_error;
pub use transform::{handle_decrypt, handle_encrypt, handle_verify};
