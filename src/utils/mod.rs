pub mod ident;
pub mod validate;

pub use ident::new_id;
pub use validate::{check_upload_size, require_name, require_username, sanitize_filename};
