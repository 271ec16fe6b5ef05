// Job listings pipeline: WordPress record -> normalized text -> JobRecord -> envelope.
// All upstream calls go through wordpress_client; nothing here holds state between requests.

pub mod extract;
pub mod handlers;
pub mod query;
pub mod text;
pub mod transform;
