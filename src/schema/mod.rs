pub mod meta;
pub mod model;
pub mod schema;
