pub mod db;
pub mod id;
pub mod model;
pub mod validate;
