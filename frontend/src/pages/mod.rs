pub mod about;
pub mod atlas;
