pub mod feed;
pub mod video;
pub mod web;
