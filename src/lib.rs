//! Seven-segment and analog clock faces drawn onto a 2D surface.
//!
//! A host calls [`render::ClockFace::draw_clock`] on its own schedule and reads
//! the frame back with [`render::ClockFace::get_image_data`].

pub mod config;
pub mod core;
pub mod render;
