//! HTTP service: JSON API under `/api`, browsing pages under `/web`, and the
//! embedded stylesheet and script those pages load.

mod api;
mod error;
mod pages;
mod params;
mod server;

pub use server::serve;
