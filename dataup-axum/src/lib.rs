//! dataup-axum: HTTP transport for dataup.
//!
//! | method | path                  |                                   |
//! |--------|-----------------------|-----------------------------------|
//! | GET    | `/video`              | list video records                |
//! | POST   | `/video`              | create or update a record         |
//! | POST   | `/video/{id}/data`    | multipart upload, part `data`     |
//! | GET    | `/video/{id}/data`    | download the payload              |
//! | GET    | `/video/{id}/status`  | upload status                     |
//! | GET    | `/health`             | liveness                          |

pub mod app;
pub mod multipart;
pub mod origin;
pub mod rest;
pub mod state;
mod error;
pub use error::DataupAxumError;
pub use state::DataupAxumState;

pub use app::{axum, AxumApp};
