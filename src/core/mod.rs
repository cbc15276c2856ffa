//! Client core shared by every front end

pub mod api;
pub mod auth;
pub mod gate;
pub mod identity;
pub mod models;
pub mod notifications;
pub mod requests;
pub mod storage;
pub mod validation;
